pub mod car;
pub mod notification;
pub mod profiles;
pub mod service_request;
pub mod user;
pub mod work_item;
