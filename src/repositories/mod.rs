pub mod car_repository;
pub mod notification_repository;
pub mod profile_repository;
pub mod service_request_repository;
pub mod user_repository;
pub mod work_item_repository;
