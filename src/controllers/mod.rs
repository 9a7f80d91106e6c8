pub mod auth_controller;
pub mod car_controller;
pub mod notification_controller;
pub mod profile_controller;
pub mod service_request_controller;
