pub mod auth_dto;
pub mod car_dto;
pub mod common;
pub mod notification_dto;
pub mod profile_dto;
pub mod service_request_dto;
