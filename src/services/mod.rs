pub mod cost_model;
pub mod email_service;
pub mod notification_service;
pub mod request_lifecycle;
pub mod role_resolver;
pub mod work_ledger;
