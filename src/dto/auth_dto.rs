use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// Request de login
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

// Datos del usuario autenticado que se devuelven al frontend.
// `user_type` lo determina el role resolver, nunca el cliente.
#[derive(Debug, Serialize)]
pub struct SessionUser {
    pub id: Uuid,
    pub email: String,
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_owner_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mechanic_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub garage_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

// Response de login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user_type: String,
    pub user: SessionUser,
}

// Response de /auth/me
#[derive(Debug, Serialize)]
pub struct CurrentUserResponse {
    pub user_type: String,
    pub user: SessionUser,
}
