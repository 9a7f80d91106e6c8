//! Modelo de User
//!
//! Este módulo contiene el struct User que mapea a la tabla `users`.
//! El rol de negocio (owner / mechanic / garage / admin) no vive aquí:
//! se resuelve por request en `services::role_resolver`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// User - mapea exactamente a la tabla users
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: String,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
}
