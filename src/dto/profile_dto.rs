use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// Request para registrar un propietario
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterOwnerRequest {
    #[validate(length(min = 2, max = 100))]
    pub full_name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 6, max = 100))]
    pub password: String,

    #[validate(custom = "crate::utils::validation::validate_phone")]
    pub phone_number: String,

    #[validate(length(min = 1))]
    pub address: String,
}

// Request para registrar un conductor/mecánico (queda pending)
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterMechanicRequest {
    #[validate(length(min = 2, max = 100))]
    pub full_name: String,

    #[validate(email)]
    pub email: String,

    #[validate(length(min = 6, max = 100))]
    pub password: String,

    #[validate(custom = "crate::utils::validation::validate_phone")]
    pub phone_number: String,

    #[validate(length(min = 1))]
    pub address: String,

    #[validate(length(min = 1, max = 50))]
    pub id_number: String,

    #[serde(default)]
    pub license_number: String,
}

// Request para registrar un garaje (queda pending)
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterGarageRequest {
    #[validate(length(min = 2, max = 200))]
    pub name: String,

    #[validate(length(min = 2, max = 200))]
    pub owner_name: String,

    #[validate(custom = "crate::utils::validation::validate_phone")]
    pub owner_phone: String,

    #[validate(email)]
    pub owner_email: String,

    #[validate(length(min = 6, max = 100))]
    pub password: String,

    #[validate(length(min = 1))]
    pub address: String,

    #[validate(length(min = 1, max = 200))]
    pub location: String,
}

// Response de propietario
#[derive(Debug, Serialize)]
pub struct OwnerResponse {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

// Response de conductor/mecánico
#[derive(Debug, Serialize)]
pub struct MechanicResponse {
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    pub phone_number: String,
    pub address: String,
    pub id_number: String,
    pub license_number: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

// Response de garaje
#[derive(Debug, Serialize)]
pub struct GarageResponse {
    pub id: Uuid,
    pub name: String,
    pub owner_name: String,
    pub owner_phone: String,
    pub owner_email: String,
    pub address: String,
    pub location: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
