use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// Request para registrar un vehículo
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCarRequest {
    #[validate(length(min = 1, max = 100))]
    pub make: String,

    #[validate(length(min = 1, max = 100))]
    pub model: String,

    #[validate(range(min = 1950, max = 2100))]
    pub year: i32,

    #[validate(length(min = 1, max = 50))]
    pub registration_number: String,

    #[validate(length(min = 1, max = 50))]
    pub color: String,
}

// Response de vehículo
#[derive(Debug, Serialize)]
pub struct CarResponse {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub registration_number: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

impl From<crate::models::car::Car> for CarResponse {
    fn from(car: crate::models::car::Car) -> Self {
        Self {
            id: car.id,
            owner_id: car.owner_id,
            make: car.make,
            model: car.model,
            year: car.year,
            registration_number: car.registration_number,
            color: car.color,
            created_at: car.created_at,
        }
    }
}
