//! Modelo de Car
//!
//! Vehículos registrados por un propietario; cada service request
//! referencia exactamente un vehículo.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Car - mapea exactamente a la tabla cars
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Car {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub registration_number: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

impl Car {
    /// Etiqueta legible para notificaciones ("Toyota Corolla")
    pub fn label(&self) -> String {
        format!("{} {}", self.make, self.model)
    }
}
