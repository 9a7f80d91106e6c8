//! Modelos de perfiles de rol
//!
//! Cada perfil (CarOwner, Mechanic, Garage) envuelve exactamente un usuario
//! autenticado (one-to-one con la tabla users). Mechanic y Garage pasan por
//! un flujo de aprobación antes de poder operar.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Estado de aprobación para mecánicos y garajes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApprovalStatus::Pending => "pending",
            ApprovalStatus::Approved => "approved",
            ApprovalStatus::Rejected => "rejected",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(ApprovalStatus::Pending),
            "approved" => Some(ApprovalStatus::Approved),
            "rejected" => Some(ApprovalStatus::Rejected),
            _ => None,
        }
    }
}

/// Propietario de vehículo - tabla car_owners
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CarOwner {
    pub id: Uuid,
    pub user_id: Uuid,
    pub phone_number: String,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

/// Conductor/mecánico - tabla mechanics
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Mechanic {
    pub id: Uuid,
    pub user_id: Uuid,
    pub phone_number: String,
    pub address: String,
    pub id_number: String,
    pub license_number: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl Mechanic {
    pub fn is_approved(&self) -> bool {
        self.status == ApprovalStatus::Approved.as_str()
    }
}

/// Garaje - tabla garages
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Garage {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub owner_name: String,
    pub owner_phone: String,
    pub owner_email: String,
    pub address: String,
    pub location: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl Garage {
    pub fn is_approved(&self) -> bool {
        self.status == ApprovalStatus::Approved.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approval_status_round_trip() {
        for status in [ApprovalStatus::Pending, ApprovalStatus::Approved, ApprovalStatus::Rejected] {
            assert_eq!(ApprovalStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(ApprovalStatus::parse("unknown"), None);
    }
}
