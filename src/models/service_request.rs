//! Modelo de ServiceRequest y su máquina de estados
//!
//! El ciclo de vida es un pipeline estricto:
//! pending → assigned → picked_up → in_service → completed → delivered,
//! con cancelled alcanzable por override de admin. Las filas nunca se
//! borran (audit trail) y `total_cost` es siempre una función pura de
//! `garage_cost`.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Estados del ciclo de vida de un service request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    Assigned,
    PickedUp,
    InService,
    Completed,
    // El flujo de conductor escribe `delivered`; `returned` se mantiene
    // como alias terminal reconocido para overrides de admin.
    Returned,
    Delivered,
    Cancelled,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 8] = [
        RequestStatus::Pending,
        RequestStatus::Assigned,
        RequestStatus::PickedUp,
        RequestStatus::InService,
        RequestStatus::Completed,
        RequestStatus::Returned,
        RequestStatus::Delivered,
        RequestStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Assigned => "assigned",
            RequestStatus::PickedUp => "picked_up",
            RequestStatus::InService => "in_service",
            RequestStatus::Completed => "completed",
            RequestStatus::Returned => "returned",
            RequestStatus::Delivered => "delivered",
            RequestStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "pending" => Some(RequestStatus::Pending),
            "assigned" => Some(RequestStatus::Assigned),
            "picked_up" => Some(RequestStatus::PickedUp),
            "in_service" => Some(RequestStatus::InService),
            "completed" => Some(RequestStatus::Completed),
            "returned" => Some(RequestStatus::Returned),
            "delivered" => Some(RequestStatus::Delivered),
            "cancelled" => Some(RequestStatus::Cancelled),
            _ => None,
        }
    }

}

/// ServiceRequest - mapea exactamente a la tabla service_requests
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ServiceRequest {
    pub id: Uuid,
    pub car_id: Uuid,
    pub owner_id: Uuid,
    pub pickup_location: String,
    pub preferred_date: NaiveDate,
    pub preferred_time: NaiveTime,
    pub service_type: String,
    pub special_instructions: String,
    pub status: String,
    pub assigned_mechanic_id: Option<Uuid>,
    pub assigned_garage_id: Option<Uuid>,
    pub garage_cost: Decimal,
    pub total_cost: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ServiceRequest {
    /// Estado actual parseado; la columna solo admite valores del enum
    pub fn request_status(&self) -> Option<RequestStatus> {
        RequestStatus::parse(&self.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in RequestStatus::ALL {
            assert_eq!(RequestStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(RequestStatus::parse("shipped"), None);
    }
}
