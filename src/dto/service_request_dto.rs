use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::service_request::ServiceRequest;
use crate::models::work_item::WorkItem;

// Request para crear un service request (el status siempre se fuerza a pending)
#[derive(Debug, Deserialize, Validate)]
pub struct CreateServiceRequestRequest {
    pub car_id: Uuid,

    #[validate(custom = "crate::utils::validation::validate_not_empty")]
    pub pickup_location: String,

    pub preferred_date: NaiveDate,
    pub preferred_time: NaiveTime,

    #[validate(length(min = 1, max = 200))]
    pub service_type: String,

    #[serde(default)]
    pub special_instructions: String,
}

// Body de deliver_to_garage
#[derive(Debug, Deserialize)]
pub struct DeliverToGarageRequest {
    pub garage_id: Uuid,
}

// Body de add_work_item
#[derive(Debug, Deserialize, Validate)]
pub struct AddWorkItemRequest {
    #[validate(length(min = 1, max = 300))]
    pub description: String,

    #[validate(custom = "crate::utils::validation::validate_non_negative_cost")]
    pub cost: Decimal,
}

// Body de remove_work_item
#[derive(Debug, Deserialize)]
pub struct RemoveWorkItemRequest {
    pub work_item_id: Uuid,
}

// Body de assign_mechanic (override de admin)
#[derive(Debug, Deserialize)]
pub struct AssignMechanicRequest {
    pub mechanic_id: Uuid,
}

// Body de update_status (override de admin)
#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

// Response de work item
#[derive(Debug, Serialize)]
pub struct WorkItemResponse {
    pub id: Uuid,
    pub service_request_id: Uuid,
    pub description: String,
    pub cost: Decimal,
    pub created_at: DateTime<Utc>,
}

impl From<WorkItem> for WorkItemResponse {
    fn from(item: WorkItem) -> Self {
        Self {
            id: item.id,
            service_request_id: item.service_request_id,
            description: item.description,
            cost: item.cost,
            created_at: item.created_at,
        }
    }
}

// Response de service request con el desglose de costos derivados
#[derive(Debug, Serialize)]
pub struct ServiceRequestResponse {
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
    pub garage_commission: Decimal,
    pub garage_earnings: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub work_items: Vec<WorkItemResponse>,
}

impl ServiceRequestResponse {
    pub fn from_request(request: ServiceRequest, work_items: Vec<WorkItem>) -> Self {
        use crate::services::cost_model;

        let garage_commission = cost_model::garage_commission(request.garage_cost);
        let garage_earnings = cost_model::garage_earnings(request.garage_cost);

        Self {
            id: request.id,
            car_id: request.car_id,
            owner_id: request.owner_id,
            pickup_location: request.pickup_location,
            preferred_date: request.preferred_date,
            preferred_time: request.preferred_time,
            service_type: request.service_type,
            special_instructions: request.special_instructions,
            status: request.status,
            assigned_mechanic_id: request.assigned_mechanic_id,
            assigned_garage_id: request.assigned_garage_id,
            garage_cost: request.garage_cost,
            total_cost: request.total_cost,
            garage_commission,
            garage_earnings,
            created_at: request.created_at,
            updated_at: request.updated_at,
            work_items: work_items.into_iter().map(WorkItemResponse::from).collect(),
        }
    }
}

// Resumen de costos que devuelven las operaciones del ledger
#[derive(Debug, Serialize)]
pub struct CostSummary {
    pub garage_cost: Decimal,
    pub total_cost: Decimal,
}
