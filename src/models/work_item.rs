//! Modelo de ServiceWorkItem
//!
//! Una línea facturable de trabajo del garaje, siempre ligada a un
//! service request. El costo agregado del padre se recalcula desde cero
//! con la suma de los items vigentes (nunca por deltas).

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// ServiceWorkItem - mapea exactamente a la tabla service_work_items
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct WorkItem {
    pub id: Uuid,
    pub service_request_id: Uuid,
    pub description: String,
    pub cost: Decimal,
    pub created_at: DateTime<Utc>,
}
