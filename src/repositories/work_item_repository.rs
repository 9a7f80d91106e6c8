use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::work_item::WorkItem;
use crate::utils::errors::AppError;

pub struct WorkItemRepository {
    pool: PgPool,
}

impl WorkItemRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_for_request(&self, request_id: Uuid) -> Result<Vec<WorkItem>, AppError> {
        let items = sqlx::query_as::<_, WorkItem>(
            "SELECT * FROM service_work_items WHERE service_request_id = $1 ORDER BY created_at",
        )
        .bind(request_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    pub async fn insert_tx(
        conn: &mut PgConnection,
        request_id: Uuid,
        description: &str,
        cost: Decimal,
    ) -> Result<WorkItem, AppError> {
        let item = sqlx::query_as::<_, WorkItem>(
            r#"
            INSERT INTO service_work_items (id, service_request_id, description, cost, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(request_id)
        .bind(description)
        .bind(cost)
        .fetch_one(conn)
        .await?;

        Ok(item)
    }

    /// Borra el item solo si pertenece al request indicado
    pub async fn delete_tx(
        conn: &mut PgConnection,
        item_id: Uuid,
        request_id: Uuid,
    ) -> Result<bool, AppError> {
        let result =
            sqlx::query("DELETE FROM service_work_items WHERE id = $1 AND service_request_id = $2")
                .bind(item_id)
                .bind(request_id)
                .execute(conn)
                .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Suma de todos los items vigentes del request (recompute from scratch)
    pub async fn sum_for_request_tx(
        conn: &mut PgConnection,
        request_id: Uuid,
    ) -> Result<Decimal, AppError> {
        let result: (Decimal,) = sqlx::query_as(
            "SELECT COALESCE(SUM(cost), 0) FROM service_work_items WHERE service_request_id = $1",
        )
        .bind(request_id)
        .fetch_one(conn)
        .await?;

        Ok(result.0)
    }
}
