//! Acceso a datos de service requests
//!
//! La fila de service request es el único recurso contendido del sistema:
//! todas las escrituras del ciclo de vida pasan por las variantes `_tx`
//! bajo un `SELECT ... FOR UPDATE` para serializar transiciones
//! concurrentes sobre el mismo request.

use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::service_request::{RequestStatus, ServiceRequest};
use crate::utils::errors::AppError;

pub struct ServiceRequestRepository {
    pool: PgPool,
}

impl ServiceRequestRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        car_id: Uuid,
        owner_id: Uuid,
        pickup_location: &str,
        preferred_date: chrono::NaiveDate,
        preferred_time: chrono::NaiveTime,
        service_type: &str,
        special_instructions: &str,
    ) -> Result<ServiceRequest, AppError> {
        let request = sqlx::query_as::<_, ServiceRequest>(
            r#"
            INSERT INTO service_requests
                (id, car_id, owner_id, pickup_location, preferred_date, preferred_time,
                 service_type, special_instructions, status, garage_cost, total_cost,
                 created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'pending', 0, 0, NOW(), NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(car_id)
        .bind(owner_id)
        .bind(pickup_location)
        .bind(preferred_date)
        .bind(preferred_time)
        .bind(service_type)
        .bind(special_instructions)
        .fetch_one(&self.pool)
        .await?;

        Ok(request)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<ServiceRequest>, AppError> {
        let request =
            sqlx::query_as::<_, ServiceRequest>("SELECT * FROM service_requests WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(request)
    }

    /// Bloquea la fila del request dentro de una transacción.
    /// El segundo caller concurrente queda esperando aquí y al despertar
    /// observa el status ya avanzado.
    pub async fn find_by_id_for_update(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<ServiceRequest>, AppError> {
        let request = sqlx::query_as::<_, ServiceRequest>(
            "SELECT * FROM service_requests WHERE id = $1 FOR UPDATE",
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(request)
    }

    // ---- Listados con scoping por rol ----

    pub async fn list_all(&self) -> Result<Vec<ServiceRequest>, AppError> {
        let requests = sqlx::query_as::<_, ServiceRequest>(
            "SELECT * FROM service_requests ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    pub async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<ServiceRequest>, AppError> {
        let requests = sqlx::query_as::<_, ServiceRequest>(
            "SELECT * FROM service_requests WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    /// Un conductor ve los requests pendientes (para aceptarlos) más los
    /// que tiene asignados
    pub async fn list_for_mechanic(
        &self,
        mechanic_id: Uuid,
    ) -> Result<Vec<ServiceRequest>, AppError> {
        let requests = sqlx::query_as::<_, ServiceRequest>(
            r#"
            SELECT * FROM service_requests
            WHERE status = 'pending' OR assigned_mechanic_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(mechanic_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    pub async fn list_for_garage(&self, garage_id: Uuid) -> Result<Vec<ServiceRequest>, AppError> {
        let requests = sqlx::query_as::<_, ServiceRequest>(
            "SELECT * FROM service_requests WHERE assigned_garage_id = $1 ORDER BY created_at DESC",
        )
        .bind(garage_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(requests)
    }

    // ---- Escrituras del ciclo de vida (siempre dentro de transacción) ----

    pub async fn set_status_tx(
        conn: &mut PgConnection,
        id: Uuid,
        status: RequestStatus,
    ) -> Result<ServiceRequest, AppError> {
        let request = sqlx::query_as::<_, ServiceRequest>(
            "UPDATE service_requests SET status = $2, updated_at = NOW() WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_one(conn)
        .await?;

        Ok(request)
    }

    pub async fn set_mechanic_and_status_tx(
        conn: &mut PgConnection,
        id: Uuid,
        mechanic_id: Uuid,
        status: RequestStatus,
    ) -> Result<ServiceRequest, AppError> {
        let request = sqlx::query_as::<_, ServiceRequest>(
            r#"
            UPDATE service_requests
            SET assigned_mechanic_id = $2, status = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(mechanic_id)
        .bind(status.as_str())
        .fetch_one(conn)
        .await?;

        Ok(request)
    }

    pub async fn set_garage_and_status_tx(
        conn: &mut PgConnection,
        id: Uuid,
        garage_id: Uuid,
        status: RequestStatus,
    ) -> Result<ServiceRequest, AppError> {
        let request = sqlx::query_as::<_, ServiceRequest>(
            r#"
            UPDATE service_requests
            SET assigned_garage_id = $2, status = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(garage_id)
        .bind(status.as_str())
        .fetch_one(conn)
        .await?;

        Ok(request)
    }

    /// Actualiza los costos derivados; status y costos se escriben en la
    /// misma sentencia para que nunca haya aplicación parcial
    pub async fn set_costs_tx(
        conn: &mut PgConnection,
        id: Uuid,
        garage_cost: Decimal,
        total_cost: Decimal,
        status: RequestStatus,
    ) -> Result<ServiceRequest, AppError> {
        let request = sqlx::query_as::<_, ServiceRequest>(
            r#"
            UPDATE service_requests
            SET garage_cost = $2, total_cost = $3, status = $4, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(garage_cost)
        .bind(total_cost)
        .bind(status.as_str())
        .fetch_one(conn)
        .await?;

        Ok(request)
    }
}
