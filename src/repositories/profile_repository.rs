//! Acceso a datos de los perfiles de rol
//!
//! Un usuario tiene a lo sumo un perfil de cada tipo (one-to-one).
//! El role resolver consulta estas tablas en orden de precedencia fija.

use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::profiles::{ApprovalStatus, CarOwner, Garage, Mechanic};
use crate::utils::errors::AppError;

pub struct ProfileRepository {
    pool: PgPool,
}

impl ProfileRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // ---- Car owners ----

    pub async fn find_owner_by_user(&self, user_id: Uuid) -> Result<Option<CarOwner>, AppError> {
        let owner = sqlx::query_as::<_, CarOwner>("SELECT * FROM car_owners WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(owner)
    }

    pub async fn create_owner_tx(
        conn: &mut PgConnection,
        user_id: Uuid,
        phone_number: &str,
        address: &str,
    ) -> Result<CarOwner, AppError> {
        let owner = sqlx::query_as::<_, CarOwner>(
            r#"
            INSERT INTO car_owners (id, user_id, phone_number, address, created_at)
            VALUES ($1, $2, $3, $4, NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(phone_number)
        .bind(address)
        .fetch_one(conn)
        .await?;

        Ok(owner)
    }

    // ---- Mechanics (drivers) ----

    pub async fn find_mechanic_by_id_tx(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<Mechanic>, AppError> {
        let mechanic = sqlx::query_as::<_, Mechanic>("SELECT * FROM mechanics WHERE id = $1")
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(mechanic)
    }

    pub async fn find_mechanic_by_user(&self, user_id: Uuid) -> Result<Option<Mechanic>, AppError> {
        let mechanic = sqlx::query_as::<_, Mechanic>("SELECT * FROM mechanics WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(mechanic)
    }

    pub async fn list_mechanics_by_status(
        &self,
        status: ApprovalStatus,
    ) -> Result<Vec<Mechanic>, AppError> {
        let mechanics = sqlx::query_as::<_, Mechanic>(
            "SELECT * FROM mechanics WHERE status = $1 ORDER BY created_at DESC",
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(mechanics)
    }

    pub async fn create_mechanic_tx(
        conn: &mut PgConnection,
        user_id: Uuid,
        phone_number: &str,
        address: &str,
        id_number: &str,
        license_number: &str,
    ) -> Result<Mechanic, AppError> {
        let mechanic = sqlx::query_as::<_, Mechanic>(
            r#"
            INSERT INTO mechanics (id, user_id, phone_number, address, id_number, license_number, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, 'pending', NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(phone_number)
        .bind(address)
        .bind(id_number)
        .bind(license_number)
        .fetch_one(conn)
        .await?;

        Ok(mechanic)
    }

    pub async fn set_mechanic_status(
        &self,
        id: Uuid,
        status: ApprovalStatus,
    ) -> Result<Mechanic, AppError> {
        let mechanic = sqlx::query_as::<_, Mechanic>(
            "UPDATE mechanics SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Mechanic not found".to_string()))?;

        Ok(mechanic)
    }

    // ---- Garages ----

    pub async fn find_garage_by_id_tx(
        conn: &mut PgConnection,
        id: Uuid,
    ) -> Result<Option<Garage>, AppError> {
        let garage = sqlx::query_as::<_, Garage>("SELECT * FROM garages WHERE id = $1")
            .bind(id)
            .fetch_optional(conn)
            .await?;

        Ok(garage)
    }

    pub async fn find_garage_by_user(&self, user_id: Uuid) -> Result<Option<Garage>, AppError> {
        let garage = sqlx::query_as::<_, Garage>("SELECT * FROM garages WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(garage)
    }

    pub async fn list_garages_by_status(
        &self,
        status: ApprovalStatus,
    ) -> Result<Vec<Garage>, AppError> {
        let garages = sqlx::query_as::<_, Garage>(
            "SELECT * FROM garages WHERE status = $1 ORDER BY created_at DESC",
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(garages)
    }

    pub async fn create_garage_tx(
        conn: &mut PgConnection,
        user_id: Uuid,
        name: &str,
        owner_name: &str,
        owner_phone: &str,
        owner_email: &str,
        address: &str,
        location: &str,
    ) -> Result<Garage, AppError> {
        let garage = sqlx::query_as::<_, Garage>(
            r#"
            INSERT INTO garages (id, user_id, name, owner_name, owner_phone, owner_email, address, location, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'pending', NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(name)
        .bind(owner_name)
        .bind(owner_phone)
        .bind(owner_email)
        .bind(address)
        .bind(location)
        .fetch_one(conn)
        .await?;

        Ok(garage)
    }

    pub async fn set_garage_status(
        &self,
        id: Uuid,
        status: ApprovalStatus,
    ) -> Result<Garage, AppError> {
        let garage = sqlx::query_as::<_, Garage>(
            "UPDATE garages SET status = $2 WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Garage not found".to_string()))?;

        Ok(garage)
    }
}
