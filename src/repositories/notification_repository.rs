use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::models::notification::{Notification, Recipient};
use crate::utils::errors::AppError;

pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>, AppError> {
        let notification =
            sqlx::query_as::<_, Notification>("SELECT * FROM notifications WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(notification)
    }

    /// Insertar una notificación dentro de la transacción de una transición,
    /// para que nunca quede registrada sin el cambio de estado (ni al revés)
    pub async fn insert_tx(
        conn: &mut PgConnection,
        recipient: Recipient,
        title: &str,
        message: &str,
    ) -> Result<Notification, AppError> {
        let (mechanic_id, garage_id, owner_id) = recipient.columns();

        let notification = sqlx::query_as::<_, Notification>(
            r#"
            INSERT INTO notifications
                (id, recipient_type, recipient_mechanic_id, recipient_garage_id,
                 recipient_owner_id, title, message, is_read, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, false, NOW())
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(recipient.recipient_type().as_str())
        .bind(mechanic_id)
        .bind(garage_id)
        .bind(owner_id)
        .bind(title)
        .bind(message)
        .fetch_one(conn)
        .await?;

        Ok(notification)
    }

    pub async fn insert(
        &self,
        recipient: Recipient,
        title: &str,
        message: &str,
    ) -> Result<Notification, AppError> {
        let mut conn = self.pool.acquire().await?;
        Self::insert_tx(&mut conn, recipient, title, message).await
    }

    // ---- Listados con scoping por rol ----

    pub async fn list_all(&self) -> Result<Vec<Notification>, AppError> {
        let notifications = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    pub async fn list_for_owner(&self, owner_id: Uuid) -> Result<Vec<Notification>, AppError> {
        let notifications = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE recipient_owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    pub async fn list_for_mechanic(
        &self,
        mechanic_id: Uuid,
    ) -> Result<Vec<Notification>, AppError> {
        let notifications = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE recipient_mechanic_id = $1 ORDER BY created_at DESC",
        )
        .bind(mechanic_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    pub async fn list_for_garage(&self, garage_id: Uuid) -> Result<Vec<Notification>, AppError> {
        let notifications = sqlx::query_as::<_, Notification>(
            "SELECT * FROM notifications WHERE recipient_garage_id = $1 ORDER BY created_at DESC",
        )
        .bind(garage_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(notifications)
    }

    pub async fn mark_read(&self, id: Uuid) -> Result<Notification, AppError> {
        let notification = sqlx::query_as::<_, Notification>(
            "UPDATE notifications SET is_read = true WHERE id = $1 RETURNING *",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))?;

        Ok(notification)
    }
}
