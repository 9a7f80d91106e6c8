//! Controller de notificaciones

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::ApiResponse;
use crate::dto::notification_dto::{BroadcastRequest, NotificationResponse};
use crate::services::notification_service::NotificationService;
use crate::services::role_resolver::Role;
use crate::utils::errors::AppError;

pub struct NotificationController {
    notifications: NotificationService,
}

impl NotificationController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            notifications: NotificationService::new(pool),
        }
    }

    pub async fn list(&self, role: &Role) -> Result<Vec<NotificationResponse>, AppError> {
        let notifications = self.notifications.list_for_role(role).await?;
        Ok(notifications.into_iter().map(NotificationResponse::from).collect())
    }

    pub async fn mark_read(
        &self,
        role: &Role,
        id: Uuid,
    ) -> Result<ApiResponse<NotificationResponse>, AppError> {
        let notification = self.notifications.mark_read(role, id).await?;
        Ok(ApiResponse::success_with_message(
            NotificationResponse::from(notification),
            "Notification marked as read".to_string(),
        ))
    }

    pub async fn broadcast_to_mechanics(
        &self,
        role: &Role,
        request: BroadcastRequest,
    ) -> Result<ApiResponse<()>, AppError> {
        request.validate()?;

        let count = self
            .notifications
            .broadcast_to_mechanics(role, &request.title, &request.message)
            .await?;

        Ok(ApiResponse::message_only(format!(
            "Notification sent to {} mechanics",
            count
        )))
    }

    pub async fn broadcast_to_garages(
        &self,
        role: &Role,
        request: BroadcastRequest,
    ) -> Result<ApiResponse<()>, AppError> {
        request.validate()?;

        let count = self
            .notifications
            .broadcast_to_garages(role, &request.title, &request.message)
            .await?;

        Ok(ApiResponse::message_only(format!(
            "Notification sent to {} garages",
            count
        )))
    }
}
