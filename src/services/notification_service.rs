//! Notificaciones in-app: listado con scoping por rol, marcado de
//! lectura autorizado y broadcasts de admin.

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::notification::{Notification, Recipient};
use crate::models::profiles::ApprovalStatus;
use crate::repositories::notification_repository::NotificationRepository;
use crate::repositories::profile_repository::ProfileRepository;
use crate::services::request_lifecycle::require_admin;
use crate::services::role_resolver::Role;
use crate::utils::errors::{AppError, AppResult};

pub struct NotificationService {
    notifications: NotificationRepository,
    profiles: ProfileRepository,
}

impl NotificationService {
    pub fn new(pool: PgPool) -> Self {
        Self {
            notifications: NotificationRepository::new(pool.clone()),
            profiles: ProfileRepository::new(pool),
        }
    }

    /// Cada rol ve solo sus notificaciones; el admin las ve todas;
    /// una identidad sin rol ve una lista vacía.
    pub async fn list_for_role(&self, role: &Role) -> AppResult<Vec<Notification>> {
        match role {
            Role::Admin => self.notifications.list_all().await,
            Role::Owner(owner) => self.notifications.list_for_owner(owner.id).await,
            Role::Mechanic(mechanic) => self.notifications.list_for_mechanic(mechanic.id).await,
            Role::Garage(garage) => self.notifications.list_for_garage(garage.id).await,
            Role::None => Ok(Vec::new()),
        }
    }

    /// Marcar como leída: solo el destinatario (o el admin)
    pub async fn mark_read(&self, role: &Role, notification_id: Uuid) -> AppResult<Notification> {
        let notification = self
            .notifications
            .find_by_id(notification_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Notification not found".to_string()))?;

        if !is_recipient(role, &notification) {
            return Err(AppError::Forbidden(
                "You cannot modify this notification".to_string(),
            ));
        }

        self.notifications.mark_read(notification_id).await
    }

    /// Broadcast de admin a todos los conductores aprobados.
    /// Fan-out materializado: una fila por destinatario, con su propio
    /// estado de lectura. Devuelve la cantidad de destinatarios.
    pub async fn broadcast_to_mechanics(
        &self,
        role: &Role,
        title: &str,
        message: &str,
    ) -> AppResult<usize> {
        require_admin(role)?;

        let mechanics = self
            .profiles
            .list_mechanics_by_status(ApprovalStatus::Approved)
            .await?;

        for mechanic in &mechanics {
            self.notifications
                .insert(Recipient::Mechanic(mechanic.id), title, message)
                .await?;
        }

        tracing::info!("📣 Broadcast '{}' enviado a {} mechanics", title, mechanics.len());
        Ok(mechanics.len())
    }

    /// Broadcast de admin a todos los garajes aprobados
    pub async fn broadcast_to_garages(
        &self,
        role: &Role,
        title: &str,
        message: &str,
    ) -> AppResult<usize> {
        require_admin(role)?;

        let garages = self
            .profiles
            .list_garages_by_status(ApprovalStatus::Approved)
            .await?;

        for garage in &garages {
            self.notifications
                .insert(Recipient::Garage(garage.id), title, message)
                .await?;
        }

        tracing::info!("📣 Broadcast '{}' enviado a {} garages", title, garages.len());
        Ok(garages.len())
    }
}

/// La identidad resuelta coincide con la referencia de destinatario poblada
fn is_recipient(role: &Role, notification: &Notification) -> bool {
    if role.is_admin() {
        return true;
    }

    match (role, notification.recipient()) {
        (Role::Owner(owner), Some(Recipient::Owner(id))) => owner.id == id,
        (Role::Mechanic(mechanic), Some(Recipient::Mechanic(id))) => mechanic.id == id,
        (Role::Garage(garage), Some(Recipient::Garage(id))) => garage.id == id,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn notification_for_owner(owner_id: Uuid) -> Notification {
        Notification {
            id: Uuid::new_v4(),
            recipient_type: "owner".to_string(),
            recipient_mechanic_id: None,
            recipient_garage_id: None,
            recipient_owner_id: Some(owner_id),
            title: "Car Returned".to_string(),
            message: "Your car has been returned.".to_string(),
            is_read: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_recipient_owner_matches_only_own_notification() {
        let owner = crate::models::profiles::CarOwner {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            phone_number: "0712345678".to_string(),
            address: "Nairobi".to_string(),
            created_at: Utc::now(),
        };

        let own = notification_for_owner(owner.id);
        let other = notification_for_owner(Uuid::new_v4());

        let role = Role::Owner(owner);
        assert!(is_recipient(&role, &own));
        assert!(!is_recipient(&role, &other));
    }

    #[test]
    fn test_admin_can_touch_any_notification() {
        let n = notification_for_owner(Uuid::new_v4());
        assert!(is_recipient(&Role::Admin, &n));
        assert!(!is_recipient(&Role::None, &n));
    }
}
