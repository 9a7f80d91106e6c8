//! Modelo de Notification
//!
//! Cada notificación apunta a exactamente uno de {mechanic, garage, owner}
//! mediante una referencia discriminada: `recipient_type` indica cuál de
//! las tres foreign keys está poblada (la base lo refuerza con un CHECK).
//! Solo el flag `is_read` se muta; las filas nunca se borran.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Categoría de destinatario de una notificación
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipientType {
    Mechanic,
    Garage,
    Owner,
}

impl RecipientType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecipientType::Mechanic => "mechanic",
            RecipientType::Garage => "garage",
            RecipientType::Owner => "owner",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "mechanic" => Some(RecipientType::Mechanic),
            "garage" => Some(RecipientType::Garage),
            "owner" => Some(RecipientType::Owner),
            _ => None,
        }
    }
}

/// Referencia discriminada al destinatario
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recipient {
    Mechanic(Uuid),
    Garage(Uuid),
    Owner(Uuid),
}

impl Recipient {
    pub fn recipient_type(&self) -> RecipientType {
        match self {
            Recipient::Mechanic(_) => RecipientType::Mechanic,
            Recipient::Garage(_) => RecipientType::Garage,
            Recipient::Owner(_) => RecipientType::Owner,
        }
    }

    /// Descompone en las tres columnas nullable de la tabla
    pub fn columns(&self) -> (Option<Uuid>, Option<Uuid>, Option<Uuid>) {
        match *self {
            Recipient::Mechanic(id) => (Some(id), None, None),
            Recipient::Garage(id) => (None, Some(id), None),
            Recipient::Owner(id) => (None, None, Some(id)),
        }
    }
}

/// Notification - mapea exactamente a la tabla notifications
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    pub id: Uuid,
    pub recipient_type: String,
    pub recipient_mechanic_id: Option<Uuid>,
    pub recipient_garage_id: Option<Uuid>,
    pub recipient_owner_id: Option<Uuid>,
    pub title: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    /// Reconstruye la referencia discriminada desde las columnas
    pub fn recipient(&self) -> Option<Recipient> {
        match RecipientType::parse(&self.recipient_type)? {
            RecipientType::Mechanic => self.recipient_mechanic_id.map(Recipient::Mechanic),
            RecipientType::Garage => self.recipient_garage_id.map(Recipient::Garage),
            RecipientType::Owner => self.recipient_owner_id.map(Recipient::Owner),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipient_columns_populate_exactly_one() {
        let id = Uuid::new_v4();
        for recipient in [Recipient::Mechanic(id), Recipient::Garage(id), Recipient::Owner(id)] {
            let (m, g, o) = recipient.columns();
            let populated = [m, g, o].iter().filter(|c| c.is_some()).count();
            assert_eq!(populated, 1);
        }
    }

    #[test]
    fn test_recipient_reconstruction_matches_type() {
        let id = Uuid::new_v4();
        let notification = Notification {
            id: Uuid::new_v4(),
            recipient_type: "garage".to_string(),
            recipient_mechanic_id: None,
            recipient_garage_id: Some(id),
            recipient_owner_id: None,
            title: "New Car Arrived".to_string(),
            message: "A car has been delivered".to_string(),
            is_read: false,
            created_at: Utc::now(),
        };

        assert_eq!(notification.recipient(), Some(Recipient::Garage(id)));
    }
}
