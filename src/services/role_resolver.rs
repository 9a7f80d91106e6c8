//! Resolución de identidad a rol
//!
//! Mapea un usuario autenticado a exactamente uno de
//! {admin, car_owner, mechanic, garage}. La resolución ocurre una sola
//! vez por request en el controller y el rol resuelto se pasa explícito
//! hacia abajo: los servicios nunca re-consultan las tablas de perfiles.
//!
//! Precedencia fija (no configurable): admin > car_owner > mechanic > garage.
//! Un usuario sin rol no es un error: ve listados vacíos.

use sqlx::PgPool;

use crate::middleware::auth::AuthenticatedUser;
use crate::models::profiles::{CarOwner, Garage, Mechanic};
use crate::repositories::profile_repository::ProfileRepository;
use crate::utils::errors::AppError;

/// Rol resuelto de un usuario autenticado
#[derive(Debug, Clone)]
pub enum Role {
    Admin,
    Owner(CarOwner),
    Mechanic(Mechanic),
    Garage(Garage),
    None,
}

impl Role {
    /// Etiqueta `user_type` que consume el frontend
    pub fn user_type(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Owner(_) => "car_owner",
            Role::Mechanic(_) => "mechanic",
            Role::Garage(_) => "garage",
            Role::None => "unknown",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

/// Precedencia pura sobre los perfiles encontrados. Separada de la
/// consulta para poder testearla sin base de datos.
pub fn resolve_precedence(
    is_staff: bool,
    owner: Option<CarOwner>,
    mechanic: Option<Mechanic>,
    garage: Option<Garage>,
) -> Role {
    if is_staff {
        return Role::Admin;
    }
    if let Some(owner) = owner {
        return Role::Owner(owner);
    }
    if let Some(mechanic) = mechanic {
        return Role::Mechanic(mechanic);
    }
    if let Some(garage) = garage {
        return Role::Garage(garage);
    }
    Role::None
}

pub struct RoleResolver {
    profiles: ProfileRepository,
}

impl RoleResolver {
    pub fn new(pool: PgPool) -> Self {
        Self {
            profiles: ProfileRepository::new(pool),
        }
    }

    /// Resolver el rol del usuario autenticado
    pub async fn resolve(&self, user: &AuthenticatedUser) -> Result<Role, AppError> {
        // El flag de staff gana sin consultar perfiles
        if user.is_staff {
            return Ok(Role::Admin);
        }

        let owner = self.profiles.find_owner_by_user(user.user_id).await?;
        if owner.is_some() {
            return Ok(resolve_precedence(false, owner, None, None));
        }

        let mechanic = self.profiles.find_mechanic_by_user(user.user_id).await?;
        if mechanic.is_some() {
            return Ok(resolve_precedence(false, None, mechanic, None));
        }

        let garage = self.profiles.find_garage_by_user(user.user_id).await?;
        Ok(resolve_precedence(false, None, None, garage))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn owner() -> CarOwner {
        CarOwner {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            phone_number: "0712345678".to_string(),
            address: "Nairobi".to_string(),
            created_at: Utc::now(),
        }
    }

    fn mechanic(status: &str) -> Mechanic {
        Mechanic {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            phone_number: "0712345678".to_string(),
            address: "Nairobi".to_string(),
            id_number: "12345678".to_string(),
            license_number: "DL-001".to_string(),
            status: status.to_string(),
            created_at: Utc::now(),
        }
    }

    fn garage(status: &str) -> Garage {
        Garage {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Speedy Fix".to_string(),
            owner_name: "Jane".to_string(),
            owner_phone: "0712345678".to_string(),
            owner_email: "jane@speedyfix.example".to_string(),
            address: "Industrial Area".to_string(),
            location: "Nairobi".to_string(),
            status: status.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_admin_flag_overrides_everything() {
        let role = resolve_precedence(true, Some(owner()), Some(mechanic("approved")), Some(garage("approved")));
        assert!(role.is_admin());
        assert_eq!(role.user_type(), "admin");
    }

    #[test]
    fn test_owner_takes_precedence_over_mechanic_and_garage() {
        let role = resolve_precedence(false, Some(owner()), Some(mechanic("approved")), Some(garage("approved")));
        assert_eq!(role.user_type(), "car_owner");
    }

    #[test]
    fn test_mechanic_takes_precedence_over_garage() {
        let role = resolve_precedence(false, None, Some(mechanic("pending")), Some(garage("approved")));
        assert_eq!(role.user_type(), "mechanic");
    }

    #[test]
    fn test_roleless_identity_is_none_not_error() {
        let role = resolve_precedence(false, None, None, None);
        assert_eq!(role.user_type(), "unknown");
        assert!(!role.is_admin());
    }
}
