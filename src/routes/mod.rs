pub mod auth_routes;
pub mod car_routes;
pub mod notification_routes;
pub mod profile_routes;
pub mod service_request_routes;

use crate::middleware::auth::AuthenticatedUser;
use crate::services::role_resolver::{Role, RoleResolver};
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Resolver el rol del usuario autenticado una sola vez por request;
/// los handlers se lo pasan explícito a los controllers
pub async fn resolve_role(state: &AppState, user: &AuthenticatedUser) -> Result<Role, AppError> {
    RoleResolver::new(state.pool.clone()).resolve(user).await
}
