//! Controller de autenticación
//!
//! Login con email/password y consulta de la sesión actual. El token
//! solo lleva identidad; `user_type` se resuelve contra la base en cada
//! request, nunca se confía en el cliente.

use sqlx::PgPool;
use validator::Validate;

use crate::dto::auth_dto::{CurrentUserResponse, LoginRequest, LoginResponse, SessionUser};
use crate::middleware::auth::AuthenticatedUser;
use crate::models::user::User;
use crate::repositories::user_repository::UserRepository;
use crate::services::role_resolver::{Role, RoleResolver};
use crate::utils::errors::AppError;
use crate::utils::jwt::{generate_token, JwtConfig};

pub struct AuthController {
    users: UserRepository,
    roles: RoleResolver,
    jwt_config: JwtConfig,
}

impl AuthController {
    pub fn new(pool: PgPool, jwt_config: JwtConfig) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            roles: RoleResolver::new(pool),
            jwt_config,
        }
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError> {
        request.validate()?;

        // Credenciales inválidas y usuario inexistente responden igual
        let user = self
            .users
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid email or password".to_string()))?;

        let valid = bcrypt::verify(&request.password, &user.password_hash)
            .map_err(|e| AppError::Hash(e.to_string()))?;
        if !valid {
            return Err(AppError::Unauthorized("Invalid email or password".to_string()));
        }

        let authenticated = AuthenticatedUser {
            user_id: user.id,
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            is_staff: user.is_staff,
        };
        let role = self.roles.resolve(&authenticated).await?;

        let token = generate_token(user.id, &self.jwt_config)?;

        tracing::info!("🔐 Login de {} como {}", user.email, role.user_type());

        Ok(LoginResponse {
            message: "Login successful".to_string(),
            token,
            user_type: role.user_type().to_string(),
            user: session_user(&user, &role),
        })
    }

    pub async fn me(&self, user: &AuthenticatedUser) -> Result<CurrentUserResponse, AppError> {
        let role = self.roles.resolve(user).await?;

        let user_row = self
            .users
            .find_by_id(user.user_id)
            .await?
            .ok_or_else(|| AppError::Unauthorized("User not found".to_string()))?;

        Ok(CurrentUserResponse {
            user_type: role.user_type().to_string(),
            user: session_user(&user_row, &role),
        })
    }
}

/// Datos de sesión que ve el frontend, con los ids de perfil del rol resuelto
fn session_user(user: &User, role: &Role) -> SessionUser {
    let mut session = SessionUser {
        id: user.id,
        email: user.email.clone(),
        full_name: user.full_name.clone(),
        car_owner_id: None,
        mechanic_id: None,
        garage_id: None,
        status: None,
    };

    match role {
        Role::Owner(owner) => session.car_owner_id = Some(owner.id),
        Role::Mechanic(mechanic) => {
            session.mechanic_id = Some(mechanic.id);
            session.status = Some(mechanic.status.clone());
        }
        Role::Garage(garage) => {
            session.garage_id = Some(garage.id);
            session.status = Some(garage.status.clone());
        }
        Role::Admin | Role::None => {}
    }

    session
}
