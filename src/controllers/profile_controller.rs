//! Controller de registro y aprobación de perfiles
//!
//! Los registros crean usuario + perfil en una sola transacción.
//! Los emails de confirmación y aprobación se despachan estrictamente
//! después del commit, en background y best-effort: un fallo de correo
//! nunca hace fallar el registro.

use std::sync::Arc;

use uuid::Uuid;
use validator::Validate;

use crate::config::environment::EnvironmentConfig;
use crate::dto::common::ApiResponse;
use crate::dto::profile_dto::{
    GarageResponse, MechanicResponse, OwnerResponse, RegisterGarageRequest,
    RegisterMechanicRequest, RegisterOwnerRequest,
};
use crate::models::profiles::{ApprovalStatus, CarOwner, Garage, Mechanic};
use crate::models::user::User;
use crate::repositories::profile_repository::ProfileRepository;
use crate::repositories::user_repository::UserRepository;
use crate::services::email_service::{dispatch, Mailer};
use crate::services::request_lifecycle::require_admin;
use crate::services::role_resolver::Role;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub struct ProfileController {
    pool: sqlx::PgPool,
    users: UserRepository,
    profiles: ProfileRepository,
    mailer: Arc<dyn Mailer>,
    config: EnvironmentConfig,
}

impl ProfileController {
    pub fn new(state: &AppState) -> Self {
        Self {
            pool: state.pool.clone(),
            users: UserRepository::new(state.pool.clone()),
            profiles: ProfileRepository::new(state.pool.clone()),
            mailer: state.mailer.clone(),
            config: state.config.clone(),
        }
    }

    // ---- Registros ----

    pub async fn register_owner(
        &self,
        request: RegisterOwnerRequest,
    ) -> Result<ApiResponse<OwnerResponse>, AppError> {
        request.validate()?;

        if self.users.email_exists(&request.email).await? {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::Hash(e.to_string()))?;

        let mut tx = self.pool.begin().await?;
        let user =
            UserRepository::create_tx(&mut tx, &request.email, &password_hash, &request.full_name)
                .await?;
        let owner = ProfileRepository::create_owner_tx(
            &mut tx,
            user.id,
            &request.phone_number,
            &request.address,
        )
        .await?;
        tx.commit().await?;

        tracing::info!("👤 Car owner registrado: {}", user.email);

        Ok(ApiResponse::success_with_message(
            owner_response(&user, owner),
            "Registration successful".to_string(),
        ))
    }

    pub async fn register_mechanic(
        &self,
        request: RegisterMechanicRequest,
    ) -> Result<ApiResponse<MechanicResponse>, AppError> {
        request.validate()?;

        if self.users.email_exists(&request.email).await? {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::Hash(e.to_string()))?;

        let mut tx = self.pool.begin().await?;
        let user =
            UserRepository::create_tx(&mut tx, &request.email, &password_hash, &request.full_name)
                .await?;
        let mechanic = ProfileRepository::create_mechanic_tx(
            &mut tx,
            user.id,
            &request.phone_number,
            &request.address,
            &request.id_number,
            &request.license_number,
        )
        .await?;
        tx.commit().await?;

        // Emails post-commit, best-effort
        dispatch(
            self.mailer.clone(),
            user.email.clone(),
            "SwiftCar - Application Received".to_string(),
            format!(
                "Dear {},\n\nWe have received your application to become a SwiftCar mechanic. \
                 We will review your details and get back to you soon.\n\nThank you,\nSwiftCar Team",
                user.full_name
            ),
        );
        dispatch(
            self.mailer.clone(),
            self.config.admin_email.clone(),
            "SwiftCar - New Mechanic Application".to_string(),
            format!(
                "A new mechanic has applied:\n\nName: {}\nEmail: {}\nPhone: {}\n\n\
                 Please review in the admin panel.",
                user.full_name, user.email, mechanic.phone_number
            ),
        );

        tracing::info!("🔧 Mechanic registrado (pending): {}", user.email);

        Ok(ApiResponse::success_with_message(
            mechanic_response(&user, mechanic),
            "Application submitted successfully! We will review your details and get back to you soon."
                .to_string(),
        ))
    }

    pub async fn register_garage(
        &self,
        request: RegisterGarageRequest,
    ) -> Result<ApiResponse<GarageResponse>, AppError> {
        request.validate()?;

        if self.users.email_exists(&request.owner_email).await? {
            return Err(AppError::Conflict("Email already registered".to_string()));
        }

        let password_hash = bcrypt::hash(&request.password, bcrypt::DEFAULT_COST)
            .map_err(|e| AppError::Hash(e.to_string()))?;

        let mut tx = self.pool.begin().await?;
        let user = UserRepository::create_tx(
            &mut tx,
            &request.owner_email,
            &password_hash,
            &request.owner_name,
        )
        .await?;
        let garage = ProfileRepository::create_garage_tx(
            &mut tx,
            user.id,
            &request.name,
            &request.owner_name,
            &request.owner_phone,
            &request.owner_email,
            &request.address,
            &request.location,
        )
        .await?;
        tx.commit().await?;

        dispatch(
            self.mailer.clone(),
            garage.owner_email.clone(),
            "SwiftCar - Garage Registration Received".to_string(),
            format!(
                "Dear {},\n\nWe have received your garage registration. We will verify your \
                 details and get back to you soon.\n\nThank you,\nSwiftCar Team",
                garage.owner_name
            ),
        );
        dispatch(
            self.mailer.clone(),
            self.config.admin_email.clone(),
            "SwiftCar - New Garage Registration".to_string(),
            format!(
                "A new garage has registered:\n\nName: {}\nOwner: {}\nEmail: {}\nPhone: {}\n\n\
                 Please review in the admin panel.",
                garage.name, garage.owner_name, garage.owner_email, garage.owner_phone
            ),
        );

        tracing::info!("🏭 Garage registrado (pending): {}", garage.name);

        Ok(ApiResponse::success_with_message(
            garage_response(garage),
            "Application submitted successfully! We will review your details and get back to you soon."
                .to_string(),
        ))
    }

    // ---- Aprobación (admin) ----

    pub async fn list_pending_mechanics(
        &self,
        role: &Role,
    ) -> Result<Vec<MechanicResponse>, AppError> {
        require_admin(role)?;

        let mechanics = self
            .profiles
            .list_mechanics_by_status(ApprovalStatus::Pending)
            .await?;

        let mut responses = Vec::with_capacity(mechanics.len());
        for mechanic in mechanics {
            let user = self
                .users
                .find_by_id(mechanic.user_id)
                .await?
                .ok_or_else(|| AppError::Internal("Mechanic without user row".to_string()))?;
            responses.push(mechanic_response(&user, mechanic));
        }

        Ok(responses)
    }

    pub async fn approve_mechanic(
        &self,
        role: &Role,
        mechanic_id: Uuid,
    ) -> Result<ApiResponse<()>, AppError> {
        require_admin(role)?;

        let mechanic = self
            .profiles
            .set_mechanic_status(mechanic_id, ApprovalStatus::Approved)
            .await?;

        let user = self
            .users
            .find_by_id(mechanic.user_id)
            .await?
            .ok_or_else(|| AppError::Internal("Mechanic without user row".to_string()))?;

        dispatch(
            self.mailer.clone(),
            user.email.clone(),
            "SwiftCar - Application Approved".to_string(),
            format!(
                "Dear {},\n\nCongratulations! Your application has been approved. You can now \
                 log in to your mechanic portal.\n\nThank you,\nSwiftCar Team",
                user.full_name
            ),
        );

        tracing::info!("✅ Mechanic {} aprobado", user.email);

        Ok(ApiResponse::message_only("Mechanic approved successfully".to_string()))
    }

    pub async fn list_pending_garages(&self, role: &Role) -> Result<Vec<GarageResponse>, AppError> {
        require_admin(role)?;

        let garages = self
            .profiles
            .list_garages_by_status(ApprovalStatus::Pending)
            .await?;

        Ok(garages.into_iter().map(garage_response).collect())
    }

    pub async fn approve_garage(
        &self,
        role: &Role,
        garage_id: Uuid,
    ) -> Result<ApiResponse<()>, AppError> {
        require_admin(role)?;

        let garage = self
            .profiles
            .set_garage_status(garage_id, ApprovalStatus::Approved)
            .await?;

        let portal_link = format!("{}/portal/garage", self.config.frontend_url);
        dispatch(
            self.mailer.clone(),
            garage.owner_email.clone(),
            "SwiftCar - Garage Approved".to_string(),
            format!(
                "Dear {},\n\nCongratulations! Your garage \"{}\" registration has been approved.\n\n\
                 You can now access your garage portal using the link below:\n\n{}\n\n\
                 Use your registered email ({}) to log in.\n\nThank you for joining SwiftCar!",
                garage.owner_name, garage.name, portal_link, garage.owner_email
            ),
        );

        tracing::info!("✅ Garage {} aprobado", garage.name);

        Ok(ApiResponse::message_only("Garage approved successfully".to_string()))
    }

    // ---- Consulta ----

    /// Directorio de garajes aprobados, visible para cualquier usuario
    /// autenticado (el conductor elige a cuál entregar)
    pub async fn list_approved_garages(&self) -> Result<Vec<GarageResponse>, AppError> {
        let garages = self
            .profiles
            .list_garages_by_status(ApprovalStatus::Approved)
            .await?;

        Ok(garages.into_iter().map(garage_response).collect())
    }

    pub async fn my_owner_profile(&self, role: &Role) -> Result<OwnerResponse, AppError> {
        let Role::Owner(owner) = role else {
            return Err(AppError::NotFound("Car owner profile not found".to_string()));
        };

        let user = self
            .users
            .find_by_id(owner.user_id)
            .await?
            .ok_or_else(|| AppError::Internal("Car owner without user row".to_string()))?;

        Ok(owner_response(&user, owner.clone()))
    }

    pub async fn my_mechanic_profile(&self, role: &Role) -> Result<MechanicResponse, AppError> {
        let Role::Mechanic(mechanic) = role else {
            return Err(AppError::NotFound("Mechanic profile not found".to_string()));
        };

        let user = self
            .users
            .find_by_id(mechanic.user_id)
            .await?
            .ok_or_else(|| AppError::Internal("Mechanic without user row".to_string()))?;

        Ok(mechanic_response(&user, mechanic.clone()))
    }

    pub async fn my_garage_profile(&self, role: &Role) -> Result<GarageResponse, AppError> {
        let Role::Garage(garage) = role else {
            return Err(AppError::NotFound("Garage profile not found".to_string()));
        };

        Ok(garage_response(garage.clone()))
    }
}

fn owner_response(user: &User, owner: CarOwner) -> OwnerResponse {
    OwnerResponse {
        id: owner.id,
        full_name: user.full_name.clone(),
        email: user.email.clone(),
        phone_number: owner.phone_number,
        address: owner.address,
        created_at: owner.created_at,
    }
}

fn mechanic_response(user: &User, mechanic: Mechanic) -> MechanicResponse {
    MechanicResponse {
        id: mechanic.id,
        full_name: user.full_name.clone(),
        email: user.email.clone(),
        phone_number: mechanic.phone_number,
        address: mechanic.address,
        id_number: mechanic.id_number,
        license_number: mechanic.license_number,
        status: mechanic.status,
        created_at: mechanic.created_at,
    }
}

fn garage_response(garage: Garage) -> GarageResponse {
    GarageResponse {
        id: garage.id,
        name: garage.name,
        owner_name: garage.owner_name,
        owner_phone: garage.owner_phone,
        owner_email: garage.owner_email,
        address: garage.address,
        location: garage.location,
        status: garage.status,
        created_at: garage.created_at,
    }
}
