//! Rutas de perfiles: propietarios, mecánicos/conductores y garajes
//!
//! Los endpoints de registro son públicos; todo lo demás requiere
//! autenticación. Las acciones de aprobación verifican admin en el
//! controller, sobre el rol resuelto.

use axum::{
    extract::{Path, State},
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::profile_controller::ProfileController;
use crate::dto::common::ApiResponse;
use crate::dto::profile_dto::{
    GarageResponse, MechanicResponse, OwnerResponse, RegisterGarageRequest,
    RegisterMechanicRequest, RegisterOwnerRequest,
};
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::routes::resolve_role;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_owner_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(my_owner_profile))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/register", post(register_owner))
        .merge(protected)
}

pub fn create_mechanic_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/me", get(my_mechanic_profile))
        .route("/pending", get(pending_mechanics))
        .route("/:id/approve", post(approve_mechanic))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/register", post(register_mechanic))
        .merge(protected)
}

pub fn create_garage_router(state: AppState) -> Router<AppState> {
    let protected = Router::new()
        .route("/", get(approved_garages))
        .route("/me", get(my_garage_profile))
        .route("/pending", get(pending_garages))
        .route("/:id/approve", post(approve_garage))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware));

    Router::new()
        .route("/register", post(register_garage))
        .merge(protected)
}

// ---- Registro (público) ----

async fn register_owner(
    State(state): State<AppState>,
    Json(request): Json<RegisterOwnerRequest>,
) -> Result<Json<ApiResponse<OwnerResponse>>, AppError> {
    let controller = ProfileController::new(&state);
    let response = controller.register_owner(request).await?;
    Ok(Json(response))
}

async fn register_mechanic(
    State(state): State<AppState>,
    Json(request): Json<RegisterMechanicRequest>,
) -> Result<Json<ApiResponse<MechanicResponse>>, AppError> {
    let controller = ProfileController::new(&state);
    let response = controller.register_mechanic(request).await?;
    Ok(Json(response))
}

async fn register_garage(
    State(state): State<AppState>,
    Json(request): Json<RegisterGarageRequest>,
) -> Result<Json<ApiResponse<GarageResponse>>, AppError> {
    let controller = ProfileController::new(&state);
    let response = controller.register_garage(request).await?;
    Ok(Json(response))
}

// ---- Perfil propio ----

async fn my_owner_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<OwnerResponse>, AppError> {
    let role = resolve_role(&state, &user).await?;
    let controller = ProfileController::new(&state);
    let response = controller.my_owner_profile(&role).await?;
    Ok(Json(response))
}

async fn my_mechanic_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<MechanicResponse>, AppError> {
    let role = resolve_role(&state, &user).await?;
    let controller = ProfileController::new(&state);
    let response = controller.my_mechanic_profile(&role).await?;
    Ok(Json(response))
}

async fn my_garage_profile(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<GarageResponse>, AppError> {
    let role = resolve_role(&state, &user).await?;
    let controller = ProfileController::new(&state);
    let response = controller.my_garage_profile(&role).await?;
    Ok(Json(response))
}

// ---- Directorio ----

async fn approved_garages(
    State(state): State<AppState>,
    Extension(_user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<GarageResponse>>, AppError> {
    let controller = ProfileController::new(&state);
    let response = controller.list_approved_garages().await?;
    Ok(Json(response))
}

// ---- Aprobación (admin) ----

async fn pending_mechanics(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<MechanicResponse>>, AppError> {
    let role = resolve_role(&state, &user).await?;
    let controller = ProfileController::new(&state);
    let response = controller.list_pending_mechanics(&role).await?;
    Ok(Json(response))
}

async fn approve_mechanic(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let role = resolve_role(&state, &user).await?;
    let controller = ProfileController::new(&state);
    let response = controller.approve_mechanic(&role, id).await?;
    Ok(Json(response))
}

async fn pending_garages(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<GarageResponse>>, AppError> {
    let role = resolve_role(&state, &user).await?;
    let controller = ProfileController::new(&state);
    let response = controller.list_pending_garages(&role).await?;
    Ok(Json(response))
}

async fn approve_garage(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let role = resolve_role(&state, &user).await?;
    let controller = ProfileController::new(&state);
    let response = controller.approve_garage(&role, id).await?;
    Ok(Json(response))
}
