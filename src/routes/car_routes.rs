use axum::{
    extract::{Path, State},
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::car_controller::CarController;
use crate::dto::car_dto::{CarResponse, CreateCarRequest};
use crate::dto::common::ApiResponse;
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::routes::resolve_role;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_car_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_car))
        .route("/", get(list_cars))
        .route("/:id", get(get_car))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn create_car(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateCarRequest>,
) -> Result<Json<ApiResponse<CarResponse>>, AppError> {
    let role = resolve_role(&state, &user).await?;
    let controller = CarController::new(state.pool.clone());
    let response = controller.create(&role, request).await?;
    Ok(Json(response))
}

async fn list_cars(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<CarResponse>>, AppError> {
    let role = resolve_role(&state, &user).await?;
    let controller = CarController::new(state.pool.clone());
    let response = controller.list(&role).await?;
    Ok(Json(response))
}

async fn get_car(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<CarResponse>, AppError> {
    let role = resolve_role(&state, &user).await?;
    let controller = CarController::new(state.pool.clone());
    let response = controller.get_by_id(&role, id).await?;
    Ok(Json(response))
}
