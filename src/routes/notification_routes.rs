use axum::{
    extract::{Path, State},
    middleware,
    routing::{get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::notification_controller::NotificationController;
use crate::dto::common::ApiResponse;
use crate::dto::notification_dto::{BroadcastRequest, NotificationResponse};
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::routes::resolve_role;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_notification_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", get(list_notifications))
        .route("/:id/mark_read", post(mark_read))
        .route("/send_to_mechanics", post(send_to_mechanics))
        .route("/send_to_garages", post(send_to_garages))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn list_notifications(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<NotificationResponse>>, AppError> {
    let role = resolve_role(&state, &user).await?;
    let controller = NotificationController::new(state.pool.clone());
    let response = controller.list(&role).await?;
    Ok(Json(response))
}

async fn mark_read(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<NotificationResponse>>, AppError> {
    let role = resolve_role(&state, &user).await?;
    let controller = NotificationController::new(state.pool.clone());
    let response = controller.mark_read(&role, id).await?;
    Ok(Json(response))
}

async fn send_to_mechanics(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<BroadcastRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let role = resolve_role(&state, &user).await?;
    let controller = NotificationController::new(state.pool.clone());
    let response = controller.broadcast_to_mechanics(&role, request).await?;
    Ok(Json(response))
}

async fn send_to_garages(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<BroadcastRequest>,
) -> Result<Json<ApiResponse<()>>, AppError> {
    let role = resolve_role(&state, &user).await?;
    let controller = NotificationController::new(state.pool.clone());
    let response = controller.broadcast_to_garages(&role, request).await?;
    Ok(Json(response))
}
