//! Rutas de service requests: CRUD scoped más las transiciones del
//! ciclo de vida como acciones POST sobre el recurso

use axum::{
    extract::{Path, State},
    middleware,
    routing::{delete, get, post},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::controllers::service_request_controller::ServiceRequestController;
use crate::dto::common::ApiResponse;
use crate::dto::service_request_dto::{
    AddWorkItemRequest, AssignMechanicRequest, CostSummary, CreateServiceRequestRequest,
    DeliverToGarageRequest, RemoveWorkItemRequest, ServiceRequestResponse, UpdateStatusRequest,
    WorkItemResponse,
};
use crate::middleware::auth::{auth_middleware, AuthenticatedUser};
use crate::routes::resolve_role;
use crate::state::AppState;
use crate::utils::errors::AppError;

pub fn create_service_request_router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/", post(create_request))
        .route("/", get(list_requests))
        .route("/:id", get(get_request))
        .route("/:id/accept_job", post(accept_job))
        .route("/:id/pickup_car", post(pickup_car))
        .route("/:id/deliver_to_garage", post(deliver_to_garage))
        .route("/:id/complete_service", post(complete_service))
        .route("/:id/return_to_owner", post(return_to_owner))
        .route("/:id/add_work_item", post(add_work_item))
        .route("/:id/remove_work_item", delete(remove_work_item))
        .route("/:id/assign_mechanic", post(assign_mechanic))
        .route("/:id/update_status", post(update_status))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

async fn create_request(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Json(request): Json<CreateServiceRequestRequest>,
) -> Result<Json<ApiResponse<ServiceRequestResponse>>, AppError> {
    let role = resolve_role(&state, &user).await?;
    let controller = ServiceRequestController::new(state.pool.clone());
    let response = controller.create(&role, request).await?;
    Ok(Json(response))
}

async fn list_requests(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<ServiceRequestResponse>>, AppError> {
    let role = resolve_role(&state, &user).await?;
    let controller = ServiceRequestController::new(state.pool.clone());
    let response = controller.list(&role).await?;
    Ok(Json(response))
}

async fn get_request(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ServiceRequestResponse>, AppError> {
    let role = resolve_role(&state, &user).await?;
    let controller = ServiceRequestController::new(state.pool.clone());
    let response = controller.get_by_id(&role, id).await?;
    Ok(Json(response))
}

async fn accept_job(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ServiceRequestResponse>>, AppError> {
    let role = resolve_role(&state, &user).await?;
    let controller = ServiceRequestController::new(state.pool.clone());
    let response = controller.accept_job(&role, id).await?;
    Ok(Json(response))
}

async fn pickup_car(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ServiceRequestResponse>>, AppError> {
    let role = resolve_role(&state, &user).await?;
    let controller = ServiceRequestController::new(state.pool.clone());
    let response = controller.pickup_car(&role, id).await?;
    Ok(Json(response))
}

async fn deliver_to_garage(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<DeliverToGarageRequest>,
) -> Result<Json<ApiResponse<ServiceRequestResponse>>, AppError> {
    let role = resolve_role(&state, &user).await?;
    let controller = ServiceRequestController::new(state.pool.clone());
    let response = controller.deliver_to_garage(&role, id, body).await?;
    Ok(Json(response))
}

async fn complete_service(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ServiceRequestResponse>>, AppError> {
    let role = resolve_role(&state, &user).await?;
    let controller = ServiceRequestController::new(state.pool.clone());
    let response = controller.complete_service(&role, id).await?;
    Ok(Json(response))
}

async fn return_to_owner(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<ServiceRequestResponse>>, AppError> {
    let role = resolve_role(&state, &user).await?;
    let controller = ServiceRequestController::new(state.pool.clone());
    let response = controller.return_to_owner(&role, id).await?;
    Ok(Json(response))
}

async fn add_work_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<AddWorkItemRequest>,
) -> Result<Json<ApiResponse<WorkItemResponse>>, AppError> {
    let role = resolve_role(&state, &user).await?;
    let controller = ServiceRequestController::new(state.pool.clone());
    let response = controller.add_work_item(&role, id, body).await?;
    Ok(Json(response))
}

async fn remove_work_item(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<RemoveWorkItemRequest>,
) -> Result<Json<ApiResponse<CostSummary>>, AppError> {
    let role = resolve_role(&state, &user).await?;
    let controller = ServiceRequestController::new(state.pool.clone());
    let response = controller.remove_work_item(&role, id, body).await?;
    Ok(Json(response))
}

async fn assign_mechanic(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<AssignMechanicRequest>,
) -> Result<Json<ApiResponse<ServiceRequestResponse>>, AppError> {
    let role = resolve_role(&state, &user).await?;
    let controller = ServiceRequestController::new(state.pool.clone());
    let response = controller.assign_mechanic(&role, id, body).await?;
    Ok(Json(response))
}

async fn update_status(
    State(state): State<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<ApiResponse<ServiceRequestResponse>>, AppError> {
    let role = resolve_role(&state, &user).await?;
    let controller = ServiceRequestController::new(state.pool.clone());
    let response = controller.update_status(&role, id, body).await?;
    Ok(Json(response))
}
