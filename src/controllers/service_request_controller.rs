//! Controller de service requests
//!
//! Creación y listados con scoping por rol, más los wrappers de las
//! transiciones del ciclo de vida y del ledger de trabajos. Toda la
//! lógica de guardas vive en los servicios; acá solo se valida el body
//! y se arma la response.

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::common::ApiResponse;
use crate::dto::service_request_dto::{
    AddWorkItemRequest, AssignMechanicRequest, CostSummary, CreateServiceRequestRequest,
    DeliverToGarageRequest, RemoveWorkItemRequest, ServiceRequestResponse, UpdateStatusRequest,
    WorkItemResponse,
};
use crate::repositories::car_repository::CarRepository;
use crate::repositories::service_request_repository::ServiceRequestRepository;
use crate::repositories::work_item_repository::WorkItemRepository;
use crate::services::request_lifecycle::RequestLifecycleService;
use crate::services::role_resolver::Role;
use crate::services::work_ledger::WorkLedgerService;
use crate::utils::errors::AppError;

pub struct ServiceRequestController {
    requests: ServiceRequestRepository,
    cars: CarRepository,
    work_items: WorkItemRepository,
    lifecycle: RequestLifecycleService,
    ledger: WorkLedgerService,
}

impl ServiceRequestController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            requests: ServiceRequestRepository::new(pool.clone()),
            cars: CarRepository::new(pool.clone()),
            work_items: WorkItemRepository::new(pool.clone()),
            lifecycle: RequestLifecycleService::new(pool.clone()),
            ledger: WorkLedgerService::new(pool),
        }
    }

    /// Crear un request. Solo el propietario del vehículo; el status
    /// siempre nace en pending, ignore lo que mande el cliente.
    pub async fn create(
        &self,
        role: &Role,
        request: CreateServiceRequestRequest,
    ) -> Result<ApiResponse<ServiceRequestResponse>, AppError> {
        request.validate()?;

        let Role::Owner(owner) = role else {
            return Err(AppError::Forbidden(
                "Only car owners can create service requests".to_string(),
            ));
        };

        let car = self
            .cars
            .find_by_id(request.car_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Car not found".to_string()))?;

        if car.owner_id != owner.id {
            return Err(AppError::Forbidden("You can only request service for your own cars".to_string()));
        }

        let created = self
            .requests
            .create(
                car.id,
                owner.id,
                &request.pickup_location,
                request.preferred_date,
                request.preferred_time,
                &request.service_type,
                &request.special_instructions,
            )
            .await?;

        tracing::info!("📋 Service request {} creado para car {}", created.id, car.id);

        Ok(ApiResponse::success_with_message(
            ServiceRequestResponse::from_request(created, Vec::new()),
            "Service request created successfully".to_string(),
        ))
    }

    /// Listado con scoping por rol: admin todo, owner los suyos, conductor
    /// los pendientes más los asignados, garaje los que tiene en casa
    pub async fn list(&self, role: &Role) -> Result<Vec<ServiceRequestResponse>, AppError> {
        let requests = match role {
            Role::Admin => self.requests.list_all().await?,
            Role::Owner(owner) => self.requests.list_for_owner(owner.id).await?,
            Role::Mechanic(mechanic) => self.requests.list_for_mechanic(mechanic.id).await?,
            Role::Garage(garage) => self.requests.list_for_garage(garage.id).await?,
            Role::None => Vec::new(),
        };

        Ok(requests
            .into_iter()
            .map(|r| ServiceRequestResponse::from_request(r, Vec::new()))
            .collect())
    }

    /// Detalle con el ledger de trabajos incluido
    pub async fn get_by_id(
        &self,
        role: &Role,
        id: Uuid,
    ) -> Result<ServiceRequestResponse, AppError> {
        let request = self
            .requests
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Service request not found".to_string()))?;

        let visible = match role {
            Role::Admin => true,
            Role::Owner(owner) => request.owner_id == owner.id,
            Role::Mechanic(mechanic) => {
                request.status == "pending" || request.assigned_mechanic_id == Some(mechanic.id)
            }
            Role::Garage(garage) => request.assigned_garage_id == Some(garage.id),
            Role::None => false,
        };
        if !visible {
            return Err(AppError::Forbidden("You cannot access this service request".to_string()));
        }

        let work_items = self.work_items.list_for_request(id).await?;

        Ok(ServiceRequestResponse::from_request(request, work_items))
    }

    // ---- Transiciones del ciclo de vida ----

    pub async fn accept_job(
        &self,
        role: &Role,
        id: Uuid,
    ) -> Result<ApiResponse<ServiceRequestResponse>, AppError> {
        let request = self.lifecycle.accept_job(role, id).await?;
        Ok(ApiResponse::success_with_message(
            ServiceRequestResponse::from_request(request, Vec::new()),
            "Job accepted successfully".to_string(),
        ))
    }

    pub async fn pickup_car(
        &self,
        role: &Role,
        id: Uuid,
    ) -> Result<ApiResponse<ServiceRequestResponse>, AppError> {
        let request = self.lifecycle.pickup_car(role, id).await?;
        Ok(ApiResponse::success_with_message(
            ServiceRequestResponse::from_request(request, Vec::new()),
            "Car picked up".to_string(),
        ))
    }

    pub async fn deliver_to_garage(
        &self,
        role: &Role,
        id: Uuid,
        body: DeliverToGarageRequest,
    ) -> Result<ApiResponse<ServiceRequestResponse>, AppError> {
        let request = self.lifecycle.deliver_to_garage(role, id, body.garage_id).await?;
        Ok(ApiResponse::success_with_message(
            ServiceRequestResponse::from_request(request, Vec::new()),
            "Car delivered to garage".to_string(),
        ))
    }

    pub async fn complete_service(
        &self,
        role: &Role,
        id: Uuid,
    ) -> Result<ApiResponse<ServiceRequestResponse>, AppError> {
        let request = self.lifecycle.complete_service(role, id).await?;
        let work_items = self.work_items.list_for_request(id).await?;
        Ok(ApiResponse::success_with_message(
            ServiceRequestResponse::from_request(request, work_items),
            "Service completed".to_string(),
        ))
    }

    pub async fn return_to_owner(
        &self,
        role: &Role,
        id: Uuid,
    ) -> Result<ApiResponse<ServiceRequestResponse>, AppError> {
        let request = self.lifecycle.return_to_owner(role, id).await?;
        Ok(ApiResponse::success_with_message(
            ServiceRequestResponse::from_request(request, Vec::new()),
            "Car returned to owner".to_string(),
        ))
    }

    pub async fn assign_mechanic(
        &self,
        role: &Role,
        id: Uuid,
        body: AssignMechanicRequest,
    ) -> Result<ApiResponse<ServiceRequestResponse>, AppError> {
        let request = self.lifecycle.assign_mechanic(role, id, body.mechanic_id).await?;
        Ok(ApiResponse::success_with_message(
            ServiceRequestResponse::from_request(request, Vec::new()),
            "Mechanic assigned successfully".to_string(),
        ))
    }

    pub async fn update_status(
        &self,
        role: &Role,
        id: Uuid,
        body: UpdateStatusRequest,
    ) -> Result<ApiResponse<ServiceRequestResponse>, AppError> {
        let request = self.lifecycle.update_status(role, id, &body.status).await?;
        Ok(ApiResponse::success_with_message(
            ServiceRequestResponse::from_request(request, Vec::new()),
            "Status updated".to_string(),
        ))
    }

    // ---- Ledger de trabajos ----

    pub async fn add_work_item(
        &self,
        role: &Role,
        id: Uuid,
        body: AddWorkItemRequest,
    ) -> Result<ApiResponse<WorkItemResponse>, AppError> {
        body.validate()?;

        let (item, summary) = self
            .ledger
            .add_work_item(role, id, &body.description, body.cost)
            .await?;

        Ok(ApiResponse::success_with_message(
            WorkItemResponse::from(item),
            format!(
                "Work item added. Garage cost: {}, customer total: {}",
                summary.garage_cost, summary.total_cost
            ),
        ))
    }

    pub async fn remove_work_item(
        &self,
        role: &Role,
        id: Uuid,
        body: RemoveWorkItemRequest,
    ) -> Result<ApiResponse<CostSummary>, AppError> {
        let summary = self
            .ledger
            .remove_work_item(role, id, body.work_item_id)
            .await?;

        Ok(ApiResponse::success_with_message(
            CostSummary {
                garage_cost: summary.garage_cost,
                total_cost: summary.total_cost,
            },
            "Work item removed".to_string(),
        ))
    }
}
