//! Máquina de estados del service request
//!
//! Cada transición está protegida por DOS guardas: el rol del actor
//! (derivado de la identidad resuelta, nunca de un parámetro del body)
//! y la precondición de status. Una transición exitosa es una única
//! transacción: `SELECT ... FOR UPDATE` sobre la fila del request,
//! verificación de guardas, UPDATE y los INSERT de notificaciones,
//! todo o nada. Dos callers concurrentes sobre el mismo request se
//! serializan en el lock; el perdedor observa el status ya avanzado y
//! recibe Conflict.
//!
//! Las transiciones no son idempotentes a propósito: repetir la misma
//! llamada falla porque la precondición ya no se cumple (evita doble
//! facturación y doble despacho).

use sqlx::PgPool;
use uuid::Uuid;

use crate::models::notification::Recipient;
use crate::models::profiles::{Garage, Mechanic};
use crate::models::service_request::{RequestStatus, ServiceRequest};
use crate::repositories::car_repository::CarRepository;
use crate::repositories::notification_repository::NotificationRepository;
use crate::repositories::profile_repository::ProfileRepository;
use crate::repositories::service_request_repository::ServiceRequestRepository;
use crate::repositories::work_item_repository::WorkItemRepository;
use crate::services::cost_model;
use crate::services::role_resolver::Role;
use crate::utils::errors::{validation_error, AppError, AppResult};

// ---- Guardas puras (compartidas con el work ledger) ----

/// Status actual parseado; la columna solo admite valores del enum
pub fn current_status(request: &ServiceRequest) -> AppResult<RequestStatus> {
    request
        .request_status()
        .ok_or_else(|| AppError::Internal(format!("Unrecognized status '{}'", request.status)))
}

/// Precondición de status: violarla es Conflict para que el cliente
/// re-sincronice su vista
pub fn require_status(
    request: &ServiceRequest,
    expected: RequestStatus,
    message: &str,
) -> AppResult<()> {
    if current_status(request)? != expected {
        return Err(AppError::Conflict(message.to_string()));
    }
    Ok(())
}

/// Solo un conductor aprobado puede aceptar trabajos
pub fn require_approved_mechanic(role: &Role) -> AppResult<&Mechanic> {
    match role {
        Role::Mechanic(mechanic) if mechanic.is_approved() => Ok(mechanic),
        _ => Err(AppError::Forbidden(
            "Only approved drivers can accept jobs".to_string(),
        )),
    }
}

/// El actor debe ser el conductor asignado a este request
pub fn require_assigned_mechanic<'a>(
    role: &'a Role,
    request: &ServiceRequest,
) -> AppResult<&'a Mechanic> {
    let mechanic = match role {
        Role::Mechanic(mechanic) => mechanic,
        _ => {
            return Err(AppError::Forbidden(
                "Only drivers can perform this action".to_string(),
            ))
        }
    };

    if request.assigned_mechanic_id != Some(mechanic.id) {
        return Err(AppError::Forbidden(
            "You are not assigned to this request".to_string(),
        ));
    }

    Ok(mechanic)
}

/// El actor debe ser el garaje asignado a este request
pub fn require_assigned_garage<'a>(
    role: &'a Role,
    request: &ServiceRequest,
) -> AppResult<&'a Garage> {
    let garage = match role {
        Role::Garage(garage) => garage,
        _ => {
            return Err(AppError::Forbidden(
                "Only garages can perform this action".to_string(),
            ))
        }
    };

    if request.assigned_garage_id != Some(garage.id) {
        return Err(AppError::Forbidden(
            "This request is not at your garage".to_string(),
        ));
    }

    Ok(garage)
}

pub fn require_admin(role: &Role) -> AppResult<()> {
    if !role.is_admin() {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }
    Ok(())
}

// ---- Servicio ----

pub struct RequestLifecycleService {
    pool: PgPool,
}

impl RequestLifecycleService {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// El conductor acepta un request pendiente.
    /// pending → assigned; notifica al propietario.
    pub async fn accept_job(&self, role: &Role, request_id: Uuid) -> AppResult<ServiceRequest> {
        let mechanic = require_approved_mechanic(role)?;

        let mut tx = self.pool.begin().await?;

        let request = ServiceRequestRepository::find_by_id_for_update(&mut tx, request_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Service request not found".to_string()))?;

        require_status(&request, RequestStatus::Pending, "This request has already been taken")?;

        let request = ServiceRequestRepository::set_mechanic_and_status_tx(
            &mut tx,
            request_id,
            mechanic.id,
            RequestStatus::Assigned,
        )
        .await?;

        NotificationRepository::insert_tx(
            &mut tx,
            Recipient::Owner(request.owner_id),
            "Driver Assigned",
            "A driver has accepted your service request and will pick up your car soon.",
        )
        .await?;

        tx.commit().await?;

        tracing::info!("🚗 Request {} aceptado por mechanic {}", request_id, mechanic.id);
        Ok(request)
    }

    /// El conductor retira el vehículo del propietario.
    /// assigned → picked_up; notifica al propietario.
    pub async fn pickup_car(&self, role: &Role, request_id: Uuid) -> AppResult<ServiceRequest> {
        let mut tx = self.pool.begin().await?;

        let request = ServiceRequestRepository::find_by_id_for_update(&mut tx, request_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Service request not found".to_string()))?;

        require_assigned_mechanic(role, &request)?;
        require_status(&request, RequestStatus::Assigned, "Cannot pick up car at this stage")?;

        let request =
            ServiceRequestRepository::set_status_tx(&mut tx, request_id, RequestStatus::PickedUp)
                .await?;

        NotificationRepository::insert_tx(
            &mut tx,
            Recipient::Owner(request.owner_id),
            "Car Picked Up",
            "Your car has been picked up by the driver and is on its way to the garage.",
        )
        .await?;

        tx.commit().await?;
        Ok(request)
    }

    /// El conductor entrega el vehículo al garaje elegido.
    /// picked_up → in_service; el garaje debe existir y estar aprobado;
    /// notifica al garaje y al propietario.
    pub async fn deliver_to_garage(
        &self,
        role: &Role,
        request_id: Uuid,
        garage_id: Uuid,
    ) -> AppResult<ServiceRequest> {
        let mut tx = self.pool.begin().await?;

        let request = ServiceRequestRepository::find_by_id_for_update(&mut tx, request_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Service request not found".to_string()))?;

        require_assigned_mechanic(role, &request)?;
        require_status(&request, RequestStatus::PickedUp, "Car must be picked up first")?;

        let garage = ProfileRepository::find_garage_by_id_tx(&mut tx, garage_id)
            .await?
            .filter(|garage| garage.is_approved())
            .ok_or_else(|| AppError::NotFound("Garage not found".to_string()))?;

        let car = CarRepository::find_by_id_tx(&mut tx, request.car_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Car not found".to_string()))?;

        let request = ServiceRequestRepository::set_garage_and_status_tx(
            &mut tx,
            request_id,
            garage.id,
            RequestStatus::InService,
        )
        .await?;

        NotificationRepository::insert_tx(
            &mut tx,
            Recipient::Garage(garage.id),
            "New Car Arrived",
            &format!(
                "A {} has been delivered for {}.",
                car.label(),
                request.service_type.replace('_', " ")
            ),
        )
        .await?;

        NotificationRepository::insert_tx(
            &mut tx,
            Recipient::Owner(request.owner_id),
            "Car At Garage",
            &format!("Your car has arrived at {} and service has begun.", garage.name),
        )
        .await?;

        tx.commit().await?;
        Ok(request)
    }

    /// El garaje marca el servicio como completo.
    /// in_service → completed; recalcula costos finales desde el ledger;
    /// notifica al conductor (para retirar) y al propietario (con total).
    pub async fn complete_service(&self, role: &Role, request_id: Uuid) -> AppResult<ServiceRequest> {
        let mut tx = self.pool.begin().await?;

        let request = ServiceRequestRepository::find_by_id_for_update(&mut tx, request_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Service request not found".to_string()))?;

        require_assigned_garage(role, &request)?;
        require_status(&request, RequestStatus::InService, "Service is not in progress")?;

        // Recompute final desde el conjunto completo de items
        let garage_cost = WorkItemRepository::sum_for_request_tx(&mut tx, request_id).await?;
        let total_cost = cost_model::customer_total(garage_cost);

        let request = ServiceRequestRepository::set_costs_tx(
            &mut tx,
            request_id,
            garage_cost,
            total_cost,
            RequestStatus::Completed,
        )
        .await?;

        if let Some(mechanic_id) = request.assigned_mechanic_id {
            let car = CarRepository::find_by_id_tx(&mut tx, request.car_id)
                .await?
                .ok_or_else(|| AppError::NotFound("Car not found".to_string()))?;

            NotificationRepository::insert_tx(
                &mut tx,
                Recipient::Mechanic(mechanic_id),
                "Service Complete",
                &format!(
                    "The service for {} is complete. Please pick up and return to owner.",
                    car.label()
                ),
            )
            .await?;
        }

        NotificationRepository::insert_tx(
            &mut tx,
            Recipient::Owner(request.owner_id),
            "Service Complete",
            &format!(
                "Your car service has been completed! Total cost: KSH {}. The driver will return your car soon.",
                request.total_cost
            ),
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            "🔧 Request {} completado: garage_cost={} total_cost={}",
            request_id,
            request.garage_cost,
            request.total_cost
        );
        Ok(request)
    }

    /// El conductor devuelve el vehículo al propietario.
    /// completed → delivered; notifica al propietario.
    pub async fn return_to_owner(&self, role: &Role, request_id: Uuid) -> AppResult<ServiceRequest> {
        let mut tx = self.pool.begin().await?;

        let request = ServiceRequestRepository::find_by_id_for_update(&mut tx, request_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Service request not found".to_string()))?;

        require_assigned_mechanic(role, &request)?;
        require_status(&request, RequestStatus::Completed, "Service must be completed first")?;

        let request =
            ServiceRequestRepository::set_status_tx(&mut tx, request_id, RequestStatus::Delivered)
                .await?;

        NotificationRepository::insert_tx(
            &mut tx,
            Recipient::Owner(request.owner_id),
            "Car Returned",
            "Your car has been returned. Thank you for using SwiftServe!",
        )
        .await?;

        tx.commit().await?;
        Ok(request)
    }

    /// Override de admin: asignar un conductor aprobado a cualquier request
    pub async fn assign_mechanic(
        &self,
        role: &Role,
        request_id: Uuid,
        mechanic_id: Uuid,
    ) -> AppResult<ServiceRequest> {
        require_admin(role)?;

        let mut tx = self.pool.begin().await?;

        ServiceRequestRepository::find_by_id_for_update(&mut tx, request_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Service request not found".to_string()))?;

        let mechanic = ProfileRepository::find_mechanic_by_id_tx(&mut tx, mechanic_id)
            .await?
            .filter(|mechanic| mechanic.is_approved())
            .ok_or_else(|| AppError::NotFound("Mechanic not found".to_string()))?;

        let request = ServiceRequestRepository::set_mechanic_and_status_tx(
            &mut tx,
            request_id,
            mechanic.id,
            RequestStatus::Assigned,
        )
        .await?;

        tx.commit().await?;
        Ok(request)
    }

    /// Override de admin: forzar un status reconocido
    pub async fn update_status(
        &self,
        role: &Role,
        request_id: Uuid,
        status: &str,
    ) -> AppResult<ServiceRequest> {
        require_admin(role)?;

        let new_status = RequestStatus::parse(status)
            .ok_or_else(|| validation_error("status", "unrecognized status value"))?;

        let mut tx = self.pool.begin().await?;

        ServiceRequestRepository::find_by_id_for_update(&mut tx, request_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Service request not found".to_string()))?;

        let request =
            ServiceRequestRepository::set_status_tx(&mut tx, request_id, new_status).await?;

        tx.commit().await?;

        tracing::info!("⚙️ Admin forzó request {} a status {}", request_id, new_status.as_str());
        Ok(request)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn mechanic(id: Uuid, status: &str) -> Mechanic {
        Mechanic {
            id,
            user_id: Uuid::new_v4(),
            phone_number: "0712345678".to_string(),
            address: "Nairobi".to_string(),
            id_number: "12345678".to_string(),
            license_number: "DL-001".to_string(),
            status: status.to_string(),
            created_at: Utc::now(),
        }
    }

    fn garage(id: Uuid) -> Garage {
        Garage {
            id,
            user_id: Uuid::new_v4(),
            name: "Speedy Fix".to_string(),
            owner_name: "Jane".to_string(),
            owner_phone: "0712345678".to_string(),
            owner_email: "jane@speedyfix.example".to_string(),
            address: "Industrial Area".to_string(),
            location: "Nairobi".to_string(),
            status: "approved".to_string(),
            created_at: Utc::now(),
        }
    }

    fn request(status: RequestStatus) -> ServiceRequest {
        ServiceRequest {
            id: Uuid::new_v4(),
            car_id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            pickup_location: "Westlands".to_string(),
            preferred_date: Utc::now().date_naive(),
            preferred_time: chrono::NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
            service_type: "oil_change".to_string(),
            special_instructions: String::new(),
            status: status.as_str().to_string(),
            assigned_mechanic_id: None,
            assigned_garage_id: None,
            garage_cost: Decimal::ZERO,
            total_cost: Decimal::ZERO,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_pending_mechanic_cannot_accept_jobs() {
        let role = Role::Mechanic(mechanic(Uuid::new_v4(), "pending"));
        assert!(matches!(require_approved_mechanic(&role), Err(AppError::Forbidden(_))));

        let approved = Role::Mechanic(mechanic(Uuid::new_v4(), "approved"));
        assert!(require_approved_mechanic(&approved).is_ok());
    }

    #[test]
    fn test_owner_cannot_act_as_driver() {
        let req = request(RequestStatus::Assigned);
        assert!(matches!(
            require_assigned_mechanic(&Role::Admin, &req),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_unassigned_mechanic_is_rejected() {
        let mut req = request(RequestStatus::Assigned);
        req.assigned_mechanic_id = Some(Uuid::new_v4());

        let other = Role::Mechanic(mechanic(Uuid::new_v4(), "approved"));
        assert!(matches!(
            require_assigned_mechanic(&other, &req),
            Err(AppError::Forbidden(_))
        ));
    }

    #[test]
    fn test_assigned_mechanic_passes_guard() {
        let mechanic_id = Uuid::new_v4();
        let mut req = request(RequestStatus::Assigned);
        req.assigned_mechanic_id = Some(mechanic_id);

        let role = Role::Mechanic(mechanic(mechanic_id, "approved"));
        assert!(require_assigned_mechanic(&role, &req).is_ok());
    }

    #[test]
    fn test_pickup_on_pending_request_is_conflict() {
        // Intentar pickup_car antes de accept_job viola la cadena de
        // precondiciones
        let req = request(RequestStatus::Pending);
        let result = require_status(&req, RequestStatus::Assigned, "Cannot pick up car at this stage");
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[test]
    fn test_second_accept_is_conflict() {
        // El perdedor de dos accept_job concurrentes observa `assigned`
        let req = request(RequestStatus::Assigned);
        let result = require_status(&req, RequestStatus::Pending, "This request has already been taken");
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[test]
    fn test_guard_chain_for_full_lifecycle() {
        // Cada paso solo pasa su guarda en el estado que le corresponde
        let steps = [
            (RequestStatus::Pending, RequestStatus::Pending),
            (RequestStatus::Assigned, RequestStatus::Assigned),
            (RequestStatus::PickedUp, RequestStatus::PickedUp),
            (RequestStatus::InService, RequestStatus::InService),
            (RequestStatus::Completed, RequestStatus::Completed),
        ];

        for (current, expected) in steps {
            assert!(require_status(&request(current), expected, "ok").is_ok());
        }

        // Y falla en cualquier otro estado
        assert!(require_status(&request(RequestStatus::Delivered), RequestStatus::Pending, "x").is_err());
        assert!(require_status(&request(RequestStatus::Cancelled), RequestStatus::InService, "x").is_err());
    }

    #[test]
    fn test_garage_guard_requires_assignment() {
        let garage_id = Uuid::new_v4();
        let mut req = request(RequestStatus::InService);

        let role = Role::Garage(garage(garage_id));
        assert!(matches!(
            require_assigned_garage(&role, &req),
            Err(AppError::Forbidden(_))
        ));

        req.assigned_garage_id = Some(garage_id);
        assert!(require_assigned_garage(&role, &req).is_ok());
    }

    #[test]
    fn test_admin_guard() {
        assert!(require_admin(&Role::Admin).is_ok());
        assert!(matches!(require_admin(&Role::None), Err(AppError::Forbidden(_))));
    }
}
