//! Controller de vehículos

use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::dto::car_dto::{CarResponse, CreateCarRequest};
use crate::dto::common::ApiResponse;
use crate::repositories::car_repository::CarRepository;
use crate::services::role_resolver::Role;
use crate::utils::errors::AppError;

pub struct CarController {
    cars: CarRepository,
}

impl CarController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            cars: CarRepository::new(pool),
        }
    }

    /// Registrar un vehículo. Solo propietarios; la patente es única.
    pub async fn create(
        &self,
        role: &Role,
        request: CreateCarRequest,
    ) -> Result<ApiResponse<CarResponse>, AppError> {
        request.validate()?;

        let Role::Owner(owner) = role else {
            return Err(AppError::Forbidden(
                "Only car owners can register cars".to_string(),
            ));
        };

        if self.cars.registration_exists(&request.registration_number).await? {
            return Err(AppError::Conflict(
                "A car with this registration number already exists".to_string(),
            ));
        }

        let car = self
            .cars
            .create(
                owner.id,
                &request.make,
                &request.model,
                request.year,
                &request.registration_number,
                &request.color,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            CarResponse::from(car),
            "Car registered successfully".to_string(),
        ))
    }

    /// El admin ve todos los vehículos; el propietario los suyos;
    /// cualquier otro rol, ninguno
    pub async fn list(&self, role: &Role) -> Result<Vec<CarResponse>, AppError> {
        let cars = match role {
            Role::Admin => self.cars.list_all().await?,
            Role::Owner(owner) => self.cars.find_by_owner(owner.id).await?,
            _ => Vec::new(),
        };

        Ok(cars.into_iter().map(CarResponse::from).collect())
    }

    pub async fn get_by_id(&self, role: &Role, id: Uuid) -> Result<CarResponse, AppError> {
        let car = self
            .cars
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Car not found".to_string()))?;

        match role {
            Role::Admin => {}
            Role::Owner(owner) if car.owner_id == owner.id => {}
            _ => return Err(AppError::Forbidden("You cannot access this car".to_string())),
        }

        Ok(CarResponse::from(car))
    }
}
