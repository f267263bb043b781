//! Controller de vehículos
//!
//! CRUD de inventario, solo admin para escrituras. El borrado está
//! bloqueado mientras el vehículo esté booked; la disponibilidad en sí la
//! muta únicamente el engine de bookings durante sus transacciones.

use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::dto::vehicle_dto::{CreateVehicleRequest, UpdateVehicleRequest, VehicleResponse};
use crate::dto::ApiResponse;
use crate::models::vehicle::{AvailabilityStatus, VehicleType};
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::AppError;
use crate::utils::validation::{validate_not_empty, validate_positive_id};

pub struct VehicleController {
    repository: VehicleRepository,
}

fn validate_vehicle_type(value: &str) -> Result<(), AppError> {
    if VehicleType::parse(value).is_none() {
        return Err(AppError::Validation(
            "type must be one of: 'car', 'bike', 'van', 'SUV'".to_string(),
        ));
    }
    Ok(())
}

fn validate_availability(value: &str) -> Result<(), AppError> {
    if AvailabilityStatus::parse(value).is_none() {
        return Err(AppError::Validation(
            "availability_status must be either 'available' or 'booked'".to_string(),
        ));
    }
    Ok(())
}

fn validate_daily_rent_price(value: Decimal) -> Result<(), AppError> {
    if value <= Decimal::ZERO {
        return Err(AppError::Validation(
            "daily_rent_price must be a positive number".to_string(),
        ));
    }
    Ok(())
}

impl VehicleController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: VehicleRepository::new(pool),
        }
    }

    pub async fn create(
        &self,
        request: CreateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        let vehicle_name = validate_not_empty(&request.vehicle_name, "vehicle_name")?;
        validate_vehicle_type(&request.vehicle_type)?;
        let registration_number =
            validate_not_empty(&request.registration_number, "registration_number")?;
        validate_daily_rent_price(request.daily_rent_price)?;
        validate_availability(&request.availability_status)?;

        if self
            .repository
            .registration_exists(&registration_number, None)
            .await?
        {
            return Err(AppError::Conflict(
                "registration_number must be unique".to_string(),
            ));
        }

        let vehicle = self
            .repository
            .create(
                &vehicle_name,
                &request.vehicle_type,
                &registration_number,
                request.daily_rent_price,
                &request.availability_status,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            VehicleResponse::from(vehicle),
            "Vehicle created successfully".to_string(),
        ))
    }

    pub async fn list(&self) -> Result<Vec<VehicleResponse>, AppError> {
        let vehicles = self.repository.list_all().await?;
        Ok(vehicles.into_iter().map(VehicleResponse::from).collect())
    }

    pub async fn get_by_id(&self, id: i32) -> Result<VehicleResponse, AppError> {
        let id = validate_positive_id(id, "vehicleId")?;

        let vehicle = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        Ok(VehicleResponse::from(vehicle))
    }

    pub async fn update(
        &self,
        id: i32,
        request: UpdateVehicleRequest,
    ) -> Result<ApiResponse<VehicleResponse>, AppError> {
        let id = validate_positive_id(id, "vehicleId")?;

        let current = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        let vehicle_name = match request.vehicle_name {
            Some(name) => validate_not_empty(&name, "vehicle_name")?,
            None => current.vehicle_name.clone(),
        };

        let vehicle_type = match request.vehicle_type {
            Some(vehicle_type) => {
                validate_vehicle_type(&vehicle_type)?;
                vehicle_type
            }
            None => current.vehicle_type.clone(),
        };

        let registration_number = match request.registration_number {
            Some(registration) => {
                let registration = validate_not_empty(&registration, "registration_number")?;
                if registration != current.registration_number
                    && self
                        .repository
                        .registration_exists(&registration, Some(id))
                        .await?
                {
                    return Err(AppError::Conflict(
                        "registration_number must be unique".to_string(),
                    ));
                }
                registration
            }
            None => current.registration_number.clone(),
        };

        let daily_rent_price = match request.daily_rent_price {
            Some(price) => {
                validate_daily_rent_price(price)?;
                price
            }
            None => current.daily_rent_price,
        };

        let availability_status = match request.availability_status {
            Some(status) => {
                validate_availability(&status)?;
                status
            }
            None => current.availability_status.clone(),
        };

        let vehicle = self
            .repository
            .update(
                id,
                &vehicle_name,
                &vehicle_type,
                &registration_number,
                daily_rent_price,
                &availability_status,
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            VehicleResponse::from(vehicle),
            "Vehicle updated successfully".to_string(),
        ))
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        let id = validate_positive_id(id, "vehicleId")?;

        let vehicle = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        if !vehicle.is_available() {
            return Err(AppError::Conflict(
                "Vehicle is currently booked and cannot be deleted".to_string(),
            ));
        }

        self.repository.delete(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_vehicle_type() {
        assert!(validate_vehicle_type("car").is_ok());
        assert!(validate_vehicle_type("SUV").is_ok());
        assert!(validate_vehicle_type("truck").is_err());
    }

    #[test]
    fn test_validate_daily_rent_price() {
        assert!(validate_daily_rent_price(Decimal::new(5000, 2)).is_ok());
        assert!(validate_daily_rent_price(Decimal::ZERO).is_err());
        assert!(validate_daily_rent_price(Decimal::new(-100, 2)).is_err());
    }
}
