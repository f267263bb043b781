//! DTOs de vehículos

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::vehicle::Vehicle;

// Request para crear un vehículo
#[derive(Debug, Deserialize)]
pub struct CreateVehicleRequest {
    pub vehicle_name: String,
    #[serde(rename = "type")]
    pub vehicle_type: String,
    pub registration_number: String,
    pub daily_rent_price: Decimal,
    pub availability_status: String,
}

// Request para actualizar un vehículo
#[derive(Debug, Deserialize)]
pub struct UpdateVehicleRequest {
    pub vehicle_name: Option<String>,
    #[serde(rename = "type")]
    pub vehicle_type: Option<String>,
    pub registration_number: Option<String>,
    pub daily_rent_price: Option<Decimal>,
    pub availability_status: Option<String>,
}

// Response de vehículo
#[derive(Debug, Serialize)]
pub struct VehicleResponse {
    pub id: i32,
    pub vehicle_name: String,
    #[serde(rename = "type")]
    pub vehicle_type: String,
    pub registration_number: String,
    pub daily_rent_price: f64,
    pub availability_status: String,
}

impl From<Vehicle> for VehicleResponse {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            vehicle_name: vehicle.vehicle_name,
            vehicle_type: vehicle.vehicle_type,
            registration_number: vehicle.registration_number,
            daily_rent_price: vehicle.daily_rent_price.to_string().parse().unwrap_or(0.0),
            availability_status: vehicle.availability_status,
        }
    }
}
