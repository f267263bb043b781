//! Modelo de Vehicle
//!
//! Este módulo contiene el struct Vehicle y sus enums de tipo y
//! disponibilidad. Mapea exactamente al schema PostgreSQL.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Tipo de vehículo - la columna `type` es VARCHAR con CHECK
/// (car|bike|van|SUV). 'SUV' va en mayúsculas en el schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VehicleType {
    #[serde(rename = "car")]
    Car,
    #[serde(rename = "bike")]
    Bike,
    #[serde(rename = "van")]
    Van,
    #[serde(rename = "SUV")]
    Suv,
}

impl VehicleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Car => "car",
            VehicleType::Bike => "bike",
            VehicleType::Van => "van",
            VehicleType::Suv => "SUV",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "car" => Some(VehicleType::Car),
            "bike" => Some(VehicleType::Bike),
            "van" => Some(VehicleType::Van),
            "SUV" => Some(VehicleType::Suv),
            _ => None,
        }
    }
}

/// Estado de disponibilidad del vehículo
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvailabilityStatus {
    Available,
    Booked,
}

impl AvailabilityStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AvailabilityStatus::Available => "available",
            AvailabilityStatus::Booked => "booked",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "available" => Some(AvailabilityStatus::Available),
            "booked" => Some(AvailabilityStatus::Booked),
            _ => None,
        }
    }
}

/// Vehicle principal - mapea exactamente a la tabla vehicles
#[derive(Debug, Clone, FromRow)]
pub struct Vehicle {
    pub id: i32,
    pub vehicle_name: String,
    #[sqlx(rename = "type")]
    pub vehicle_type: String,
    pub registration_number: String,
    pub daily_rent_price: Decimal,
    pub availability_status: String,
}

impl Vehicle {
    pub fn is_available(&self) -> bool {
        self.availability_status == AvailabilityStatus::Available.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_type_parse() {
        assert_eq!(VehicleType::parse("car"), Some(VehicleType::Car));
        assert_eq!(VehicleType::parse("SUV"), Some(VehicleType::Suv));
        // el schema exige 'SUV' exacto, minúsculas no valen
        assert_eq!(VehicleType::parse("suv"), None);
        assert_eq!(VehicleType::parse("truck"), None);
    }

    #[test]
    fn test_availability_status_parse() {
        assert_eq!(
            AvailabilityStatus::parse("available"),
            Some(AvailabilityStatus::Available)
        );
        assert_eq!(
            AvailabilityStatus::parse("booked"),
            Some(AvailabilityStatus::Booked)
        );
        assert_eq!(AvailabilityStatus::parse("reserved"), None);
    }
}
