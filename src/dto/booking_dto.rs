//! DTOs de bookings
//!
//! Las vistas de booking cambian según el contexto: la creación devuelve
//! un snapshot del vehículo con su tarifa, el listado de admin incluye
//! cliente y vehículo, y el listado de cliente solo el vehículo.

use serde::{Deserialize, Serialize};

use crate::models::booking::Booking;

// Request para crear un booking
#[derive(Debug, Deserialize)]
pub struct CreateBookingRequest {
    pub customer_id: i32,
    pub vehicle_id: i32,
    pub rent_start_date: String,
    pub rent_end_date: String,
}

// Request para transicionar el estado de un booking
#[derive(Debug, Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: String,
}

/// Snapshot del vehículo en la respuesta de creación
#[derive(Debug, Serialize)]
pub struct BookedVehicleSnapshot {
    pub vehicle_name: String,
    pub daily_rent_price: f64,
}

// Response de creación: booking + snapshot de vehículo
#[derive(Debug, Serialize)]
pub struct CreatedBookingResponse {
    pub id: i32,
    pub customer_id: i32,
    pub vehicle_id: i32,
    pub rent_start_date: String,
    pub rent_end_date: String,
    pub total_price: f64,
    pub status: String,
    pub vehicle: BookedVehicleSnapshot,
}

/// Datos del cliente en la vista de admin
#[derive(Debug, Serialize)]
pub struct CustomerSnapshot {
    pub name: String,
    pub email: String,
}

/// Datos del vehículo en la vista de admin
#[derive(Debug, Serialize)]
pub struct VehicleSummary {
    pub vehicle_name: String,
    pub registration_number: String,
}

// Item del listado para admin: booking + cliente + vehículo
#[derive(Debug, Serialize)]
pub struct AdminBookingView {
    pub id: i32,
    pub customer_id: i32,
    pub vehicle_id: i32,
    pub rent_start_date: String,
    pub rent_end_date: String,
    pub total_price: f64,
    pub status: String,
    pub customer: CustomerSnapshot,
    pub vehicle: VehicleSummary,
}

/// Datos del vehículo en la vista de cliente
#[derive(Debug, Serialize)]
pub struct VehicleDetail {
    pub vehicle_name: String,
    pub registration_number: String,
    #[serde(rename = "type")]
    pub vehicle_type: String,
}

// Item del listado para cliente: booking propio + vehículo
#[derive(Debug, Serialize)]
pub struct CustomerBookingView {
    pub id: i32,
    pub vehicle_id: i32,
    pub rent_start_date: String,
    pub rent_end_date: String,
    pub total_price: f64,
    pub status: String,
    pub vehicle: VehicleDetail,
}

/// Listado devuelto por `get_bookings_by_role`: la forma depende del rol
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BookingListing {
    Admin(Vec<AdminBookingView>),
    Customer(Vec<CustomerBookingView>),
}

/// Disponibilidad del vehículo tras una transición de admin
#[derive(Debug, Serialize)]
pub struct VehicleAvailabilitySnapshot {
    pub availability_status: String,
}

// Response de transición de estado
#[derive(Debug, Serialize)]
pub struct UpdatedBookingResponse {
    pub id: i32,
    pub customer_id: i32,
    pub vehicle_id: i32,
    pub rent_start_date: String,
    pub rent_end_date: String,
    pub total_price: f64,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vehicle: Option<VehicleAvailabilitySnapshot>,
}

impl UpdatedBookingResponse {
    /// Construye la vista desde la fila, con o sin snapshot de
    /// disponibilidad según el rol que ejecutó la transición.
    pub fn from_booking(booking: &Booking, availability: Option<&str>) -> Self {
        Self {
            id: booking.id,
            customer_id: booking.customer_id,
            vehicle_id: booking.vehicle_id,
            rent_start_date: booking.rent_start_date.format("%Y-%m-%d").to_string(),
            rent_end_date: booking.rent_end_date.format("%Y-%m-%d").to_string(),
            total_price: booking.total_price.to_string().parse().unwrap_or(0.0),
            status: booking.status.clone(),
            vehicle: availability.map(|status| VehicleAvailabilitySnapshot {
                availability_status: status.to_string(),
            }),
        }
    }
}
