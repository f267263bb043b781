//! Controllers de negocio
//!
//! Cada módulo de la API tiene su controller; el de bookings es el engine
//! transaccional del sistema.

pub mod auth_controller;
pub mod booking_controller;
pub mod user_controller;
pub mod vehicle_controller;
