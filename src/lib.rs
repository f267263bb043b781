//! Rentify - backend de alquiler de vehículos
//!
//! API REST sobre Axum + SQLx (PostgreSQL). Autenticación JWT, control de
//! acceso por rol (admin / customer) y un engine transaccional de bookings.

pub mod config;
pub mod controllers;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod state;
pub mod utils;
