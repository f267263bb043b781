//! Modelos de datos
//!
//! Structs que mapean a las tablas PostgreSQL y sus enums de dominio.

pub mod booking;
pub mod user;
pub mod vehicle;
