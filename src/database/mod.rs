//! Capa de persistencia

pub mod connection;
pub mod schema;
