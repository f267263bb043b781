//! Inicialización del schema
//!
//! CREATE TABLE IF NOT EXISTS para users, vehicles y bookings. Las
//! restricciones de unicidad y rango viven en el storage; la exclusión
//! mutua de bookings activos por vehículo se garantiza por locking en el
//! engine, no por constraint.

use sqlx::PgPool;

use crate::utils::errors::AppError;

const USERS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id SERIAL PRIMARY KEY,
        name VARCHAR(100) NOT NULL,
        email VARCHAR(150) NOT NULL UNIQUE CHECK (email = LOWER(email)),
        password VARCHAR(225) NOT NULL CHECK (LENGTH(password) >= 6),
        phone VARCHAR(20) NOT NULL,
        role VARCHAR(20) NOT NULL CHECK (role IN ('admin', 'customer')),
        created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
    )
"#;

const VEHICLES_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS vehicles (
        id SERIAL PRIMARY KEY,
        vehicle_name VARCHAR(255) NOT NULL,
        type VARCHAR(10) NOT NULL CHECK (type IN ('car', 'bike', 'van', 'SUV')),
        registration_number VARCHAR(100) NOT NULL UNIQUE,
        daily_rent_price NUMERIC(10, 2) NOT NULL CHECK (daily_rent_price > 0),
        availability_status VARCHAR(15) NOT NULL CHECK (availability_status IN ('available', 'booked'))
    )
"#;

const BOOKINGS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS bookings (
        id SERIAL PRIMARY KEY,
        customer_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        vehicle_id INTEGER NOT NULL REFERENCES vehicles(id) ON DELETE CASCADE,
        rent_start_date DATE NOT NULL,
        rent_end_date DATE NOT NULL CHECK (rent_end_date > rent_start_date),
        total_price NUMERIC(10, 2) NOT NULL CHECK (total_price > 0),
        status VARCHAR(15) NOT NULL CHECK (status IN ('active', 'cancelled', 'returned'))
    )
"#;

/// Crear las tablas si no existen (idempotente, se ejecuta al arranque)
pub async fn init_schema(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query(USERS_TABLE).execute(pool).await?;
    sqlx::query(VEHICLES_TABLE).execute(pool).await?;
    sqlx::query(BOOKINGS_TABLE).execute(pool).await?;

    Ok(())
}
