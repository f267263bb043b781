//! Repositorio de vehículos
//!
//! Las lecturas normales van contra el pool. `find_for_update` y
//! `set_availability` operan sobre la conexión de una transacción del
//! engine de bookings: el lock de fila del vehículo es lo que serializa
//! los intentos de reserva concurrentes.

use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use crate::models::vehicle::{AvailabilityStatus, Vehicle};
use crate::utils::errors::AppError;

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        vehicle_name: &str,
        vehicle_type: &str,
        registration_number: &str,
        daily_rent_price: Decimal,
        availability_status: &str,
    ) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (vehicle_name, type, registration_number, daily_rent_price, availability_status)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(vehicle_name)
        .bind(vehicle_type)
        .bind(registration_number)
        .bind(daily_rent_price)
        .bind(availability_status)
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(vehicle)
    }

    pub async fn list_all(&self) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles ORDER BY id ASC")
            .fetch_all(&self.pool)
            .await?;

        Ok(vehicles)
    }

    pub async fn registration_exists(
        &self,
        registration_number: &str,
        exclude_id: Option<i32>,
    ) -> Result<bool, AppError> {
        let exists: (bool,) = match exclude_id {
            Some(id) => {
                sqlx::query_as(
                    "SELECT EXISTS(SELECT 1 FROM vehicles WHERE registration_number = $1 AND id <> $2)",
                )
                .bind(registration_number)
                .bind(id)
                .fetch_one(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(
                    "SELECT EXISTS(SELECT 1 FROM vehicles WHERE registration_number = $1)",
                )
                .bind(registration_number)
                .fetch_one(&self.pool)
                .await?
            }
        };

        Ok(exists.0)
    }

    pub async fn update(
        &self,
        id: i32,
        vehicle_name: &str,
        vehicle_type: &str,
        registration_number: &str,
        daily_rent_price: Decimal,
        availability_status: &str,
    ) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles
            SET vehicle_name = $2, type = $3, registration_number = $4, daily_rent_price = $5, availability_status = $6
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(vehicle_name)
        .bind(vehicle_type)
        .bind(registration_number)
        .bind(daily_rent_price)
        .bind(availability_status)
        .fetch_one(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn delete(&self, id: i32) -> Result<(), AppError> {
        sqlx::query("DELETE FROM vehicles WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Carga el vehículo con lock exclusivo de fila dentro de una transacción
    pub async fn find_for_update(
        conn: &mut PgConnection,
        id: i32,
    ) -> Result<Option<Vehicle>, AppError> {
        let vehicle =
            sqlx::query_as::<_, Vehicle>("SELECT * FROM vehicles WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(conn)
                .await?;

        Ok(vehicle)
    }

    /// Cambia el flag de disponibilidad dentro de una transacción
    pub async fn set_availability(
        conn: &mut PgConnection,
        id: i32,
        status: AvailabilityStatus,
    ) -> Result<(), AppError> {
        sqlx::query("UPDATE vehicles SET availability_status = $2 WHERE id = $1")
            .bind(id)
            .bind(status.as_str())
            .execute(conn)
            .await?;

        Ok(())
    }
}
