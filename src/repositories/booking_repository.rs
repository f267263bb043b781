//! Repositorio de bookings
//!
//! El engine de bookings es el único escritor de `bookings.status` y
//! `bookings.total_price`; todas las escrituras pasan por la conexión de
//! una transacción, con `FOR UPDATE` sobre la fila del booking antes de
//! cualquier transición.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::{PgConnection, PgPool};

use crate::models::booking::{Booking, BookingStatus};
use crate::utils::errors::AppError;

/// Fila del listado de admin: booking + cliente + vehículo
#[derive(Debug, sqlx::FromRow)]
pub struct AdminBookingRow {
    pub id: i32,
    pub customer_id: i32,
    pub vehicle_id: i32,
    pub rent_start_date: NaiveDate,
    pub rent_end_date: NaiveDate,
    pub total_price: Decimal,
    pub status: String,
    pub customer_name: String,
    pub customer_email: String,
    pub vehicle_name: String,
    pub registration_number: String,
}

/// Fila del listado de cliente: booking propio + vehículo
#[derive(Debug, sqlx::FromRow)]
pub struct CustomerBookingRow {
    pub id: i32,
    pub vehicle_id: i32,
    pub rent_start_date: NaiveDate,
    pub rent_end_date: NaiveDate,
    pub total_price: Decimal,
    pub status: String,
    pub vehicle_name: String,
    pub registration_number: String,
    #[sqlx(rename = "type")]
    pub vehicle_type: String,
}

pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_all(&self) -> Result<Vec<AdminBookingRow>, AppError> {
        let rows = sqlx::query_as::<_, AdminBookingRow>(
            r#"
            SELECT
                b.id,
                b.customer_id,
                b.vehicle_id,
                b.rent_start_date,
                b.rent_end_date,
                b.total_price,
                b.status,
                u.name AS customer_name,
                u.email AS customer_email,
                v.vehicle_name,
                v.registration_number
            FROM bookings b
            INNER JOIN users u ON u.id = b.customer_id
            INNER JOIN vehicles v ON v.id = b.vehicle_id
            ORDER BY b.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn list_for_customer(
        &self,
        customer_id: i32,
    ) -> Result<Vec<CustomerBookingRow>, AppError> {
        let rows = sqlx::query_as::<_, CustomerBookingRow>(
            r#"
            SELECT
                b.id,
                b.vehicle_id,
                b.rent_start_date,
                b.rent_end_date,
                b.total_price,
                b.status,
                v.vehicle_name,
                v.registration_number,
                v.type
            FROM bookings b
            INNER JOIN vehicles v ON v.id = b.vehicle_id
            WHERE b.customer_id = $1
            ORDER BY b.id DESC
            "#,
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Inserta un booking activo dentro de una transacción
    pub async fn insert(
        conn: &mut PgConnection,
        customer_id: i32,
        vehicle_id: i32,
        rent_start_date: NaiveDate,
        rent_end_date: NaiveDate,
        total_price: Decimal,
    ) -> Result<Booking, AppError> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            INSERT INTO bookings (customer_id, vehicle_id, rent_start_date, rent_end_date, total_price, status)
            VALUES ($1, $2, $3, $4, $5, 'active')
            RETURNING *
            "#,
        )
        .bind(customer_id)
        .bind(vehicle_id)
        .bind(rent_start_date)
        .bind(rent_end_date)
        .bind(total_price)
        .fetch_one(conn)
        .await?;

        Ok(booking)
    }

    /// Carga el booking con lock exclusivo de fila dentro de una transacción
    pub async fn find_for_update(
        conn: &mut PgConnection,
        id: i32,
    ) -> Result<Option<Booking>, AppError> {
        let booking =
            sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(conn)
                .await?;

        Ok(booking)
    }

    /// Transiciona el estado del booking dentro de una transacción
    pub async fn set_status(
        conn: &mut PgConnection,
        id: i32,
        status: BookingStatus,
    ) -> Result<Booking, AppError> {
        let booking = sqlx::query_as::<_, Booking>(
            r#"
            UPDATE bookings
            SET status = $2
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .fetch_one(conn)
        .await?;

        Ok(booking)
    }
}
