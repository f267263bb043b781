//! Engine de bookings
//!
//! Este controller es el núcleo transaccional del sistema: crea bookings
//! calculando el precio bajo lock de fila del vehículo, lista por rol y
//! transiciona estados (active -> cancelled / returned) con auto-lapse de
//! bookings vencidos. Es el único escritor de `bookings.status`,
//! `bookings.total_price` y `vehicles.availability_status`.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::dto::booking_dto::{
    AdminBookingView, BookedVehicleSnapshot, BookingListing, CreateBookingRequest,
    CreatedBookingResponse, CustomerBookingView, CustomerSnapshot, UpdatedBookingResponse,
    VehicleDetail, VehicleSummary,
};
use crate::dto::ApiResponse;
use crate::middleware::auth::AuthenticatedUser;
use crate::models::booking::{Booking, BookingStatus};
use crate::models::user::Role;
use crate::models::vehicle::AvailabilityStatus;
use crate::repositories::booking_repository::BookingRepository;
use crate::repositories::user_repository::UserRepository;
use crate::repositories::vehicle_repository::VehicleRepository;
use crate::utils::errors::AppError;
use crate::utils::validation::{validate_date, validate_positive_id};

pub struct BookingController {
    pool: PgPool,
    repository: BookingRepository,
}

/// Duración del alquiler en días completos, mínimo 1
fn rental_duration_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days().max(1)
}

/// Precio total = tarifa diaria x duración, redondeado a 2 decimales
fn compute_total_price(daily_rent_price: Decimal, duration_days: i64) -> Decimal {
    (daily_rent_price * Decimal::from(duration_days)).round_dp(2)
}

/// Valida el rango de fechas del alquiler y devuelve la duración en días
fn validate_rental_period(
    start: NaiveDate,
    end: NaiveDate,
    today: NaiveDate,
) -> Result<i64, AppError> {
    if start < today {
        return Err(AppError::Validation(
            "rent_start_date cannot be in the past".to_string(),
        ));
    }

    if end <= start {
        return Err(AppError::Validation(
            "rent_end_date must be later than rent_start_date".to_string(),
        ));
    }

    Ok(rental_duration_days(start, end))
}

/// Normaliza el estado solicitado (trim + lowercase); solo se aceptan
/// 'cancelled' y 'returned' como transiciones pedidas por un caller
fn parse_requested_status(raw: &str) -> Result<BookingStatus, AppError> {
    match BookingStatus::parse(raw.trim().to_lowercase().as_str()) {
        Some(status @ (BookingStatus::Cancelled | BookingStatus::Returned)) => Ok(status),
        _ => Err(AppError::Validation(
            "status must be either 'cancelled' or 'returned'".to_string(),
        )),
    }
}

/// Un booking activo vence en cuanto el instante actual pasa la medianoche
/// de su fecha de fin
fn is_overdue(rent_end_date: NaiveDate, now: DateTime<Utc>) -> bool {
    rent_end_date.and_time(NaiveTime::MIN) < now.naive_utc()
}

/// Acción resuelta por la tabla de reglas de transición
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TransitionAction {
    Cancel,
    Return,
    /// Ya devuelto (incluido el caso auto-lapse): éxito idempotente
    AlreadyReturned,
}

/// Tabla de reglas de transición: rol + propiedad + estado actual + fecha.
/// Evalúa la autorización sin tocar el storage; el caller ya tiene la fila
/// del booking bajo lock.
fn authorize_transition(
    booking: &Booking,
    requested: BookingStatus,
    caller_id: i32,
    caller_role: Role,
    today: NaiveDate,
) -> Result<TransitionAction, AppError> {
    match caller_role {
        Role::Customer => {
            if booking.customer_id != caller_id {
                return Err(AppError::Forbidden(
                    "You can only update your own bookings".to_string(),
                ));
            }

            if requested != BookingStatus::Cancelled {
                return Err(AppError::Forbidden(
                    "Customers can only cancel bookings".to_string(),
                ));
            }

            if !booking.is_active() {
                return Err(AppError::Validation(
                    "Only active bookings can be cancelled".to_string(),
                ));
            }

            if today >= booking.rent_start_date {
                return Err(AppError::Validation(
                    "You can only cancel before the booking start date".to_string(),
                ));
            }

            Ok(TransitionAction::Cancel)
        }
        Role::Admin => {
            if requested != BookingStatus::Returned {
                return Err(AppError::Forbidden(
                    "Admins can only mark bookings as 'returned'".to_string(),
                ));
            }

            if booking.status() == Some(BookingStatus::Cancelled) {
                return Err(AppError::Validation(
                    "Cancelled bookings cannot be marked as returned".to_string(),
                ));
            }

            if booking.status() == Some(BookingStatus::Returned) {
                return Ok(TransitionAction::AlreadyReturned);
            }

            Ok(TransitionAction::Return)
        }
    }
}

impl BookingController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: BookingRepository::new(pool.clone()),
            pool,
        }
    }

    /// Crea un booking en una única transacción: lookup del cliente,
    /// vehículo bajo `FOR UPDATE`, cálculo de precio, insert del booking
    /// activo y marcado del vehículo como booked. Cualquier fallo revierte
    /// la transacción completa.
    pub async fn create_booking(
        &self,
        request: CreateBookingRequest,
    ) -> Result<ApiResponse<CreatedBookingResponse>, AppError> {
        let customer_id = validate_positive_id(request.customer_id, "customer_id")?;
        let vehicle_id = validate_positive_id(request.vehicle_id, "vehicle_id")?;
        let rent_start_date = validate_date(&request.rent_start_date, "rent_start_date")?;
        let rent_end_date = validate_date(&request.rent_end_date, "rent_end_date")?;

        let today = Utc::now().date_naive();
        let duration_days = validate_rental_period(rent_start_date, rent_end_date, today)?;

        let mut tx = self.pool.begin().await?;

        let (_, customer_role) = UserRepository::find_id_and_role(&mut *tx, customer_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Customer not found".to_string()))?;

        match Role::parse(&customer_role) {
            Some(Role::Customer) | Some(Role::Admin) => {}
            None => {
                return Err(AppError::Forbidden(
                    "Customer is not allowed to create bookings".to_string(),
                ))
            }
        }

        // El lock de fila serializa los intentos concurrentes sobre el
        // mismo vehículo: solo el primero ve 'available'
        let vehicle = VehicleRepository::find_for_update(&mut *tx, vehicle_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Vehicle not found".to_string()))?;

        if !vehicle.is_available() {
            return Err(AppError::Conflict(
                "Vehicle is not available for booking".to_string(),
            ));
        }

        let total_price = compute_total_price(vehicle.daily_rent_price, duration_days);

        let booking = BookingRepository::insert(
            &mut *tx,
            customer_id,
            vehicle_id,
            rent_start_date,
            rent_end_date,
            total_price,
        )
        .await?;

        VehicleRepository::set_availability(&mut *tx, vehicle_id, AvailabilityStatus::Booked)
            .await?;

        tx.commit().await?;

        let response = CreatedBookingResponse {
            id: booking.id,
            customer_id: booking.customer_id,
            vehicle_id: booking.vehicle_id,
            rent_start_date: booking.rent_start_date.format("%Y-%m-%d").to_string(),
            rent_end_date: booking.rent_end_date.format("%Y-%m-%d").to_string(),
            total_price: booking.total_price.to_string().parse().unwrap_or(0.0),
            status: booking.status,
            vehicle: BookedVehicleSnapshot {
                vehicle_name: vehicle.vehicle_name,
                daily_rent_price: vehicle.daily_rent_price.to_string().parse().unwrap_or(0.0),
            },
        };

        Ok(ApiResponse::success_with_message(
            response,
            "Booking created successfully".to_string(),
        ))
    }

    /// Listado por rol: admin ve todos los bookings con cliente y vehículo;
    /// un cliente solo los suyos con el vehículo. Lectura sin locks.
    pub async fn get_bookings_by_role(
        &self,
        caller: &AuthenticatedUser,
    ) -> Result<BookingListing, AppError> {
        match caller.role {
            Role::Admin => {
                let rows = self.repository.list_all().await?;
                let views = rows
                    .into_iter()
                    .map(|row| AdminBookingView {
                        id: row.id,
                        customer_id: row.customer_id,
                        vehicle_id: row.vehicle_id,
                        rent_start_date: row.rent_start_date.format("%Y-%m-%d").to_string(),
                        rent_end_date: row.rent_end_date.format("%Y-%m-%d").to_string(),
                        total_price: row.total_price.to_string().parse().unwrap_or(0.0),
                        status: row.status,
                        customer: CustomerSnapshot {
                            name: row.customer_name,
                            email: row.customer_email,
                        },
                        vehicle: VehicleSummary {
                            vehicle_name: row.vehicle_name,
                            registration_number: row.registration_number,
                        },
                    })
                    .collect();

                Ok(BookingListing::Admin(views))
            }
            Role::Customer => {
                let rows = self.repository.list_for_customer(caller.user_id).await?;
                let views = rows
                    .into_iter()
                    .map(|row| CustomerBookingView {
                        id: row.id,
                        vehicle_id: row.vehicle_id,
                        rent_start_date: row.rent_start_date.format("%Y-%m-%d").to_string(),
                        rent_end_date: row.rent_end_date.format("%Y-%m-%d").to_string(),
                        total_price: row.total_price.to_string().parse().unwrap_or(0.0),
                        status: row.status,
                        vehicle: VehicleDetail {
                            vehicle_name: row.vehicle_name,
                            registration_number: row.registration_number,
                            vehicle_type: row.vehicle_type,
                        },
                    })
                    .collect();

                Ok(BookingListing::Customer(views))
            }
        }
    }

    /// Transiciona el estado de un booking bajo lock de fila. Antes de
    /// evaluar la transición pedida aplica el auto-lapse: un booking activo
    /// cuya fecha de fin ya pasó se marca como returned y libera el
    /// vehículo, dentro de la misma transacción.
    pub async fn update_booking_status(
        &self,
        booking_id: i32,
        request_status: &str,
        caller: &AuthenticatedUser,
    ) -> Result<ApiResponse<UpdatedBookingResponse>, AppError> {
        let booking_id = validate_positive_id(booking_id, "bookingId")?;
        let requested = parse_requested_status(request_status)?;

        let mut tx = self.pool.begin().await?;

        let mut booking = BookingRepository::find_for_update(&mut *tx, booking_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Booking not found".to_string()))?;

        // Auto-lapse: el retorno es implícito una vez vencido el período
        if booking.is_active() && is_overdue(booking.rent_end_date, Utc::now()) {
            booking =
                BookingRepository::set_status(&mut *tx, booking.id, BookingStatus::Returned).await?;
            VehicleRepository::set_availability(
                &mut *tx,
                booking.vehicle_id,
                AvailabilityStatus::Available,
            )
            .await?;
        }

        let today = Utc::now().date_naive();
        let action = authorize_transition(&booking, requested, caller.user_id, caller.role, today)?;

        match action {
            TransitionAction::Cancel => {
                let cancelled =
                    BookingRepository::set_status(&mut *tx, booking.id, BookingStatus::Cancelled)
                        .await?;
                VehicleRepository::set_availability(
                    &mut *tx,
                    cancelled.vehicle_id,
                    AvailabilityStatus::Available,
                )
                .await?;

                tx.commit().await?;

                let response = UpdatedBookingResponse::from_booking(&cancelled, None);
                Ok(ApiResponse::success_with_message(
                    response,
                    "Booking cancelled successfully".to_string(),
                ))
            }
            TransitionAction::AlreadyReturned => {
                tx.commit().await?;

                let response = UpdatedBookingResponse::from_booking(
                    &booking,
                    Some(AvailabilityStatus::Available.as_str()),
                );
                Ok(ApiResponse::success_with_message(
                    response,
                    "Booking marked as returned. Vehicle is now available".to_string(),
                ))
            }
            TransitionAction::Return => {
                let returned =
                    BookingRepository::set_status(&mut *tx, booking.id, BookingStatus::Returned)
                        .await?;
                VehicleRepository::set_availability(
                    &mut *tx,
                    returned.vehicle_id,
                    AvailabilityStatus::Available,
                )
                .await?;

                tx.commit().await?;

                let response = UpdatedBookingResponse::from_booking(
                    &returned,
                    Some(AvailabilityStatus::Available.as_str()),
                );
                Ok(ApiResponse::success_with_message(
                    response,
                    "Booking marked as returned. Vehicle is now available".to_string(),
                ))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_duration_is_whole_days_with_minimum_one() {
        assert_eq!(rental_duration_days(date(2025, 1, 1), date(2025, 1, 4)), 3);
        assert_eq!(rental_duration_days(date(2025, 1, 1), date(2025, 1, 2)), 1);
        // el mínimo protege contra rangos degenerados que la validación
        // previa ya rechaza
        assert_eq!(rental_duration_days(date(2025, 1, 1), date(2025, 1, 1)), 1);
    }

    #[test]
    fn test_price_determinism() {
        // 50.00 x 3 días = 150.00
        let daily = Decimal::new(5000, 2);
        let total = compute_total_price(daily, 3);
        assert_eq!(total, Decimal::new(15000, 2));
        assert_eq!(total.to_string(), "150.00");
    }

    #[test]
    fn test_price_rounds_to_two_decimals() {
        let daily = Decimal::new(3333, 3); // 3.333
        let total = compute_total_price(daily, 3);
        assert_eq!(total, Decimal::new(1000, 2)); // 9.999 -> 10.00
    }

    #[test]
    fn test_rental_period_rejects_past_start() {
        let today = date(2025, 6, 15);
        let err = validate_rental_period(date(2025, 6, 14), date(2025, 6, 20), today).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_rental_period_rejects_inverted_or_equal_dates() {
        let today = date(2025, 6, 15);
        // end == start
        assert!(validate_rental_period(date(2025, 6, 16), date(2025, 6, 16), today).is_err());
        // end < start
        assert!(validate_rental_period(date(2025, 6, 20), date(2025, 6, 16), today).is_err());
        // rango válido empezando hoy
        assert_eq!(
            validate_rental_period(date(2025, 6, 15), date(2025, 6, 18), today).unwrap(),
            3
        );
    }

    #[test]
    fn test_parse_requested_status_normalizes() {
        assert_eq!(
            parse_requested_status("  CANCELLED ").unwrap(),
            BookingStatus::Cancelled
        );
        assert_eq!(
            parse_requested_status("Returned").unwrap(),
            BookingStatus::Returned
        );
        // 'active' es un estado válido de la tabla pero no una transición
        // que un caller pueda pedir
        assert!(parse_requested_status("active").is_err());
        assert!(parse_requested_status("finished").is_err());
        assert!(parse_requested_status("").is_err());
    }

    #[test]
    fn test_overdue_predicate() {
        let end = date(2025, 6, 15);

        // justo a medianoche del fin todavía no vence
        let at_midnight = Utc.with_ymd_and_hms(2025, 6, 15, 0, 0, 0).unwrap();
        assert!(!is_overdue(end, at_midnight));

        // cualquier instante posterior a la medianoche del fin ya vence
        let next_minute = Utc.with_ymd_and_hms(2025, 6, 15, 0, 1, 0).unwrap();
        assert!(is_overdue(end, next_minute));

        let day_before = Utc.with_ymd_and_hms(2025, 6, 14, 23, 59, 0).unwrap();
        assert!(!is_overdue(end, day_before));
    }

    fn booking_row(customer_id: i32, status: BookingStatus, start: NaiveDate) -> Booking {
        Booking {
            id: 1,
            customer_id,
            vehicle_id: 2,
            rent_start_date: start,
            rent_end_date: start + chrono::Duration::days(3),
            total_price: Decimal::new(15000, 2),
            status: status.as_str().to_string(),
        }
    }

    #[test]
    fn test_customer_cannot_request_returned() {
        let booking = booking_row(7, BookingStatus::Active, date(2025, 6, 20));
        let err = authorize_transition(
            &booking,
            BookingStatus::Returned,
            7,
            Role::Customer,
            date(2025, 6, 15),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn test_admin_cannot_request_cancelled() {
        let booking = booking_row(7, BookingStatus::Active, date(2025, 6, 20));
        let err = authorize_transition(
            &booking,
            BookingStatus::Cancelled,
            1,
            Role::Admin,
            date(2025, 6, 15),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn test_customer_cannot_cancel_from_start_date_onwards() {
        let booking = booking_row(7, BookingStatus::Active, date(2025, 6, 15));

        // el mismo día de inicio ya no se puede cancelar
        let err = authorize_transition(
            &booking,
            BookingStatus::Cancelled,
            7,
            Role::Customer,
            date(2025, 6, 15),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        // el día anterior sí
        assert_eq!(
            authorize_transition(
                &booking,
                BookingStatus::Cancelled,
                7,
                Role::Customer,
                date(2025, 6, 14),
            )
            .unwrap(),
            TransitionAction::Cancel
        );
    }

    #[test]
    fn test_customer_cannot_touch_foreign_booking() {
        let booking = booking_row(7, BookingStatus::Active, date(2025, 6, 20));
        let err = authorize_transition(
            &booking,
            BookingStatus::Cancelled,
            9,
            Role::Customer,
            date(2025, 6, 15),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn test_terminal_states_for_admin() {
        // cancelled es terminal: no puede marcarse como returned
        let cancelled = booking_row(7, BookingStatus::Cancelled, date(2025, 6, 20));
        let err = authorize_transition(
            &cancelled,
            BookingStatus::Returned,
            1,
            Role::Admin,
            date(2025, 6, 15),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));

        // returned -> returned es un éxito idempotente
        let returned = booking_row(7, BookingStatus::Returned, date(2025, 6, 20));
        assert_eq!(
            authorize_transition(
                &returned,
                BookingStatus::Returned,
                1,
                Role::Admin,
                date(2025, 6, 15),
            )
            .unwrap(),
            TransitionAction::AlreadyReturned
        );

        let active = booking_row(7, BookingStatus::Active, date(2025, 6, 20));
        assert_eq!(
            authorize_transition(
                &active,
                BookingStatus::Returned,
                1,
                Role::Admin,
                date(2025, 6, 15),
            )
            .unwrap(),
            TransitionAction::Return
        );
    }
}
