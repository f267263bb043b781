//! Modelo de Booking
//!
//! Este módulo contiene el struct Booking y el state machine de estados:
//! active -> cancelled (cliente, antes del inicio) o active -> returned
//! (admin o auto-lapse). cancelled y returned son terminales.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Estado del booking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Active,
    Cancelled,
    Returned,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Active => "active",
            BookingStatus::Cancelled => "cancelled",
            BookingStatus::Returned => "returned",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "active" => Some(BookingStatus::Active),
            "cancelled" => Some(BookingStatus::Cancelled),
            "returned" => Some(BookingStatus::Returned),
            _ => None,
        }
    }
}

/// Booking principal - mapea exactamente a la tabla bookings
#[derive(Debug, Clone, FromRow)]
pub struct Booking {
    pub id: i32,
    pub customer_id: i32,
    pub vehicle_id: i32,
    pub rent_start_date: NaiveDate,
    pub rent_end_date: NaiveDate,
    pub total_price: Decimal,
    pub status: String,
}

impl Booking {
    /// Estado tipado; `None` si la columna contiene un valor fuera del CHECK
    pub fn status(&self) -> Option<BookingStatus> {
        BookingStatus::parse(&self.status)
    }

    pub fn is_active(&self) -> bool {
        self.status == BookingStatus::Active.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_status_parse() {
        assert_eq!(BookingStatus::parse("active"), Some(BookingStatus::Active));
        assert_eq!(BookingStatus::parse("cancelled"), Some(BookingStatus::Cancelled));
        assert_eq!(BookingStatus::parse("returned"), Some(BookingStatus::Returned));
        assert_eq!(BookingStatus::parse("pending"), None);
    }
}
