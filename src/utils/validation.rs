//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! de entrada: ids positivos, fechas ISO y campos de texto.

use chrono::NaiveDate;
use validator::Validate;

use crate::utils::errors::AppError;

/// Ejecutar las validaciones derivadas de un request DTO
pub fn check_request(request: &impl Validate) -> Result<(), AppError> {
    request
        .validate()
        .map_err(|e| AppError::Validation(e.to_string()))
}

/// Validar que un id sea un entero positivo
pub fn validate_positive_id(value: i32, field_name: &str) -> Result<i32, AppError> {
    if value <= 0 {
        return Err(AppError::Validation(format!(
            "{} must be a positive integer",
            field_name
        )));
    }
    Ok(value)
}

/// Validar y convertir string a fecha calendario (YYYY-MM-DD)
pub fn validate_date(value: &str, field_name: &str) -> Result<NaiveDate, AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", field_name)));
    }

    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| {
        AppError::Validation(format!("{} must be a valid date (YYYY-MM-DD)", field_name))
    })
}

/// Validar que un string no esté vacío, devolviendo el valor recortado
pub fn validate_not_empty(value: &str, field_name: &str) -> Result<String, AppError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::Validation(format!("{} is required", field_name)));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_positive_id() {
        assert_eq!(validate_positive_id(1, "customer_id").unwrap(), 1);
        assert!(validate_positive_id(0, "customer_id").is_err());
        assert!(validate_positive_id(-5, "vehicle_id").is_err());
    }

    #[test]
    fn test_validate_date() {
        let date = validate_date("2025-01-04", "rent_start_date").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2025, 1, 4).unwrap());

        // con espacios alrededor también parsea
        assert!(validate_date(" 2025-01-04 ", "rent_start_date").is_ok());

        assert!(validate_date("", "rent_start_date").is_err());
        assert!(validate_date("04/01/2025", "rent_start_date").is_err());
        assert!(validate_date("2025-13-40", "rent_end_date").is_err());
    }

    #[test]
    fn test_validate_not_empty() {
        assert_eq!(validate_not_empty("  Toyota  ", "vehicle_name").unwrap(), "Toyota");
        assert!(validate_not_empty("   ", "vehicle_name").is_err());
    }
}
