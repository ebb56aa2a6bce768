//! Utilidades de validación
//!
//! Validadores usados por `#[validate(custom = "...")]` en los DTOs y por
//! los controladores para parámetros de consulta.

use rust_decimal::Decimal;
use serde::Serialize;
use validator::ValidationError;

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_empty"));
    }
    Ok(())
}

/// Validar formato de teléfono (básico)
pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    let clean_phone = value.chars().filter(|c| c.is_ascii_digit()).collect::<String>();
    if clean_phone.len() < 10 || clean_phone.len() > 15 {
        let mut error = ValidationError::new("phone");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar coordenadas GPS en grados decimales
pub fn validate_coordinates(lat: f64, lng: f64) -> Result<(), ValidationError> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        let mut error = ValidationError::new("latitude");
        error.add_param("value".into(), &lat);
        error.add_param("range".into(), &"-90.0 to 90.0".to_string());
        return Err(error);
    }

    if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
        let mut error = ValidationError::new("longitude");
        error.add_param("value".into(), &lng);
        error.add_param("range".into(), &"-180.0 to 180.0".to_string());
        return Err(error);
    }

    Ok(())
}

/// Latitud almacenada como `NUMERIC(10,7)`
pub fn validate_latitude(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::from(-90) || *value > Decimal::from(90) {
        let mut error = ValidationError::new("latitude");
        error.add_param("range".into(), &"-90.0 to 90.0".to_string());
        return Err(error);
    }
    Ok(())
}

/// Longitud almacenada como `NUMERIC(10,7)`
pub fn validate_longitude(value: &Decimal) -> Result<(), ValidationError> {
    if *value < Decimal::from(-180) || *value > Decimal::from(180) {
        let mut error = ValidationError::new("longitude");
        error.add_param("range".into(), &"-180.0 to 180.0".to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor sea positivo
pub fn validate_positive<T: PartialOrd + num_traits::Zero + Serialize>(
    value: &T,
) -> Result<(), ValidationError> {
    if *value <= T::zero() {
        let mut error = ValidationError::new("positive");
        error.add_param("value".into(), value);
        return Err(error);
    }
    Ok(())
}

/// Validar que un valor no sea negativo
pub fn validate_non_negative<T: PartialOrd + num_traits::Zero + Serialize>(
    value: &T,
) -> Result<(), ValidationError> {
    if *value < T::zero() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), value);
        return Err(error);
    }
    Ok(())
}

/// Validador de precios para DTOs (`Decimal` positivo)
pub fn validate_price(value: &Decimal) -> Result<(), ValidationError> {
    validate_positive(value)
}

/// Validador de importes que admiten cero
pub fn validate_amount(value: &Decimal) -> Result<(), ValidationError> {
    validate_non_negative(value)
}

/// Validador de duraciones en horas
pub fn validate_duration_hours(value: &Decimal) -> Result<(), ValidationError> {
    validate_positive(value)
}

/// Validador de texto obligatorio para DTOs
pub fn validate_required_text(value: &str) -> Result<(), ValidationError> {
    validate_not_empty(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_coordinates() {
        assert!(validate_coordinates(28.6139, 77.2090).is_ok());
        assert!(validate_coordinates(90.0, -180.0).is_ok());
        assert!(validate_coordinates(90.1, 0.0).is_err());
        assert!(validate_coordinates(0.0, 180.5).is_err());
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_validate_decimal_coordinates() {
        assert!(validate_latitude(&Decimal::new(286_139_000, 7)).is_ok());
        assert!(validate_latitude(&Decimal::new(91, 0)).is_err());
        assert!(validate_longitude(&Decimal::new(-180, 0)).is_ok());
        assert!(validate_longitude(&Decimal::new(1801, 1)).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(&Decimal::new(4000, 2)).is_ok());
        assert!(validate_price(&Decimal::ZERO).is_err());
        assert!(validate_amount(&Decimal::ZERO).is_ok());
        assert!(validate_amount(&Decimal::new(-1, 0)).is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("+91 98765 43210").is_ok());
        assert!(validate_phone("12345").is_err());
    }

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("  ").is_err());
        assert!(validate_not_empty("ok").is_ok());
    }
}
