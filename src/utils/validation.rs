//! Utilidades de validación
//!
//! Este módulo contiene funciones helper para validación de datos
//! de entrada que no cubren los derives de `validator`.

use rust_decimal::Decimal;
use validator::ValidationError;

/// Validar que un string no esté vacío
pub fn validate_not_empty(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("not_empty");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
    }
    Ok(())
}

/// Validar que un costo sea no-negativo
pub fn validate_non_negative_cost(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() {
        let mut error = ValidationError::new("non_negative");
        error.add_param("value".into(), &value.to_string());
        return Err(error);
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_not_empty() {
        assert!(validate_not_empty("oil change").is_ok());
        assert!(validate_not_empty("   ").is_err());
        assert!(validate_not_empty("").is_err());
    }

    #[test]
    fn test_validate_non_negative_cost() {
        assert!(validate_non_negative_cost(&Decimal::ZERO).is_ok());
        assert!(validate_non_negative_cost(&Decimal::from(2000)).is_ok());
        assert!(validate_non_negative_cost(&Decimal::from(-1)).is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("0712345678").is_ok());
        assert!(validate_phone("+254 712 345 678").is_ok());
        assert!(validate_phone("12345").is_err());
    }
}
