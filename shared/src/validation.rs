//! Validation utilities for the Digital Farmer platform
//!
//! Boundary checks run before anything enters the store, plus the
//! Turkey-specific region helpers.

use rust_decimal::Decimal;
use validator::ValidationError;

// ============================================================================
// Field Validations
// ============================================================================

/// Validate that a field size is strictly positive
pub fn validate_field_size(size_decares: Decimal) -> Result<(), &'static str> {
    if size_decares <= Decimal::ZERO {
        return Err("Field size must be greater than zero");
    }
    Ok(())
}

/// Validate that a required text value is present
pub fn validate_required_text(value: &str) -> Result<(), &'static str> {
    if value.trim().is_empty() {
        return Err("Value cannot be empty");
    }
    Ok(())
}

/// `validator` hook for [`validate_field_size`]
pub fn validate_positive_size(size_decares: &Decimal) -> Result<(), ValidationError> {
    validate_field_size(*size_decares).map_err(|msg| {
        let mut error = ValidationError::new("positive_size");
        error.message = Some(msg.into());
        error
    })
}

/// `validator` hook for [`validate_required_text`]
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    validate_required_text(value).map_err(|msg| {
        let mut error = ValidationError::new("required");
        error.message = Some(msg.into());
        error
    })
}

// ============================================================================
// Soil Analysis Validations
// ============================================================================

/// Validate soil pH is on the 0-14 scale
pub fn validate_ph(ph: Decimal) -> Result<(), &'static str> {
    if ph < Decimal::ZERO || ph > Decimal::from(14) {
        return Err("pH must be between 0 and 14");
    }
    Ok(())
}

/// Validate organic matter percentage
pub fn validate_organic_matter(percent: Decimal) -> Result<(), &'static str> {
    if percent < Decimal::ZERO || percent > Decimal::from(100) {
        return Err("Organic matter must be between 0 and 100%");
    }
    Ok(())
}

// ============================================================================
// Turkey-Specific Helpers
// ============================================================================

/// Provinces with a warm Mediterranean/Aegean climate
pub const WARM_REGIONS: &[&str] = &[
    "antalya",
    "adana",
    "mersin",
    "izmir",
    "aydın",
];

/// Lowercase with Turkish dotted/dotless I rules ("İZMİR" -> "izmir", "AYDIN" -> "aydın")
pub fn turkish_lowercase(value: &str) -> String {
    value
        .chars()
        .map(|c| match c {
            'I' => 'ı',
            'İ' => 'i',
            other => other,
        })
        .collect::<String>()
        .to_lowercase()
}

/// Check if a location lies in one of the warm regions
pub fn is_warm_region(location: &str) -> bool {
    let location = turkish_lowercase(location);
    WARM_REGIONS.iter().any(|region| location.contains(region))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_size() {
        assert!(validate_field_size(Decimal::from(10)).is_ok());
        assert!(validate_field_size(Decimal::new(1, 2)).is_ok());
        assert!(validate_field_size(Decimal::ZERO).is_err());
        assert!(validate_field_size(Decimal::from(-5)).is_err());
    }

    #[test]
    fn test_required_text() {
        assert!(validate_required_text("Kuzey Bahçesi").is_ok());
        assert!(validate_required_text("").is_err());
        assert!(validate_required_text(" \t ").is_err());
    }

    #[test]
    fn test_validator_hooks_carry_codes() {
        let err = validate_positive_size(&Decimal::ZERO).unwrap_err();
        assert_eq!(err.code, "positive_size");
        let err = validate_not_blank("").unwrap_err();
        assert_eq!(err.code, "required");
    }

    #[test]
    fn test_ph_range() {
        assert!(validate_ph(Decimal::new(68, 1)).is_ok());
        assert!(validate_ph(Decimal::ZERO).is_ok());
        assert!(validate_ph(Decimal::from(14)).is_ok());
        assert!(validate_ph(Decimal::new(141, 1)).is_err());
        assert!(validate_ph(Decimal::from(-1)).is_err());
    }

    #[test]
    fn test_organic_matter_range() {
        assert!(validate_organic_matter(Decimal::new(25, 1)).is_ok());
        assert!(validate_organic_matter(Decimal::from(101)).is_err());
    }

    #[test]
    fn test_warm_regions() {
        assert!(is_warm_region("Antalya, Manavgat"));
        assert!(is_warm_region("İZMİR, Bornova"));
        assert!(is_warm_region("AYDIN, Söke"));
        assert!(!is_warm_region("Kars, Sarıkamış"));
        assert!(!is_warm_region("Tekirdağ, Hayrabolu"));
    }
}
