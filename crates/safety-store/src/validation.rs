//! Input validation for store writes.

use std::fmt;
use std::time::Duration;

/// Validation error types.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Value outside its allowed numeric range.
    OutOfRange { field: String, value: f64 },
    /// Negative value where a count is required.
    Negative { field: String, value: i64 },
    /// Pregnancy category is not a single-letter code.
    InvalidCategory(String),
    /// Value too long.
    TooLong { field: String, max: usize, actual: usize },
    /// Empty value where one is required.
    Empty(String),
    /// Zero-length expiry window.
    ZeroTtl(String),
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::OutOfRange { field, value } => {
                write!(f, "{} is out of range: {}", field, value)
            }
            ValidationError::Negative { field, value } => {
                write!(f, "{} cannot be negative: {}", field, value)
            }
            ValidationError::InvalidCategory(value) => {
                write!(f, "Invalid pregnancy category: {:?}", value)
            }
            ValidationError::TooLong { field, max, actual } => {
                write!(f, "{} is too long ({} chars, max {})", field, actual, max)
            }
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
            ValidationError::ZeroTtl(field) => write!(f, "{} must be at least one second", field),
        }
    }
}

impl std::error::Error for ValidationError {}

/// Maximum allowed length for drug names.
pub const MAX_DRUG_NAME_LENGTH: usize = 255;

/// Maximum allowed length for cache keys.
pub const MAX_CACHE_KEY_LENGTH: usize = 512;

/// Validate a drug name: nonempty after trimming, bounded length.
pub fn validate_drug_name(name: &str) -> Result<(), ValidationError> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Empty("drug name".to_string()));
    }

    if name.len() > MAX_DRUG_NAME_LENGTH {
        return Err(ValidationError::TooLong {
            field: "drug name".to_string(),
            max: MAX_DRUG_NAME_LENGTH,
            actual: name.len(),
        });
    }

    Ok(())
}

/// Validate a cache key: nonempty, bounded length.
pub fn validate_cache_key(key: &str) -> Result<(), ValidationError> {
    if key.is_empty() {
        return Err(ValidationError::Empty("cache key".to_string()));
    }

    if key.len() > MAX_CACHE_KEY_LENGTH {
        return Err(ValidationError::TooLong {
            field: "cache key".to_string(),
            max: MAX_CACHE_KEY_LENGTH,
            actual: key.len(),
        });
    }

    Ok(())
}

/// Validate a confidence score: finite, within [0, 1].
pub fn validate_confidence_score(score: f64) -> Result<(), ValidationError> {
    if !score.is_finite() || !(0.0..=1.0).contains(&score) {
        return Err(ValidationError::OutOfRange {
            field: "confidence score".to_string(),
            value: score,
        });
    }

    Ok(())
}

/// Validate a study count: zero or more.
pub fn validate_study_count(count: i64) -> Result<(), ValidationError> {
    if count < 0 {
        return Err(ValidationError::Negative {
            field: "study count".to_string(),
            value: count,
        });
    }

    Ok(())
}

/// Validate a pregnancy category: a single ASCII letter (e.g. "B", "X").
pub fn validate_pregnancy_category(category: &str) -> Result<(), ValidationError> {
    let mut chars = category.chars();

    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_ascii_alphabetic() => Ok(()),
        _ => Err(ValidationError::InvalidCategory(category.to_string())),
    }
}

/// Validate an expiry window: at least one whole second.
pub fn validate_ttl(field: &str, ttl: Duration) -> Result<(), ValidationError> {
    if ttl.as_secs() == 0 {
        return Err(ValidationError::ZeroTtl(field.to_string()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_drug_name() {
        assert!(validate_drug_name("Atorvastatin").is_ok());
        assert!(validate_drug_name(" Tylenol ").is_ok()); // trimmed

        assert!(matches!(
            validate_drug_name(""),
            Err(ValidationError::Empty(_))
        ));
        assert!(matches!(
            validate_drug_name("   "),
            Err(ValidationError::Empty(_))
        ));

        let long_name = "a".repeat(300);
        assert!(matches!(
            validate_drug_name(&long_name),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_validate_cache_key() {
        assert!(validate_cache_key("fda:atorvastatin").is_ok());

        assert!(matches!(
            validate_cache_key(""),
            Err(ValidationError::Empty(_))
        ));

        let long_key = "k".repeat(600);
        assert!(matches!(
            validate_cache_key(&long_key),
            Err(ValidationError::TooLong { .. })
        ));
    }

    #[test]
    fn test_validate_confidence_score() {
        assert!(validate_confidence_score(0.0).is_ok());
        assert!(validate_confidence_score(0.75).is_ok());
        assert!(validate_confidence_score(1.0).is_ok());

        assert!(matches!(
            validate_confidence_score(-0.1),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            validate_confidence_score(1.5),
            Err(ValidationError::OutOfRange { .. })
        ));
        assert!(matches!(
            validate_confidence_score(f64::NAN),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_validate_study_count() {
        assert!(validate_study_count(0).is_ok());
        assert!(validate_study_count(250).is_ok());

        assert!(matches!(
            validate_study_count(-1),
            Err(ValidationError::Negative { .. })
        ));
    }

    #[test]
    fn test_validate_pregnancy_category() {
        assert!(validate_pregnancy_category("B").is_ok());
        assert!(validate_pregnancy_category("x").is_ok());

        assert!(matches!(
            validate_pregnancy_category(""),
            Err(ValidationError::InvalidCategory(_))
        ));
        assert!(matches!(
            validate_pregnancy_category("BC"),
            Err(ValidationError::InvalidCategory(_))
        ));
        assert!(matches!(
            validate_pregnancy_category("3"),
            Err(ValidationError::InvalidCategory(_))
        ));
    }

    #[test]
    fn test_validate_ttl() {
        assert!(validate_ttl("ttl", Duration::from_secs(60)).is_ok());

        assert!(matches!(
            validate_ttl("ttl", Duration::from_millis(400)),
            Err(ValidationError::ZeroTtl(_))
        ));
    }

    #[test]
    fn test_validation_error_display() {
        let err = ValidationError::OutOfRange {
            field: "confidence score".to_string(),
            value: 1.5,
        };
        assert_eq!(err.to_string(), "confidence score is out of range: 1.5");

        let err = ValidationError::Empty("drug name".to_string());
        assert_eq!(err.to_string(), "drug name cannot be empty");
    }
}
