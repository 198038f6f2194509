//! Validation of inbound command fields.
//!
//! Each function checks one raw input and returns the typed value the
//! aggregate works with.

use common::CustomerId;
use thiserror::Error;

use crate::wishlist::ProductId;

/// Maximum length of a customer id.
pub const MAX_CUSTOMER_ID_LEN: usize = 50;

/// Maximum length of a product id.
pub const MAX_PRODUCT_ID_LEN: usize = 100;

/// Maximum length of an item note, in characters.
pub const MAX_NOTE_LEN: usize = 500;

/// Errors raised while validating command input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid customer ID: {0}")]
    InvalidCustomerId(String),

    #[error("Invalid product ID: {0}")]
    InvalidProductId(String),

    #[error("Note is too long: {len} characters (max {max})")]
    NoteTooLong { len: usize, max: usize },
}

/// Validates a customer id: 1 to 50 ASCII letters, digits, `-` or `_`.
pub fn validate_customer_id(raw: &str) -> Result<CustomerId, ValidationError> {
    check_identifier(raw, MAX_CUSTOMER_ID_LEN)
        .map(|()| CustomerId::new(raw))
        .map_err(ValidationError::InvalidCustomerId)
}

/// Validates a product id: 1 to 100 ASCII letters, digits, `-` or `_`.
pub fn validate_product_id(raw: &str) -> Result<ProductId, ValidationError> {
    check_identifier(raw, MAX_PRODUCT_ID_LEN)
        .map(|()| ProductId::new(raw))
        .map_err(ValidationError::InvalidProductId)
}

/// Validates an optional note. Blank notes are dropped; others are trimmed.
pub fn validate_note(note: Option<String>) -> Result<Option<String>, ValidationError> {
    let Some(note) = note else {
        return Ok(None);
    };

    let trimmed = note.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let len = trimmed.chars().count();
    if len > MAX_NOTE_LEN {
        return Err(ValidationError::NoteTooLong {
            len,
            max: MAX_NOTE_LEN,
        });
    }

    Ok(Some(trimmed.to_string()))
}

fn check_identifier(raw: &str, max_len: usize) -> Result<(), String> {
    if raw.trim().is_empty() {
        return Err("must not be empty".to_string());
    }
    if raw.len() > max_len {
        return Err(format!("must be at most {max_len} characters"));
    }
    if let Some(c) = raw
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
    {
        return Err(format!("unexpected character {c:?}"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_customer_ids() {
        let longest = "a".repeat(MAX_CUSTOMER_ID_LEN);
        for raw in ["customer-1", "ABC_123", "x", longest.as_str()] {
            assert_eq!(validate_customer_id(raw).unwrap().as_str(), raw);
        }
    }

    #[test]
    fn test_invalid_customer_ids() {
        let too_long = "a".repeat(MAX_CUSTOMER_ID_LEN + 1);
        for raw in ["", "   ", "has space", "semi;colon", "ümlaut", too_long.as_str()] {
            assert!(
                matches!(
                    validate_customer_id(raw),
                    Err(ValidationError::InvalidCustomerId(_))
                ),
                "{raw:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_product_id_length_limit() {
        assert!(validate_product_id(&"p".repeat(100)).is_ok());
        assert!(matches!(
            validate_product_id(&"p".repeat(101)),
            Err(ValidationError::InvalidProductId(_))
        ));
        assert!(matches!(
            validate_product_id("../etc"),
            Err(ValidationError::InvalidProductId(_))
        ));
    }

    #[test]
    fn test_note_normalization() {
        assert_eq!(validate_note(None), Ok(None));
        assert_eq!(validate_note(Some("   ".to_string())), Ok(None));
        assert_eq!(
            validate_note(Some("  for Sam  ".to_string())),
            Ok(Some("for Sam".to_string()))
        );
    }

    #[test]
    fn test_note_too_long() {
        let result = validate_note(Some("n".repeat(MAX_NOTE_LEN + 1)));
        assert_eq!(
            result,
            Err(ValidationError::NoteTooLong {
                len: MAX_NOTE_LEN + 1,
                max: MAX_NOTE_LEN
            })
        );
    }
}
