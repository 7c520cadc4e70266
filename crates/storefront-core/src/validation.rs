//! # Validation Module
//!
//! Product validation for records received from the Product Service.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Deserialization (serde)                                      │
//! │  ├── Field presence and JSON types                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── id > 0, title present, 0 <= price <= max, image is a URI          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Stores accept only validated products and never re-check them         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Price;
use crate::types::ProductId;
use crate::{MAX_PRICE_CENTS, MAX_TITLE_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a product id.
///
/// ## Rules
/// - Must be greater than zero (the catalog starts numbering at 1)
pub fn validate_product_id(id: ProductId) -> ValidationResult<()> {
    if id.get() == 0 {
        return Err(ValidationError::InvalidFormat {
            field: "id".to_string(),
            reason: "must be greater than zero".to_string(),
        });
    }

    Ok(())
}

/// Validates a product title.
///
/// ## Rules
/// - Must not be empty
/// - At most [`MAX_TITLE_LEN`] characters
///
/// ```rust
/// use storefront_core::validation::validate_title;
///
/// assert!(validate_title("Mens Casual Slim Fit").is_ok());
/// assert!(validate_title("   ").is_err());
/// ```
pub fn validate_title(title: &str) -> ValidationResult<()> {
    let title = title.trim();

    if title.is_empty() {
        return Err(ValidationError::Required {
            field: "title".to_string(),
        });
    }

    if title.chars().count() > MAX_TITLE_LEN {
        return Err(ValidationError::TooLong {
            field: "title".to_string(),
            max: MAX_TITLE_LEN,
        });
    }

    Ok(())
}

/// Validates a price.
///
/// Zero is allowed (free items). At most [`MAX_PRICE_CENTS`].
pub fn validate_price(price: Price) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustBeNonNegative {
            field: "price".to_string(),
        });
    }

    let max = Price::from_cents(MAX_PRICE_CENTS);
    if price > max {
        return Err(ValidationError::ExceedsMaximum {
            field: "price".to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates an image reference.
///
/// ## Rules
/// - Must not be empty
/// - Must be an absolute `http://` or `https://` URI
pub fn validate_image(image: &str) -> ValidationResult<()> {
    let image = image.trim();

    if image.is_empty() {
        return Err(ValidationError::Required {
            field: "image".to_string(),
        });
    }

    let rest = image
        .strip_prefix("https://")
        .or_else(|| image.strip_prefix("http://"));

    match rest {
        Some(rest) if !rest.is_empty() && !rest.contains(char::is_whitespace) => Ok(()),
        _ => Err(ValidationError::InvalidFormat {
            field: "image".to_string(),
            reason: "must be an http(s) URI".to_string(),
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
