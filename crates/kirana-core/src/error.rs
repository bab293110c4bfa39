//! # Error Types
//!
//! Domain-specific error types for kirana-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                 │
//! │                                                                     │
//! │  kirana-core errors (this file)                                     │
//! │  ├── CoreError        - Business rule and referential failures      │
//! │  └── ValidationError  - Input validation failures                   │
//! │                                                                     │
//! │  kirana-db errors (separate crate)                                  │
//! │  ├── DbError          - Database operation failures                 │
//! │  └── EngineError      - CoreError + DbError at the engine boundary  │
//! │                                                                     │
//! │  Flow: ValidationError → CoreError → EngineError → caller           │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. `thiserror` for derive macros (not manual impls)
//! 2. Include context in messages (product name, offending id)
//! 3. Errors are enum variants, never strings
//! 4. Business failures are typed and machine-distinguishable; only
//!    genuinely unexpected failures stay opaque

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations and referential failures.
///
/// Every variant leaves persistent state untouched: these errors are
/// raised before the transaction commits and abort it wholesale.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Product id does not exist, or the product is deactivated.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Customer id does not exist.
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    /// Invoice id or number does not exist.
    #[error("Invoice not found: {0}")]
    InvoiceNotFound(String),

    /// On-hand stock does not cover the requested quantity.
    ///
    /// Raised on the first violating line; no stock moves for any line.
    #[error("Insufficient stock for {name}: available {available}, requested {requested}")]
    InsufficientStock {
        name: String,
        available: i64,
        requested: i64,
    },

    /// Cart has no lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// Computed grand total went negative. Guarded against because the
    /// discount is capped at 100%; reaching this is a defect.
    #[error("Invoice total would be negative: {total_cents} cents")]
    NegativeTotal { total_cents: i64 },

    /// Identifier minting exhausted its bounded retries. Practically
    /// unreachable given the random space; treated as an infrastructure
    /// anomaly rather than user feedback.
    #[error("Could not mint a unique {kind} after {attempts} attempts")]
    IdentifierExhausted { kind: &'static str, attempts: u32 },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any lookup or I/O runs.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g. non-digit mobile, malformed barcode).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_message() {
        let err = CoreError::InsufficientStock {
            name: "Milk (1 L)".to_string(),
            available: 3,
            requested: 5,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for Milk (1 L): available 3, requested 5"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::OutOfRange {
            field: "discount".to_string(),
            min: 0,
            max: 10000,
        };
        assert_eq!(err.to_string(), "discount must be between 0 and 10000");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "quantity".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
