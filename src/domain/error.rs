//! Domain errors

use thiserror::Error;

/// Domain-level error types.
///
/// Every failure an operation can surface to a caller is a distinct
/// variant; the HTTP layer maps each to a status code in one place.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("Access denied: {0}")]
    Forbidden(String),

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Insufficient wallet balance: required {required}, available {available}")]
    InsufficientFunds { required: i64, available: i64 },

    #[error("Time slot not available")]
    SlotUnavailable,

    #[error("Cannot cancel booking less than {cutoff_minutes} minutes before start time")]
    TooLateToCancel { cutoff_minutes: i64 },

    #[error("Review already exists for this booking")]
    DuplicateReview,

    #[error("Booking not found or not completed")]
    BookingNotEligible,

    #[error("Validation: {0}")]
    Validation(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;
