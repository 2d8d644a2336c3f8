//! Error types for timegrid-engine operations.
//!
//! The engines themselves are infallible: semantically unusual input (an
//! unrecognized occurrence type, an end date before the anchor) yields an
//! empty result, never an `Err`. The only failure class is a malformed date
//! key handed to the civil-date parser, which is a caller contract violation.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GridError {
    #[error("Invalid date key (expected YYYY-MM-DD): {0}")]
    InvalidDateKey(String),
}

pub type Result<T> = std::result::Result<T, GridError>;
