//! Error types for projection and snapshot operations

use thiserror::Error;

/// Errors raised by the projection engine, the snapshot store and the loaders
#[derive(Error, Debug)]
pub enum PlanError {
    /// Assumptions violate a structural precondition (plan length, non-finite rates).
    /// Callers are expected to reject these before reaching the engine.
    #[error("Invalid assumptions: {0}")]
    InvalidAssumptions(String),

    /// A currency value left the representable range
    #[error("Arithmetic overflow computing {field} for year {year}")]
    ArithmeticOverflow {
        /// Quantity being computed when the overflow happened
        field: &'static str,
        /// Calendar year of the offending record
        year: i32,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

pub type Result<T> = std::result::Result<T, PlanError>;
