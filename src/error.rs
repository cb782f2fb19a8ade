//! Error types shared by the profile loaders and the projection engine

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CalculatorError {
    /// Malformed or missing input detected while building a profile or config
    #[error("Validation error on `{field}`: {message}")]
    Validation { field: String, message: String },

    /// Discounting at exactly -100% per period
    #[error("Division by zero: discount rate of {rate}% per period")]
    DivisionByZero { rate: f64 },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl CalculatorError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        CalculatorError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// True for failures caused by the caller's input rather than the computation
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            CalculatorError::Validation { .. } | CalculatorError::Json(_) | CalculatorError::Csv(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, CalculatorError>;
