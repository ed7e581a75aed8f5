//! API query and error types.

use serde::{Deserialize, Serialize};

use crate::estimate::{Mode, ValidationFailure, Violation};

/// Query parameters for `POST /calculate`.
#[derive(Debug, Default, Deserialize)]
pub struct CalculateQuery {
    /// Defaults to lenient, matching the live editor.
    #[serde(default)]
    pub mode: Mode,
}

/// Error response body for a rejected strict calculation.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message.
    pub error: String,
    pub violations: Vec<Violation>,
}

impl From<ValidationFailure> for ErrorResponse {
    fn from(failure: ValidationFailure) -> Self {
        Self {
            error: failure.to_string(),
            violations: failure.violations,
        }
    }
}
