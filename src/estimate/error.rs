//! Strict-mode validation errors.

use std::fmt;

use serde::Serialize;

/// A single input problem that prevents a fully formed proposal.
///
/// In lenient mode these are collected on the result instead of failing.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    #[error("monthly consumption history is empty")]
    EmptyHistory,

    #[error("monthly consumption history has {found} entries, expected {expected}")]
    HistoryLength { expected: usize, found: usize },

    #[error("monthly consumption reading at index {index} is not a finite number")]
    NonFiniteReading { index: usize },

    #[error("{field} is not a finite number")]
    NonFiniteInput { field: &'static str },

    #[error("final average consumption must be > 0, got {value}")]
    NonPositiveDemand { value: f64 },

    #[error("local irradiation must be > 0, got {value}")]
    NonPositiveIrradiation { value: f64 },

    #[error("roof orientation factor must be > 0, got {value}")]
    NonPositiveOrientation { value: f64 },

    #[error("panel capacity must be > 0 W, got {value}")]
    NonPositivePanelCapacity { value: f64 },

    #[error("no line item with order rank 1 (panel row)")]
    MissingPanelRow,

    #[error("{count} line items have order rank 1, expected exactly one panel row")]
    DuplicatePanelRow { count: usize },

    #[error("manual panel count must be a whole number >= 0, got {value}")]
    InvalidPanelCount { value: f64 },

    #[error("calculation produced a non-finite figure")]
    NonFiniteResult,
}

/// Strict-mode failure carrying every violation found in the input.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationFailure {
    pub violations: Vec<Violation>,
}

impl ValidationFailure {
    /// Returns `true` if any violation matches the predicate.
    pub fn contains(&self, pred: impl Fn(&Violation) -> bool) -> bool {
        self.violations.iter().any(pred)
    }
}

impl fmt::Display for ValidationFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot build proposal: ")?;
        for (i, v) in self.violations.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{v}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationFailure {}
