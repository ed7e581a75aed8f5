//! Estimate calculation engine: sizing, pricing and projections for a PV proposal.

/// Billing policy and sizing coefficients.
pub mod constants;
pub mod engine;
pub mod error;
/// Bill-of-materials helpers.
pub mod items;
pub mod result;
pub mod types;

pub use constants::{BILLING_MONTHS, EngineConstants};
pub use engine::{Calculator, calculate};
pub use error::{ValidationFailure, Violation};
pub use items::move_item;
pub use result::CalculationResult;
pub use types::{CalculationInput, LineItem, Mode, PanelSpec};
