//! Input records for the calculation engine.

use serde::{Deserialize, Serialize};

/// Order rank of the line item that carries the panel count.
pub const PANEL_ROW_RANK: u32 = 1;

/// Reference panel used for sizing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PanelSpec {
    /// Rated power of one panel (W).
    pub capacity_watts: f64,
    /// Unit price of one panel.
    pub price: f64,
}

/// A priced, quantified row in the bill of materials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub order_rank: u32,
    pub name: String,
    pub quantity: f64,
    pub unit_price: f64,
}

impl LineItem {
    pub fn new(order_rank: u32, name: impl Into<String>, quantity: f64, unit_price: f64) -> Self {
        Self {
            order_rank,
            name: name.into(),
            quantity,
            unit_price,
        }
    }

    /// `quantity * unit_price`.
    pub fn line_total(&self) -> f64 {
        self.quantity * self.unit_price
    }

    /// Whether this row holds the panel count.
    pub fn is_panel_row(&self) -> bool {
        self.order_rank == PANEL_ROW_RANK
    }
}

/// Everything the engine needs to size and price one proposal.
///
/// Callers build a fresh value per invocation; the engine only borrows it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalculationInput {
    /// Utility price per kWh.
    pub unit_energy_cost: f64,
    /// Average daily irradiation at the site (kWh/m²/day).
    pub local_irradiation: f64,
    pub panel: PanelSpec,
    /// Thirteen monthly readings (kWh).
    pub monthly_consumption_kwh: Vec<f64>,
    /// Expected extra monthly consumption added after averaging (kWh).
    #[serde(default)]
    pub average_increase_kwh: f64,
    /// Yield multiplier from roof facing (1.0 = optimal).
    pub roof_orientation_factor: f64,
    #[serde(default)]
    pub discount: f64,
    #[serde(default)]
    pub increase: f64,
    /// When true, `discount` and `increase` are percentages of the subtotal.
    #[serde(default)]
    pub discount_is_percent: bool,
    pub line_items: Vec<LineItem>,
    /// When false the panel row quantity is taken as entered by the user.
    pub apply_calculation: bool,
}

/// How the engine reacts to inputs that cannot produce a full proposal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Fail with every violation found (print view).
    Strict,
    /// Return a zeroed, well-formed result and record the issues (live editor).
    #[default]
    Lenient,
}

impl Mode {
    pub fn from_strict(strict: bool) -> Self {
        if strict { Self::Strict } else { Self::Lenient }
    }

    pub fn is_strict(self) -> bool {
        self == Self::Strict
    }
}
