//! Fixed billing policy and the tunable coefficients used by the sizing formulas.

use serde::{Deserialize, Serialize};

/// Number of monthly readings in a billing history.
///
/// The average always divides by this value, never by 12.
pub const BILLING_MONTHS: usize = 13;

/// Months per year used to annualize monthly figures.
pub const MONTHS_PER_YEAR: f64 = 12.0;

/// Coefficients applied uniformly by the sizing and projection formulas.
///
/// Kept out of the formulas so they can be audited and overridden
/// (see the `[engine]` section of an estimate file).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConstants {
    /// Days in the reference billing month.
    pub days_in_reference_month: f64,
    /// Fraction of theoretical generation realized after system losses (0.0-1.0].
    pub performance_ratio: f64,
    /// Grid emission factor (kg CO2 per kWh).
    pub co2_kg_per_kwh: f64,
    /// Roof area occupied by one panel (m²).
    pub panel_area_m2: f64,
}

impl EngineConstants {
    pub const DEFAULT: Self = Self {
        days_in_reference_month: 30.0,
        performance_ratio: 0.80,
        co2_kg_per_kwh: 0.0817,
        panel_area_m2: 2.0,
    };

    /// Monthly energy (kWh) produced per installed kWp at a site.
    ///
    /// # Arguments
    ///
    /// * `irradiation` - Average daily irradiation (kWh/m²/day)
    /// * `orientation_factor` - Roof orientation yield multiplier
    pub fn monthly_yield_per_kwp(&self, irradiation: f64, orientation_factor: f64) -> f64 {
        irradiation * self.days_in_reference_month * orientation_factor * self.performance_ratio
    }
}

impl Default for EngineConstants {
    fn default() -> Self {
        Self::DEFAULT
    }
}
