//! The sized and priced proposal returned by the engine.

use std::fmt;

use serde::Serialize;

use super::error::Violation;
use super::types::LineItem;

/// Output of one engine invocation.
///
/// All figures are full precision; rounding is left to whoever renders them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalculationResult {
    /// Straight average of the billing history (kWh/month).
    pub months_average_kwh: f64,
    /// Demand the system is sized for (kWh/month).
    pub final_average_kwh: f64,
    /// Current monthly utility spend.
    pub monthly_paid: f64,
    /// Current yearly utility spend.
    pub yearly_paid: f64,
    /// Required system capacity (kWp).
    pub final_system_capacity_kwp: f64,
    /// Projected monthly generation (kWh).
    pub monthly_generated_energy: f64,
    /// Projected yearly generation (kWh).
    pub yearly_generated_energy: f64,
    /// Yearly CO2 offset (kg).
    pub co2_reduction: f64,
    /// Occupied roof area (m²).
    pub system_area: f64,
    pub result_panels_amount: u32,
    /// Bill-of-materials subtotal.
    pub system_initial_price: f64,
    /// Subtotal after discount and increase.
    pub final_system_price: f64,
    /// Caller's items with the panel quantity resolved.
    pub estimate_items: Vec<LineItem>,
    /// Problems that degraded this result. Always empty in strict mode.
    pub issues: Vec<Violation>,
}

impl CalculationResult {
    /// Whether the result was zeroed or partially computed.
    pub fn is_degraded(&self) -> bool {
        !self.issues.is_empty()
    }

    /// Returns `true` if every numeric field is finite.
    pub fn is_finite(&self) -> bool {
        [
            self.months_average_kwh,
            self.final_average_kwh,
            self.monthly_paid,
            self.yearly_paid,
            self.final_system_capacity_kwp,
            self.monthly_generated_energy,
            self.yearly_generated_energy,
            self.co2_reduction,
            self.system_area,
            self.system_initial_price,
            self.final_system_price,
        ]
        .iter()
        .all(|v| v.is_finite())
    }

    /// Replaces every `NaN` or infinite figure with zero.
    pub(crate) fn zero_non_finite(&mut self) {
        for value in [
            &mut self.months_average_kwh,
            &mut self.final_average_kwh,
            &mut self.monthly_paid,
            &mut self.yearly_paid,
            &mut self.final_system_capacity_kwp,
            &mut self.monthly_generated_energy,
            &mut self.yearly_generated_energy,
            &mut self.co2_reduction,
            &mut self.system_area,
            &mut self.system_initial_price,
            &mut self.final_system_price,
        ] {
            if !value.is_finite() {
                *value = 0.0;
            }
        }
    }
}

impl fmt::Display for CalculationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Solar Proposal ---")?;
        writeln!(f, "Average consumption:   {:.2} kWh/month", self.months_average_kwh)?;
        writeln!(f, "Sizing demand:         {:.2} kWh/month", self.final_average_kwh)?;
        writeln!(
            f,
            "Current bill:          {:.2}/month ({:.2}/year)",
            self.monthly_paid, self.yearly_paid
        )?;
        writeln!(f, "System capacity:       {:.2} kWp", self.final_system_capacity_kwp)?;
        writeln!(f, "Panels:                {}", self.result_panels_amount)?;
        writeln!(f, "System area:           {:.2} m2", self.system_area)?;
        writeln!(
            f,
            "Generation:            {:.2} kWh/month ({:.2} kWh/year)",
            self.monthly_generated_energy, self.yearly_generated_energy
        )?;
        writeln!(f, "CO2 avoided:           {:.2} kg/year", self.co2_reduction)?;
        writeln!(f, "Items:")?;
        for item in &self.estimate_items {
            writeln!(
                f,
                "  {:>3}  {:<28} {:>8.2} x {:>10.2} = {:>12.2}",
                item.order_rank,
                item.name,
                item.quantity,
                item.unit_price,
                item.line_total()
            )?;
        }
        writeln!(f, "Subtotal:              {:.2}", self.system_initial_price)?;
        write!(f, "Total:                 {:.2}", self.final_system_price)?;
        for issue in &self.issues {
            write!(f, "\nwarning: {issue}")?;
        }
        Ok(())
    }
}
