//! Sizing and pricing of a photovoltaic proposal.
//!
//! [`Calculator::calculate`] is a pure function of its input: no I/O, no
//! shared state, safe to call concurrently and on every keystroke.

use super::constants::{BILLING_MONTHS, EngineConstants, MONTHS_PER_YEAR};
use super::error::{ValidationFailure, Violation};
use super::items::{panel_row_index, subtotal};
use super::result::CalculationResult;
use super::types::{CalculationInput, LineItem, Mode};

/// Stateless engine bound to a set of coefficients.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Calculator {
    constants: EngineConstants,
}

impl Calculator {
    pub fn new(constants: EngineConstants) -> Self {
        Self { constants }
    }

    pub fn constants(&self) -> &EngineConstants {
        &self.constants
    }

    /// Sizes and prices a proposal.
    ///
    /// In [`Mode::Strict`] any input problem yields a [`ValidationFailure`]
    /// listing every violation. In [`Mode::Lenient`] the same problems are
    /// recorded in [`CalculationResult::issues`] and the affected figures
    /// collapse to zero, so the result never carries `NaN` or infinities
    /// from the sizing formulas.
    ///
    /// # Errors
    ///
    /// Only in strict mode, see [`Violation`] for the conditions.
    pub fn calculate(
        &self,
        input: &CalculationInput,
        mode: Mode,
    ) -> Result<CalculationResult, ValidationFailure> {
        let mut issues = Vec::new();

        let unit_energy_cost =
            finite_or_zero("unit_energy_cost", input.unit_energy_cost, &mut issues);
        let average_increase_kwh =
            finite_or_zero("average_increase_kwh", input.average_increase_kwh, &mut issues);
        let discount = finite_or_zero("discount", input.discount, &mut issues);
        let increase = finite_or_zero("increase", input.increase, &mut issues);

        let months_average_kwh = average_history(&input.monthly_consumption_kwh, &mut issues);
        let final_average_kwh = months_average_kwh + average_increase_kwh;
        let monthly_paid = final_average_kwh * unit_energy_cost;
        let yearly_paid = monthly_paid * MONTHS_PER_YEAR;

        if !(final_average_kwh > 0.0) {
            issues.push(Violation::NonPositiveDemand {
                value: final_average_kwh,
            });
        }
        if !input.local_irradiation.is_finite() {
            issues.push(Violation::NonFiniteInput {
                field: "local_irradiation",
            });
        } else if !(input.local_irradiation > 0.0) {
            issues.push(Violation::NonPositiveIrradiation {
                value: input.local_irradiation,
            });
        }
        if !input.roof_orientation_factor.is_finite() {
            issues.push(Violation::NonFiniteInput {
                field: "roof_orientation_factor",
            });
        } else if !(input.roof_orientation_factor > 0.0) {
            issues.push(Violation::NonPositiveOrientation {
                value: input.roof_orientation_factor,
            });
        }

        let panel_row = match panel_row_index(&input.line_items) {
            Ok(index) => Some(index),
            Err(violation) => {
                if input.apply_calculation {
                    issues.push(violation);
                }
                None
            }
        };
        if input.apply_calculation {
            if !input.panel.capacity_watts.is_finite() {
                issues.push(Violation::NonFiniteInput {
                    field: "panel.capacity_watts",
                });
            } else if !(input.panel.capacity_watts > 0.0) {
                issues.push(Violation::NonPositivePanelCapacity {
                    value: input.panel.capacity_watts,
                });
            }
        }

        // A manual count is honored even when the rank is duplicated.
        let manual_row = if input.apply_calculation {
            None
        } else {
            input.line_items.iter().position(LineItem::is_panel_row)
        };
        let manual_panels = manual_row
            .map(|i| manual_panel_count(input.line_items[i].quantity, &mut issues));

        if mode.is_strict() && !issues.is_empty() {
            tracing::debug!(violations = issues.len(), "strict calculation rejected");
            return Err(ValidationFailure { violations: issues });
        }

        let site_yield = if input.local_irradiation > 0.0 && input.roof_orientation_factor > 0.0 {
            positive_or_zero(
                self.constants
                    .monthly_yield_per_kwp(input.local_irradiation, input.roof_orientation_factor),
            )
        } else {
            0.0
        };
        let final_system_capacity_kwp = if final_average_kwh > 0.0 && site_yield > 0.0 {
            final_average_kwh / site_yield
        } else {
            0.0
        };

        let result_panels_amount = if input.apply_calculation {
            match panel_row {
                Some(_) => {
                    panels_for_capacity(final_system_capacity_kwp, input.panel.capacity_watts)
                }
                None => 0,
            }
        } else {
            manual_panels.unwrap_or(0)
        };

        let panel_kw = positive_or_zero(input.panel.capacity_watts) / 1000.0;
        let monthly_generated_energy = f64::from(result_panels_amount) * panel_kw * site_yield;
        let yearly_generated_energy = monthly_generated_energy * MONTHS_PER_YEAR;
        let co2_reduction = yearly_generated_energy * self.constants.co2_kg_per_kwh;
        let system_area = f64::from(result_panels_amount) * self.constants.panel_area_m2;

        let write_row = if input.apply_calculation {
            panel_row
        } else {
            manual_row
        };
        let estimate_items = resolve_items(&input.line_items, write_row, result_panels_amount);
        let system_initial_price = subtotal(&estimate_items);
        let final_system_price = adjusted_price(
            system_initial_price,
            discount,
            increase,
            input.discount_is_percent,
        );

        let mut result = CalculationResult {
            months_average_kwh,
            final_average_kwh,
            monthly_paid,
            yearly_paid,
            final_system_capacity_kwp,
            monthly_generated_energy,
            yearly_generated_energy,
            co2_reduction,
            system_area,
            result_panels_amount,
            system_initial_price,
            final_system_price,
            estimate_items,
            issues: Vec::new(),
        };

        // Finite inputs can still overflow (e.g. a history summing past f64::MAX).
        if !result.is_finite() {
            issues.push(Violation::NonFiniteResult);
            if mode.is_strict() {
                tracing::debug!("strict calculation overflowed");
                return Err(ValidationFailure { violations: issues });
            }
            result.zero_non_finite();
        }
        result.issues = issues;

        tracing::debug!(
            capacity_kwp = result.final_system_capacity_kwp,
            panels = result.result_panels_amount,
            price = result.final_system_price,
            degraded = result.is_degraded(),
            "calculated proposal"
        );

        Ok(result)
    }
}

/// Runs [`Calculator::calculate`] with the default coefficients.
///
/// # Errors
///
/// See [`Calculator::calculate`].
pub fn calculate(
    input: &CalculationInput,
    mode: Mode,
) -> Result<CalculationResult, ValidationFailure> {
    Calculator::default().calculate(input, mode)
}

/// Averages the history over [`BILLING_MONTHS`], whatever its actual length.
///
/// Missing months count as zero, extra months are ignored and non-finite
/// readings count as zero; each case is recorded in `issues`.
fn average_history(readings: &[f64], issues: &mut Vec<Violation>) -> f64 {
    if readings.is_empty() {
        issues.push(Violation::EmptyHistory);
    } else if readings.len() != BILLING_MONTHS {
        issues.push(Violation::HistoryLength {
            expected: BILLING_MONTHS,
            found: readings.len(),
        });
    }

    let mut sum = 0.0;
    for (index, &reading) in readings.iter().take(BILLING_MONTHS).enumerate() {
        if reading.is_finite() {
            sum += reading;
        } else {
            issues.push(Violation::NonFiniteReading { index });
        }
    }
    sum / BILLING_MONTHS as f64
}

/// Smallest panel count whose combined rating covers `capacity_kwp`.
fn panels_for_capacity(capacity_kwp: f64, panel_watts: f64) -> u32 {
    if !(capacity_kwp > 0.0) || !(panel_watts > 0.0) {
        return 0;
    }
    let count = (capacity_kwp * 1000.0 / panel_watts).ceil();
    if count.is_finite() {
        // saturating cast
        count as u32
    } else {
        0
    }
}

/// Reads a hand-entered panel count, recording anything that is not a whole
/// number in `u32` range. The returned count is written back to the panel row.
fn manual_panel_count(quantity: f64, issues: &mut Vec<Violation>) -> u32 {
    let whole = quantity.is_finite()
        && quantity >= 0.0
        && quantity.fract() == 0.0
        && quantity <= f64::from(u32::MAX);
    if !whole {
        issues.push(Violation::InvalidPanelCount { value: quantity });
    }
    if quantity.is_finite() && quantity > 0.0 {
        // saturating cast
        quantity.round() as u32
    } else {
        0
    }
}

/// Returns `value`, or 0 with an issue recorded if it is NaN or infinite.
fn finite_or_zero(field: &'static str, value: f64, issues: &mut Vec<Violation>) -> f64 {
    if value.is_finite() {
        value
    } else {
        issues.push(Violation::NonFiniteInput { field });
        0.0
    }
}

fn positive_or_zero(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

/// Copies the caller's items, writing the panel count into the panel row.
fn resolve_items(items: &[LineItem], panel_row: Option<usize>, panels: u32) -> Vec<LineItem> {
    let mut resolved = items.to_vec();
    if let Some(item) = panel_row.and_then(|i| resolved.get_mut(i)) {
        item.quantity = f64::from(panels);
    }
    resolved
}

/// Applies discount and increase, both relative to the original subtotal.
fn adjusted_price(subtotal: f64, discount: f64, increase: f64, percent: bool) -> f64 {
    if percent {
        subtotal * (1.0 - discount / 100.0 + increase / 100.0)
    } else {
        subtotal - discount + increase
    }
}
