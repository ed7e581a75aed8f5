//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use solar_estimate::estimate::{CalculationInput, LineItem, PanelSpec};

/// Bill of materials with an unsized panel row (rank 1) and two fixed rows.
pub fn default_items() -> Vec<LineItem> {
    vec![
        LineItem::new(1, "Solar panel 550 W", 0.0, 900.0),
        LineItem::new(2, "String inverter 5 kW", 1.0, 4200.0),
        LineItem::new(3, "Installation", 1.0, 2500.0),
    ]
}

/// Residential input: flat 300 kWh history, 5.0 kWh/m²/day, optimal roof, 550 W panels.
pub fn default_input() -> CalculationInput {
    CalculationInput {
        unit_energy_cost: 0.95,
        local_irradiation: 5.0,
        panel: PanelSpec {
            capacity_watts: 550.0,
            price: 900.0,
        },
        monthly_consumption_kwh: vec![300.0; 13],
        average_increase_kwh: 0.0,
        roof_orientation_factor: 1.0,
        discount: 0.0,
        increase: 0.0,
        discount_is_percent: false,
        line_items: default_items(),
        apply_calculation: true,
    }
}

/// Default input with a flat history at `kwh` per month.
pub fn input_with_flat_history(kwh: f64) -> CalculationInput {
    CalculationInput {
        monthly_consumption_kwh: vec![kwh; 13],
        ..default_input()
    }
}
