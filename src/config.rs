//! TOML-based estimate files and preset definitions.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::estimate::{
    BILLING_MONTHS, Calculator, CalculationInput, EngineConstants, LineItem, PanelSpec,
};

/// Top-level estimate file parsed from TOML.
///
/// Every section has defaults matching the residential preset. Load from
/// TOML with [`EstimateConfig::from_toml_file`] or use
/// [`EstimateConfig::residential`] for the built-in default.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EstimateConfig {
    /// Sizing coefficients.
    #[serde(default)]
    pub engine: EngineConstants,
    /// Tariff and site conditions.
    #[serde(default)]
    pub site: SiteConfig,
    /// Reference panel.
    #[serde(default)]
    pub panel: PanelConfig,
    /// Billing history and expected growth.
    #[serde(default)]
    pub consumption: ConsumptionConfig,
    /// Discount, increase and sizing mode.
    #[serde(default)]
    pub pricing: PricingConfig,
    /// Bill of materials.
    #[serde(default = "default_items")]
    pub items: Vec<ItemConfig>,
}

/// Tariff and site conditions.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Utility price per kWh.
    pub unit_energy_cost: f64,
    /// Average daily irradiation (kWh/m²/day, must be > 0).
    pub local_irradiation: f64,
    /// Roof orientation yield multiplier (0.0-1.0], 1.0 = optimal.
    pub roof_orientation_factor: f64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            unit_energy_cost: 0.95,
            local_irradiation: 5.0,
            roof_orientation_factor: 1.0,
        }
    }
}

/// Reference panel.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PanelConfig {
    /// Rated power (W).
    pub capacity_watts: f64,
    /// Unit price.
    pub price: f64,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            capacity_watts: 550.0,
            price: 900.0,
        }
    }
}

/// Billing history and expected growth.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConsumptionConfig {
    /// Thirteen monthly readings (kWh).
    pub monthly_kwh: Vec<f64>,
    /// Extra monthly consumption added after averaging (kWh).
    pub average_increase_kwh: f64,
}

impl Default for ConsumptionConfig {
    fn default() -> Self {
        Self {
            monthly_kwh: vec![
                320.0, 298.0, 310.0, 280.0, 265.0, 240.0, 250.0, 262.0, 275.0, 290.0, 305.0,
                330.0, 315.0,
            ],
            average_increase_kwh: 0.0,
        }
    }
}

/// Discount, increase and sizing mode.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PricingConfig {
    pub discount: f64,
    pub increase: f64,
    /// Treat `discount` and `increase` as percentages of the subtotal.
    pub discount_is_percent: bool,
    /// Keep the panel row quantity as written instead of sizing it.
    pub manual_panel_count: bool,
}

/// One bill-of-materials row.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemConfig {
    /// Display order; rank 1 is the panel row.
    pub order_rank: u32,
    pub name: String,
    #[serde(default)]
    pub quantity: f64,
    pub unit_price: f64,
}

impl ItemConfig {
    fn new(order_rank: u32, name: &str, quantity: f64, unit_price: f64) -> Self {
        Self {
            order_rank,
            name: name.to_string(),
            quantity,
            unit_price,
        }
    }
}

fn default_items() -> Vec<ItemConfig> {
    vec![
        ItemConfig::new(1, "Solar panel 550 W", 0.0, 900.0),
        ItemConfig::new(2, "String inverter 5 kW", 1.0, 4200.0),
        ItemConfig::new(3, "Roof mounting structure", 1.0, 1800.0),
        ItemConfig::new(4, "Installation and commissioning", 1.0, 2500.0),
    ]
}

/// Configuration error with field path and constraint description.
#[derive(Debug, thiserror::Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"site.local_irradiation"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl EstimateConfig {
    /// Returns the residential preset: a typical single-family bill.
    pub fn residential() -> Self {
        Self {
            engine: EngineConstants::default(),
            site: SiteConfig::default(),
            panel: PanelConfig::default(),
            consumption: ConsumptionConfig::default(),
            pricing: PricingConfig::default(),
            items: default_items(),
        }
    }

    /// Returns the commercial preset: larger flat load, east-west roof, percent discount.
    pub fn commercial() -> Self {
        Self {
            engine: EngineConstants::default(),
            site: SiteConfig {
                unit_energy_cost: 0.82,
                local_irradiation: 5.4,
                roof_orientation_factor: 0.92,
            },
            panel: PanelConfig {
                capacity_watts: 600.0,
                price: 980.0,
            },
            consumption: ConsumptionConfig {
                monthly_kwh: vec![2400.0; BILLING_MONTHS],
                average_increase_kwh: 300.0,
            },
            pricing: PricingConfig {
                discount: 8.0,
                increase: 2.0,
                discount_is_percent: true,
                manual_panel_count: false,
            },
            items: vec![
                ItemConfig::new(1, "Solar panel 600 W", 0.0, 980.0),
                ItemConfig::new(2, "Three-phase inverter 25 kW", 1.0, 21_000.0),
                ItemConfig::new(3, "Ground mounting structure", 1.0, 14_500.0),
                ItemConfig::new(4, "Cabling and protection", 1.0, 6_200.0),
                ItemConfig::new(5, "Installation and commissioning", 1.0, 12_000.0),
            ],
        }
    }

    /// Returns the manual-override preset: the panel count is entered by hand.
    pub fn manual_override() -> Self {
        let mut items = default_items();
        items[0].quantity = 8.0;
        Self {
            pricing: PricingConfig {
                discount: 500.0,
                manual_panel_count: true,
                ..PricingConfig::default()
            },
            items,
            ..Self::residential()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["residential", "commercial", "manual_override"];

    /// Loads an estimate from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "residential" => Ok(Self::residential()),
            "commercial" => Ok(Self::commercial()),
            "manual_override" => Ok(Self::manual_override()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses an estimate from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("estimate", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses an estimate from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the estimate is valid. These checks are
    /// stricter than the engine's own strict mode: they also reject
    /// negative prices and out-of-range coefficients.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let e = &self.engine;
        if !positive(e.days_in_reference_month) {
            errors.push(ConfigError::new(
                "engine.days_in_reference_month",
                "must be a finite number > 0",
            ));
        }
        if !(e.performance_ratio > 0.0 && e.performance_ratio <= 1.0) {
            errors.push(ConfigError::new("engine.performance_ratio", "must be in (0.0, 1.0]"));
        }
        if !non_negative(e.co2_kg_per_kwh) {
            errors.push(ConfigError::new("engine.co2_kg_per_kwh", "must be a finite number >= 0"));
        }
        if !non_negative(e.panel_area_m2) {
            errors.push(ConfigError::new("engine.panel_area_m2", "must be a finite number >= 0"));
        }

        let site = &self.site;
        if !non_negative(site.unit_energy_cost) {
            errors.push(ConfigError::new("site.unit_energy_cost", "must be a finite number >= 0"));
        }
        if !positive(site.local_irradiation) {
            errors.push(ConfigError::new("site.local_irradiation", "must be a finite number > 0"));
        }
        if !(site.roof_orientation_factor > 0.0 && site.roof_orientation_factor <= 1.0) {
            errors.push(ConfigError::new(
                "site.roof_orientation_factor",
                "must be in (0.0, 1.0]",
            ));
        }

        if !positive(self.panel.capacity_watts) {
            errors.push(ConfigError::new("panel.capacity_watts", "must be a finite number > 0"));
        }
        if !non_negative(self.panel.price) {
            errors.push(ConfigError::new("panel.price", "must be a finite number >= 0"));
        }

        let c = &self.consumption;
        if c.monthly_kwh.len() != BILLING_MONTHS {
            errors.push(ConfigError::new(
                "consumption.monthly_kwh",
                format!(
                    "must have exactly {BILLING_MONTHS} entries, got {}",
                    c.monthly_kwh.len()
                ),
            ));
        }
        if let Some(i) = c.monthly_kwh.iter().position(|v| !non_negative(*v)) {
            errors.push(ConfigError::new(
                format!("consumption.monthly_kwh[{i}]"),
                "must be a finite number >= 0",
            ));
        }
        // negative increases model expected reductions
        if !c.average_increase_kwh.is_finite() {
            errors.push(ConfigError::new(
                "consumption.average_increase_kwh",
                "must be a finite number",
            ));
        }

        let p = &self.pricing;
        if !non_negative(p.discount) {
            errors.push(ConfigError::new("pricing.discount", "must be a finite number >= 0"));
        }
        if !non_negative(p.increase) {
            errors.push(ConfigError::new("pricing.increase", "must be a finite number >= 0"));
        }

        let panel_rows = self.items.iter().filter(|i| i.order_rank == 1).count();
        if panel_rows != 1 {
            errors.push(ConfigError::new(
                "items",
                format!("must contain exactly one item with order_rank = 1, got {panel_rows}"),
            ));
        }
        for (i, item) in self.items.iter().enumerate() {
            if !non_negative(item.quantity) {
                errors.push(ConfigError::new(
                    format!("items[{i}].quantity"),
                    "must be a finite number >= 0",
                ));
            }
            if !non_negative(item.unit_price) {
                errors.push(ConfigError::new(
                    format!("items[{i}].unit_price"),
                    "must be a finite number >= 0",
                ));
            }
        }

        errors
    }

    /// Builds the engine input described by this estimate.
    pub fn to_input(&self) -> CalculationInput {
        CalculationInput {
            unit_energy_cost: self.site.unit_energy_cost,
            local_irradiation: self.site.local_irradiation,
            panel: PanelSpec {
                capacity_watts: self.panel.capacity_watts,
                price: self.panel.price,
            },
            monthly_consumption_kwh: self.consumption.monthly_kwh.clone(),
            average_increase_kwh: self.consumption.average_increase_kwh,
            roof_orientation_factor: self.site.roof_orientation_factor,
            discount: self.pricing.discount,
            increase: self.pricing.increase,
            discount_is_percent: self.pricing.discount_is_percent,
            line_items: self
                .items
                .iter()
                .map(|i| LineItem::new(i.order_rank, i.name.clone(), i.quantity, i.unit_price))
                .collect(),
            apply_calculation: !self.pricing.manual_panel_count,
        }
    }

    /// Calculator configured with this estimate's `[engine]` section.
    pub fn calculator(&self) -> Calculator {
        Calculator::new(self.engine)
    }
}

// Written as positive checks so NaN fails them.
fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn residential_preset_valid() {
        let cfg = EstimateConfig::residential();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "residential should be valid: {errors:?}");
    }

    #[test]
    fn from_preset_unknown() {
        let err = EstimateConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in EstimateConfig::PRESETS {
            let cfg = EstimateConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[engine]
days_in_reference_month = 30.0
performance_ratio = 0.75
co2_kg_per_kwh = 0.09
panel_area_m2 = 2.2

[site]
unit_energy_cost = 1.1
local_irradiation = 4.8
roof_orientation_factor = 0.9

[panel]
capacity_watts = 450
price = 750

[consumption]
monthly_kwh = [500, 510, 490, 470, 460, 455, 450, 470, 480, 495, 505, 520, 515]
average_increase_kwh = 120

[pricing]
discount = 5
discount_is_percent = true

[[items]]
order_rank = 1
name = "Panel 450 W"
unit_price = 750

[[items]]
order_rank = 2
name = "Inverter"
quantity = 1
unit_price = 5000
"#;
        let cfg = EstimateConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.engine.performance_ratio), Some(0.75));
        assert_eq!(cfg.as_ref().map(|c| c.items.len()), Some(2));
        assert_eq!(cfg.as_ref().map(|c| c.items[0].quantity), Some(0.0));
        assert!(cfg.map(|c| c.validate().is_empty()).unwrap_or(false));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[site]
local_irradiation = 5.0
bogus_field = true
"#;
        assert!(EstimateConfig::from_toml_str(toml).is_err());
    }

    #[test]
    fn validation_rejects_nan_from_toml() {
        let toml = r#"
[engine]
co2_kg_per_kwh = nan

[site]
unit_energy_cost = nan

[consumption]
average_increase_kwh = inf
"#;
        let cfg = EstimateConfig::from_toml_str(toml).expect("nan and inf are valid TOML floats");
        assert!(cfg.site.unit_energy_cost.is_nan());
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "site.unit_energy_cost"));
        assert!(errors.iter().any(|e| e.field == "engine.co2_kg_per_kwh"));
        assert!(errors.iter().any(|e| e.field == "consumption.average_increase_kwh"));
        assert_eq!(errors.len(), 3);
    }

    #[test]
    fn validation_rejects_nan_item_price() {
        let mut cfg = EstimateConfig::residential();
        cfg.items[1].unit_price = f64::NAN;
        cfg.panel.capacity_watts = f64::NAN;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "items[1].unit_price"));
        assert!(errors.iter().any(|e| e.field == "panel.capacity_watts"));
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[site]
local_irradiation = 6.1
"#;
        let cfg = EstimateConfig::from_toml_str(toml).ok();
        assert_eq!(cfg.as_ref().map(|c| c.site.local_irradiation), Some(6.1));
        // untouched fields keep defaults
        assert_eq!(cfg.as_ref().map(|c| c.site.unit_energy_cost), Some(0.95));
        assert_eq!(cfg.as_ref().map(|c| c.engine), Some(EngineConstants::default()));
        assert_eq!(cfg.as_ref().map(|c| c.items.len()), Some(4));
    }

    #[test]
    fn validation_catches_short_history() {
        let mut cfg = EstimateConfig::residential();
        cfg.consumption.monthly_kwh.pop();
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "consumption.monthly_kwh"));
    }

    #[test]
    fn validation_catches_zero_irradiation() {
        let mut cfg = EstimateConfig::residential();
        cfg.site.local_irradiation = 0.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "site.local_irradiation"));
    }

    #[test]
    fn validation_catches_missing_panel_row() {
        let mut cfg = EstimateConfig::residential();
        cfg.items.remove(0);
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "items"));
    }

    #[test]
    fn validation_catches_bad_performance_ratio() {
        let mut cfg = EstimateConfig::residential();
        cfg.engine.performance_ratio = 1.3;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "engine.performance_ratio"));
    }

    #[test]
    fn manual_override_disables_sizing() {
        let input = EstimateConfig::manual_override().to_input();
        assert!(!input.apply_calculation);
        assert_eq!(input.line_items[0].quantity, 8.0);
    }

    #[test]
    fn to_input_carries_every_section() {
        let cfg = EstimateConfig::commercial();
        let input = cfg.to_input();
        assert_eq!(input.monthly_consumption_kwh.len(), BILLING_MONTHS);
        assert_eq!(input.average_increase_kwh, 300.0);
        assert_eq!(input.panel.capacity_watts, 600.0);
        assert!(input.discount_is_percent);
        assert!(input.apply_calculation);
        assert_eq!(input.line_items.len(), 5);
    }
}
