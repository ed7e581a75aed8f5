//! Photovoltaic proposal sizing and pricing for solar sales estimates.

/// REST API over the calculation engine.
#[cfg(feature = "api")]
pub mod api;
pub mod cli;
/// TOML estimate files and presets.
pub mod config;
pub mod estimate;
pub mod io;
