//! Command-line arguments for the `solar-estimate` binary.

use std::path::PathBuf;

use clap::Parser;

use crate::config::EstimateConfig;
use crate::estimate::Mode;

#[derive(Debug, Parser)]
#[command(name = "solar-estimate")]
#[command(about = "Sizes and prices a photovoltaic proposal from a billing history")]
pub struct CliArgs {
    /// Load the estimate from a TOML file.
    #[arg(long, value_name = "PATH", conflicts_with = "preset")]
    pub estimate: Option<PathBuf>,

    /// Use a built-in preset (residential, commercial, manual_override).
    #[arg(long, value_name = "NAME")]
    pub preset: Option<String>,

    /// Return a zeroed proposal with warnings instead of failing on bad input.
    #[arg(long)]
    pub lenient: bool,

    /// Export the resolved bill of materials to CSV.
    #[arg(long, value_name = "PATH")]
    pub items_out: Option<PathBuf>,

    /// Start the REST API server instead of printing a proposal (requires the `api` feature).
    #[arg(long)]
    pub serve: bool,

    /// API server port.
    #[arg(long, default_value_t = 3000)]
    pub port: u16,
}

impl CliArgs {
    pub fn mode(&self) -> Mode {
        Mode::from_strict(!self.lenient)
    }

    /// Resolves the estimate source: `--estimate` first, then `--preset`,
    /// then the residential default.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file or preset cannot be loaded.
    pub fn load_estimate(&self) -> Result<EstimateConfig, crate::config::ConfigError> {
        if let Some(path) = &self.estimate {
            EstimateConfig::from_toml_file(path)
        } else if let Some(name) = &self.preset {
            EstimateConfig::from_preset(name)
        } else {
            Ok(EstimateConfig::residential())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<CliArgs, clap::Error> {
        CliArgs::try_parse_from(std::iter::once("solar-estimate").chain(args.iter().copied()))
    }

    #[test]
    fn supports_estimate_file() {
        let args = parse(&["--estimate", "estimate.toml"]).expect("parse should succeed");
        assert_eq!(
            args.estimate.as_deref().and_then(|p| p.to_str()),
            Some("estimate.toml")
        );
        assert!(args.preset.is_none());
        assert_eq!(args.mode(), Mode::Strict);
    }

    #[test]
    fn supports_preset_and_lenient() {
        let args = parse(&["--preset", "commercial", "--lenient"]).expect("parse should succeed");
        assert_eq!(args.preset.as_deref(), Some("commercial"));
        assert_eq!(args.mode(), Mode::Lenient);
    }

    #[test]
    fn estimate_and_preset_are_mutually_exclusive() {
        assert!(parse(&["--estimate", "a.toml", "--preset", "residential"]).is_err());
    }

    #[test]
    fn defaults_to_residential() {
        let args = parse(&[]).expect("parse should succeed");
        let cfg = args.load_estimate().expect("default should load");
        assert_eq!(cfg.items.len(), EstimateConfig::residential().items.len());
    }

    #[test]
    fn unknown_preset_fails_to_load() {
        let args = parse(&["--preset", "bogus"]).expect("parse should succeed");
        assert!(args.load_estimate().is_err());
    }
}
