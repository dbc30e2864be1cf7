#![allow(clippy::collapsible_if)]
#![allow(clippy::type_complexity)]

// Core modules
pub mod config;
pub mod domain;
pub mod engine;
pub mod render;
pub mod ui;
pub mod utils;

use std::path::PathBuf;

use anyhow::Result;

// Re-export commonly used types
pub use config::{ChartConfig, MarkerMode};
pub use domain::{Marker, MarkerKind, Sample};
pub use engine::ChartEngine;
pub use ui::{ChartInstance, PlaybackOptions, PulseChartApp};
pub use utils::app_time;

// CLI argument parsing
use clap::Parser;

#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// JSON chart configuration. Missing fields use the built-in defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override the marker trigger strategy
    #[arg(long, value_enum)]
    pub marker_mode: Option<MarkerMode>,

    /// Fixed RNG seed for a reproducible price path
    #[arg(long)]
    pub seed: Option<u64>,

    /// Loop length of the stand-in playback clock (timeline mode)
    #[arg(long, default_value_t = 10.0)]
    pub playback_duration: f64,

    /// Delay before the playback clock reports ready
    #[arg(long, default_value_t = 800.0)]
    pub playback_load_delay_ms: f64,
}

impl Cli {
    /// Load the config file (or defaults), apply CLI overrides and validate.
    pub fn resolve_config(&self) -> Result<ChartConfig> {
        let mut config = match &self.config {
            Some(path) => ChartConfig::load(path)?,
            None => ChartConfig::default(),
        };
        if let Some(mode) = self.marker_mode {
            config.markers.mode = mode;
        }
        if let Some(seed) = self.seed {
            config.simulation.seed = Some(seed);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn playback_options(&self) -> PlaybackOptions {
        PlaybackOptions {
            duration_secs: self.playback_duration,
            load_delay_ms: self.playback_load_delay_ms,
        }
    }
}

/// Main application entry point - creates the GUI app
/// This is the public API for the binary to call
pub fn run_app(
    cc: &eframe::CreationContext,
    config: ChartConfig,
    playback: PlaybackOptions,
) -> Box<dyn eframe::App> {
    Box::new(PulseChartApp::new(cc, config, playback))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_overrides_config() {
        let cli = Cli::parse_from(["pulse-chart", "--marker-mode", "timeline", "--seed", "42"]);
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.markers.mode, MarkerMode::ExternalClock);
        assert_eq!(config.simulation.seed, Some(42));
        assert_eq!(cli.playback_options().duration_secs, 10.0);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let cli = Cli::parse_from(["pulse-chart", "--config", "/nonexistent/chart.json"]);
        let err = cli.resolve_config().unwrap_err();
        assert!(format!("{err:#}").contains("chart.json"));
    }
}
