//! Chart configuration.
//!
//! Every tunable of the simulation, layout and marker subsystems lives here as a
//! named field with a default. The whole tree deserialises from JSON; missing
//! fields fall back to the defaults below.

use std::path::Path;

use anyhow::{Context, Result, bail, ensure};
use serde::{Deserialize, Serialize};

use crate::domain::{TimelineEntry, default_timeline};

/// Parameters of the stochastic price process and its smoother
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub base_price: f64,
    /// Fixed sub-step length in ms
    pub sample_interval_ms: f64,
    /// RNG seed. `None` picks a fresh one per mount
    pub seed: Option<u64>,

    // Drift: bounded random walk
    pub drift_step: f64,
    pub drift_clamp: f64,
    pub drift_scale: f64,

    /// Amplitude of the Irwin-Hall noise term before the volatility multiplier
    pub noise_amplitude: f64,

    // Mean reversion
    pub mean_revert_to: f64,
    pub mean_revert_strength: f64,

    // Volatility regime cycle
    pub vol_cycle_secs: f64,
    pub vol_cycle_min: f64,
    pub vol_cycle_max: f64,

    // Spikes
    pub spike_probability: f64,
    pub spike_amplitude: f64,
    pub spike_decay: f64,

    /// Hard clamp on any single step
    pub max_move_per_tick: f64,

    /// EMA weight of the newest raw value
    pub ema_alpha: f64,
}

impl SimulationConfig {
    /// Shortest sub-step; anything finer turns one frame into millions of steps
    pub const MIN_SAMPLE_INTERVAL_MS: f64 = 1.0;
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            base_price: 116_200.13,
            sample_interval_ms: 150.0,
            seed: None,
            drift_step: 0.0002,
            drift_clamp: 0.0003,
            drift_scale: 0.0005,
            noise_amplitude: 0.005,
            mean_revert_to: 116_200.0,
            mean_revert_strength: 0.15,
            vol_cycle_secs: 18.0,
            vol_cycle_min: 0.9,
            vol_cycle_max: 1.1,
            spike_probability: 0.001,
            spike_amplitude: 0.2,
            spike_decay: 0.9,
            max_move_per_tick: 0.01,
            ema_alpha: 0.25,
        }
    }
}

/// Horizontal layout and time axis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub visible_columns: u32,
    pub seconds_per_column: f64,
    /// Full horizontal cells; the grid draws `cells + 1` price levels
    pub horizontal_cells: u32,
    /// Fractional x-position of the "now" column
    pub now_position_ratio: f64,
    /// Used whenever the live chart width cannot produce a usable scale
    pub fallback_pixels_per_second: f64,
    /// Panel width assumed until the panel has been measured once
    pub default_panel_width: f32,
    /// Extra history retained past the left edge
    pub eviction_slack_ms: f64,
    /// Samples further than this outside the surface are not drawn
    pub curve_cull_margin_px: f32,
    /// Longest elapsed time fed to the process in one frame
    pub max_frame_gap_ms: f64,
}

impl LayoutConfig {
    pub const MIN_SECONDS_PER_COLUMN: f64 = 0.1;
    pub const MAX_SECONDS_PER_COLUMN: f64 = 3_600.0;
    pub const MAX_VISIBLE_COLUMNS: u32 = 240;
    pub const MAX_HORIZONTAL_CELLS: u32 = 64;
    pub const MAX_FRAME_GAP_MS: f64 = 60_000.0;
}

impl Default for LayoutConfig {
    fn default() -> Self {
        LayoutConfig {
            visible_columns: 13,
            seconds_per_column: 10.0,
            horizontal_cells: 4,
            now_position_ratio: 0.62,
            fallback_pixels_per_second: 100.0,
            default_panel_width: 142.5,
            eviction_slack_ms: 2_000.0,
            curve_cull_margin_px: 20.0,
            max_frame_gap_ms: 1_000.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowMode {
    /// Symmetric window around the mean-reversion target
    #[default]
    Fixed,
    /// Data-driven range. Not implemented yet: renders as `Fixed`
    Auto,
}

/// Vertical scale
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaleConfig {
    pub window_mode: WindowMode,
    /// Half-height of the fixed window
    pub fixed_pad: f64,
    /// Reserved for `WindowMode::Auto`
    pub auto_pad_ratio: f64,
}

impl Default for ScaleConfig {
    fn default() -> Self {
        ScaleConfig {
            window_mode: WindowMode::Fixed,
            fixed_pad: 0.10,
            auto_pad_ratio: 0.12,
        }
    }
}

/// Text shown on the chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Every displayed price is rounded to a multiple of this
    pub price_step: f64,
    pub price_digits: usize,
    pub asset_label: String,
    pub utc_offset_hours: i32,
    pub timezone_label: String,
    /// Top-left time + price badge
    pub show_info_badge: bool,
}

impl Default for LabelConfig {
    fn default() -> Self {
        LabelConfig {
            price_step: 0.02,
            price_digits: 2,
            asset_label: "BTC".to_string(),
            utc_offset_hours: 9,
            timezone_label: "UTC+9".to_string(),
            show_info_badge: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum MarkerMode {
    /// Alternate long/short on a fixed cadence of engine time
    #[default]
    #[value(name = "timer")]
    SelfTimer,
    /// Follow a pre-authored timeline against an external playback position
    #[value(name = "timeline")]
    ExternalClock,
}

/// Marker triggering and retention
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkerConfig {
    pub mode: MarkerMode,
    pub timeline: Vec<TimelineEntry>,
    pub active_window_secs: f64,
    /// Same-kind markers closer than this (virtual ms) are suppressed
    pub debounce_ms: f64,
    pub initial_delay_ms: f64,
    pub interval_ms: f64,
    /// Markers whose x drops below `-evict_margin_px` are removed
    pub evict_margin_px: f32,
    pub max_markers: usize,
}

impl Default for MarkerConfig {
    fn default() -> Self {
        MarkerConfig {
            mode: MarkerMode::SelfTimer,
            timeline: default_timeline(),
            active_window_secs: 0.8,
            debounce_ms: 400.0,
            initial_delay_ms: 3_000.0,
            interval_ms: 6_000.0,
            evict_margin_px: 24.0,
            max_markers: 64,
        }
    }
}

/// The master chart configuration. Immutable for the lifetime of a chart instance.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    pub simulation: SimulationConfig,
    pub layout: LayoutConfig,
    pub scale: ScaleConfig,
    pub labels: LabelConfig,
    pub markers: MarkerConfig,
}

impl ChartConfig {
    /// Read, parse and validate a JSON config file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading chart config {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("in {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: ChartConfig =
            serde_json::from_str(text).context("parsing chart config JSON")?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that would make the simulation or the layout degenerate.
    pub fn validate(&self) -> Result<()> {
        let sim = &self.simulation;
        let finite = [
            ("base_price", sim.base_price),
            ("drift_step", sim.drift_step),
            ("drift_scale", sim.drift_scale),
            ("noise_amplitude", sim.noise_amplitude),
            ("mean_revert_to", sim.mean_revert_to),
            ("mean_revert_strength", sim.mean_revert_strength),
            ("vol_cycle_min", sim.vol_cycle_min),
            ("vol_cycle_max", sim.vol_cycle_max),
            ("spike_amplitude", sim.spike_amplitude),
        ];
        for (name, value) in finite {
            ensure!(value.is_finite(), "simulation.{name} must be finite, got {value}");
        }
        ensure!(
            sim.sample_interval_ms >= SimulationConfig::MIN_SAMPLE_INTERVAL_MS,
            "simulation.sample_interval_ms must be >= {} ms, got {}",
            SimulationConfig::MIN_SAMPLE_INTERVAL_MS,
            sim.sample_interval_ms
        );
        ensure!(sim.drift_clamp >= 0.0, "simulation.drift_clamp must be >= 0");
        ensure!(sim.vol_cycle_secs > 0.0, "simulation.vol_cycle_secs must be > 0");
        ensure!(
            sim.vol_cycle_min <= sim.vol_cycle_max,
            "simulation.vol_cycle_min must not exceed vol_cycle_max"
        );
        ensure!(
            (0.0..=1.0).contains(&sim.spike_probability),
            "simulation.spike_probability must be within [0, 1]"
        );
        ensure!(
            (0.0..=1.0).contains(&sim.spike_decay),
            "simulation.spike_decay must be within [0, 1]"
        );
        ensure!(
            sim.max_move_per_tick > 0.0 && sim.max_move_per_tick.is_finite(),
            "simulation.max_move_per_tick must be a positive number"
        );
        ensure!(
            sim.ema_alpha > 0.0 && sim.ema_alpha <= 1.0,
            "simulation.ema_alpha must be within (0, 1]"
        );

        let layout = &self.layout;
        ensure!(
            (1..=LayoutConfig::MAX_VISIBLE_COLUMNS).contains(&layout.visible_columns),
            "layout.visible_columns must be within [1, {}], got {}",
            LayoutConfig::MAX_VISIBLE_COLUMNS,
            layout.visible_columns
        );
        ensure!(
            (LayoutConfig::MIN_SECONDS_PER_COLUMN..=LayoutConfig::MAX_SECONDS_PER_COLUMN)
                .contains(&layout.seconds_per_column),
            "layout.seconds_per_column must be within [{}, {}], got {}",
            LayoutConfig::MIN_SECONDS_PER_COLUMN,
            LayoutConfig::MAX_SECONDS_PER_COLUMN,
            layout.seconds_per_column
        );
        ensure!(
            layout.horizontal_cells <= LayoutConfig::MAX_HORIZONTAL_CELLS,
            "layout.horizontal_cells must be <= {}, got {}",
            LayoutConfig::MAX_HORIZONTAL_CELLS,
            layout.horizontal_cells
        );
        ensure!(
            layout.now_position_ratio > 0.0 && layout.now_position_ratio < 1.0,
            "layout.now_position_ratio must be within (0, 1)"
        );
        ensure!(
            layout.fallback_pixels_per_second > 0.0,
            "layout.fallback_pixels_per_second must be > 0"
        );
        ensure!(
            layout.default_panel_width >= 0.0,
            "layout.default_panel_width must be >= 0"
        );
        ensure!(
            layout.max_frame_gap_ms > 0.0
                && layout.max_frame_gap_ms <= LayoutConfig::MAX_FRAME_GAP_MS,
            "layout.max_frame_gap_ms must be within (0, {}]",
            LayoutConfig::MAX_FRAME_GAP_MS
        );

        ensure!(
            self.scale.fixed_pad > 0.0 && self.scale.fixed_pad.is_finite(),
            "scale.fixed_pad must be a positive number"
        );
        ensure!(self.labels.price_step > 0.0, "labels.price_step must be > 0");
        if !(-12..=14).contains(&self.labels.utc_offset_hours) {
            bail!(
                "labels.utc_offset_hours {} is not a real UTC offset",
                self.labels.utc_offset_hours
            );
        }

        let markers = &self.markers;
        ensure!(
            markers.active_window_secs > 0.0,
            "markers.active_window_secs must be > 0"
        );
        ensure!(markers.interval_ms > 0.0, "markers.interval_ms must be > 0");
        ensure!(markers.max_markers > 0, "markers.max_markers must be > 0");
        if markers.mode == MarkerMode::ExternalClock {
            ensure!(
                !markers.timeline.is_empty(),
                "markers.timeline must not be empty in timeline mode"
            );
        }
        ensure!(
            markers
                .timeline
                .windows(2)
                .all(|w| w[0].start_secs <= w[1].start_secs),
            "markers.timeline must be sorted by start"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        ChartConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_falls_back_to_defaults() {
        let config =
            ChartConfig::from_json(r#"{ "simulation": { "ema_alpha": 0.5 } }"#).unwrap();
        assert_eq!(config.simulation.ema_alpha, 0.5);
        assert_eq!(config.simulation.sample_interval_ms, 150.0);
        assert_eq!(config.layout, LayoutConfig::default());
    }

    #[test]
    fn rejects_out_of_range_alpha() {
        let err = ChartConfig::from_json(r#"{ "simulation": { "ema_alpha": 1.5 } }"#)
            .unwrap_err();
        assert!(format!("{err:#}").contains("ema_alpha"));
    }

    #[test]
    fn rejects_unsorted_timeline() {
        let json = r#"{ "markers": { "mode": "external_clock",
            "timeline": [{"start": 2.0, "kind": "long"}, {"start": 1.0, "kind": "short"}] } }"#;
        assert!(ChartConfig::from_json(json).is_err());
    }

    #[test]
    fn rejects_degenerate_layout() {
        let cases = [
            r#"{ "layout": { "seconds_per_column": 1e-9 } }"#,
            r#"{ "layout": { "horizontal_cells": 4294967295 } }"#,
            r#"{ "layout": { "visible_columns": 100000 } }"#,
            r#"{ "layout": { "max_frame_gap_ms": 1e12 } }"#,
            r#"{ "simulation": { "sample_interval_ms": 1e-9 } }"#,
        ];
        for json in cases {
            assert!(ChartConfig::from_json(json).is_err(), "accepted {json}");
        }

        let mut config = ChartConfig::default();
        config.layout.seconds_per_column = f64::NAN;
        let err = config.validate().unwrap_err();
        assert!(format!("{err:#}").contains("seconds_per_column"));
    }

    #[test]
    fn window_mode_parses_auto() {
        let config = ChartConfig::from_json(r#"{ "scale": { "window_mode": "auto" } }"#).unwrap();
        assert_eq!(config.scale.window_mode, WindowMode::Auto);
    }
}
