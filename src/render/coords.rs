//! Time/price to pixel mapping.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::{ChartConfig, WindowMode};
use crate::domain::{Price, VirtualTimeMs};
use super::metrics::SurfaceMetrics;

static AUTO_MODE_WARNED: AtomicBool = AtomicBool::new(false);

/// Per-frame geometry, recomputed from configuration and the latest surface
/// measurements. Never stored across frames.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewWindow {
    pub y_min: Price,
    pub y_max: Price,
    pub pixels_per_second: f64,
    pub panel_width: f64,
    /// Surface width minus panel width. May be zero or negative.
    pub chart_width: f64,
    pub chart_height: f64,
    pub surface_width: f64,
    pub now_x: f64,
}

impl ViewWindow {
    pub fn compute(config: &ChartConfig, metrics: &SurfaceMetrics) -> Self {
        let layout = &config.layout;
        let surface_width = metrics.css_width as f64;
        let panel_width = metrics.panel_width as f64;
        let chart_width = surface_width - panel_width;

        let visible_secs = layout.visible_columns as f64 * layout.seconds_per_column;
        let pixels_per_second = match chart_width / visible_secs {
            pps if chart_width > 0.0 && pps.is_finite() && pps > 0.0 => pps,
            _ => layout.fallback_pixels_per_second,
        };

        let (y_min, y_max) = vertical_window(config);

        ViewWindow {
            y_min,
            y_max,
            pixels_per_second,
            panel_width,
            chart_width,
            chart_height: metrics.css_height.max(0.0) as f64,
            surface_width,
            now_x: chart_width.max(0.0) * layout.now_position_ratio,
        }
    }

    /// Width of history visible left of the now-line.
    pub fn history_width(&self) -> f64 {
        self.now_x
    }

    pub fn has_area(&self) -> bool {
        self.surface_width > 0.0 && self.chart_height > 0.0
    }
}

/// Symmetric window around the mean-reversion target. Never data-dependent.
fn vertical_window(config: &ChartConfig) -> (Price, Price) {
    if config.scale.window_mode == WindowMode::Auto
        && !AUTO_MODE_WARNED.swap(true, Ordering::Relaxed)
    {
        log::warn!("scale.window_mode = auto is not implemented; using the fixed window");
    }
    let center = config.simulation.mean_revert_to;
    let pad = config.scale.fixed_pad;
    (center - pad, center + pad)
}

/// Maps samples into chart pixel space for one frame.
#[derive(Debug, Clone, Copy)]
pub struct CoordinateMapper {
    view: ViewWindow,
    now: VirtualTimeMs,
}

impl CoordinateMapper {
    pub fn new(view: ViewWindow, now: VirtualTimeMs) -> Self {
        CoordinateMapper { view, now }
    }

    pub fn view(&self) -> &ViewWindow {
        &self.view
    }

    pub fn now(&self) -> VirtualTimeMs {
        self.now
    }

    pub fn time_to_x(&self, t: VirtualTimeMs) -> f64 {
        self.view.now_x - ((self.now - t) / 1000.0) * self.view.pixels_per_second
    }

    pub fn price_to_y(&self, v: Price) -> f64 {
        let h = self.view.chart_height;
        h - ((v - self.view.y_min) / (self.view.y_max - self.view.y_min)) * h
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SimulationConfig;
    use crate::engine::StochasticProcess;
    use itertools::Itertools;

    fn metrics(width: f32, panel: f32) -> SurfaceMetrics {
        SurfaceMetrics::new(width, 400.0, 1.0, panel)
    }

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn scale_keeps_constant_column_count() {
        let config = ChartConfig::default();
        let view = ViewWindow::compute(&config, &metrics(1442.5, 142.5));
        assert!(approx_eq(view.chart_width, 1300.0));
        assert!(approx_eq(view.pixels_per_second, 10.0));
        assert!(approx_eq(view.now_x, 1300.0 * 0.62));
    }

    #[test]
    fn collapsed_chart_falls_back_to_default_scale() {
        let config = ChartConfig::default();
        for m in [metrics(0.0, 0.0), metrics(100.0, 142.5), metrics(142.5, 142.5)] {
            let view = ViewWindow::compute(&config, &m);
            assert_eq!(view.pixels_per_second, config.layout.fallback_pixels_per_second);
            assert!(view.now_x >= 0.0);
        }

        // Panel measured as 0 on a real surface: whole width is chart
        let view = ViewWindow::compute(&config, &metrics(650.0, 0.0));
        assert!(view.pixels_per_second.is_finite());
        assert!(approx_eq(view.pixels_per_second, 5.0));
    }

    #[test]
    fn fixed_window_ignores_the_data() {
        let mut config = ChartConfig::default();
        config.simulation.base_price = 100.0;
        config.simulation.mean_revert_to = 100.0;
        config.scale.fixed_pad = 0.10;
        // Let the process wander well outside the window
        config.simulation.mean_revert_strength = 0.0;
        config.simulation.max_move_per_tick = 1.0;
        config.simulation.noise_amplitude = 5.0;

        let mut process = StochasticProcess::new(&config.simulation, 8);
        for _ in 0..50 {
            process.advance(1_000.0);
            let view = ViewWindow::compute(&config, &metrics(800.0, 142.5));
            assert!(approx_eq(view.y_min, 99.90));
            assert!(approx_eq(view.y_max, 100.10));
        }
    }

    #[test]
    fn auto_mode_renders_as_fixed() {
        let mut config = ChartConfig::default();
        config.scale.window_mode = WindowMode::Auto;
        let auto = ViewWindow::compute(&config, &metrics(800.0, 142.5));
        config.scale.window_mode = WindowMode::Fixed;
        let fixed = ViewWindow::compute(&config, &metrics(800.0, 142.5));
        assert_eq!(auto, fixed);
    }

    #[test]
    fn mapping_is_monotonic() {
        let config = ChartConfig::default();
        let view = ViewWindow::compute(&config, &metrics(1442.5, 142.5));
        let now = 1_000_000.0;
        let mapper = CoordinateMapper::new(view, now);

        assert!(approx_eq(mapper.time_to_x(now), view.now_x));
        let xs: Vec<f64> = (0..100).map(|i| mapper.time_to_x(now - i as f64 * 137.0)).collect();
        assert!(xs.iter().tuple_windows().all(|(a, b)| b < a));

        let center = SimulationConfig::default().mean_revert_to;
        let ys: Vec<f64> = (0..50)
            .map(|i| mapper.price_to_y(center - 0.1 + i as f64 * 0.004))
            .collect();
        assert!(ys.iter().tuple_windows().all(|(a, b)| b < a));

        assert!(approx_eq(mapper.price_to_y(view.y_min), view.chart_height));
        assert!(approx_eq(mapper.price_to_y(view.y_max), 0.0));
    }
}
