use crate::config::{ChartConfig, DEBUG_FLAGS, LayoutConfig};
use crate::domain::{Marker, Sample, VirtualClock, VirtualTimeMs};
use crate::render::{CoordinateMapper, ViewWindow};

use super::diagnostics::ProcessStats;
use super::markers::{MarkerSynchronizer, TriggerInput};
use super::process::{Smoother, StochasticProcess};
use super::series::{SeriesBuffer, eviction_cutoff};

/// What one `tick` did, for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TickReport {
    pub steps: usize,
    pub evicted_samples: usize,
    pub placed_marker: Option<Marker>,
    pub evicted_markers: usize,
}

/// Owns all per-chart simulation state: clock, process, smoother, series and markers.
pub struct ChartEngine {
    layout: LayoutConfig,
    clock: VirtualClock,
    process: StochasticProcess,
    smoother: Smoother,
    series: SeriesBuffer,
    markers: MarkerSynchronizer,
    stats: ProcessStats,
    evict_margin_px: f32,
}

impl ChartEngine {
    pub fn new(config: &ChartConfig, clock: VirtualClock, seed: u64) -> Self {
        let sim = &config.simulation;
        ChartEngine {
            layout: config.layout.clone(),
            clock,
            process: StochasticProcess::new(sim, seed),
            smoother: Smoother::new(sim.ema_alpha, sim.base_price),
            series: SeriesBuffer::new(),
            markers: MarkerSynchronizer::from_config(&config.markers),
            stats: ProcessStats::new(DEBUG_FLAGS.stats_window, DEBUG_FLAGS.stats_report_every),
            evict_margin_px: config.markers.evict_margin_px,
        }
    }

    /// Advance by one frame.
    ///
    /// `elapsed_ms` is clamped to the configured maximum frame gap. Every whole
    /// sub-step is stamped with the virtual time it falls on, smoothed, appended
    /// and followed by an eviction pass sized from `view`. Markers are then
    /// synced against the newest sample and evicted by their pixel position.
    pub fn tick(
        &mut self,
        elapsed_ms: f64,
        view: &ViewWindow,
        playback_position_secs: Option<f64>,
    ) -> TickReport {
        let elapsed = if elapsed_ms.is_finite() {
            elapsed_ms.clamp(0.0, self.layout.max_frame_gap_ms)
        } else {
            0.0
        };
        self.clock.advance(elapsed);
        let now = self.clock.now_ms();

        let mut report = TickReport::default();
        for step in self.process.advance(elapsed) {
            let value = self.smoother.apply(step.raw);
            let timestamp = now - step.lag_ms;
            self.series.append(Sample::new(timestamp, value));

            let cutoff = eviction_cutoff(
                timestamp,
                view.history_width(),
                view.pixels_per_second,
                self.layout.eviction_slack_ms,
            );
            report.evicted_samples += self.series.evict_older_than(cutoff);
            self.stats.record(step.delta, value);
            report.steps += 1;
        }

        let input = TriggerInput {
            now_ms: now,
            engine_elapsed_ms: self.clock.elapsed_ms(),
            playback_position_secs,
        };
        report.placed_marker = self.markers.sync(&input, self.series.last());

        let mapper = CoordinateMapper::new(*view, now);
        report.evicted_markers = self
            .markers
            .evict_offscreen(self.evict_margin_px, |m| mapper.time_to_x(m.timestamp) as f32);

        report
    }

    pub fn now_ms(&self) -> VirtualTimeMs {
        self.clock.now_ms()
    }

    pub fn clock(&self) -> &VirtualClock {
        &self.clock
    }

    pub fn series(&self) -> &SeriesBuffer {
        &self.series
    }

    pub fn markers(&self) -> &MarkerSynchronizer {
        &self.markers
    }

    pub fn stats(&self) -> &ProcessStats {
        &self.stats
    }
}
