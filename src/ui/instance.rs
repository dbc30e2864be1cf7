//! Mount/unmount lifecycle of one chart.
//!
//! All mutation happens on the host's frame callback. The host drives the
//! instance with [`ChartInstance::frame`] for each ticket it was handed and
//! forwards size, visibility and readiness signals through
//! [`ChartInstance::handle_event`].

use crate::config::{ChartConfig, ChartStyle, MarkerMode};
use crate::domain::VirtualClock;
use crate::engine::{
    ChartEngine, FrameScheduler, FrameTicket, ListenerKind, ListenerRegistry, RunGate, TickReport,
};
use crate::render::{
    ChartSurface, CoordinateMapper, FrameInput, RenderPipeline, SurfaceMetrics, ViewWindow,
};

use super::surface_controller::{PanelWidthSource, PlaybackSource, SurfaceController};

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

/// Signals from the host environment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    ContainerResized {
        width: f32,
        height: f32,
        pixels_per_point: f32,
    },
    PanelReady,
    VisibilityChanged(bool),
    PlaybackReady,
}

impl HostEvent {
    fn listener(&self) -> ListenerKind {
        match self {
            HostEvent::ContainerResized { .. } => ListenerKind::ContainerResize,
            HostEvent::PanelReady => ListenerKind::PanelReady,
            HostEvent::VisibilityChanged(_) => ListenerKind::Visibility,
            HostEvent::PlaybackReady => ListenerKind::PlaybackReady,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameOutcome {
    /// Ticket for the next frame, if one should be scheduled
    pub next: Option<FrameTicket>,
    /// `None` when the frame was a no-op
    pub report: Option<TickReport>,
    /// New surface geometry, when this frame was the first to draw at it
    pub resized: Option<SurfaceMetrics>,
}

pub struct ChartInstance {
    config: ChartConfig,
    style: ChartStyle,
    engine: ChartEngine,
    pipeline: RenderPipeline,
    surface: SurfaceController,
    scheduler: FrameScheduler,
    listeners: ListenerRegistry,
    gate: RunGate,
    last_host_time_ms: Option<f64>,
    playback_ready: bool,
}

impl ChartInstance {
    /// Mount against the wall clock. Returns the instance and its first frame ticket.
    pub fn mount(config: ChartConfig, panel: Box<dyn PanelWidthSource>) -> (Self, FrameTicket) {
        let seed = config.simulation.seed.unwrap_or_else(rand::random);
        Self::mount_with(config, panel, VirtualClock::anchored_now(), seed)
    }

    pub fn mount_with(
        config: ChartConfig,
        panel: Box<dyn PanelWidthSource>,
        clock: VirtualClock,
        seed: u64,
    ) -> (Self, FrameTicket) {
        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_config {
            match serde_json::to_string_pretty(&config) {
                Ok(json) => log::info!("Chart config:\n{json}"),
                Err(e) => log::warn!("Could not serialise chart config: {e}"),
            }
        }

        let style = ChartStyle::default();
        let mut listeners = ListenerRegistry::new();
        listeners.attach(ListenerKind::ContainerResize);
        listeners.attach(ListenerKind::PanelReady);
        listeners.attach(ListenerKind::Visibility);
        if config.markers.mode == MarkerMode::ExternalClock {
            listeners.attach(ListenerKind::PlaybackReady);
        }

        let mut scheduler = FrameScheduler::new();
        let first = scheduler.start();

        let instance = ChartInstance {
            engine: ChartEngine::new(&config, clock, seed),
            pipeline: RenderPipeline::new(&style),
            surface: SurfaceController::new(config.layout.default_panel_width, panel),
            config,
            style,
            scheduler,
            listeners,
            gate: RunGate::default(),
            last_host_time_ms: None,
            playback_ready: false,
        };

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_lifecycle {
            log::info!(
                "Chart mounted (seed {seed}, markers: {})",
                instance.engine.markers().strategy_name()
            );
        }
        (instance, first)
    }

    /// Handle a host signal. Returns a ticket when the signal (re)started the
    /// frame chain. Signals for detached listeners are ignored.
    pub fn handle_event(&mut self, event: HostEvent) -> Option<FrameTicket> {
        if !self.listeners.is_attached(event.listener()) {
            return None;
        }
        match event {
            HostEvent::ContainerResized {
                width,
                height,
                pixels_per_point,
            } => {
                self.surface.on_container_resized(width, height, pixels_per_point);
                None
            }
            HostEvent::PanelReady => {
                self.surface.on_panel_ready();
                None
            }
            HostEvent::VisibilityChanged(visible) => {
                if !self.gate.set_visible(visible) {
                    return None;
                }
                // Resume: do not count the hidden period as elapsed time
                self.last_host_time_ms = None;
                self.scheduler.request()
            }
            HostEvent::PlaybackReady => {
                self.playback_ready = true;
                None
            }
        }
    }

    /// Run one frame for `ticket`. Stale tickets, frames after unmount and
    /// frames while hidden do not advance anything.
    pub fn frame(
        &mut self,
        ticket: FrameTicket,
        host_time_ms: f64,
        surface: &mut dyn ChartSurface,
        playback: Option<&dyn PlaybackSource>,
    ) -> FrameOutcome {
        if !self.scheduler.accept(ticket) {
            return FrameOutcome::default();
        }
        if !self.gate.is_eligible_to_run() {
            self.last_host_time_ms = None;
            return FrameOutcome::default();
        }

        let elapsed = self
            .last_host_time_ms
            .map_or(0.0, |last| host_time_ms - last);
        self.last_host_time_ms = Some(host_time_ms);

        let view = self.view();
        let position = if self.playback_ready {
            playback.and_then(|p| p.position_secs())
        } else {
            None
        };
        let report = self.engine.tick(elapsed, &view, position);

        let mapper = CoordinateMapper::new(view, self.engine.now_ms());
        self.pipeline.render(
            surface,
            &FrameInput {
                config: &self.config,
                style: &self.style,
                mapper: &mapper,
                series: self.engine.series(),
                markers: self.engine.markers(),
            },
        );
        let resized = self.surface.take_dirty().then(|| self.surface.metrics());

        FrameOutcome {
            next: self.scheduler.request(),
            report: Some(report),
            resized,
        }
    }

    /// Stop the frame chain and detach every listener. Safe to call twice.
    pub fn unmount(&mut self) {
        let was_running = self.scheduler.is_running();
        self.scheduler.stop();
        let detached = self.listeners.detach_all();

        #[cfg(debug_assertions)]
        if was_running && DEBUG_FLAGS.print_lifecycle {
            log::info!("Chart unmounted ({detached} listeners detached)");
        }
        #[cfg(not(debug_assertions))]
        let _ = (was_running, detached);
    }

    pub fn view(&self) -> ViewWindow {
        ViewWindow::compute(&self.config, &self.surface.metrics())
    }

    pub fn metrics(&self) -> SurfaceMetrics {
        self.surface.metrics()
    }

    pub fn engine(&self) -> &ChartEngine {
        &self.engine
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    pub fn style(&self) -> &ChartStyle {
        &self.style
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn is_listening(&self, kind: ListenerKind) -> bool {
        self.listeners.is_attached(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::surface::testing::{CountingSurface, DrawKind};
    use crate::ui::playback::LoopingPlaybackClock;

    struct FixedPanel(Option<f32>);

    impl PanelWidthSource for FixedPanel {
        fn measured_width(&self) -> Option<f32> {
            self.0
        }
    }

    fn mounted(config: ChartConfig) -> (ChartInstance, FrameTicket) {
        let (mut chart, first) = ChartInstance::mount_with(
            config,
            Box::new(FixedPanel(Some(142.5))),
            VirtualClock::anchored_at(1_700_000_000_000.0),
            3,
        );
        chart.handle_event(HostEvent::ContainerResized {
            width: 1442.5,
            height: 400.0,
            pixels_per_point: 2.0,
        });
        (chart, first)
    }

    /// Run `frames` frames 16 ms apart, following the ticket chain.
    fn run(
        chart: &mut ChartInstance,
        mut ticket: FrameTicket,
        start_ms: f64,
        frames: usize,
    ) -> Option<FrameTicket> {
        let mut surface = CountingSurface::default();
        for i in 0..frames {
            let outcome = chart.frame(ticket, start_ms + i as f64 * 16.0, &mut surface, None);
            ticket = outcome.next?;
        }
        Some(ticket)
    }

    #[test]
    fn frames_advance_and_reschedule() {
        let (mut chart, first) = mounted(ChartConfig::default());
        let next = run(&mut chart, first, 0.0, 100);
        assert!(next.is_some());
        // 99 intervals of 16 ms
        assert_eq!(chart.engine().clock().elapsed_ms(), 1_584.0);
        assert_eq!(chart.engine().series().len(), 10);
    }

    #[test]
    fn unmount_cancels_in_flight_frame_and_detaches() {
        let (mut chart, first) = mounted(ChartConfig::default());
        let pending = run(&mut chart, first, 0.0, 10).unwrap();

        chart.unmount();
        assert!(!chart.is_running());
        for kind in [ListenerKind::ContainerResize, ListenerKind::Visibility] {
            assert!(!chart.is_listening(kind));
        }

        let mut surface = CountingSurface::default();
        let outcome = chart.frame(pending, 10_000.0, &mut surface, None);
        assert_eq!(outcome, FrameOutcome::default());
        assert_eq!(surface.total(), 0);

        // Second unmount and late signals are harmless
        chart.unmount();
        assert_eq!(chart.handle_event(HostEvent::VisibilityChanged(true)), None);
    }

    #[test]
    fn duplicate_callback_is_a_no_op() {
        let (mut chart, first) = mounted(ChartConfig::default());
        let mut surface = CountingSurface::default();
        assert!(chart.frame(first, 0.0, &mut surface, None).report.is_some());
        assert!(chart.frame(first, 16.0, &mut surface, None).report.is_none());
    }

    #[test]
    fn hidden_instance_pauses_and_resumes_without_burst() {
        let (mut chart, first) = mounted(ChartConfig::default());
        let pending = run(&mut chart, first, 0.0, 10).unwrap();
        let elapsed_before = chart.engine().clock().elapsed_ms();

        assert_eq!(chart.handle_event(HostEvent::VisibilityChanged(false)), None);
        let mut surface = CountingSurface::default();
        let outcome = chart.frame(pending, 200.0, &mut surface, None);
        assert_eq!(outcome.next, None);
        assert_eq!(surface.total(), 0);

        // Back after a long pause: the frame clock restarts
        let resumed = chart.handle_event(HostEvent::VisibilityChanged(true)).unwrap();
        let outcome = chart.frame(resumed, 60_000.0, &mut surface, None);
        assert!(outcome.next.is_some());
        assert_eq!(chart.engine().clock().elapsed_ms(), elapsed_before);
    }

    #[test]
    fn frame_reports_surface_change_once() {
        let (mut chart, first) = mounted(ChartConfig::default());
        let mut surface = CountingSurface::default();
        let outcome = chart.frame(first, 0.0, &mut surface, None);
        let resized = outcome.resized.unwrap();
        assert_eq!(resized.css_width, 1442.5);
        assert_eq!(resized.backing_size(), [2885, 800]);

        let outcome = chart.frame(outcome.next.unwrap(), 16.0, &mut surface, None);
        assert_eq!(outcome.resized, None);

        chart.handle_event(HostEvent::ContainerResized {
            width: 900.0,
            height: 300.0,
            pixels_per_point: 1.0,
        });
        let outcome = chart.frame(outcome.next.unwrap(), 32.0, &mut surface, None);
        assert_eq!(outcome.resized.map(|m| m.css_width), Some(900.0));
    }

    #[test]
    fn panel_width_feeds_the_scale() {
        let (chart, _) = mounted(ChartConfig::default());
        let view = chart.view();
        assert_eq!(chart.metrics().device_pixel_ratio, 2.0);
        assert!((view.pixels_per_second - 10.0).abs() < 1e-9);
    }

    #[test]
    fn timeline_markers_wait_for_playback_ready() {
        let mut config = ChartConfig::default();
        config.markers.mode = MarkerMode::ExternalClock;
        let (mut chart, first) = mounted(config);
        assert!(chart.is_listening(ListenerKind::PlaybackReady));

        let mut playback = LoopingPlaybackClock::new(10.0, 0.0);
        let mut surface = CountingSurface::default();
        let mut ticket = first;
        for i in 0..700 {
            if i == 300 {
                chart.handle_event(HostEvent::PlaybackReady);
            }
            let outcome = chart.frame(ticket, i as f64 * 16.0, &mut surface, Some(&playback));
            playback.advance(16.0);
            ticket = outcome.next.unwrap();
        }
        // Positions 4.8 s .. 10 s, then the loop restarts from zero
        let placed = chart.engine().markers().len();
        assert!((5..=8).contains(&placed), "{placed} markers");
        assert!(surface.count(DrawKind::Triangle) > placed);
    }
}
