use std::cell::Cell;
use std::rc::Rc;

use eframe::egui;
use eframe::Frame;

use crate::config::{ChartConfig, MarkerMode};
use crate::engine::FrameTicket;
use crate::utils::app_time::{self, AppInstant};

use super::instance::{ChartInstance, HostEvent};
use super::playback::LoopingPlaybackClock;
use super::surface_controller::PanelWidthSource;
use super::utils::setup_custom_visuals;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

/// Width of the overlay panel as rendered on the previous frame.
pub(super) struct OverlayPanelWidth(pub(super) Rc<Cell<Option<f32>>>);

impl PanelWidthSource for OverlayPanelWidth {
    fn measured_width(&self) -> Option<f32> {
        self.0.get()
    }
}

/// Playback stand-in settings for timeline mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackOptions {
    pub duration_secs: f64,
    pub load_delay_ms: f64,
}

pub struct PulseChartApp {
    pub(super) chart: ChartInstance,
    pub(super) pending: Option<FrameTicket>,
    pub(super) origin: AppInstant,
    pub(super) playback: Option<LoopingPlaybackClock>,
    pub(super) last_playback_ms: Option<f64>,
    pub(super) panel_width: Rc<Cell<Option<f32>>>,
    pub(super) last_panel_width: Option<f32>,
    pub(super) last_container: Option<(f32, f32, f32)>,
    pub(super) visible: bool,
}

impl PulseChartApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        config: ChartConfig,
        playback: PlaybackOptions,
    ) -> Self {
        let panel_width = Rc::new(Cell::new(None));
        let playback = (config.markers.mode == MarkerMode::ExternalClock)
            .then(|| LoopingPlaybackClock::new(playback.duration_secs, playback.load_delay_ms));

        let (chart, first) =
            ChartInstance::mount(config, Box::new(OverlayPanelWidth(panel_width.clone())));
        setup_custom_visuals(&cc.egui_ctx, chart.style());

        PulseChartApp {
            chart,
            pending: Some(first),
            origin: app_time::now(),
            playback,
            last_playback_ms: None,
            panel_width,
            last_panel_width: None,
            last_container: None,
            visible: true,
        }
    }

    /// Forward viewport minimise/restore as visibility.
    fn poll_visibility(&mut self, ctx: &egui::Context) {
        let minimized = ctx.input(|i| i.viewport().minimized).unwrap_or(false);
        if minimized != self.visible {
            return;
        }
        self.visible = !minimized;

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_lifecycle {
            log::info!("Viewport visible: {}", self.visible);
        }
        if let Some(ticket) = self.chart.handle_event(HostEvent::VisibilityChanged(self.visible)) {
            self.pending = Some(ticket);
        }
    }

    fn advance_playback(&mut self, host_ms: f64) {
        let Some(playback) = self.playback.as_mut() else {
            return;
        };
        let dt = self.last_playback_ms.map_or(0.0, |last| host_ms - last);
        self.last_playback_ms = Some(host_ms);
        // Media keeps playing while the chart is hidden
        if playback.advance(dt) {
            log::info!("Playback ready ({:.1} s loop)", playback.duration_secs());
            self.chart.handle_event(HostEvent::PlaybackReady);
        }
    }
}

impl eframe::App for PulseChartApp {
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.pending = None;
        self.chart.unmount();

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_lifecycle {
            log::info!("Application shutdown complete.");
        }
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        let host_ms = app_time::elapsed_ms(self.origin);

        self.poll_visibility(ctx);
        self.advance_playback(host_ms);

        self.render_chart_panel(ctx, host_ms);
        self.render_marker_panel(ctx);

        if self.pending.is_some() {
            ctx.request_repaint();
        }
    }
}
