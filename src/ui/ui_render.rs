use eframe::egui::{Align2, Area, CentralPanel, Context, Frame, Id, Margin, vec2};
use itertools::Itertools;

use crate::render::PainterSurface;
use crate::ui::surface_controller::PlaybackSource;
use crate::ui::utils::colored_heading;
use crate::utils::maths_utils::format_price;
use crate::utils::time_utils::format_clock;

use super::app::PulseChartApp;
use super::instance::HostEvent;

impl PulseChartApp {
    pub(super) fn render_chart_panel(&mut self, ctx: &Context, host_ms: f64) {
        CentralPanel::default().frame(Frame::NONE).show(ctx, |ui| {
            let rect = ui.max_rect();
            let ppp = ctx.pixels_per_point();

            let container = (rect.width(), rect.height(), ppp);
            if self.last_container != Some(container) {
                self.last_container = Some(container);
                self.chart.handle_event(HostEvent::ContainerResized {
                    width: rect.width(),
                    height: rect.height(),
                    pixels_per_point: ppp,
                });
            }

            let Some(ticket) = self.pending.take() else {
                return;
            };
            let painter = ui.painter_at(rect);
            let mut surface = PainterSurface::new(&painter, rect);
            let playback = self.playback.as_ref().map(|p| p as &dyn PlaybackSource);
            let outcome = self.chart.frame(ticket, host_ms, &mut surface, playback);
            self.pending = outcome.next;
            if let Some(metrics) = outcome.resized {
                let [bw, bh] = metrics.backing_size();
                log::debug!("Chart surface now {bw}x{bh} px");
                // Panel width feeds back into the scale; settle it on the next pass
                ctx.request_repaint();
            }
        });
    }

    /// Right-edge overlay listing recent markers. Its rendered width is what
    /// the chart subtracts from the surface width.
    pub(super) fn render_marker_panel(&mut self, ctx: &Context) {
        let style = self.chart.style();
        let labels = &self.chart.config().labels;
        let engine = self.chart.engine();
        let markers = engine.markers();

        let response = Area::new(Id::new("marker_panel"))
            .anchor(Align2::RIGHT_TOP, vec2(0.0, 0.0))
            .show(ctx, |ui| {
                Frame::new()
                    .fill(style.panel_fill)
                    .inner_margin(Margin::same(8))
                    .show(ui, |ui| {
                        ui.set_min_width(style.panel_min_width);
                        ui.label(colored_heading(&labels.asset_label, style));
                        ui.monospace(format!(
                            "{} ({})",
                            markers.strategy_name(),
                            markers.len()
                        ));
                        ui.weak(format!("{} steps", engine.stats().total_steps()));
                        ui.separator();

                        let rows = markers
                            .markers()
                            .rev()
                            .take(style.panel_marker_rows)
                            .map(|m| {
                                format!(
                                    "{} {:<5} {} {}",
                                    m.kind.arrow(),
                                    m.kind,
                                    format_clock(m.timestamp, labels.utc_offset_hours),
                                    format_price(m.value, labels.price_digits)
                                )
                            })
                            .join("\n");
                        if rows.is_empty() {
                            ui.weak("no markers yet");
                        } else {
                            ui.monospace(rows);
                        }
                    });
            });

        let width = response.response.rect.width();
        self.panel_width.set(Some(width));
        if self.last_panel_width != Some(width) {
            self.last_panel_width = Some(width);
            self.chart.handle_event(HostEvent::PanelReady);
        }
    }
}
