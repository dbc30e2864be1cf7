//! Surface sizing and side-panel measurement.
//!
//! Resize and panel-ready signals never block: they update the cached metrics
//! and mark the surface dirty so the next frame picks up the new scale.

use crate::render::SurfaceMetrics;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

/// Anything whose rendered width can be queried. `None` until measurable.
pub trait PanelWidthSource {
    fn measured_width(&self) -> Option<f32>;
}

/// An external playback clock (media element or stand-in).
pub trait PlaybackSource {
    /// Current position, `None` while not ready.
    fn position_secs(&self) -> Option<f64>;

    fn is_ready(&self) -> bool;
}

pub struct SurfaceController {
    panel_source: Box<dyn PanelWidthSource>,
    default_panel_width: f32,
    last_panel_width: Option<f32>,
    metrics: SurfaceMetrics,
    dirty: bool,
}

impl SurfaceController {
    pub fn new(default_panel_width: f32, panel_source: Box<dyn PanelWidthSource>) -> Self {
        let mut controller = SurfaceController {
            panel_source,
            default_panel_width,
            last_panel_width: None,
            metrics: SurfaceMetrics::new(0.0, 0.0, 1.0, default_panel_width),
            dirty: true,
        };
        controller.remeasure_panel();
        controller
    }

    /// Host reported a new container size. Returns true if anything changed.
    pub fn on_container_resized(&mut self, width: f32, height: f32, pixels_per_point: f32) -> bool {
        let panel_width = self.remeasure_panel();
        let next = SurfaceMetrics::new(width, height, pixels_per_point, panel_width);
        self.apply(next, "container resize")
    }

    /// The panel element loaded or changed size.
    pub fn on_panel_ready(&mut self) -> bool {
        let panel_width = self.remeasure_panel();
        let next = SurfaceMetrics { panel_width, ..self.metrics };
        self.apply(next, "panel ready")
    }

    /// Current panel width: fresh measurement, else last known, else the default.
    pub fn remeasure_panel(&mut self) -> f32 {
        match self.panel_source.measured_width() {
            Some(w) if w.is_finite() && w > 0.0 => {
                self.last_panel_width = Some(w);
                w
            }
            _ => self.last_panel_width.unwrap_or(self.default_panel_width),
        }
    }

    pub fn metrics(&self) -> SurfaceMetrics {
        self.metrics
    }

    /// Returns and clears the dirty flag.
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    fn apply(&mut self, next: SurfaceMetrics, reason: &str) -> bool {
        if next == self.metrics {
            return false;
        }

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_surface_events {
            let [bw, bh] = next.backing_size();
            log::info!(
                "Surface {reason}: {:.1}x{:.1} css, panel {:.1}, backing {bw}x{bh}",
                next.css_width,
                next.css_height,
                next.panel_width
            );
        }
        #[cfg(not(debug_assertions))]
        let _ = reason;

        self.metrics = next;
        self.dirty = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    struct SharedWidth(Rc<Cell<Option<f32>>>);

    impl PanelWidthSource for SharedWidth {
        fn measured_width(&self) -> Option<f32> {
            self.0.get()
        }
    }

    fn controller() -> (SurfaceController, Rc<Cell<Option<f32>>>) {
        let width = Rc::new(Cell::new(None));
        let ctl = SurfaceController::new(142.5, Box::new(SharedWidth(width.clone())));
        (ctl, width)
    }

    #[test]
    fn unmeasured_panel_uses_default_then_last_known() {
        let (mut ctl, width) = controller();
        ctl.on_container_resized(1000.0, 400.0, 1.0);
        assert_eq!(ctl.metrics().panel_width, 142.5);

        width.set(Some(180.0));
        assert!(ctl.on_panel_ready());
        assert_eq!(ctl.metrics().panel_width, 180.0);

        // Source goes unmeasurable again: keep the last good width
        width.set(Some(0.0));
        assert!(!ctl.on_panel_ready());
        assert_eq!(ctl.metrics().panel_width, 180.0);
    }

    #[test]
    fn resize_marks_dirty_only_on_change() {
        let (mut ctl, _) = controller();
        assert!(ctl.take_dirty());
        assert!(ctl.on_container_resized(640.0, 360.0, 2.0));
        assert!(ctl.take_dirty());
        assert!(!ctl.take_dirty());

        assert!(!ctl.on_container_resized(640.0, 360.0, 2.0));
        assert!(!ctl.take_dirty());
    }
}
