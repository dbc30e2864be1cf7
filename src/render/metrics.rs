//! Surface geometry as measured by the host.
//!
//! Drawing happens in CSS pixels; the backing buffer is CSS size times an
//! integer device pixel ratio.

/// One consistent snapshot of the surface geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceMetrics {
    pub css_width: f32,
    pub css_height: f32,
    /// Integer ratio, at least 1
    pub device_pixel_ratio: f32,
    pub panel_width: f32,
}

impl SurfaceMetrics {
    pub fn new(css_width: f32, css_height: f32, pixels_per_point: f32, panel_width: f32) -> Self {
        let sane = |v: f32| if v.is_finite() { v.max(0.0) } else { 0.0 };
        let dpr = if pixels_per_point.is_finite() {
            pixels_per_point.floor().max(1.0)
        } else {
            1.0
        };
        SurfaceMetrics {
            css_width: sane(css_width),
            css_height: sane(css_height),
            device_pixel_ratio: dpr,
            panel_width: sane(panel_width),
        }
    }

    /// Width left for the chart once the panel is taken off. May be negative.
    pub fn chart_width(&self) -> f32 {
        self.css_width - self.panel_width
    }

    /// Size of the pixel buffer backing the surface.
    pub fn backing_size(&self) -> [u32; 2] {
        [
            (self.css_width * self.device_pixel_ratio).floor() as u32,
            (self.css_height * self.device_pixel_ratio).floor() as u32,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_ratio_is_floored_integer() {
        let m = SurfaceMetrics::new(800.0, 300.0, 2.75, 100.0);
        assert_eq!(m.device_pixel_ratio, 2.0);
        assert_eq!(m.backing_size(), [1600, 600]);

        let m = SurfaceMetrics::new(800.0, 300.0, 0.5, 100.0);
        assert_eq!(m.device_pixel_ratio, 1.0);
        assert_eq!(m.chart_width(), 700.0);
    }

    #[test]
    fn garbage_sizes_are_sanitised() {
        let m = SurfaceMetrics::new(f32::NAN, -20.0, f32::INFINITY, -1.0);
        assert_eq!(m.css_width, 0.0);
        assert_eq!(m.css_height, 0.0);
        assert_eq!(m.device_pixel_ratio, 1.0);
        assert_eq!(m.panel_width, 0.0);
    }
}
