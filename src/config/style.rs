//! Visual style of the chart: colours, stroke widths, fonts and fixed geometry.

use eframe::egui::{Color32, FontId};

pub struct ChartStyle {
    pub background: Color32,

    // Grid
    pub grid_line: Color32,
    pub grid_label: Color32,
    pub time_font: FontId,
    pub price_font: FontId,
    /// Labels hug this distance from the bottom edge
    pub time_label_bottom_pad: f32,
    /// Time labels are only drawn this far inside the chart area
    pub time_label_edge_pad: f32,
    /// Vertical grid lines continue this far past either surface edge
    pub grid_overscan_px: f32,

    // Curve
    pub curve_color: Color32,
    pub curve_width: f32,
    pub curve_glow_color: Color32,
    pub curve_glow_width: f32,
    /// Catmull-Rom tension
    pub curve_tension: f32,

    // Current price capsule (right edge)
    pub capsule_width: f32,
    pub capsule_height: f32,
    pub capsule_fill: Color32,
    pub capsule_text: Color32,
    pub capsule_font: FontId,

    // Guide line through the current price
    pub guide_line: Color32,
    pub guide_dashed: bool,
    pub guide_dash: f32,
    pub guide_gap: f32,

    // Now-line and dot
    pub now_line: Color32,
    pub dot_fill: Color32,
    pub dot_radius: f32,
    pub dot_stroke: Color32,
    pub glow_fill: Color32,
    pub glow_radius: f32,

    // Markers
    pub long_color: Color32,
    pub short_color: Color32,
    pub marker_size: f32,
    pub band_width: f32,
    /// Opacity at the marker end of the band (0.0 - 1.0)
    pub band_opacity: f32,
    /// Number of strips the fade is rendered with
    pub band_strips: usize,

    // Top-left info badge
    pub info_margin_x: f32,
    pub info_time_y: f32,
    pub info_time_color: Color32,
    pub info_time_font: FontId,
    pub info_badge_center_y: f32,
    pub info_badge_height: f32,
    pub info_badge_pad_x: f32,
    pub info_badge_gap: f32,
    pub info_badge_fill: Color32,
    pub info_badge_stroke: Color32,
    pub info_badge_stroke_width: f32,
    pub info_asset_font: FontId,
    pub info_price_font: FontId,
    pub info_caret_width: f32,

    // Side panel overlay
    pub panel_fill: Color32,
    pub panel_min_width: f32,
    /// Most recent markers listed in the overlay
    pub panel_marker_rows: usize,
}

impl Default for ChartStyle {
    fn default() -> Self {
        ChartStyle {
            background: Color32::from_rgb(16, 15, 23),

            grid_line: Color32::from_rgba_unmultiplied(255, 255, 255, 38),
            grid_label: Color32::from_rgba_unmultiplied(255, 255, 255, 191),
            time_font: FontId::proportional(9.0),
            price_font: FontId::monospace(12.0),
            time_label_bottom_pad: 8.0,
            time_label_edge_pad: 8.0,
            grid_overscan_px: 60.0,

            curve_color: Color32::from_rgba_unmultiplied(90, 200, 250, 242),
            curve_width: 2.0,
            curve_glow_color: Color32::from_rgba_unmultiplied(90, 200, 250, 64),
            curve_glow_width: 6.0,
            curve_tension: 0.5,

            capsule_width: 96.0,
            capsule_height: 24.0,
            capsule_fill: Color32::from_rgb(224, 224, 224),
            capsule_text: Color32::BLACK,
            capsule_font: FontId::proportional(12.0),

            guide_line: Color32::from_rgba_unmultiplied(255, 255, 255, 89),
            guide_dashed: true,
            guide_dash: 6.0,
            guide_gap: 6.0,

            now_line: Color32::from_rgba_unmultiplied(80, 160, 255, 166),
            dot_fill: Color32::from_rgb(90, 200, 250),
            dot_radius: 5.0,
            dot_stroke: Color32::WHITE,
            glow_fill: Color32::from_rgba_unmultiplied(90, 200, 250, 70),
            glow_radius: 11.0,

            long_color: Color32::from_rgb(0, 200, 120),
            short_color: Color32::from_rgb(235, 70, 70),
            marker_size: 10.0,
            band_width: 28.0,
            band_opacity: 0.35,
            band_strips: 12,

            info_margin_x: 16.0,
            info_time_y: 27.0,
            info_time_color: Color32::from_rgb(102, 102, 102),
            info_time_font: FontId::proportional(12.0),
            info_badge_center_y: 49.0,
            info_badge_height: 28.0,
            info_badge_pad_x: 14.0,
            info_badge_gap: 12.0,
            info_badge_fill: Color32::from_rgba_unmultiplied(255, 255, 255, 31),
            info_badge_stroke: Color32::WHITE,
            info_badge_stroke_width: 1.5,
            info_asset_font: FontId::proportional(12.0),
            info_price_font: FontId::proportional(14.0),
            info_caret_width: 10.0,

            panel_fill: Color32::from_rgba_unmultiplied(25, 25, 25, 220),
            panel_min_width: 132.0,
            panel_marker_rows: 12,
        }
    }
}
