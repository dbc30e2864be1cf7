use eframe::egui::{Context, RichText, Visuals};

use crate::config::ChartStyle;

/// Creates an uppercase monospace heading for the side panel
pub fn colored_heading(text: impl Into<String>, style: &ChartStyle) -> RichText {
    RichText::new(text.into().to_uppercase())
        .color(style.grid_label)
        .monospace()
}

/// Dark theme matching the chart background
pub fn setup_custom_visuals(ctx: &Context, style: &ChartStyle) {
    let mut visuals = Visuals::dark();
    visuals.window_fill = style.panel_fill;
    visuals.panel_fill = style.background;
    visuals.widgets.noninteractive.fg_stroke.color = style.grid_label;
    ctx.set_visuals(visuals);
}
