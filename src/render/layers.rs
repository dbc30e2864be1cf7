use colorgrad::{Gradient, LinearGradient};
use eframe::egui::{Align2, Color32, Pos2, Rect, Stroke, pos2, vec2};

use crate::config::{ChartConfig, ChartStyle, LayoutConfig};
use crate::domain::{MarkerKind, Price, Sample};
use crate::engine::MarkerSynchronizer;
use crate::utils::maths_utils::{format_level, format_price, quantize_to_step};
use crate::utils::time_utils::{format_clock, format_clock_with_zone};

use super::coords::CoordinateMapper;
use super::curve::catmull_rom_segments;
use super::surface::ChartSurface;

/// The last sample, resolved once per frame. Only present when at least two
/// samples survive culling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CurrentPrice {
    pub sample: Sample,
    pub y: f32,
    /// Quantized value shown in labels
    pub label_value: Price,
}

/// Context passed to every layer during rendering.
pub struct LayerContext<'a> {
    pub config: &'a ChartConfig,
    pub style: &'a ChartStyle,
    pub mapper: &'a CoordinateMapper,
    pub markers: &'a MarkerSynchronizer,
    /// Culled curve points in pixel space
    pub curve: &'a [Pos2],
    pub current: Option<CurrentPrice>,
}

impl LayerContext<'_> {
    fn width(&self) -> f32 {
        self.mapper.view().surface_width as f32
    }

    fn height(&self) -> f32 {
        self.mapper.view().chart_height as f32
    }

    fn chart_width(&self) -> f32 {
        self.mapper.view().chart_width as f32
    }

    /// Shared x of the price capsule and the grid price labels
    fn price_anchor_x(&self) -> f32 {
        self.chart_width() - self.style.capsule_width / 2.0
    }
}

/// A standardized layer in the chart stack.
pub trait ChartLayer {
    fn render(&self, surface: &mut dyn ChartSurface, ctx: &LayerContext);
}

// ============================================================================
// 1. BACKGROUND
// ============================================================================
pub struct BackgroundLayer;

impl ChartLayer for BackgroundLayer {
    fn render(&self, surface: &mut dyn ChartSurface, ctx: &LayerContext) {
        surface.clear(ctx.style.background);
    }
}

// ============================================================================
// 2. TIME GRID (vertical lines, scroll with time)
// ============================================================================
pub struct TimeGridLayer;

impl TimeGridLayer {
    /// Bounds the walk when the column step is tiny next to the surface
    const MAX_COLUMNS_PER_SIDE: usize = 1_024;

    fn draw_column(&self, surface: &mut dyn ChartSurface, ctx: &LayerContext, t: f64, x: f32) {
        let style = ctx.style;
        let h = ctx.height();
        surface.line(
            pos2(x + 0.5, 0.0),
            pos2(x + 0.5, h),
            Stroke::new(1.0, style.grid_line),
        );

        let pad = style.time_label_edge_pad;
        if x >= pad && x <= ctx.chart_width() - pad {
            let label = format_clock(t, ctx.config.labels.utc_offset_hours);
            surface.text(
                pos2(x, h - style.time_label_bottom_pad),
                Align2::CENTER_BOTTOM,
                &label,
                &style.time_font,
                style.grid_label,
            );
        }
    }
}

impl ChartLayer for TimeGridLayer {
    fn render(&self, surface: &mut dyn ChartSurface, ctx: &LayerContext) {
        let step_ms = ctx.config.layout.seconds_per_column * 1000.0;
        if !(step_ms > 0.0 && ctx.mapper.view().pixels_per_second > 0.0) {
            return;
        }
        let overscan = ctx.style.grid_overscan_px;
        let base_tick = (ctx.mapper.now() / step_ms).floor() * step_ms;

        // Older side, walking left from the anchor tick
        let mut t = base_tick;
        for _ in 0..Self::MAX_COLUMNS_PER_SIDE {
            let x = ctx.mapper.time_to_x(t) as f32;
            if !x.is_finite() || x < -overscan {
                break;
            }
            self.draw_column(surface, ctx, t, x);
            let next = t - step_ms;
            // Step below the float resolution of `t`
            if next == t {
                break;
            }
            t = next;
        }

        // Newer side
        let mut t = base_tick + step_ms;
        for _ in 0..Self::MAX_COLUMNS_PER_SIDE {
            let x = ctx.mapper.time_to_x(t) as f32;
            if !x.is_finite() || x > ctx.width() + overscan {
                break;
            }
            self.draw_column(surface, ctx, t, x);
            let next = t + step_ms;
            if next == t {
                break;
            }
            t = next;
        }
    }
}

// ============================================================================
// 3. PRICE GRID (horizontal lines at quantized levels)
// ============================================================================
pub struct PriceGridLayer;

impl ChartLayer for PriceGridLayer {
    fn render(&self, surface: &mut dyn ChartSurface, ctx: &LayerContext) {
        let view = ctx.mapper.view();
        let labels = &ctx.config.labels;
        let style = ctx.style;
        let parts = ctx
            .config
            .layout
            .horizontal_cells
            .min(LayoutConfig::MAX_HORIZONTAL_CELLS)
            + 1;

        for i in 0..parts {
            let frac = (i as f64 + 0.5) / parts as f64;
            let raw = view.y_max - (view.y_max - view.y_min) * frac;
            // Quantize first so line and label agree
            let level = quantize_to_step(raw, labels.price_step);
            let y = ctx.mapper.price_to_y(level).round() as f32 + 0.5;

            surface.line(
                pos2(0.0, y),
                pos2(ctx.width(), y),
                Stroke::new(1.0, style.grid_line),
            );
            surface.text(
                pos2(ctx.price_anchor_x(), y - 2.0),
                Align2::CENTER_BOTTOM,
                &format_level(level, labels.price_digits),
                &style.price_font,
                style.grid_label,
            );
        }
    }
}

// ============================================================================
// 4. PRICE CURVE
// ============================================================================
pub struct CurveLayer;

impl ChartLayer for CurveLayer {
    fn render(&self, surface: &mut dyn ChartSurface, ctx: &LayerContext) {
        if ctx.current.is_none() {
            return;
        }
        let Some((&start, _)) = ctx.curve.split_first() else {
            return;
        };
        let style = ctx.style;
        let segments = catmull_rom_segments(ctx.curve, style.curve_tension);

        surface.bezier_path(
            start,
            &segments,
            Stroke::new(style.curve_glow_width, style.curve_glow_color),
        );
        surface.bezier_path(
            start,
            &segments,
            Stroke::new(style.curve_width, style.curve_color),
        );
    }
}

// ============================================================================
// 5. CURRENT PRICE CAPSULE (right edge of the chart area)
// ============================================================================
pub struct PriceCapsuleLayer;

impl ChartLayer for PriceCapsuleLayer {
    fn render(&self, surface: &mut dyn ChartSurface, ctx: &LayerContext) {
        let Some(current) = ctx.current else { return };
        let style = ctx.style;
        let center = pos2(ctx.price_anchor_x(), current.y);
        let rect = Rect::from_center_size(center, vec2(style.capsule_width, style.capsule_height));

        surface.capsule(rect, style.capsule_fill, Stroke::NONE);
        surface.text(
            center,
            Align2::CENTER_CENTER,
            &format_price(current.label_value, ctx.config.labels.price_digits),
            &style.capsule_font,
            style.capsule_text,
        );
    }
}

// ============================================================================
// 6. GUIDE LINE through the current price
// ============================================================================
pub struct GuideLineLayer;

impl ChartLayer for GuideLineLayer {
    fn render(&self, surface: &mut dyn ChartSurface, ctx: &LayerContext) {
        let Some(current) = ctx.current else { return };
        let style = ctx.style;
        let from = pos2(0.0, current.y);
        let to = pos2(ctx.width(), current.y);
        let stroke = Stroke::new(1.0, style.guide_line);

        if style.guide_dashed {
            surface.dashed_line(from, to, stroke, style.guide_dash, style.guide_gap);
        } else {
            surface.line(from, to, stroke);
        }
    }
}

// ============================================================================
// 7. NOW-LINE
// ============================================================================
pub struct NowLineLayer;

impl ChartLayer for NowLineLayer {
    fn render(&self, surface: &mut dyn ChartSurface, ctx: &LayerContext) {
        if ctx.current.is_none() {
            return;
        }
        let x = ctx.mapper.view().now_x as f32 + 0.5;
        surface.line(
            pos2(x, 0.0),
            pos2(x, ctx.height()),
            Stroke::new(1.0, ctx.style.now_line),
        );
    }
}

// ============================================================================
// 8. GLOW + DOT at now-line x current price
// ============================================================================
pub struct NowDotLayer;

impl ChartLayer for NowDotLayer {
    fn render(&self, surface: &mut dyn ChartSurface, ctx: &LayerContext) {
        let Some(current) = ctx.current else { return };
        let style = ctx.style;
        let center = pos2(ctx.mapper.view().now_x as f32, current.y);

        surface.circle(center, style.glow_radius, style.glow_fill, Stroke::NONE);
        surface.circle(
            center,
            style.dot_radius,
            style.dot_fill,
            Stroke::new(1.0, style.dot_stroke),
        );
    }
}

// ============================================================================
// 9. MARKERS (triangle + fading band)
// ============================================================================
pub struct MarkerLayer {
    long_band: Option<LinearGradient>,
    short_band: Option<LinearGradient>,
}

impl MarkerLayer {
    pub fn new(style: &ChartStyle) -> Self {
        MarkerLayer {
            long_band: band_gradient(style.long_color, style.band_opacity),
            short_band: band_gradient(style.short_color, style.band_opacity),
        }
    }

    fn kind_color(style: &ChartStyle, kind: MarkerKind) -> Color32 {
        match kind {
            MarkerKind::Long => style.long_color,
            MarkerKind::Short => style.short_color,
        }
    }

    /// Band from the marker towards the top (long) or bottom (short), opaque
    /// at the marker end. Drawn as strips sampled from the gradient.
    fn draw_band(
        &self,
        surface: &mut dyn ChartSurface,
        ctx: &LayerContext,
        kind: MarkerKind,
        x: f32,
        y: f32,
    ) {
        let style = ctx.style;
        let half = style.band_width / 2.0;
        let (far_y, gradient) = match kind {
            MarkerKind::Long => (0.0, self.long_band.as_ref()),
            MarkerKind::Short => (ctx.height(), self.short_band.as_ref()),
        };
        if (far_y - y).abs() < 1.0 {
            return;
        }

        let Some(gradient) = gradient else {
            let opaque = Self::kind_color(style, kind).gamma_multiply(style.band_opacity);
            let rect = Rect::from_x_y_ranges(x - half..=x + half, y.min(far_y)..=y.max(far_y));
            let (top, bottom) = match kind {
                MarkerKind::Long => (Color32::TRANSPARENT, opaque),
                MarkerKind::Short => (opaque, Color32::TRANSPARENT),
            };
            surface.vertical_gradient(rect, top, bottom);
            return;
        };

        let strips = style.band_strips.max(1);
        for i in 0..strips {
            let t0 = i as f32 / strips as f32;
            let t1 = (i + 1) as f32 / strips as f32;
            // t = 0 at the marker, 1 at the far edge
            let y0 = y + (far_y - y) * t0;
            let y1 = y + (far_y - y) * t1;
            let c0 = to_egui_color(gradient.at(t0));
            let c1 = to_egui_color(gradient.at(t1));

            let rect = Rect::from_x_y_ranges(x - half..=x + half, y0.min(y1)..=y0.max(y1));
            let (top, bottom) = if y0 <= y1 { (c0, c1) } else { (c1, c0) };
            surface.vertical_gradient(rect, top, bottom);
        }
    }
}

impl ChartLayer for MarkerLayer {
    fn render(&self, surface: &mut dyn ChartSurface, ctx: &LayerContext) {
        let style = ctx.style;
        let size = style.marker_size;

        for marker in ctx.markers.markers() {
            let x = ctx.mapper.time_to_x(marker.timestamp) as f32;
            let y = ctx.mapper.price_to_y(marker.value) as f32;

            self.draw_band(surface, ctx, marker.kind, x, y);

            // Apex on the marker point
            let base_y = match marker.kind {
                MarkerKind::Long => y + size,
                MarkerKind::Short => y - size,
            };
            surface.triangle(
                [pos2(x, y), pos2(x - size / 2.0, base_y), pos2(x + size / 2.0, base_y)],
                Self::kind_color(style, marker.kind),
            );
        }
    }
}

fn band_gradient(color: Color32, opacity: f32) -> Option<LinearGradient> {
    let [r, g, b, _] = color.to_srgba_unmultiplied();
    let alpha = (opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
    colorgrad::GradientBuilder::new()
        .colors(&[
            colorgrad::Color::from_rgba8(r, g, b, alpha),
            colorgrad::Color::from_rgba8(r, g, b, 0),
        ])
        .build::<LinearGradient>()
        .map_err(|e| log::warn!("Marker band gradient unavailable: {e}"))
        .ok()
}

fn to_egui_color(color: colorgrad::Color) -> Color32 {
    let [r, g, b, a] = color.to_rgba8();
    Color32::from_rgba_unmultiplied(r, g, b, a)
}

// ============================================================================
// 10. TOP-LEFT INFO BADGE (time + asset/price capsule)
// ============================================================================
pub struct InfoBadgeLayer;

impl ChartLayer for InfoBadgeLayer {
    fn render(&self, surface: &mut dyn ChartSurface, ctx: &LayerContext) {
        let labels = &ctx.config.labels;
        if !labels.show_info_badge {
            return;
        }
        let Some(current) = ctx.current else { return };
        let style = ctx.style;
        let left = style.info_margin_x;

        let time = format_clock_with_zone(
            current.sample.timestamp,
            labels.utc_offset_hours,
            &labels.timezone_label,
        );
        surface.text(
            pos2(left, style.info_time_y),
            Align2::LEFT_BOTTOM,
            &time,
            &style.info_time_font,
            style.info_time_color,
        );

        let price = format_price(current.label_value, labels.price_digits);
        let asset_w = surface.text_width(&labels.asset_label, &style.info_asset_font);
        let price_w = surface.text_width(&price, &style.info_price_font);
        let badge_w = style.info_badge_pad_x * 2.0
            + asset_w
            + style.info_badge_gap * 2.0
            + price_w
            + style.info_caret_width;

        let cy = style.info_badge_center_y;
        let rect = Rect::from_min_size(
            pos2(left, cy - style.info_badge_height / 2.0),
            vec2(badge_w, style.info_badge_height),
        );
        surface.capsule(
            rect,
            style.info_badge_fill,
            Stroke::new(style.info_badge_stroke_width, style.info_badge_stroke),
        );

        let mut cursor = left + style.info_badge_pad_x;
        surface.text(
            pos2(cursor, cy),
            Align2::LEFT_CENTER,
            &labels.asset_label,
            &style.info_asset_font,
            Color32::WHITE,
        );
        cursor += asset_w + style.info_badge_gap;
        surface.text(
            pos2(cursor, cy),
            Align2::LEFT_CENTER,
            &price,
            &style.info_price_font,
            Color32::WHITE,
        );

        // Down caret
        let caret_x = rect.right() - style.info_badge_pad_x - style.info_caret_width / 2.0;
        let half = style.info_caret_width / 2.0;
        surface.triangle(
            [
                pos2(caret_x - half, cy - half / 2.0),
                pos2(caret_x + half, cy - half / 2.0),
                pos2(caret_x, cy + half / 2.0),
            ],
            Color32::WHITE,
        );
    }
}
