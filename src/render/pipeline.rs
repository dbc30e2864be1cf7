use eframe::egui::{Pos2, pos2};

use crate::config::{ChartConfig, ChartStyle};
use crate::engine::{MarkerSynchronizer, SeriesBuffer};
use crate::utils::maths_utils::quantize_to_step;

use super::coords::CoordinateMapper;
use super::layers::{
    BackgroundLayer, ChartLayer, CurrentPrice, CurveLayer, GuideLineLayer, InfoBadgeLayer,
    LayerContext, MarkerLayer, NowDotLayer, NowLineLayer, PriceCapsuleLayer, PriceGridLayer,
    TimeGridLayer,
};
use super::surface::ChartSurface;

/// Everything one frame is drawn from. Borrowed, never retained.
pub struct FrameInput<'a> {
    pub config: &'a ChartConfig,
    pub style: &'a ChartStyle,
    pub mapper: &'a CoordinateMapper,
    pub series: &'a SeriesBuffer,
    pub markers: &'a MarkerSynchronizer,
}

pub struct RenderPipeline {
    layers: Vec<Box<dyn ChartLayer>>,
}

impl RenderPipeline {
    pub fn new(style: &ChartStyle) -> Self {
        // Back to front
        let layers: Vec<Box<dyn ChartLayer>> = vec![
            Box::new(BackgroundLayer),
            Box::new(TimeGridLayer),
            Box::new(PriceGridLayer),
            Box::new(CurveLayer),
            Box::new(PriceCapsuleLayer),
            Box::new(GuideLineLayer),
            Box::new(NowLineLayer),
            Box::new(NowDotLayer),
            Box::new(MarkerLayer::new(style)),
            Box::new(InfoBadgeLayer),
        ];
        RenderPipeline { layers }
    }

    pub fn render(&self, surface: &mut dyn ChartSurface, input: &FrameInput) {
        let view = input.mapper.view();
        if !view.has_area() {
            surface.clear(input.style.background);
            return;
        }

        let curve = visible_curve(input);
        let current = if curve.len() >= 2 {
            input.series.last().map(|last| CurrentPrice {
                sample: *last,
                y: input.mapper.price_to_y(last.value) as f32,
                label_value: quantize_to_step(last.value, input.config.labels.price_step),
            })
        } else {
            None
        };

        let ctx = LayerContext {
            config: input.config,
            style: input.style,
            mapper: input.mapper,
            markers: input.markers,
            curve: &curve,
            current,
        };
        for layer in &self.layers {
            layer.render(surface, &ctx);
        }
    }
}

/// Samples mapped to pixels, dropping any outside the surface plus the cull margin.
fn visible_curve(input: &FrameInput) -> Vec<Pos2> {
    let margin = input.config.layout.curve_cull_margin_px as f64;
    let right = input.mapper.view().surface_width + margin;

    input
        .series
        .iter()
        .filter_map(|sample| {
            let x = input.mapper.time_to_x(sample.timestamp);
            if x < -margin || x > right {
                return None;
            }
            let y = input.mapper.price_to_y(sample.value);
            Some(pos2(x as f32, y as f32))
        })
        .collect()
}
