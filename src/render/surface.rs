//! Drawing surface abstraction.
//!
//! Layers draw through [`ChartSurface`] in chart-local CSS pixels with the origin
//! at the top-left of the chart. [`PainterSurface`] forwards to an egui
//! `Painter`; tests use a counting stub instead.

use eframe::egui::epaint::{CubicBezierShape, Mesh};
use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Shape, Stroke, StrokeKind, Vec2};

/// One cubic bezier segment continuing from the previous end point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicSegment {
    pub c1: Pos2,
    pub c2: Pos2,
    pub end: Pos2,
}

pub trait ChartSurface {
    fn clear(&mut self, color: Color32);

    fn line(&mut self, from: Pos2, to: Pos2, stroke: Stroke);

    fn dashed_line(&mut self, from: Pos2, to: Pos2, stroke: Stroke, dash: f32, gap: f32);

    fn bezier_path(&mut self, start: Pos2, segments: &[CubicSegment], stroke: Stroke);

    /// Rounded rectangle with fully rounded ends.
    fn capsule(&mut self, rect: Rect, fill: Color32, stroke: Stroke);

    fn circle(&mut self, center: Pos2, radius: f32, fill: Color32, stroke: Stroke);

    fn triangle(&mut self, points: [Pos2; 3], fill: Color32);

    /// Fill `rect` with a linear gradient from `top` to `bottom`.
    fn vertical_gradient(&mut self, rect: Rect, top: Color32, bottom: Color32);

    fn text(&mut self, pos: Pos2, anchor: Align2, text: &str, font: &FontId, color: Color32);

    /// Rendered width of `text`, used for layout before drawing.
    fn text_width(&self, text: &str, font: &FontId) -> f32;
}

/// egui-backed surface covering `rect` of the painter.
pub struct PainterSurface<'a> {
    painter: &'a Painter,
    rect: Rect,
}

impl<'a> PainterSurface<'a> {
    pub fn new(painter: &'a Painter, rect: Rect) -> Self {
        PainterSurface { painter, rect }
    }

    fn at(&self, p: Pos2) -> Pos2 {
        p + self.origin()
    }

    fn origin(&self) -> Vec2 {
        self.rect.min.to_vec2()
    }
}

impl ChartSurface for PainterSurface<'_> {
    fn clear(&mut self, color: Color32) {
        self.painter.rect_filled(self.rect, 0.0, color);
    }

    fn line(&mut self, from: Pos2, to: Pos2, stroke: Stroke) {
        self.painter.line_segment([self.at(from), self.at(to)], stroke);
    }

    fn dashed_line(&mut self, from: Pos2, to: Pos2, stroke: Stroke, dash: f32, gap: f32) {
        let shapes = Shape::dashed_line(&[self.at(from), self.at(to)], stroke, dash, gap);
        self.painter.extend(shapes);
    }

    fn bezier_path(&mut self, start: Pos2, segments: &[CubicSegment], stroke: Stroke) {
        let mut from = self.at(start);
        for seg in segments {
            let points = [from, self.at(seg.c1), self.at(seg.c2), self.at(seg.end)];
            self.painter.add(CubicBezierShape::from_points_stroke(
                points,
                false,
                Color32::TRANSPARENT,
                stroke,
            ));
            from = points[3];
        }
    }

    fn capsule(&mut self, rect: Rect, fill: Color32, stroke: Stroke) {
        let rect = rect.translate(self.origin());
        let radius = rect.height() / 2.0;
        self.painter.rect(rect, radius, fill, stroke, StrokeKind::Middle);
    }

    fn circle(&mut self, center: Pos2, radius: f32, fill: Color32, stroke: Stroke) {
        self.painter.circle(self.at(center), radius, fill, stroke);
    }

    fn triangle(&mut self, points: [Pos2; 3], fill: Color32) {
        let points = points.map(|p| self.at(p)).to_vec();
        self.painter.add(Shape::convex_polygon(points, fill, Stroke::NONE));
    }

    fn vertical_gradient(&mut self, rect: Rect, top: Color32, bottom: Color32) {
        let rect = rect.translate(self.origin());
        let mut mesh = Mesh::default();
        mesh.colored_vertex(rect.left_top(), top);
        mesh.colored_vertex(rect.right_top(), top);
        mesh.colored_vertex(rect.left_bottom(), bottom);
        mesh.colored_vertex(rect.right_bottom(), bottom);
        mesh.add_triangle(0, 1, 2);
        mesh.add_triangle(1, 3, 2);
        self.painter.add(Shape::mesh(mesh));
    }

    fn text(&mut self, pos: Pos2, anchor: Align2, text: &str, font: &FontId, color: Color32) {
        self.painter.text(self.at(pos), anchor, text, font.clone(), color);
    }

    fn text_width(&self, text: &str, font: &FontId) -> f32 {
        self.painter
            .layout_no_wrap(text.to_owned(), font.clone(), Color32::WHITE)
            .size()
            .x
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::collections::HashMap;

    use strum_macros::EnumIter;

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter)]
    pub enum DrawKind {
        Clear,
        Line,
        DashedLine,
        Bezier,
        Capsule,
        Circle,
        Triangle,
        Gradient,
        Text,
    }

    /// Records draw calls instead of painting.
    #[derive(Debug, Default)]
    pub struct CountingSurface {
        counts: HashMap<DrawKind, usize>,
        pub texts: Vec<String>,
        pub lines: Vec<(Pos2, Pos2)>,
        pub triangles: Vec<[Pos2; 3]>,
        pub gradients: Vec<(Rect, Color32, Color32)>,
    }

    impl CountingSurface {
        pub fn count(&self, kind: DrawKind) -> usize {
            self.counts.get(&kind).copied().unwrap_or(0)
        }

        pub fn total(&self) -> usize {
            self.counts.values().sum()
        }

        fn bump(&mut self, kind: DrawKind) {
            *self.counts.entry(kind).or_default() += 1;
        }
    }

    impl ChartSurface for CountingSurface {
        fn clear(&mut self, _color: Color32) {
            self.bump(DrawKind::Clear);
        }

        fn line(&mut self, from: Pos2, to: Pos2, _stroke: Stroke) {
            self.lines.push((from, to));
            self.bump(DrawKind::Line);
        }

        fn dashed_line(&mut self, _from: Pos2, _to: Pos2, _stroke: Stroke, _dash: f32, _gap: f32) {
            self.bump(DrawKind::DashedLine);
        }

        fn bezier_path(&mut self, _start: Pos2, _segments: &[CubicSegment], _stroke: Stroke) {
            self.bump(DrawKind::Bezier);
        }

        fn capsule(&mut self, _rect: Rect, _fill: Color32, _stroke: Stroke) {
            self.bump(DrawKind::Capsule);
        }

        fn circle(&mut self, _center: Pos2, _radius: f32, _fill: Color32, _stroke: Stroke) {
            self.bump(DrawKind::Circle);
        }

        fn triangle(&mut self, points: [Pos2; 3], _fill: Color32) {
            self.triangles.push(points);
            self.bump(DrawKind::Triangle);
        }

        fn vertical_gradient(&mut self, rect: Rect, top: Color32, bottom: Color32) {
            self.gradients.push((rect, top, bottom));
            self.bump(DrawKind::Gradient);
        }

        fn text(
            &mut self,
            _pos: Pos2,
            _anchor: Align2,
            text: &str,
            _font: &FontId,
            _color: Color32,
        ) {
            self.texts.push(text.to_owned());
            self.bump(DrawKind::Text);
        }

        fn text_width(&self, text: &str, font: &FontId) -> f32 {
            text.chars().count() as f32 * font.size * 0.6
        }
    }
}
