use eframe::egui::{Pos2, pos2};

use super::surface::CubicSegment;

/// Convert a polyline into Catmull-Rom bezier segments. Each interior control
/// point follows the chord between the point's neighbours, scaled by
/// `tension / 6`. End points reuse themselves as the missing neighbour.
pub fn catmull_rom_segments(points: &[Pos2], tension: f32) -> Vec<CubicSegment> {
    if points.len() < 2 {
        return Vec::new();
    }
    let k = tension / 6.0;
    let last = points.len() - 1;

    (0..last)
        .map(|i| {
            let p0 = points[i.saturating_sub(1)];
            let p1 = points[i];
            let p2 = points[i + 1];
            let p3 = points[(i + 2).min(last)];
            CubicSegment {
                c1: pos2(p1.x + (p2.x - p0.x) * k, p1.y + (p2.y - p0.y) * k),
                c2: pos2(p2.x - (p3.x - p1.x) * k, p2.y - (p3.y - p1.y) * k),
                end: p2,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn needs_two_points() {
        assert!(catmull_rom_segments(&[], 0.5).is_empty());
        assert!(catmull_rom_segments(&[pos2(1.0, 1.0)], 0.5).is_empty());
        assert_eq!(catmull_rom_segments(&[pos2(0.0, 0.0), pos2(1.0, 1.0)], 0.5).len(), 1);
    }

    #[test]
    fn collinear_points_stay_on_the_line() {
        let points: Vec<Pos2> = (0..6).map(|i| pos2(i as f32 * 10.0, i as f32 * 5.0)).collect();
        for seg in catmull_rom_segments(&points, 0.5) {
            assert!(approx_eq(seg.c1.y, seg.c1.x / 2.0));
            assert!(approx_eq(seg.c2.y, seg.c2.x / 2.0));
        }
    }

    #[test]
    fn segments_end_on_input_points() {
        let points = [pos2(0.0, 3.0), pos2(4.0, 1.0), pos2(9.0, 7.0), pos2(12.0, 2.0)];
        let segments = catmull_rom_segments(&points, 0.5);
        assert_eq!(segments.len(), 3);
        for (seg, p) in segments.iter().zip(&points[1..]) {
            assert_eq!(seg.end, *p);
        }
        // Interior tangent at points[1] follows points[2] - points[0]
        let k = 0.5 / 6.0;
        assert!(approx_eq(segments[1].c1.x, 4.0 + 9.0 * k));
        assert!(approx_eq(segments[1].c1.y, 1.0 + 4.0 * k));
    }
}
