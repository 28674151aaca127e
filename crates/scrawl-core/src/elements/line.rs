//! Line element: a straight segment or a freehand polyline.

use super::{Color, ElementId, flat_points, generate_element_id};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// A polyline. Two forms share this kind:
///
/// - line-tool segments keep `x,y` at the drag start and signed
///   `width`/`height` (`end - start`), preserving direction;
/// - pen strokes keep the min/max bounding box of all points.
///
/// Both store the full `points` sequence, which is what gets rendered.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    pub id: ElementId,
    pub x: f64,
    pub y: f64,
    /// Signed for line-tool segments, non-negative for pen strokes.
    pub width: f64,
    /// Signed for line-tool segments, non-negative for pen strokes.
    pub height: f64,
    pub stroke_color: Color,
    pub stroke_width: f64,
    /// Vertices of the polyline, flattened to `[x0, y0, x1, y1, ...]` on
    /// the wire.
    #[serde(with = "flat_points", default)]
    pub points: Vec<Point>,
}

impl Line {
    /// Create a straight line from a drag gesture. Direction is preserved:
    /// swapping start and end negates `width` and `height`.
    pub fn from_drag(start: Point, end: Point) -> Self {
        Self {
            id: generate_element_id(),
            x: start.x,
            y: start.y,
            width: end.x - start.x,
            height: end.y - start.y,
            stroke_color: Color::BLACK,
            stroke_width: 2.0,
            points: vec![start, end],
        }
    }

    /// Create a freehand stroke from accumulated points. The bounding box is
    /// the min/max of all coordinates.
    pub fn from_stroke(points: Vec<Point>) -> Self {
        let (min_x, max_x) = points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(mn, mx), p| {
                (mn.min(p.x), mx.max(p.x))
            });
        let (min_y, max_y) = points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(mn, mx), p| {
                (mn.min(p.y), mx.max(p.y))
            });
        let (x, y, width, height) = if points.is_empty() {
            (0.0, 0.0, 0.0, 0.0)
        } else {
            (min_x, min_y, max_x - min_x, max_y - min_y)
        };
        Self {
            id: generate_element_id(),
            x,
            y,
            width,
            height,
            stroke_color: Color::BLACK,
            stroke_width: 2.0,
            points,
        }
    }
}
