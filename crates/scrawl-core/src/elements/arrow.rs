//! Arrow element.

use super::{Color, ElementId, generate_element_id};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Half-angle of the arrowhead chevron in radians (30 degrees).
pub const HEAD_ANGLE: f64 = std::f64::consts::PI / 6.0;

/// Length of each arrowhead segment.
pub const HEAD_LENGTH: f64 = 15.0;

/// A straight arrow. `x,y` is the start point; `width`/`height` are signed
/// (`end - start`) so the arrowhead keeps its orientation regardless of the
/// drag direction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Arrow {
    pub id: ElementId,
    pub x: f64,
    pub y: f64,
    /// Signed horizontal extent (`end.x - start.x`).
    pub width: f64,
    /// Signed vertical extent (`end.y - start.y`).
    pub height: f64,
    pub stroke_color: Color,
    pub stroke_width: f64,
}

impl Arrow {
    /// Create an arrow from a drag gesture, start to tip.
    pub fn from_drag(start: Point, end: Point) -> Self {
        Self {
            id: generate_element_id(),
            x: start.x,
            y: start.y,
            width: end.x - start.x,
            height: end.y - start.y,
            stroke_color: Color::BLACK,
            stroke_width: 2.0,
        }
    }

    /// Start of the shaft.
    pub fn start(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Tip of the arrow, where the chevron is drawn.
    pub fn end(&self) -> Point {
        Point::new(self.x + self.width, self.y + self.height)
    }

    /// Shaft angle from start to tip.
    pub fn angle(&self) -> f64 {
        self.height.atan2(self.width)
    }

    /// The two back points of the arrowhead chevron.
    pub fn head_points(&self) -> [Point; 2] {
        let end = self.end();
        let angle = self.angle();
        [
            Point::new(
                end.x - HEAD_LENGTH * (angle - HEAD_ANGLE).cos(),
                end.y - HEAD_LENGTH * (angle - HEAD_ANGLE).sin(),
            ),
            Point::new(
                end.x - HEAD_LENGTH * (angle + HEAD_ANGLE).cos(),
                end.y - HEAD_LENGTH * (angle + HEAD_ANGLE).sin(),
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_drag_signed_extents() {
        let fwd = Arrow::from_drag(Point::new(0.0, 0.0), Point::new(30.0, 40.0));
        assert!((fwd.width - 30.0).abs() < f64::EPSILON);
        assert!((fwd.height - 40.0).abs() < f64::EPSILON);

        let rev = Arrow::from_drag(Point::new(30.0, 40.0), Point::new(0.0, 0.0));
        assert!((rev.x - 30.0).abs() < f64::EPSILON);
        assert!((rev.y - 40.0).abs() < f64::EPSILON);
        assert!((rev.width + 30.0).abs() < f64::EPSILON);
        assert!((rev.height + 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_head_points_flank_the_shaft() {
        // Horizontal arrow pointing right: both head points sit behind the
        // tip, one above and one below the shaft.
        let arrow = Arrow::from_drag(Point::new(0.0, 0.0), Point::new(100.0, 0.0));
        let [a, b] = arrow.head_points();
        assert!(a.x < 100.0 && b.x < 100.0);
        assert!((a.y + b.y).abs() < 1e-9);
        assert!((a.y - b.y).abs() > 1.0);
    }

    #[test]
    fn test_angle() {
        let arrow = Arrow::from_drag(Point::new(0.0, 0.0), Point::new(0.0, 10.0));
        assert!((arrow.angle() - std::f64::consts::FRAC_PI_2).abs() < 1e-9);
    }
}
