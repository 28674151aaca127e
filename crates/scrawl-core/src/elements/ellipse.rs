//! Ellipse element.

use super::{Color, ElementId, generate_element_id, transparent};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// An axis-aligned ellipse inscribed in its bounding box.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ellipse {
    pub id: ElementId,
    /// Top-left corner x of the bounding box.
    pub x: f64,
    /// Top-left corner y of the bounding box.
    pub y: f64,
    /// Width, always non-negative.
    pub width: f64,
    /// Height, always non-negative.
    pub height: f64,
    pub stroke_color: Color,
    pub stroke_width: f64,
    /// Fill color; `None` is the transparent sentinel.
    #[serde(with = "transparent", default)]
    pub background_color: Option<Color>,
}

impl Ellipse {
    /// Create a new ellipse from its bounding box.
    pub fn new(origin: Point, width: f64, height: f64) -> Self {
        Self {
            id: generate_element_id(),
            x: origin.x,
            y: origin.y,
            width,
            height,
            stroke_color: Color::BLACK,
            stroke_width: 2.0,
            background_color: None,
        }
    }

    /// Create an ellipse from two drag corners, normalized.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        Self::new(
            Point::new(p1.x.min(p2.x), p1.y.min(p2.y)),
            (p2.x - p1.x).abs(),
            (p2.y - p1.y).abs(),
        )
    }

    /// Center of the ellipse.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Horizontal and vertical radii.
    pub fn radii(&self) -> (f64, f64) {
        (self.width / 2.0, self.height / 2.0)
    }

    /// Inside test against the ellipse equation, not the bounding box:
    /// `((x-cx)/rx)^2 + ((y-cy)/ry)^2 <= 1`. A degenerate radius hits
    /// nothing.
    pub fn contains_point(&self, point: Point) -> bool {
        let (rx, ry) = self.radii();
        if rx <= 0.0 || ry <= 0.0 {
            return false;
        }
        let center = self.center();
        let nx = (point.x - center.x) / rx;
        let ny = (point.y - center.y) / ry;
        nx * nx + ny * ny <= 1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ellipse_center_and_radii() {
        let e = Ellipse::new(Point::new(0.0, 0.0), 100.0, 50.0);
        assert_eq!(e.center(), Point::new(50.0, 25.0));
        assert_eq!(e.radii(), (50.0, 25.0));
    }

    #[test]
    fn test_contains_point_uses_equation() {
        let e = Ellipse::new(Point::new(0.0, 0.0), 100.0, 100.0);
        // Center hits.
        assert!(e.contains_point(Point::new(50.0, 50.0)));
        // Near the bottom of the circle, inside.
        assert!(e.contains_point(Point::new(50.0, 95.0)));
        // Bounding-box corner is outside the ellipse.
        assert!(!e.contains_point(Point::new(5.0, 5.0)));
        // On the rim is inside (inclusive).
        assert!(e.contains_point(Point::new(100.0, 50.0)));
    }

    #[test]
    fn test_degenerate_ellipse_hits_nothing() {
        let e = Ellipse::new(Point::new(0.0, 0.0), 0.0, 50.0);
        assert!(!e.contains_point(Point::new(0.0, 25.0)));
    }
}
