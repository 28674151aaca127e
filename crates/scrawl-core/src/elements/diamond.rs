//! Diamond element.

use super::{Color, ElementId, generate_element_id, transparent};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// A diamond: the quadrilateral connecting the edge midpoints of its
/// bounding box.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Diamond {
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

impl Diamond {
    /// Create a new diamond from its bounding box.
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

    /// Create a diamond from two drag corners, normalized.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        Self::new(
            Point::new(p1.x.min(p2.x), p1.y.min(p2.y)),
            (p2.x - p1.x).abs(),
            (p2.y - p1.y).abs(),
        )
    }

    /// The four vertices, clockwise from the top midpoint.
    pub fn vertices(&self) -> [Point; 4] {
        let cx = self.x + self.width / 2.0;
        let cy = self.y + self.height / 2.0;
        [
            Point::new(cx, self.y),
            Point::new(self.x + self.width, cy),
            Point::new(cx, self.y + self.height),
            Point::new(self.x, cy),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diamond_vertices() {
        let d = Diamond::new(Point::new(0.0, 0.0), 100.0, 50.0);
        let [top, right, bottom, left] = d.vertices();
        assert_eq!(top, Point::new(50.0, 0.0));
        assert_eq!(right, Point::new(100.0, 25.0));
        assert_eq!(bottom, Point::new(50.0, 50.0));
        assert_eq!(left, Point::new(0.0, 25.0));
    }

    #[test]
    fn test_diamond_from_corners_normalizes() {
        let a = Diamond::from_corners(Point::new(10.0, 10.0), Point::new(50.0, 80.0));
        let b = Diamond::from_corners(Point::new(50.0, 80.0), Point::new(10.0, 10.0));
        assert!((a.x - b.x).abs() < f64::EPSILON);
        assert!((a.y - b.y).abs() < f64::EPSILON);
        assert!((a.width - b.width).abs() < f64::EPSILON);
        assert!((a.height - b.height).abs() < f64::EPSILON);
    }
}
