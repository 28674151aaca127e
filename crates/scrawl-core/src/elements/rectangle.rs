//! Rectangle element.

use super::{Color, ElementId, generate_element_id, transparent};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rectangle {
    pub id: ElementId,
    /// Top-left corner x.
    pub x: f64,
    /// Top-left corner y.
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

impl Rectangle {
    /// Create a new rectangle from its top-left corner and extents.
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

    /// Create a rectangle from two drag corners, normalized so the drag
    /// direction never matters.
    pub fn from_corners(p1: Point, p2: Point) -> Self {
        Self::new(
            Point::new(p1.x.min(p2.x), p1.y.min(p2.y)),
            (p2.x - p1.x).abs(),
            (p2.y - p1.y).abs(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rectangle_creation() {
        let rect = Rectangle::new(Point::new(10.0, 20.0), 100.0, 50.0);
        assert!((rect.x - 10.0).abs() < f64::EPSILON);
        assert!((rect.y - 20.0).abs() < f64::EPSILON);
        assert!((rect.width - 100.0).abs() < f64::EPSILON);
        assert!((rect.height - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_rectangle_from_corners_normalizes() {
        let rect = Rectangle::from_corners(Point::new(100.0, 100.0), Point::new(50.0, 50.0));
        assert!((rect.x - 50.0).abs() < f64::EPSILON);
        assert!((rect.y - 50.0).abs() < f64::EPSILON);
        assert!((rect.width - 50.0).abs() < f64::EPSILON);
        assert!((rect.height - 50.0).abs() < f64::EPSILON);
    }
}
