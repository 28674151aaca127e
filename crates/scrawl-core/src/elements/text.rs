//! Text element.

use super::{Color, ElementId, box_contains, generate_element_id};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};

/// A text label anchored at its baseline origin.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    pub id: ElementId,
    /// Baseline origin x.
    pub x: f64,
    /// Baseline origin y.
    pub y: f64,
    pub text: String,
    pub font_size: f64,
    pub stroke_color: Color,
    #[serde(default = "default_stroke_width")]
    pub stroke_width: f64,
}

fn default_stroke_width() -> f64 {
    2.0
}

impl Text {
    /// Create a text element at the given baseline origin.
    pub fn new(origin: Point, text: String) -> Self {
        Self {
            id: generate_element_id(),
            x: origin.x,
            y: origin.y,
            text,
            font_size: 20.0,
            stroke_color: Color::BLACK,
            stroke_width: 2.0,
        }
    }

    /// Hit box: a fixed-width approximation above the baseline
    /// (`[x, x+100] x [y-20, y]`), since no real text metrics are available.
    pub fn contains_point(&self, point: Point) -> bool {
        box_contains(
            Rect::new(self.x, self.y - 20.0, self.x + 100.0, self.y),
            point,
        )
    }
}
