//! Recording surface: captures draw operations for inspection in tests.

use crate::surface::Surface;
use kurbo::{Point, Rect, Size};
use peniko::Color;

/// One recorded surface operation.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear(Size),
    StrokeColor(Color),
    FillColor(Color),
    LineWidth(f64),
    DashPattern(Vec<f64>),
    BeginPath,
    ClosePath,
    MoveTo(Point),
    LineTo(Point),
    Rect(Rect),
    Ellipse { center: Point, rx: f64, ry: f64 },
    Stroke,
    Fill,
    FillText { text: String, origin: Point, size: f64 },
    Present,
}

/// A [`Surface`] that records every operation instead of drawing.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub ops: Vec<DrawOp>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count the recorded operations matching a predicate.
    pub fn count(&self, predicate: impl Fn(&DrawOp) -> bool) -> usize {
        self.ops.iter().filter(|op| predicate(op)).count()
    }

    /// Drop everything recorded so far.
    pub fn reset(&mut self) {
        self.ops.clear();
    }
}

impl Surface for RecordingSurface {
    fn clear(&mut self, size: Size) {
        self.ops.push(DrawOp::Clear(size));
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.ops.push(DrawOp::StrokeColor(color));
    }

    fn set_fill_color(&mut self, color: Color) {
        self.ops.push(DrawOp::FillColor(color));
    }

    fn set_line_width(&mut self, width: f64) {
        self.ops.push(DrawOp::LineWidth(width));
    }

    fn set_dash_pattern(&mut self, pattern: &[f64]) {
        self.ops.push(DrawOp::DashPattern(pattern.to_vec()));
    }

    fn begin_path(&mut self) {
        self.ops.push(DrawOp::BeginPath);
    }

    fn close_path(&mut self) {
        self.ops.push(DrawOp::ClosePath);
    }

    fn move_to(&mut self, point: Point) {
        self.ops.push(DrawOp::MoveTo(point));
    }

    fn line_to(&mut self, point: Point) {
        self.ops.push(DrawOp::LineTo(point));
    }

    fn rect(&mut self, rect: Rect) {
        self.ops.push(DrawOp::Rect(rect));
    }

    fn ellipse(&mut self, center: Point, rx: f64, ry: f64) {
        self.ops.push(DrawOp::Ellipse { center, rx, ry });
    }

    fn stroke(&mut self) {
        self.ops.push(DrawOp::Stroke);
    }

    fn fill(&mut self) {
        self.ops.push(DrawOp::Fill);
    }

    fn fill_text(&mut self, text: &str, origin: Point, size: f64) {
        self.ops.push(DrawOp::FillText {
            text: text.to_string(),
            origin,
            size,
        });
    }

    fn present(&mut self) {
        self.ops.push(DrawOp::Present);
    }
}
