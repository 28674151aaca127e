//! Drawing-surface abstraction.

use kurbo::{Point, Rect, Size};
use peniko::Color;

/// The drawing surface consumed by the rendering pipeline.
///
/// Implementations can target a GPU scene graph, a raster canvas, or the
/// recording surface used by tests. The contract mirrors an immediate-mode
/// 2D canvas: style setters apply to subsequent path operations, and
/// [`Surface::present`] commits the finished frame.
pub trait Surface {
    /// Clear the surface to the given viewport size, dropping the previous
    /// frame's content.
    fn clear(&mut self, size: Size);

    fn set_stroke_color(&mut self, color: Color);

    fn set_fill_color(&mut self, color: Color);

    fn set_line_width(&mut self, width: f64);

    /// Set the dash pattern for strokes; an empty slice resets to solid.
    fn set_dash_pattern(&mut self, pattern: &[f64]);

    fn begin_path(&mut self);

    fn close_path(&mut self);

    fn move_to(&mut self, point: Point);

    fn line_to(&mut self, point: Point);

    /// Add an axis-aligned rectangle to the current path.
    fn rect(&mut self, rect: Rect);

    /// Add a full ellipse to the current path.
    fn ellipse(&mut self, center: Point, rx: f64, ry: f64);

    /// Stroke the current path with the current stroke style.
    fn stroke(&mut self);

    /// Fill the current path with the current fill color.
    fn fill(&mut self);

    /// Draw text at the given baseline origin in the current fill color.
    fn fill_text(&mut self, text: &str, origin: Point, size: f64);

    /// Present the drawn frame.
    fn present(&mut self);
}
