//! Rendering pipeline: full redraw and incremental gesture preview.

use crate::surface::Surface;
use kurbo::{Point, Rect, Size};
use log::warn;
use peniko::Color;
use scrawl_core::document::ElementStore;
use scrawl_core::elements::{Element, ElementId};

/// Dash pattern for the selection highlight.
const SELECTION_DASH: [f64; 2] = [5.0, 5.0];

/// Stroke width for the selection highlight.
const SELECTION_STROKE_WIDTH: f64 = 2.0;

/// Draws the document onto a [`Surface`].
///
/// Selection is a rendering overlay, not a stored property: the selected
/// element is drawn with a fixed dashed highlight stroke instead of its own
/// style. A malformed element is skipped with a diagnostic so one corrupt
/// entry cannot blank the canvas.
pub struct Pipeline {
    /// Viewport size the surface is cleared to.
    pub viewport: Size,
    /// Highlight stroke for the selected element.
    pub highlight_color: Color,
}

impl Pipeline {
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport,
            highlight_color: Color::from_rgba8(0x4a, 0x90, 0xe2, 255),
        }
    }

    /// Clear the surface and draw every element in document order, with the
    /// selected element highlighted.
    pub fn full_redraw(
        &self,
        surface: &mut dyn Surface,
        store: &ElementStore,
        selected: Option<&ElementId>,
    ) {
        surface.clear(self.viewport);
        for element in store.iter() {
            let is_selected = selected == Some(element.id());
            self.draw_element(surface, element, is_selected);
        }
        surface.present();
    }

    /// Redraw the committed elements plus one uncommitted gesture shape.
    ///
    /// The preview element comes from the in-progress gesture and is never
    /// part of the store; this is how live feedback is shown on every
    /// pointer move without committing a speculative element to history.
    pub fn incremental_preview(
        &self,
        surface: &mut dyn Surface,
        store: &ElementStore,
        preview: &Element,
    ) {
        surface.clear(self.viewport);
        for element in store.iter() {
            self.draw_element(surface, element, false);
        }
        self.draw_element(surface, preview, false);
        surface.present();
    }

    fn draw_element(&self, surface: &mut dyn Surface, element: &Element, selected: bool) {
        if let Err(err) = element.validate() {
            warn!("skipping element during redraw: {err}");
            return;
        }

        if selected {
            surface.set_stroke_color(self.highlight_color);
            surface.set_line_width(SELECTION_STROKE_WIDTH);
            surface.set_dash_pattern(&SELECTION_DASH);
        } else {
            surface.set_stroke_color(element.stroke_color().into());
            surface.set_line_width(element.stroke_width());
            surface.set_dash_pattern(&[]);
        }

        match element {
            Element::Rectangle(e) => {
                surface.begin_path();
                surface.rect(Rect::new(e.x, e.y, e.x + e.width, e.y + e.height));
                surface.stroke();
                if let Some(bg) = e.background_color {
                    surface.set_fill_color(bg.into());
                    surface.fill();
                }
            }
            Element::Ellipse(e) => {
                let (rx, ry) = e.radii();
                surface.begin_path();
                surface.ellipse(e.center(), rx, ry);
                surface.stroke();
                if let Some(bg) = e.background_color {
                    surface.set_fill_color(bg.into());
                    surface.fill();
                }
            }
            Element::Diamond(e) => {
                let [top, right, bottom, left] = e.vertices();
                surface.begin_path();
                surface.move_to(top);
                surface.line_to(right);
                surface.line_to(bottom);
                surface.line_to(left);
                surface.close_path();
                surface.stroke();
                if let Some(bg) = e.background_color {
                    surface.set_fill_color(bg.into());
                    surface.fill();
                }
            }
            Element::Line(e) => {
                // validate() guarantees at least two points here.
                surface.begin_path();
                surface.move_to(e.points[0]);
                for point in &e.points[1..] {
                    surface.line_to(*point);
                }
                surface.stroke();
            }
            Element::Arrow(e) => {
                surface.begin_path();
                surface.move_to(e.start());
                surface.line_to(e.end());
                surface.stroke();

                let [left, right] = e.head_points();
                surface.begin_path();
                surface.move_to(e.end());
                surface.line_to(left);
                surface.move_to(e.end());
                surface.line_to(right);
                surface.stroke();
            }
            Element::Text(e) => {
                surface.set_fill_color(e.stroke_color.into());
                surface.fill_text(&e.text, Point::new(e.x, e.y), e.font_size);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recording::{DrawOp, RecordingSurface};
    use scrawl_core::elements::{Arrow, Color as CoreColor, Line, Rectangle, Text};

    fn pipeline() -> Pipeline {
        Pipeline::new(Size::new(800.0, 600.0))
    }

    fn rect_element(x: f64, y: f64) -> Element {
        Element::Rectangle(Rectangle::new(Point::new(x, y), 50.0, 40.0))
    }

    #[test]
    fn test_full_redraw_clears_then_presents() {
        let mut surface = RecordingSurface::new();
        let mut store = ElementStore::new();
        store.append(rect_element(0.0, 0.0));

        pipeline().full_redraw(&mut surface, &store, None);

        assert_eq!(surface.ops.first(), Some(&DrawOp::Clear(Size::new(800.0, 600.0))));
        assert_eq!(surface.ops.last(), Some(&DrawOp::Present));
    }

    #[test]
    fn test_full_redraw_draws_in_document_order() {
        let mut surface = RecordingSurface::new();
        let mut store = ElementStore::new();
        store.append(rect_element(0.0, 0.0));
        store.append(rect_element(100.0, 0.0));

        pipeline().full_redraw(&mut surface, &store, None);

        let rects: Vec<_> = surface
            .ops
            .iter()
            .filter_map(|op| match op {
                DrawOp::Rect(r) => Some(*r),
                _ => None,
            })
            .collect();
        assert_eq!(rects.len(), 2);
        assert!(rects[0].x0 < rects[1].x0);
    }

    #[test]
    fn test_selected_element_gets_dashed_highlight() {
        let mut surface = RecordingSurface::new();
        let mut store = ElementStore::new();
        let element = rect_element(0.0, 0.0);
        let id = element.id().clone();
        store.append(element);

        pipeline().full_redraw(&mut surface, &store, Some(&id));

        assert!(
            surface
                .ops
                .contains(&DrawOp::DashPattern(vec![5.0, 5.0]))
        );
        assert!(
            surface
                .ops
                .contains(&DrawOp::StrokeColor(Color::from_rgba8(0x4a, 0x90, 0xe2, 255)))
        );
        // The element's own stroke color is not used while selected.
        assert!(
            !surface
                .ops
                .contains(&DrawOp::StrokeColor(CoreColor::BLACK.into()))
        );
    }

    #[test]
    fn test_unselected_elements_reset_dash() {
        let mut surface = RecordingSurface::new();
        let mut store = ElementStore::new();
        store.append(rect_element(0.0, 0.0));

        pipeline().full_redraw(&mut surface, &store, None);
        assert!(surface.ops.contains(&DrawOp::DashPattern(Vec::new())));
    }

    #[test]
    fn test_filled_shape_strokes_and_fills() {
        let mut surface = RecordingSurface::new();
        let mut store = ElementStore::new();
        let mut rect = Rectangle::new(Point::new(0.0, 0.0), 10.0, 10.0);
        rect.background_color = Some(CoreColor::rgb(255, 0, 0));
        store.append(Element::Rectangle(rect));

        pipeline().full_redraw(&mut surface, &store, None);
        assert_eq!(surface.count(|op| matches!(op, DrawOp::Stroke)), 1);
        assert_eq!(surface.count(|op| matches!(op, DrawOp::Fill)), 1);
    }

    #[test]
    fn test_transparent_shape_only_strokes() {
        let mut surface = RecordingSurface::new();
        let mut store = ElementStore::new();
        store.append(rect_element(0.0, 0.0));

        pipeline().full_redraw(&mut surface, &store, None);
        assert_eq!(surface.count(|op| matches!(op, DrawOp::Fill)), 0);
    }

    #[test]
    fn test_arrow_draws_shaft_and_chevron() {
        let mut surface = RecordingSurface::new();
        let mut store = ElementStore::new();
        store.append(Element::Arrow(Arrow::from_drag(
            Point::new(0.0, 0.0),
            Point::new(100.0, 0.0),
        )));

        pipeline().full_redraw(&mut surface, &store, None);

        // Shaft line plus two chevron segments.
        assert_eq!(surface.count(|op| matches!(op, DrawOp::LineTo(_))), 3);
        // The chevron starts from the tip twice.
        let tip_moves = surface.count(|op| matches!(op, DrawOp::MoveTo(p) if *p == Point::new(100.0, 0.0)));
        assert_eq!(tip_moves, 2);
    }

    #[test]
    fn test_corrupt_element_is_skipped_not_fatal() {
        let mut surface = RecordingSurface::new();
        let mut store = ElementStore::new();
        let mut broken = Line::from_stroke(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
        broken.points.clear();
        store.append(Element::Line(broken));
        store.append(rect_element(10.0, 10.0));

        pipeline().full_redraw(&mut surface, &store, None);

        // The broken line contributed nothing, but the rectangle drew.
        assert_eq!(surface.count(|op| matches!(op, DrawOp::Rect(_))), 1);
        assert_eq!(surface.ops.last(), Some(&DrawOp::Present));
    }

    #[test]
    fn test_empty_text_is_skipped() {
        let mut surface = RecordingSurface::new();
        let mut store = ElementStore::new();
        store.append(Element::Text(Text::new(Point::new(0.0, 0.0), String::new())));

        pipeline().full_redraw(&mut surface, &store, None);
        assert_eq!(surface.count(|op| matches!(op, DrawOp::FillText { .. })), 0);
    }

    #[test]
    fn test_incremental_preview_overlays_gesture_shape() {
        let mut surface = RecordingSurface::new();
        let mut store = ElementStore::new();
        store.append(rect_element(0.0, 0.0));

        let preview = rect_element(200.0, 200.0);
        pipeline().incremental_preview(&mut surface, &store, &preview);

        // Committed element plus the preview, nothing persisted.
        assert_eq!(surface.count(|op| matches!(op, DrawOp::Rect(_))), 2);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_text_rendered_in_stroke_color_at_font_size() {
        let mut surface = RecordingSurface::new();
        let mut store = ElementStore::new();
        let mut text = Text::new(Point::new(5.0, 30.0), "hi".to_string());
        text.stroke_color = CoreColor::rgb(0, 128, 0);
        text.font_size = 24.0;
        store.append(Element::Text(text));

        pipeline().full_redraw(&mut surface, &store, None);

        assert!(surface.ops.contains(&DrawOp::FillColor(Color::from_rgba8(0, 128, 0, 255))));
        assert!(surface.ops.contains(&DrawOp::FillText {
            text: "hi".to_string(),
            origin: Point::new(5.0, 30.0),
            size: 24.0,
        }));
    }
}
