//! The editor: interprets pointer gestures according to the active tool and
//! applies the resulting document mutations.

use crate::document::Document;
use crate::elements::{Arrow, Diamond, Element, ElementId, Ellipse, Line, Rectangle, Text};
use crate::history::History;
use crate::tools::{Gesture, Tool};
use kurbo::Point;

/// Editing state over one document: tool, gesture, selection, and history.
///
/// Pointer handlers return whether the caller should redraw. Committed
/// mutations (creation, move, delete, clear) each push exactly one history
/// snapshot and bump the revision counter; preview frames during a drag do
/// neither.
#[derive(Debug)]
pub struct Editor {
    pub document: Document,
    history: History,
    tool: Tool,
    gesture: Gesture,
    selected_id: Option<ElementId>,
    revision: u64,
}

impl Editor {
    /// Create an editor over an empty document.
    pub fn new() -> Self {
        Self::with_document(Document::new())
    }

    /// Create an editor over an existing document.
    pub fn with_document(document: Document) -> Self {
        let history = History::new(document.store.snapshot());
        Self {
            document,
            history,
            tool: Tool::default(),
            gesture: Gesture::Idle,
            selected_id: None,
            revision: 0,
        }
    }

    /// Replace the document (e.g. after a load), resetting history,
    /// selection, and any gesture in progress.
    pub fn replace_document(&mut self, document: Document) {
        self.document = document;
        self.history.reset(self.document.store.snapshot());
        self.selected_id = None;
        self.gesture = Gesture::Idle;
    }

    pub fn tool(&self) -> Tool {
        self.tool
    }

    /// Switch tools. Any active gesture is discarded and the selection is
    /// cleared, so a stale drag can never hit-test against the new tool.
    pub fn set_tool(&mut self, tool: Tool) {
        self.tool = tool;
        self.gesture = Gesture::Idle;
        self.selected_id = None;
    }

    pub fn selected_id(&self) -> Option<&ElementId> {
        self.selected_id.as_ref()
    }

    /// Counter of committed mutations; hosts watch it to schedule autosaves.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_gesture_active(&self) -> bool {
        self.gesture.is_active()
    }

    /// Where the text tool is waiting for input, if it is.
    pub fn pending_text_origin(&self) -> Option<Point> {
        match self.gesture {
            Gesture::AwaitingText { origin } => Some(origin),
            _ => None,
        }
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    /// Handle a pointer press. Returns whether a redraw is needed.
    pub fn pointer_down(&mut self, point: Point) -> bool {
        match self.tool {
            Tool::Text => {
                self.gesture = Gesture::AwaitingText { origin: point };
                false
            }
            Tool::Select => {
                let hit = self
                    .document
                    .store
                    .find_topmost_at(point)
                    .map(|e| (e.id().clone(), e.origin()));
                match hit {
                    Some((id, origin)) => {
                        self.selected_id = Some(id.clone());
                        self.gesture = Gesture::DraggingSelection {
                            id,
                            offset: point - origin,
                        };
                    }
                    None => {
                        self.selected_id = None;
                        self.gesture = Gesture::Idle;
                    }
                }
                true
            }
            Tool::Eraser => self.erase_at(point),
            Tool::Pen => {
                self.gesture = Gesture::Stroking {
                    points: vec![point],
                };
                false
            }
            tool => {
                debug_assert!(tool.is_shape_tool());
                self.gesture = Gesture::DrawingShape {
                    tool,
                    start: point,
                    current: point,
                };
                false
            }
        }
    }

    /// Handle a pointer move. Updates the gesture and reports whether a
    /// redraw (full or preview) is needed; nothing is committed here.
    pub fn pointer_move(&mut self, point: Point) -> bool {
        match &mut self.gesture {
            Gesture::DrawingShape { current, .. } => {
                *current = point;
                true
            }
            Gesture::Stroking { points } => {
                points.push(point);
                true
            }
            Gesture::DraggingSelection { id, offset } => {
                let target = point - *offset;
                let id = id.clone();
                self.document
                    .store
                    .update_by_id(&id, |e| e.move_origin_to(target));
                true
            }
            Gesture::Idle | Gesture::AwaitingText { .. } => false,
        }
    }

    /// Handle a pointer release: commit or discard the gesture.
    pub fn pointer_up(&mut self, point: Point) -> bool {
        match std::mem::take(&mut self.gesture) {
            Gesture::DrawingShape { tool, start, .. } => {
                if let Some(element) = self.build_shape(tool, start, point) {
                    self.document.store.append(element);
                    self.commit();
                }
                true
            }
            Gesture::Stroking { points } => {
                // A tap (fewer than two points) produces no element.
                if points.len() >= 2 {
                    let element = self.styled_stroke(points);
                    self.document.store.append(element);
                    self.commit();
                    true
                } else {
                    false
                }
            }
            Gesture::DraggingSelection { .. } => {
                // One snapshot for the whole drag, not one per move.
                self.commit();
                true
            }
            Gesture::AwaitingText { origin } => {
                // The text gesture completes via commit_text/cancel_text,
                // not pointer release.
                self.gesture = Gesture::AwaitingText { origin };
                false
            }
            Gesture::Idle => false,
        }
    }

    /// Confirm text entry. Empty (after trimming) input discards the
    /// gesture with no mutation. Returns whether an element was committed.
    pub fn commit_text(&mut self, input: &str) -> bool {
        let Gesture::AwaitingText { origin } = self.gesture else {
            return false;
        };
        self.gesture = Gesture::Idle;

        let trimmed = input.trim();
        if trimmed.is_empty() {
            return false;
        }

        let app = &self.document.app_state;
        let mut text = Text::new(origin, trimmed.to_string());
        text.stroke_color = app.current_item_stroke_color;
        text.font_size = app.current_item_font_size;
        text.stroke_width = app.current_item_stroke_width;
        self.document.store.append(Element::Text(text));
        self.commit();
        true
    }

    /// Cancel a pending text entry with no mutation.
    pub fn cancel_text(&mut self) {
        if matches!(self.gesture, Gesture::AwaitingText { .. }) {
            self.gesture = Gesture::Idle;
        }
    }

    /// Undo to the previous snapshot. Clears the selection.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(snapshot) => {
                self.document.store.replace_all(snapshot);
                self.selected_id = None;
                true
            }
            None => false,
        }
    }

    /// Redo to the next snapshot. Clears the selection.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(snapshot) => {
                self.document.store.replace_all(snapshot);
                self.selected_id = None;
                true
            }
            None => false,
        }
    }

    /// Remove every element from the canvas.
    pub fn clear_canvas(&mut self) {
        self.document.store.clear();
        self.selected_id = None;
        self.commit();
    }

    /// Delete the selected element, if any.
    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.selected_id.take() else {
            return false;
        };
        if self.document.store.remove_by_id(&id).is_some() {
            self.commit();
            true
        } else {
            false
        }
    }

    /// The uncommitted shape for the gesture in progress, for incremental
    /// preview rendering. Never touches the store or history.
    pub fn preview(&self) -> Option<Element> {
        match &self.gesture {
            Gesture::DrawingShape {
                tool,
                start,
                current,
            } => self.build_shape(*tool, *start, *current),
            Gesture::Stroking { points } if points.len() >= 2 => {
                Some(self.styled_stroke(points.clone()))
            }
            _ => None,
        }
    }

    fn erase_at(&mut self, point: Point) -> bool {
        let Some(id) = self
            .document
            .store
            .find_topmost_at(point)
            .map(|e| e.id().clone())
        else {
            return false;
        };
        self.document.store.remove_by_id(&id);
        if self.selected_id.as_ref() == Some(&id) {
            self.selected_id = None;
        }
        self.commit();
        true
    }

    fn commit(&mut self) {
        self.history.push(self.document.store.snapshot());
        self.revision += 1;
    }

    /// Build a shape element from a drag, normalized per kind and styled
    /// from the current defaults.
    fn build_shape(&self, tool: Tool, start: Point, end: Point) -> Option<Element> {
        let app = &self.document.app_state;
        let element = match tool {
            Tool::Rectangle => {
                let mut e = Rectangle::from_corners(start, end);
                e.stroke_color = app.current_item_stroke_color;
                e.stroke_width = app.current_item_stroke_width;
                e.background_color = app.current_item_background_color;
                Element::Rectangle(e)
            }
            Tool::Ellipse => {
                let mut e = Ellipse::from_corners(start, end);
                e.stroke_color = app.current_item_stroke_color;
                e.stroke_width = app.current_item_stroke_width;
                e.background_color = app.current_item_background_color;
                Element::Ellipse(e)
            }
            Tool::Diamond => {
                let mut e = Diamond::from_corners(start, end);
                e.stroke_color = app.current_item_stroke_color;
                e.stroke_width = app.current_item_stroke_width;
                e.background_color = app.current_item_background_color;
                Element::Diamond(e)
            }
            Tool::Line => {
                let mut e = Line::from_drag(start, end);
                e.stroke_color = app.current_item_stroke_color;
                e.stroke_width = app.current_item_stroke_width;
                Element::Line(e)
            }
            Tool::Arrow => {
                let mut e = Arrow::from_drag(start, end);
                e.stroke_color = app.current_item_stroke_color;
                e.stroke_width = app.current_item_stroke_width;
                Element::Arrow(e)
            }
            _ => return None,
        };
        Some(element)
    }

    fn styled_stroke(&self, points: Vec<Point>) -> Element {
        let app = &self.document.app_state;
        let mut line = Line::from_stroke(points);
        line.stroke_color = app.current_item_stroke_color;
        line.stroke_width = app.current_item_stroke_width;
        Element::Line(line)
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}
