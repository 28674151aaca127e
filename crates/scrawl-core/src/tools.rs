//! Tool and gesture state for the whiteboard.

use crate::elements::ElementId;
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Available tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    Select,
    #[default]
    Pen,
    Rectangle,
    Ellipse,
    Diamond,
    Line,
    Arrow,
    Text,
    Eraser,
}

impl Tool {
    /// Tools that drag out a two-point shape with a live preview.
    pub fn is_shape_tool(self) -> bool {
        matches!(
            self,
            Tool::Rectangle | Tool::Ellipse | Tool::Diamond | Tool::Line | Tool::Arrow
        )
    }
}

/// State of the gesture in progress.
///
/// Each pointer press enters one of the active variants; release either
/// commits a mutation or discards the gesture, returning to `Idle`.
/// Switching tools mid-gesture resets to `Idle` so no stale drag state can
/// leak into the next tool's hit-tests.
#[derive(Debug, Clone, Default)]
pub enum Gesture {
    #[default]
    Idle,
    /// A shape-tool drag from `start` to the current pointer position.
    DrawingShape {
        tool: Tool,
        start: Point,
        current: Point,
    },
    /// A pen stroke accumulating points.
    Stroking { points: Vec<Point> },
    /// Select-tool drag, keeping the press offset from the element origin.
    DraggingSelection { id: ElementId, offset: Vec2 },
    /// Text tool waiting for the entry surface to confirm or cancel.
    AwaitingText { origin: Point },
}

impl Gesture {
    pub fn is_active(&self) -> bool {
        !matches!(self, Gesture::Idle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_tools() {
        assert!(Tool::Rectangle.is_shape_tool());
        assert!(Tool::Arrow.is_shape_tool());
        assert!(!Tool::Pen.is_shape_tool());
        assert!(!Tool::Select.is_shape_tool());
        assert!(!Tool::Eraser.is_shape_tool());
    }

    #[test]
    fn test_gesture_activity() {
        assert!(!Gesture::Idle.is_active());
        assert!(
            Gesture::Stroking {
                points: vec![Point::ZERO]
            }
            .is_active()
        );
    }

    #[test]
    fn test_tool_wire_names() {
        assert_eq!(serde_json::to_value(Tool::Rectangle).unwrap(), "rectangle");
        assert_eq!(serde_json::to_value(Tool::Eraser).unwrap(), "eraser");
    }
}
