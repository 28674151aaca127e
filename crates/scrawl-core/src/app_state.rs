//! Application state: current style defaults and viewport fields.

use crate::elements::{Color, transparent};
use serde::{Deserialize, Serialize};

/// Fill pattern style for shapes.
///
/// Carried through persistence for compatibility; only solid fills affect
/// rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FillStyle {
    #[default]
    Hachure,
    CrossHatch,
    Solid,
}

/// Stroke style for lines and arrows. Carried but inert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
}

/// Viewport zoom factor. Inert: no documented interaction exercises it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zoom {
    pub value: f64,
}

impl Default for Zoom {
    fn default() -> Self {
        Self { value: 1.0 }
    }
}

/// Current style defaults plus viewport fields.
///
/// Of these, only the stroke color/width, fill color, and font size affect
/// what new elements look like; the rest are carried for wire compatibility.
/// The active tool and selection are session state and are never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppState {
    pub view_background_color: Color,
    pub current_item_stroke_color: Color,
    #[serde(with = "transparent")]
    pub current_item_background_color: Option<Color>,
    pub current_item_fill_style: FillStyle,
    pub current_item_stroke_width: f64,
    pub current_item_roughness: f64,
    pub current_item_opacity: f64,
    pub current_item_font_size: f64,
    pub current_item_stroke_style: StrokeStyle,
    pub grid_size: Option<f64>,
    pub zoom: Zoom,
    pub scroll_x: f64,
    pub scroll_y: f64,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            view_background_color: Color::WHITE,
            current_item_stroke_color: Color::BLACK,
            current_item_background_color: None,
            current_item_fill_style: FillStyle::default(),
            current_item_stroke_width: 2.0,
            current_item_roughness: 1.0,
            current_item_opacity: 100.0,
            current_item_font_size: 20.0,
            current_item_stroke_style: StrokeStyle::default(),
            grid_size: None,
            zoom: Zoom::default(),
            scroll_x: 0.0,
            scroll_y: 0.0,
        }
    }
}

impl AppState {
    /// Toggle the current fill between transparent and the stroke color.
    pub fn toggle_fill(&mut self) {
        self.current_item_background_color = match self.current_item_background_color {
            Some(_) => None,
            None => Some(self.current_item_stroke_color),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let state = AppState::default();
        assert_eq!(state.current_item_stroke_color, Color::BLACK);
        assert!(state.current_item_background_color.is_none());
        assert!((state.current_item_stroke_width - 2.0).abs() < f64::EPSILON);
        assert!((state.zoom.value - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_toggle_fill() {
        let mut state = AppState::default();
        state.toggle_fill();
        assert_eq!(state.current_item_background_color, Some(Color::BLACK));
        state.toggle_fill();
        assert!(state.current_item_background_color.is_none());
    }

    #[test]
    fn test_wire_names() {
        let json = serde_json::to_value(AppState::default()).unwrap();
        assert_eq!(json["currentItemStrokeColor"], "#000000");
        assert_eq!(json["currentItemBackgroundColor"], "transparent");
        assert_eq!(json["currentItemFillStyle"], "hachure");
        assert_eq!(json["zoom"]["value"], 1.0);
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let state: AppState = serde_json::from_str("{}").unwrap();
        assert_eq!(state.view_background_color, Color::WHITE);
    }
}
