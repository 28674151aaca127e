//! Element definitions for the whiteboard document.

mod arrow;
mod diamond;
mod ellipse;
mod line;
mod rectangle;
mod text;

pub use arrow::Arrow;
pub use diamond::Diamond;
pub use ellipse::Ellipse;
pub use line::Line;
pub use rectangle::Rectangle;
pub use text::Text;

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Unique identifier for elements within a document.
pub type ElementId = String;

/// Generate a new element id: millisecond timestamp plus a base36 suffix.
///
/// The suffix is derived from a hashed atomic counter, so two elements
/// created within the same millisecond still get distinct ids.
pub fn generate_element_id() -> ElementId {
    use std::sync::atomic::{AtomicU32, Ordering};

    static SUFFIX_COUNTER: AtomicU32 = AtomicU32::new(1);

    let millis = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);

    let counter = SUFFIX_COUNTER.fetch_add(1, Ordering::Relaxed);

    // Mix the counter with constants for better distribution (splitmix32-like)
    let mut x = counter.wrapping_mul(0x9E37_79B9);
    x ^= x >> 16;
    x = x.wrapping_mul(0x85EB_CA6B);
    x ^= x >> 13;
    x = x.wrapping_mul(0xC2B2_AE35);
    x ^= x >> 16;

    format!("{}{}", millis, base36(x))
}

fn base36(mut value: u32) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    let mut out = [0u8; 7];
    let mut i = out.len();
    loop {
        i -= 1;
        out[i] = DIGITS[(value % 36) as usize];
        value /= 36;
        if value == 0 {
            break;
        }
    }
    String::from_utf8_lossy(&out[i..]).into_owned()
}

/// Serializable color (RGBA8), written as a hex string on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Parse a `#rgb`, `#rrggbb`, or `#rrggbbaa` hex string.
    ///
    /// Unparseable input falls back to black rather than failing, so one bad
    /// color in a stored document cannot reject the whole load.
    pub fn parse(color: &str) -> Self {
        if let Some(hex) = color.strip_prefix('#') {
            let hex = hex.trim();
            match hex.len() {
                3 => {
                    let r = u8::from_str_radix(&hex[0..1], 16).unwrap_or(0) * 17;
                    let g = u8::from_str_radix(&hex[1..2], 16).unwrap_or(0) * 17;
                    let b = u8::from_str_radix(&hex[2..3], 16).unwrap_or(0) * 17;
                    return Self::rgb(r, g, b);
                }
                6 => {
                    let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
                    let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
                    let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
                    return Self::rgb(r, g, b);
                }
                8 => {
                    let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
                    let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
                    let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
                    let a = u8::from_str_radix(&hex[6..8], 16).unwrap_or(255);
                    return Self::new(r, g, b, a);
                }
                _ => {}
            }
        }
        Self::BLACK
    }

    /// Hex representation; includes the alpha byte only when not opaque.
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<Color> for peniko::Color {
    fn from(color: Color) -> Self {
        peniko::Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

impl From<peniko::Color> for Color {
    fn from(color: peniko::Color) -> Self {
        let rgba = color.to_rgba8();
        Self::new(rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

impl Serialize for Color {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Color::parse(&s))
    }
}

/// Serde adapter for optional fill colors using the `"transparent"` sentinel.
pub mod transparent {
    use super::Color;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Color>, ser: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(color) => ser.serialize_str(&color.to_hex()),
            None => ser.serialize_str("transparent"),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Option<Color>, D::Error> {
        let s = Option::<String>::deserialize(de)?;
        Ok(match s.as_deref() {
            None | Some("transparent") => None,
            Some(hex) => Some(Color::parse(hex)),
        })
    }
}

/// Serde adapter for point lists stored as flattened `[x0, y0, x1, y1, ...]`.
pub(crate) mod flat_points {
    use kurbo::Point;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(points: &[Point], ser: S) -> Result<S::Ok, S::Error> {
        ser.collect_seq(points.iter().flat_map(|p| [p.x, p.y]))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<Point>, D::Error> {
        let flat = Vec::<f64>::deserialize(de)?;
        if flat.len() % 2 != 0 {
            return Err(D::Error::custom("point list must contain x,y pairs"));
        }
        Ok(flat.chunks_exact(2).map(|c| Point::new(c[0], c[1])).collect())
    }
}

/// An element missing the data its kind requires.
///
/// Rendering and hit-testing skip such elements (with a diagnostic) rather
/// than aborting the whole pass.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("malformed element {id}: {reason}")]
pub struct MalformedElement {
    pub id: ElementId,
    pub reason: &'static str,
}

/// Bounding box from an origin and possibly signed extents.
pub(crate) fn signed_box(x: f64, y: f64, width: f64, height: f64) -> Rect {
    Rect::new(
        x.min(x + width),
        y.min(y + height),
        x.max(x + width),
        y.max(y + height),
    )
}

/// Axis-aligned containment with inclusive bounds on all four edges.
pub(crate) fn box_contains(bounds: Rect, point: Point) -> bool {
    point.x >= bounds.x0 && point.x <= bounds.x1 && point.y >= bounds.y0 && point.y <= bounds.y1
}

/// One drawable element of the document.
///
/// A closed variant set: draw, hit-test, bounding box, and commit
/// normalization each match exhaustively, so adding a kind is a localized,
/// compile-checked change.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Element {
    Rectangle(Rectangle),
    Ellipse(Ellipse),
    Diamond(Diamond),
    Line(Line),
    Arrow(Arrow),
    Text(Text),
}

impl Element {
    pub fn id(&self) -> &ElementId {
        match self {
            Element::Rectangle(e) => &e.id,
            Element::Ellipse(e) => &e.id,
            Element::Diamond(e) => &e.id,
            Element::Line(e) => &e.id,
            Element::Arrow(e) => &e.id,
            Element::Text(e) => &e.id,
        }
    }

    pub fn stroke_color(&self) -> Color {
        match self {
            Element::Rectangle(e) => e.stroke_color,
            Element::Ellipse(e) => e.stroke_color,
            Element::Diamond(e) => e.stroke_color,
            Element::Line(e) => e.stroke_color,
            Element::Arrow(e) => e.stroke_color,
            Element::Text(e) => e.stroke_color,
        }
    }

    pub fn stroke_width(&self) -> f64 {
        match self {
            Element::Rectangle(e) => e.stroke_width,
            Element::Ellipse(e) => e.stroke_width,
            Element::Diamond(e) => e.stroke_width,
            Element::Line(e) => e.stroke_width,
            Element::Arrow(e) => e.stroke_width,
            Element::Text(e) => e.stroke_width,
        }
    }

    /// Fill color, if this kind carries one and it is not transparent.
    pub fn background_color(&self) -> Option<Color> {
        match self {
            Element::Rectangle(e) => e.background_color,
            Element::Ellipse(e) => e.background_color,
            Element::Diamond(e) => e.background_color,
            Element::Line(_) | Element::Arrow(_) | Element::Text(_) => None,
        }
    }

    /// Top-left (or start/baseline) origin of the element.
    pub fn origin(&self) -> Point {
        match self {
            Element::Rectangle(e) => Point::new(e.x, e.y),
            Element::Ellipse(e) => Point::new(e.x, e.y),
            Element::Diamond(e) => Point::new(e.x, e.y),
            Element::Line(e) => Point::new(e.x, e.y),
            Element::Arrow(e) => Point::new(e.x, e.y),
            Element::Text(e) => Point::new(e.x, e.y),
        }
    }

    /// Bounding box in document coordinates.
    ///
    /// For line/arrow the signed extents are normalized into a non-negative
    /// box; the stored signed form is untouched (rendering relies on it).
    pub fn bounding_box(&self) -> Rect {
        match self {
            Element::Rectangle(e) => Rect::new(e.x, e.y, e.x + e.width, e.y + e.height),
            Element::Ellipse(e) => Rect::new(e.x, e.y, e.x + e.width, e.y + e.height),
            Element::Diamond(e) => Rect::new(e.x, e.y, e.x + e.width, e.y + e.height),
            Element::Line(e) => signed_box(e.x, e.y, e.width, e.height),
            Element::Arrow(e) => signed_box(e.x, e.y, e.width, e.height),
            Element::Text(e) => Rect::new(e.x, e.y - 20.0, e.x + 100.0, e.y),
        }
    }

    /// Whether the point lies inside this element, per-kind semantics.
    pub fn contains_point(&self, point: Point) -> bool {
        match self {
            // Rectangle, diamond, line, and arrow use inclusive
            // bounding-box containment.
            Element::Rectangle(_) | Element::Diamond(_) | Element::Line(_) | Element::Arrow(_) => {
                box_contains(self.bounding_box(), point)
            }
            Element::Ellipse(e) => e.contains_point(point),
            Element::Text(e) => e.contains_point(point),
        }
    }

    /// Translate the element by a delta, moving any stored path points with
    /// the origin so the visible geometry stays coherent.
    pub fn translate(&mut self, delta: Vec2) {
        match self {
            Element::Rectangle(e) => {
                e.x += delta.x;
                e.y += delta.y;
            }
            Element::Ellipse(e) => {
                e.x += delta.x;
                e.y += delta.y;
            }
            Element::Diamond(e) => {
                e.x += delta.x;
                e.y += delta.y;
            }
            Element::Line(e) => {
                e.x += delta.x;
                e.y += delta.y;
                for p in &mut e.points {
                    p.x += delta.x;
                    p.y += delta.y;
                }
            }
            Element::Arrow(e) => {
                e.x += delta.x;
                e.y += delta.y;
            }
            Element::Text(e) => {
                e.x += delta.x;
                e.y += delta.y;
            }
        }
    }

    /// Move the element so its origin lands at the given point.
    pub fn move_origin_to(&mut self, origin: Point) {
        let delta = origin - self.origin();
        self.translate(delta);
    }

    /// Check the element carries the data its kind requires.
    pub fn validate(&self) -> Result<(), MalformedElement> {
        match self {
            Element::Line(e) if e.points.len() < 2 => Err(MalformedElement {
                id: e.id.clone(),
                reason: "line has fewer than two points",
            }),
            Element::Text(e) if e.text.is_empty() => Err(MalformedElement {
                id: e.id.clone(),
                reason: "text has no content",
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_id_unique() {
        let a = generate_element_id();
        let b = generate_element_id();
        assert_ne!(a, b);
    }

    #[test]
    fn test_color_hex_round_trip() {
        let c = Color::parse("#4a90e2");
        assert_eq!(c, Color::rgb(0x4a, 0x90, 0xe2));
        assert_eq!(c.to_hex(), "#4a90e2");

        let short = Color::parse("#f00");
        assert_eq!(short, Color::rgb(255, 0, 0));

        let alpha = Color::parse("#11223344");
        assert_eq!(alpha, Color::new(0x11, 0x22, 0x33, 0x44));
        assert_eq!(alpha.to_hex(), "#11223344");
    }

    #[test]
    fn test_color_parse_fallback() {
        assert_eq!(Color::parse("not-a-color"), Color::BLACK);
        assert_eq!(Color::parse("#12"), Color::BLACK);
    }

    #[test]
    fn test_signed_box_normalizes() {
        let b = signed_box(30.0, 40.0, -30.0, -40.0);
        assert_eq!(b, Rect::new(0.0, 0.0, 30.0, 40.0));
    }

    #[test]
    fn test_box_contains_inclusive_edges() {
        let b = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(box_contains(b, Point::new(0.0, 0.0)));
        assert!(box_contains(b, Point::new(10.0, 10.0)));
        assert!(!box_contains(b, Point::new(10.1, 10.0)));
    }

    #[test]
    fn test_translate_moves_line_points() {
        let mut el = Element::Line(Line::from_stroke(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 5.0),
        ]));
        el.translate(Vec2::new(3.0, 4.0));
        let Element::Line(line) = &el else { unreachable!() };
        assert_eq!(line.points[0], Point::new(3.0, 4.0));
        assert_eq!(line.points[1], Point::new(13.0, 9.0));
        assert!((line.x - 3.0).abs() < f64::EPSILON);
        assert!((line.y - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_validate_flags_malformed() {
        let mut line = Line::from_stroke(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]);
        assert!(Element::Line(line.clone()).validate().is_ok());
        line.points.clear();
        assert!(Element::Line(line).validate().is_err());

        let text = Text::new(Point::new(0.0, 0.0), String::new());
        assert!(Element::Text(text).validate().is_err());
    }

    #[test]
    fn test_wire_format_tagging() {
        let rect = Rectangle::new(Point::new(10.0, 20.0), 30.0, 40.0);
        let json = serde_json::to_value(Element::Rectangle(rect)).unwrap();
        assert_eq!(json["type"], "rectangle");
        assert_eq!(json["x"], 10.0);
        assert_eq!(json["strokeColor"], "#000000");
        assert_eq!(json["backgroundColor"], "transparent");
    }

    #[test]
    fn test_wire_format_flat_points() {
        let line = Line::from_stroke(vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)]);
        let json = serde_json::to_value(Element::Line(line)).unwrap();
        assert_eq!(json["points"], serde_json::json!([1.0, 2.0, 3.0, 4.0]));

        let back: Element = serde_json::from_value(json).unwrap();
        let Element::Line(line) = back else {
            panic!("expected a line")
        };
        assert_eq!(line.points.len(), 2);
        assert_eq!(line.points[1], Point::new(3.0, 4.0));
    }
}
