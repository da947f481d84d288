//! Canvas elements - the units a user places on the page.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EditorError, EditorResult};

/// Unique identifier for an element.
///
/// Generated once at creation and never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Create a new unique element ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse an ID from its string form.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::InvalidElementId`] if the string is not a UUID.
    pub fn parse(s: &str) -> EditorResult<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| EditorError::InvalidElementId(s.to_string()))
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ElementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The closed set of element kinds offered by the palette.
///
/// A kind is fixed at creation; elements are never retyped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementKind {
    /// Paragraph text, editable in place.
    Text,
    /// Heading text.
    Heading,
    /// Image placeholder.
    Image,
    /// Call-to-action button.
    Button,
    /// Container block.
    Section,
    /// Filled decorative shape.
    Shape,
    /// Horizontal rule.
    Divider,
    /// Invisible vertical space.
    Spacer,
}

impl ElementKind {
    /// Every kind, in palette order.
    pub const ALL: [Self; 8] = [
        Self::Text,
        Self::Heading,
        Self::Button,
        Self::Image,
        Self::Section,
        Self::Divider,
        Self::Spacer,
        Self::Shape,
    ];

    /// Lowercase wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Heading => "heading",
            Self::Image => "image",
            Self::Button => "button",
            Self::Section => "section",
            Self::Shape => "shape",
            Self::Divider => "divider",
            Self::Spacer => "spacer",
        }
    }

    /// Whether `content` is shown as text for this kind.
    #[must_use]
    pub const fn has_text(self) -> bool {
        !matches!(self, Self::Shape | Self::Divider | Self::Spacer)
    }

    /// Whether the kind carries typographic styling (font size, text color).
    #[must_use]
    pub const fn is_text_bearing(self) -> bool {
        matches!(self, Self::Text | Self::Heading | Self::Button)
    }

    /// Whether double-click switches the element into in-place editing.
    #[must_use]
    pub const fn is_editable_in_place(self) -> bool {
        matches!(self, Self::Text)
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementKind {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| EditorError::UnknownKind(s.to_string()))
    }
}

/// A point in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f32,
    /// Vertical coordinate.
    pub y: f32,
}

impl Point {
    /// Create a point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - other`.
    #[must_use]
    pub fn delta_from(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    /// Whether both coordinates are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// Position and size in canvas-local pixels, top-left origin.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    /// X position (pixels from the canvas's left edge).
    pub x: f32,
    /// Y position (pixels from the canvas's top edge).
    pub y: f32,
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
}

impl Geometry {
    /// Create a geometry.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Top-left corner.
    #[must_use]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Right edge (`x + width`).
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge (`y + height`).
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Check if a point (in canvas coordinates) is within this box.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Return a copy moved by `(dx, dy)`.
    #[must_use]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }
}

/// Sparse visual attributes. Absent keys fall back to the kind's defaults
/// when rendered (see [`crate::defaults`]).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    /// CSS font size, e.g. `1rem`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<String>,
    /// CSS text color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// CSS background color.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background_color: Option<String>,
    /// CSS border radius.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<String>,
    /// CSS font weight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<String>,
    /// CSS text alignment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_align: Option<String>,
    /// CSS padding.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<String>,
    /// CSS margin.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub margin: Option<String>,
}

impl Style {
    /// Overlay every key present in `patch` onto this style.
    pub fn merge(&mut self, patch: &Self) {
        fn overlay(slot: &mut Option<String>, value: Option<&String>) {
            if let Some(value) = value {
                *slot = Some(value.clone());
            }
        }

        overlay(&mut self.font_size, patch.font_size.as_ref());
        overlay(&mut self.color, patch.color.as_ref());
        overlay(&mut self.background_color, patch.background_color.as_ref());
        overlay(&mut self.border_radius, patch.border_radius.as_ref());
        overlay(&mut self.font_weight, patch.font_weight.as_ref());
        overlay(&mut self.text_align, patch.text_align.as_ref());
        overlay(&mut self.padding, patch.padding.as_ref());
        overlay(&mut self.margin, patch.margin.as_ref());
    }

    /// Whether no key is set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A placed element: kind, text content, geometry and sparse style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Unique identifier.
    pub id: ElementId,
    /// Element kind. Immutable after creation.
    pub kind: ElementKind,
    /// Label or caption; ignored by kinds without text.
    pub content: String,
    /// Position and size.
    #[serde(flatten)]
    pub geometry: Geometry,
    /// Sparse visual attributes.
    #[serde(default)]
    pub style: Style,
}

impl Element {
    /// Create an element with a fresh ID and explicit fields.
    #[must_use]
    pub fn new(kind: ElementKind, content: impl Into<String>, geometry: Geometry) -> Self {
        Self {
            id: ElementId::new(),
            kind,
            content: content.into(),
            geometry,
            style: Style::default(),
        }
    }

    /// Set the style.
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Copy of this element under a fresh ID, shifted by `offset` on both axes.
    #[must_use]
    pub fn duplicate(&self, offset: f32) -> Self {
        Self {
            id: ElementId::new(),
            kind: self.kind,
            content: self.content.clone(),
            geometry: self.geometry.offset(offset, offset),
            style: self.style.clone(),
        }
    }

    /// Apply a partial update. The kind is never touched.
    ///
    /// Non-finite numbers are ignored and negative ones saturate to zero, so
    /// geometry stays finite and non-negative.
    pub fn apply(&mut self, patch: &ElementPatch) {
        fn sanitize(slot: &mut f32, value: Option<f32>) {
            if let Some(value) = value.filter(|v| v.is_finite()) {
                *slot = value.max(0.0);
            }
        }

        if let Some(content) = &patch.content {
            self.content.clone_from(content);
        }
        sanitize(&mut self.geometry.x, patch.x);
        sanitize(&mut self.geometry.y, patch.y);
        sanitize(&mut self.geometry.width, patch.width);
        sanitize(&mut self.geometry.height, patch.height);
        if let Some(style) = &patch.style {
            self.style.merge(style);
        }
    }
}

/// Partial update for an element. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ElementPatch {
    /// New content.
    #[serde(default)]
    pub content: Option<String>,
    /// New x position.
    #[serde(default)]
    pub x: Option<f32>,
    /// New y position.
    #[serde(default)]
    pub y: Option<f32>,
    /// New width.
    #[serde(default)]
    pub width: Option<f32>,
    /// New height.
    #[serde(default)]
    pub height: Option<f32>,
    /// Style keys to overlay.
    #[serde(default)]
    pub style: Option<Style>,
}

impl ElementPatch {
    /// Patch that replaces the content.
    #[must_use]
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// Patch that replaces the full geometry.
    #[must_use]
    pub fn geometry(geometry: Geometry) -> Self {
        Self {
            x: Some(geometry.x),
            y: Some(geometry.y),
            width: Some(geometry.width),
            height: Some(geometry.height),
            ..Self::default()
        }
    }

    /// Patch that overlays style keys.
    #[must_use]
    pub fn style(style: Style) -> Self {
        Self {
            style: Some(style),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Element {
        Element::new(ElementKind::Button, "Click Me", Geometry::new(10.0, 20.0, 120.0, 40.0))
    }

    #[test]
    fn test_element_id_parse_roundtrip() {
        let id = ElementId::new();
        let parsed = ElementId::parse(&id.to_string()).expect("should parse");
        assert_eq!(id, parsed);
        assert!(ElementId::parse("not-a-uuid").is_err());
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("heading".parse::<ElementKind>().ok(), Some(ElementKind::Heading));
        assert!(matches!(
            "circle".parse::<ElementKind>(),
            Err(EditorError::UnknownKind(name)) if name == "circle"
        ));
    }

    #[test]
    fn test_kind_text_flags() {
        assert!(ElementKind::Button.has_text());
        assert!(!ElementKind::Spacer.has_text());
        assert!(ElementKind::Heading.is_text_bearing());
        assert!(!ElementKind::Section.is_text_bearing());
        assert!(ElementKind::Text.is_editable_in_place());
        assert!(!ElementKind::Heading.is_editable_in_place());
    }

    #[test]
    fn test_duplicate_copies_fields_under_new_id() {
        let mut original = sample();
        original.style.color = Some("#ffffff".to_string());
        let copy = original.duplicate(20.0);

        assert_ne!(copy.id, original.id);
        assert_eq!(copy.kind, original.kind);
        assert_eq!(copy.content, original.content);
        assert_eq!(copy.style, original.style);
        assert_eq!(copy.geometry, Geometry::new(30.0, 40.0, 120.0, 40.0));
    }

    #[test]
    fn test_apply_patch_saturates_and_ignores_non_finite() {
        let mut element = sample();
        element.apply(&ElementPatch {
            x: Some(-15.0),
            y: Some(f32::NAN),
            width: Some(10.0),
            ..ElementPatch::default()
        });

        assert!((element.geometry.x - 0.0).abs() < f32::EPSILON);
        assert!((element.geometry.y - 20.0).abs() < f32::EPSILON);
        // Direct entry does not enforce the resize floor.
        assert!((element.geometry.width - 10.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_style_merge_only_overlays_present_keys() {
        let mut style = Style {
            font_size: Some("1rem".to_string()),
            color: Some("#000000".to_string()),
            ..Style::default()
        };
        style.merge(&Style {
            color: Some("#ff0000".to_string()),
            ..Style::default()
        });

        assert_eq!(style.font_size.as_deref(), Some("1rem"));
        assert_eq!(style.color.as_deref(), Some("#ff0000"));
    }

    #[test]
    fn test_element_json_uses_flat_geometry_and_camel_case_style() {
        let mut element = sample();
        element.style.background_color = Some("#3b82f6".to_string());
        let json = serde_json::to_value(&element).expect("should serialize");

        assert_eq!(json["kind"], "button");
        assert_eq!(json["width"], 120.0);
        assert_eq!(json["style"]["backgroundColor"], "#3b82f6");
        assert!(json["style"].get("fontSize").is_none());
    }
}
