//! JSON documents exchanged with the host page: templates coming in and
//! the scene feed going out.

use serde::{Deserialize, Serialize};

use crate::{
    CanvasSnapshot, EditorResult, Element, ElementId, ElementKind, ElementPatch, GestureState,
    Geometry, Style, ViewMode,
};

/// Document-friendly element description.
///
/// Uses the page's field names (`type` for the kind, flat geometry).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementDocument {
    /// Element identifier. Template-local in templates.
    #[serde(default)]
    pub id: String,
    /// Element kind.
    #[serde(rename = "type")]
    pub kind: ElementKind,
    /// Element content.
    #[serde(default)]
    pub content: String,
    /// X position.
    #[serde(default)]
    pub x: f32,
    /// Y position.
    #[serde(default)]
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
    /// Sparse style.
    #[serde(default)]
    pub style: Style,
}

impl From<&Element> for ElementDocument {
    fn from(element: &Element) -> Self {
        Self {
            id: element.id.to_string(),
            kind: element.kind,
            content: element.content.clone(),
            x: element.geometry.x,
            y: element.geometry.y,
            width: element.geometry.width,
            height: element.geometry.height,
            style: element.style.clone(),
        }
    }
}

impl ElementDocument {
    /// Convert to a runtime element under a fresh ID.
    ///
    /// The document's own id is discarded; geometry is saturated the same
    /// way a panel update is.
    #[must_use]
    pub fn into_element(self) -> Element {
        let mut element = Element::new(self.kind, self.content, Geometry::default());
        element.apply(&ElementPatch::geometry(Geometry::new(
            self.x,
            self.y,
            self.width,
            self.height,
        )));
        element.style = self.style;
        element
    }
}

/// A starter page the editor can be initialised from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateDocument {
    /// Template identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Short description.
    #[serde(default)]
    pub description: String,
    /// Preview image URL.
    #[serde(default)]
    pub thumbnail: String,
    /// Catalogue category.
    #[serde(default)]
    pub category: String,
    /// Elements in paint order.
    #[serde(default)]
    pub elements: Vec<ElementDocument>,
}

impl TemplateDocument {
    /// Parse a template from JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EditorError::Serialization`] if the JSON is malformed.
    pub fn from_json(json: &str) -> EditorResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Runtime elements in order, each under a fresh ID.
    #[must_use]
    pub fn instantiate(&self) -> Vec<Element> {
        self.elements
            .iter()
            .cloned()
            .map(ElementDocument::into_element)
            .collect()
    }

    /// Capture a snapshot as a template.
    #[must_use]
    pub fn from_snapshot(
        id: impl Into<String>,
        name: impl Into<String>,
        snapshot: &CanvasSnapshot,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            thumbnail: String::new(),
            category: String::new(),
            elements: snapshot.elements().iter().map(ElementDocument::from).collect(),
        }
    }
}

/// Canvas size and preset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasDocument {
    /// Host width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
    /// Width after the view mode cap.
    pub effective_width: f32,
    /// Active view mode.
    pub view_mode: ViewMode,
}

/// Outbound scene feed for the host page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDocument {
    /// Canvas frame.
    pub canvas: CanvasDocument,
    /// Selected element.
    pub selected: Option<ElementId>,
    /// Gesture in progress.
    pub gesture: GestureState,
    /// Element in edit mode.
    pub editing: Option<ElementId>,
    /// Elements in paint order.
    pub elements: Vec<ElementDocument>,
}

impl SceneDocument {
    /// Serialize to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EditorError::Serialization`] if serialization fails.
    pub fn to_json(&self) -> EditorResult<String> {
        Ok(serde_json::to_string(self)?)
    }
}
