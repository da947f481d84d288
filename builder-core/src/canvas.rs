//! Canvas surface: owns the ordered element collection and the coordinate
//! frame.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::defaults::defaults_for;
use crate::{Element, ElementId, ElementKind, Point};

/// Preview width presets for the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    /// Full host width.
    #[default]
    Desktop,
    /// Tablet-width preview.
    Tablet,
    /// Phone-width preview.
    Mobile,
}

impl ViewMode {
    /// Maximum canvas width for this preset, if any.
    #[must_use]
    pub const fn max_width(self) -> Option<f32> {
        match self {
            Self::Desktop => None,
            Self::Tablet => Some(672.0),
            Self::Mobile => Some(384.0),
        }
    }
}

/// One row of the host's layer list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    /// Element ID.
    pub id: ElementId,
    /// Element kind.
    pub kind: ElementKind,
    /// Content, or the kind's display name when content is empty.
    pub label: String,
}

/// Ordered copy of the canvas contents, used by history.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanvasSnapshot {
    elements: Vec<Element>,
}

impl CanvasSnapshot {
    /// Elements in paint order.
    #[must_use]
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }
}

impl From<Vec<Element>> for CanvasSnapshot {
    fn from(elements: Vec<Element>) -> Self {
        Self { elements }
    }
}

/// The bounded drawing region and its elements.
///
/// Paint order is insertion order. Selection never reorders the collection.
#[derive(Debug, Clone)]
pub struct Canvas {
    /// All elements, indexed by ID.
    elements: HashMap<ElementId, Element>,
    /// Element IDs in insertion order.
    order: Vec<ElementId>,
    /// Top-left of the canvas in page coordinates.
    origin: Point,
    /// Width in pixels.
    width: f32,
    /// Height in pixels.
    height: f32,
    /// Active width preset.
    view_mode: ViewMode,
}

impl Canvas {
    /// Create an empty canvas of the given size at the page origin.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            elements: HashMap::new(),
            order: Vec::new(),
            origin: Point::default(),
            width,
            height,
            view_mode: ViewMode::default(),
        }
    }

    /// Update the canvas's page-space bounding box.
    ///
    /// Non-finite values are ignored; negative sizes saturate to zero.
    pub fn set_bounds(&mut self, origin: Point, width: f32, height: f32) {
        if origin.is_finite() {
            self.origin = origin;
        }
        if width.is_finite() {
            self.width = width.max(0.0);
        }
        if height.is_finite() {
            self.height = height.max(0.0);
        }
    }

    /// Top-left in page coordinates.
    #[must_use]
    pub const fn origin(&self) -> Point {
        self.origin
    }

    /// Host width in pixels.
    #[must_use]
    pub const fn width(&self) -> f32 {
        self.width
    }

    /// Height in pixels.
    #[must_use]
    pub const fn height(&self) -> f32 {
        self.height
    }

    /// Width used for clamping: host width capped by the view mode.
    #[must_use]
    pub fn effective_width(&self) -> f32 {
        self.view_mode
            .max_width()
            .map_or(self.width, |max| self.width.min(max))
    }

    /// Active view mode.
    #[must_use]
    pub const fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    /// Switch view mode. Elements keep their geometry.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    /// Map a page-space point into canvas-local coordinates.
    #[must_use]
    pub fn to_local(&self, page: Point) -> Point {
        page.delta_from(self.origin)
    }

    /// Append an element; it paints above everything already present.
    pub fn insert(&mut self, element: Element) -> ElementId {
        let id = element.id;
        if self.elements.insert(id, element).is_none() {
            self.order.push(id);
        }
        id
    }

    /// Remove an element, returning it if it existed.
    pub fn remove(&mut self, id: ElementId) -> Option<Element> {
        let element = self.elements.remove(&id)?;
        self.order.retain(|&eid| eid != id);
        Some(element)
    }

    /// Get an element by ID.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    /// Get a mutable reference to an element by ID.
    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut Element> {
        self.elements.get_mut(&id)
    }

    /// Whether an element with `id` exists.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    /// Elements in paint order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.order.iter().filter_map(|id| self.elements.get(id))
    }

    /// Get the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if the canvas is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Find the element under a canvas-local point.
    ///
    /// The selected element is tested first since it renders on top; the
    /// rest are tested from the last painted down.
    #[must_use]
    pub fn element_at(&self, local: Point, selected: Option<ElementId>) -> Option<ElementId> {
        if let Some(id) = selected {
            if self.get(id).is_some_and(|e| e.geometry.contains(local)) {
                return Some(id);
            }
        }
        self.order
            .iter()
            .rev()
            .copied()
            .find(|id| self.get(*id).is_some_and(|e| e.geometry.contains(local)))
    }

    /// Rows for the host's layer list, in paint order.
    #[must_use]
    pub fn layers(&self) -> Vec<Layer> {
        self.elements()
            .map(|e| Layer {
                id: e.id,
                kind: e.kind,
                label: if e.content.is_empty() {
                    defaults_for(e.kind).display_name.to_string()
                } else {
                    e.content.clone()
                },
            })
            .collect()
    }

    /// Copy the current contents.
    #[must_use]
    pub fn snapshot(&self) -> CanvasSnapshot {
        CanvasSnapshot {
            elements: self.elements().cloned().collect(),
        }
    }

    /// Replace the contents with a snapshot. Bounds and view mode are kept.
    pub fn restore(&mut self, snapshot: CanvasSnapshot) {
        self.elements.clear();
        self.order.clear();
        for element in snapshot.elements {
            self.insert(element);
        }
    }
}
