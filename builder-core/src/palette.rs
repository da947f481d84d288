//! Element palette catalogue.
//!
//! The palette owns no state: picking an entry sends an [`AddRequest`]
//! carrying only a kind, and the editor builds the element from the kind's
//! defaults.

use serde::{Deserialize, Serialize};

use crate::ElementKind;

/// Palette section an entry is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaletteGroup {
    /// Content elements.
    Basic,
    /// Structural elements.
    Layout,
}

/// One palette button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaletteEntry {
    /// Kind created by this entry.
    pub kind: ElementKind,
    /// Button label.
    pub name: &'static str,
    /// Button caption.
    pub description: &'static str,
    /// Section.
    pub group: PaletteGroup,
}

/// The full palette, in display order.
pub const PALETTE: [PaletteEntry; 8] = [
    PaletteEntry {
        kind: ElementKind::Text,
        name: "Text",
        description: "Add text element",
        group: PaletteGroup::Basic,
    },
    PaletteEntry {
        kind: ElementKind::Heading,
        name: "Heading",
        description: "Add heading",
        group: PaletteGroup::Basic,
    },
    PaletteEntry {
        kind: ElementKind::Button,
        name: "Button",
        description: "Add button",
        group: PaletteGroup::Basic,
    },
    PaletteEntry {
        kind: ElementKind::Image,
        name: "Image",
        description: "Add image",
        group: PaletteGroup::Basic,
    },
    PaletteEntry {
        kind: ElementKind::Section,
        name: "Container",
        description: "Add container",
        group: PaletteGroup::Layout,
    },
    PaletteEntry {
        kind: ElementKind::Divider,
        name: "Divider",
        description: "Add divider line",
        group: PaletteGroup::Layout,
    },
    PaletteEntry {
        kind: ElementKind::Spacer,
        name: "Spacer",
        description: "Add spacing",
        group: PaletteGroup::Layout,
    },
    PaletteEntry {
        kind: ElementKind::Shape,
        name: "Shape",
        description: "Add shape",
        group: PaletteGroup::Layout,
    },
];

/// Entries of one group, in display order.
pub fn entries(group: PaletteGroup) -> impl Iterator<Item = &'static PaletteEntry> {
    PALETTE.iter().filter(move |entry| entry.group == group)
}

/// Request to add an element of `kind`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddRequest {
    /// Kind to create.
    pub kind: ElementKind,
}

impl From<&PaletteEntry> for AddRequest {
    fn from(entry: &PaletteEntry) -> Self {
        Self { kind: entry.kind }
    }
}
