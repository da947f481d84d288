//! Input events the host page forwards to the editor.

use serde::{Deserialize, Serialize};

use crate::{ElementId, Point, ResizeHandle};

/// What a pointer-down landed on.
///
/// DOM hosts know this from the event target; other hosts can resolve it
/// with [`crate::Editor::target_at`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PointerTarget {
    /// Empty canvas background.
    Canvas,
    /// An element's body or one of its descendants.
    Element {
        /// Element hit.
        id: ElementId,
    },
    /// A resize handle of an element.
    Handle {
        /// Element owning the handle.
        id: ElementId,
        /// Which handle.
        handle: ResizeHandle,
    },
}

/// Pointer input in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "lowercase")]
pub enum PointerEvent {
    /// Button pressed.
    Down {
        /// What was pressed on.
        target: PointerTarget,
        /// Page position.
        position: Point,
    },
    /// Pointer moved.
    Move {
        /// Page position.
        position: Point,
    },
    /// Button released.
    Up {
        /// Page position.
        position: Point,
    },
    /// Pointer left the tracked region.
    Leave,
    /// Double click or double tap.
    DoubleClick {
        /// What was double-clicked.
        target: PointerTarget,
    },
}

/// Keys the editor reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Key {
    /// Confirms an in-place edit.
    Enter,
    /// Abandons an in-place edit.
    Escape,
}

impl Key {
    /// Map a DOM `KeyboardEvent.key` value.
    #[must_use]
    pub fn from_dom(key: &str) -> Option<Self> {
        match key {
            "Enter" => Some(Self::Enter),
            "Escape" | "Esc" => Some(Self::Escape),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_from_dom() {
        assert_eq!(Key::from_dom("Enter"), Some(Key::Enter));
        assert_eq!(Key::from_dom("Esc"), Some(Key::Escape));
        assert_eq!(Key::from_dom("a"), None);
    }

    #[test]
    fn test_pointer_event_json_shape() {
        let id = ElementId::new();
        let event = PointerEvent::Down {
            target: PointerTarget::Handle {
                id,
                handle: ResizeHandle::BottomRight,
            },
            position: Point::new(1.0, 2.0),
        };
        let json = serde_json::to_value(event).expect("serialize");
        assert_eq!(json["type"], "down");
        assert_eq!(json["data"]["target"]["type"], "handle");
        assert_eq!(json["data"]["target"]["handle"], "bottom-right");

        let back: PointerEvent = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, event);
    }
}
