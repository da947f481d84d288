//! # Site Builder Core
//!
//! Canvas editor logic for the drag-and-drop site builder.
//! Platform-agnostic; the browser bindings live in `builder-app`.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │              builder-core                   │
//! ├─────────────────────────────────────────────┤
//! │  Canvas Surface  │  Interaction Controller  │
//! │  - Elements      │  - Drag / resize math    │
//! │  - Paint order   │  - Gesture state machine │
//! │  - View modes    │  - Edit in place         │
//! ├─────────────────────────────────────────────┤
//! │  Selection       │  Collaborator contracts  │
//! │  - Single target │  - Palette / panel       │
//! │  - Undo history  │  - Templates / scene     │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod canvas;
pub mod config;
pub mod defaults;
pub mod editor;
pub mod element;
pub mod error;
pub mod event;
pub mod gesture;
pub mod history;
pub mod interaction;
pub mod palette;
pub mod properties;
pub mod schema;
pub mod selection;

pub use canvas::{Canvas, CanvasSnapshot, Layer, ViewMode};
pub use config::EditorConfig;
pub use defaults::{defaults_for, KindDefaults, ResolvedStyle};
pub use editor::{Editor, RenderItem};
pub use element::{Element, ElementId, ElementKind, ElementPatch, Geometry, Point, Style};
pub use error::{EditorError, EditorResult};
pub use event::{Key, PointerEvent, PointerTarget};
pub use gesture::{CaptureGuard, Gesture, GestureMachine, GestureState, NoCapture, PointerCapture};
pub use history::History;
pub use interaction::{ResizeHandle, SizeLimits};
pub use palette::{AddRequest, PaletteEntry, PaletteGroup, PALETTE};
pub use properties::{NumericField, PanelEdit, PanelView};
pub use schema::{ElementDocument, SceneDocument, TemplateDocument};
pub use selection::Selection;

/// Builder core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
