//! Gesture state machine and pointer-capture subscriptions.
//!
//! At most one gesture (drag or resize) is active. A gesture can only begin
//! from [`GestureState::Idle`]; a second begin while active is ignored.
//!
//! Starting a gesture acquires a [`CaptureGuard`] from the host's
//! [`PointerCapture`], which subscribes to page-wide pointer move/up events.
//! The guard lives inside the active gesture and releases the subscription
//! when dropped, so every exit path (pointer-up, cancel, deleting the
//! element, undo, dropping the editor) unsubscribes exactly once.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{ElementId, Geometry, Point, ResizeHandle};

/// Releases a pointer subscription when dropped.
pub struct CaptureGuard {
    release: Option<Box<dyn FnOnce()>>,
}

impl CaptureGuard {
    /// Guard that runs `release` exactly once, on drop.
    #[must_use]
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Guard with nothing to release.
    #[must_use]
    pub fn detached() -> Self {
        Self { release: None }
    }
}

impl Drop for CaptureGuard {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl fmt::Debug for CaptureGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureGuard")
            .field("armed", &self.release.is_some())
            .finish()
    }
}

/// Host hook that subscribes to pointer move/up for the length of a gesture.
pub trait PointerCapture {
    /// Subscribe; the subscription ends when the returned guard is dropped.
    fn acquire(&self) -> CaptureGuard;
}

/// Capture for hosts that already route every pointer event to the editor.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCapture;

impl PointerCapture for NoCapture {
    fn acquire(&self) -> CaptureGuard {
        CaptureGuard::detached()
    }
}

/// Baseline of an in-progress drag.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragSession {
    /// Element being moved.
    pub element: ElementId,
    /// Pointer position relative to the element's top-left at grab time.
    pub offset: Point,
    /// Geometry when the drag began.
    pub start: Geometry,
}

/// Baseline of an in-progress resize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResizeSession {
    /// Element being resized.
    pub element: ElementId,
    /// Handle that started the resize.
    pub handle: ResizeHandle,
    /// Canvas-local pointer position when the resize began.
    pub start_pointer: Point,
    /// Geometry when the resize began.
    pub start: Geometry,
}

/// An in-progress gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Moving an element.
    Drag(DragSession),
    /// Resizing an element from a handle.
    Resize(ResizeSession),
}

impl Gesture {
    /// Element the gesture acts on.
    #[must_use]
    pub const fn element(&self) -> ElementId {
        match self {
            Self::Drag(session) => session.element,
            Self::Resize(session) => session.element,
        }
    }

    /// Geometry captured when the gesture began.
    #[must_use]
    pub const fn start(&self) -> Geometry {
        match self {
            Self::Drag(session) => session.start,
            Self::Resize(session) => session.start,
        }
    }

    /// Observable state for this gesture.
    #[must_use]
    pub const fn state(&self) -> GestureState {
        match self {
            Self::Drag(session) => GestureState::Dragging {
                element: session.element,
            },
            Self::Resize(session) => GestureState::Resizing {
                element: session.element,
                handle: session.handle,
            },
        }
    }
}

/// Observable gesture state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum GestureState {
    /// No gesture.
    #[default]
    Idle,
    /// An element is being dragged.
    Dragging {
        /// Dragged element.
        element: ElementId,
    },
    /// An element is being resized.
    Resizing {
        /// Resized element.
        element: ElementId,
        /// Active handle.
        handle: ResizeHandle,
    },
}

#[derive(Debug)]
struct ActiveGesture {
    gesture: Gesture,
    guard: CaptureGuard,
}

/// Single-gesture state machine.
#[derive(Debug, Default)]
pub struct GestureMachine {
    active: Option<ActiveGesture>,
}

impl GestureMachine {
    /// Create an idle machine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current observable state.
    #[must_use]
    pub fn state(&self) -> GestureState {
        self.active
            .as_ref()
            .map_or(GestureState::Idle, |active| active.gesture.state())
    }

    /// Whether no gesture is active.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.active.is_none()
    }

    /// The active gesture, if any.
    #[must_use]
    pub fn current(&self) -> Option<&Gesture> {
        self.active.as_ref().map(|active| &active.gesture)
    }

    /// Start a gesture, acquiring a pointer subscription.
    ///
    /// Returns `false` and acquires nothing if a gesture is already active.
    pub fn begin(&mut self, gesture: Gesture, capture: &dyn PointerCapture) -> bool {
        if self.active.is_some() {
            tracing::debug!("Ignoring {:?}: gesture already active", gesture.state());
            return false;
        }
        let guard = capture.acquire();
        self.active = Some(ActiveGesture { gesture, guard });
        true
    }

    /// End the active gesture, releasing its subscription.
    pub fn end(&mut self) -> Option<Gesture> {
        let ActiveGesture { gesture, guard } = self.active.take()?;
        drop(guard);
        Some(gesture)
    }
}
