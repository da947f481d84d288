//! Drag and resize math.
//!
//! Both gestures capture a baseline at start and compute the new geometry
//! as a pure function of that baseline and the current pointer. Nothing is
//! accumulated across move events, so a dropped move cannot cause drift.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{EditorError, Geometry, Point};

/// One of the eight resize handles on a selected element's border.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResizeHandle {
    /// Top-left corner.
    TopLeft,
    /// Top edge midpoint.
    Top,
    /// Top-right corner.
    TopRight,
    /// Right edge midpoint.
    Right,
    /// Bottom-right corner.
    BottomRight,
    /// Bottom edge midpoint.
    Bottom,
    /// Bottom-left corner.
    BottomLeft,
    /// Left edge midpoint.
    Left,
}

impl ResizeHandle {
    /// All handles, clockwise from top-left.
    pub const ALL: [Self; 8] = [
        Self::TopLeft,
        Self::Top,
        Self::TopRight,
        Self::Right,
        Self::BottomRight,
        Self::Bottom,
        Self::BottomLeft,
        Self::Left,
    ];

    /// Host-facing name, e.g. `top-left`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::Top => "top",
            Self::TopRight => "top-right",
            Self::Right => "right",
            Self::BottomRight => "bottom-right",
            Self::Bottom => "bottom",
            Self::BottomLeft => "bottom-left",
            Self::Left => "left",
        }
    }

    /// CSS cursor shown over the handle.
    #[must_use]
    pub const fn cursor(self) -> &'static str {
        match self {
            Self::TopLeft => "nw-resize",
            Self::Top => "n-resize",
            Self::TopRight => "ne-resize",
            Self::Right => "e-resize",
            Self::BottomRight => "se-resize",
            Self::Bottom => "s-resize",
            Self::BottomLeft => "sw-resize",
            Self::Left => "w-resize",
        }
    }

    /// Handle moves the top edge.
    #[must_use]
    pub const fn top(self) -> bool {
        matches!(self, Self::TopLeft | Self::Top | Self::TopRight)
    }

    /// Handle moves the bottom edge.
    #[must_use]
    pub const fn bottom(self) -> bool {
        matches!(self, Self::BottomLeft | Self::Bottom | Self::BottomRight)
    }

    /// Handle moves the left edge.
    #[must_use]
    pub const fn left(self) -> bool {
        matches!(self, Self::TopLeft | Self::Left | Self::BottomLeft)
    }

    /// Handle moves the right edge.
    #[must_use]
    pub const fn right(self) -> bool {
        matches!(self, Self::TopRight | Self::Right | Self::BottomRight)
    }

    /// Where the handle sits on `geometry`'s border.
    #[must_use]
    pub fn anchor(self, geometry: &Geometry) -> Point {
        let x = if self.left() {
            geometry.x
        } else if self.right() {
            geometry.right()
        } else {
            geometry.x + geometry.width / 2.0
        };
        let y = if self.top() {
            geometry.y
        } else if self.bottom() {
            geometry.bottom()
        } else {
            geometry.y + geometry.height / 2.0
        };
        Point::new(x, y)
    }
}

impl fmt::Display for ResizeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResizeHandle {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|handle| handle.as_str() == s)
            .ok_or_else(|| EditorError::UnknownHandle(s.to_string()))
    }
}

/// Hard floors applied on every resize step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeLimits {
    /// Minimum width.
    pub min_width: f32,
    /// Minimum height.
    pub min_height: f32,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            min_width: 50.0,
            min_height: 30.0,
        }
    }
}

/// Clamp a top-left position so a `width` x `height` box stays inside a
/// `bounds_width` x `bounds_height` canvas.
///
/// A box larger than the canvas is pinned to the origin on that axis.
#[must_use]
pub fn clamp_position(
    position: Point,
    width: f32,
    height: f32,
    bounds_width: f32,
    bounds_height: f32,
) -> Point {
    Point::new(
        position.x.min(bounds_width - width).max(0.0),
        position.y.min(bounds_height - height).max(0.0),
    )
}

/// New top-left for a drag: `pointer - offset`, clamped inside the canvas.
///
/// `pointer` is in canvas-local coordinates; `offset` is where the pointer
/// grabbed the element, relative to its top-left.
#[must_use]
pub fn drag_position(
    pointer: Point,
    offset: Point,
    element: &Geometry,
    bounds_width: f32,
    bounds_height: f32,
) -> Point {
    clamp_position(
        pointer.delta_from(offset),
        element.width,
        element.height,
        bounds_width,
        bounds_height,
    )
}

/// Geometry for a resize from `start` by the pointer `delta` since the
/// gesture began.
///
/// Left and top handles keep the opposite edge fixed. Size floors are
/// enforced; the result is not clamped to the canvas.
#[must_use]
pub fn resize_geometry(
    start: &Geometry,
    handle: ResizeHandle,
    delta: Point,
    limits: SizeLimits,
) -> Geometry {
    let mut next = *start;

    if handle.right() {
        next.width = (start.width + delta.x).max(limits.min_width);
    }
    if handle.left() {
        next.width = (start.width - delta.x).max(limits.min_width);
        next.x = start.x + (start.width - next.width);
    }
    if handle.bottom() {
        next.height = (start.height + delta.y).max(limits.min_height);
    }
    if handle.top() {
        next.height = (start.height - delta.y).max(limits.min_height);
        next.y = start.y + (start.height - next.height);
    }

    next
}
