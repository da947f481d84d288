//! The editor: canvas surface, selection, gestures, edit mode and history
//! behind one update contract.
//!
//! Every operation is total. Unknown ids are silent no-ops and geometry is
//! saturated rather than rejected, so callers never handle errors here.

use std::fmt;

use serde::Serialize;

use crate::defaults::{defaults_for, ResolvedStyle};
use crate::gesture::{
    DragSession, Gesture, GestureMachine, NoCapture, PointerCapture, ResizeSession,
};
use crate::interaction::{clamp_position, drag_position, resize_geometry, SizeLimits};
use crate::properties::{PanelEdit, PanelView};
use crate::schema::{CanvasDocument, ElementDocument, SceneDocument, TemplateDocument};
use crate::{
    AddRequest, Canvas, CanvasSnapshot, EditorConfig, Element, ElementId, ElementKind, ElementPatch,
    Geometry, GestureState, History, Key, Layer, Point, PointerEvent, PointerTarget,
    ResizeHandle, Selection, ViewMode,
};

/// In-place text edit of one element.
#[derive(Debug, Clone, PartialEq, Eq)]
struct EditSession {
    element: ElementId,
    draft: String,
}

/// One element as the host should paint it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderItem {
    /// Element ID.
    pub id: ElementId,
    /// Element kind.
    #[serde(rename = "type")]
    pub kind: ElementKind,
    /// Content to display; empty for kinds without text.
    pub content: String,
    /// Position and size.
    #[serde(flatten)]
    pub geometry: Geometry,
    /// Style with kind defaults filled in.
    pub style: ResolvedStyle,
    /// Stacking priority.
    pub z_index: i32,
    /// Whether resize handles and the toolbar are shown.
    pub show_handles: bool,
    /// Whether the element is being dragged.
    pub dragging: bool,
    /// Whether the element is in edit mode.
    pub editing: bool,
}

/// Canvas editor state.
pub struct Editor {
    config: EditorConfig,
    canvas: Canvas,
    selection: Selection,
    gestures: GestureMachine,
    /// Canvas contents when the active gesture began.
    gesture_baseline: Option<CanvasSnapshot>,
    editing: Option<EditSession>,
    history: History<CanvasSnapshot>,
    capture: Box<dyn PointerCapture>,
}

impl fmt::Debug for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Editor")
            .field("config", &self.config)
            .field("canvas", &self.canvas)
            .field("selection", &self.selection)
            .field("gestures", &self.gestures)
            .field("editing", &self.editing)
            .finish_non_exhaustive()
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    /// Create an empty editor.
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self {
            canvas: Canvas::new(config.canvas_width, config.canvas_height),
            selection: Selection::new(),
            gestures: GestureMachine::new(),
            gesture_baseline: None,
            editing: None,
            history: History::new(config.history_limit),
            capture: Box::new(NoCapture),
            config,
        }
    }

    /// Create an editor pre-populated from a template.
    #[must_use]
    pub fn from_template(config: EditorConfig, template: &TemplateDocument) -> Self {
        let mut editor = Self::new(config);
        editor.load_template(template);
        editor
    }

    /// Replace the canvas contents with a template's elements.
    ///
    /// Ends any gesture or edit, clears the selection and the history.
    pub fn load_template(&mut self, template: &TemplateDocument) {
        self.gestures.end();
        self.gesture_baseline = None;
        self.editing = None;
        self.selection.clear();
        self.history.clear();
        self.canvas.restore(CanvasSnapshot::from(template.instantiate()));
        tracing::debug!(
            "Loaded template '{}' with {} elements",
            template.id,
            self.canvas.len()
        );
    }

    /// Install the host's pointer subscription hook.
    pub fn set_pointer_capture(&mut self, capture: Box<dyn PointerCapture>) {
        self.capture = capture;
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// Active configuration.
    #[must_use]
    pub const fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// The canvas surface.
    #[must_use]
    pub const fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Get an element by ID.
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&Element> {
        self.canvas.get(id)
    }

    /// Elements in paint order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.canvas.elements()
    }

    /// Selected element, if any.
    #[must_use]
    pub const fn selected(&self) -> Option<ElementId> {
        self.selection.get()
    }

    /// Current gesture state.
    #[must_use]
    pub fn gesture_state(&self) -> GestureState {
        self.gestures.state()
    }

    /// Element in edit mode, if any.
    #[must_use]
    pub fn editing(&self) -> Option<ElementId> {
        self.editing.as_ref().map(|session| session.element)
    }

    /// Uncommitted text of the active edit.
    #[must_use]
    pub fn draft(&self) -> Option<&str> {
        self.editing.as_ref().map(|session| session.draft.as_str())
    }

    /// Resize floors from the config.
    #[must_use]
    pub const fn limits(&self) -> SizeLimits {
        SizeLimits {
            min_width: self.config.min_width,
            min_height: self.config.min_height,
        }
    }

    // ------------------------------------------------------------------
    // Inbound contract
    // ------------------------------------------------------------------

    /// Add an element of `kind` with the kind's defaults and select it.
    ///
    /// Like every other mutation, this ends an active gesture first.
    pub fn add_element(&mut self, kind: ElementKind) -> ElementId {
        self.finish_gesture();
        let defaults = defaults_for(kind);
        let spawn = clamp_position(
            Point::new(self.config.spawn_x, self.config.spawn_y),
            defaults.width,
            defaults.height,
            self.canvas.effective_width(),
            self.canvas.height(),
        );
        let element = Element::new(
            kind,
            defaults.content,
            Geometry::new(spawn.x, spawn.y, defaults.width, defaults.height),
        )
        .with_style(defaults.style.to_style());

        self.commit_edit();
        self.record();
        let id = self.canvas.insert(element);
        self.selection.set(id);
        tracing::debug!("Added {kind} element {id}");
        id
    }

    /// Add the element a palette entry asked for.
    pub fn handle_add(&mut self, request: AddRequest) -> ElementId {
        self.add_element(request.kind)
    }

    /// Select `id`. Returns `false` if no such element exists.
    ///
    /// An edit on another element is committed first.
    pub fn select(&mut self, id: ElementId) -> bool {
        if !self.canvas.contains(id) {
            return false;
        }
        if self.gestures.current().is_some_and(|g| g.element() != id) {
            self.finish_gesture();
        }
        if self.editing().is_some_and(|editing| editing != id) {
            self.commit_edit();
        }
        self.selection.set(id);
        true
    }

    /// Select nothing, committing any active edit.
    pub fn clear_selection(&mut self) {
        self.commit_edit();
        self.selection.clear();
    }

    /// Apply a partial update. Returns `false` if no such element exists.
    pub fn update(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        if !self.canvas.contains(id) {
            return false;
        }
        self.finish_gesture();
        let Some(current) = self.canvas.get(id) else {
            return false;
        };
        let mut next = current.clone();
        next.apply(patch);
        if next != *current {
            self.record();
            if let Some(element) = self.canvas.get_mut(id) {
                *element = next;
            }
        }
        true
    }

    /// Remove an element. Returns `false` if no such element exists.
    ///
    /// Deleting the selected element clears the selection; an edit on it is
    /// dropped.
    pub fn delete(&mut self, id: ElementId) -> bool {
        if !self.canvas.contains(id) {
            return false;
        }
        self.finish_gesture();
        if self.editing() == Some(id) {
            self.editing = None;
        }
        self.record();
        self.canvas.remove(id);
        self.selection.forget(id);
        tracing::debug!("Deleted element {id}");
        true
    }

    /// Copy an element under a new ID, offset by the configured amount, and
    /// select the copy.
    pub fn duplicate(&mut self, id: ElementId) -> Option<ElementId> {
        if !self.canvas.contains(id) {
            return None;
        }
        self.finish_gesture();
        let copy = self.canvas.get(id)?.duplicate(self.config.duplicate_offset);
        self.commit_edit();
        self.record();
        let copy_id = self.canvas.insert(copy);
        self.selection.set(copy_id);
        tracing::debug!("Duplicated element {id} as {copy_id}");
        Some(copy_id)
    }

    /// Apply a properties panel edit to the selected element.
    pub fn apply_panel(&mut self, edit: &PanelEdit) -> bool {
        let Some(id) = self.selection.get() else {
            return false;
        };
        let patch = edit.to_patch(self.limits());
        self.update(id, &patch)
    }

    // ------------------------------------------------------------------
    // Gestures
    // ------------------------------------------------------------------

    /// Start dragging `id` from the page point `pointer`.
    ///
    /// Selects the element. Ignored while another gesture is active or while
    /// the element is in edit mode.
    pub fn begin_drag(&mut self, id: ElementId, pointer: Point) -> bool {
        if !pointer.is_finite() || !self.gestures.is_idle() {
            return false;
        }
        if self.editing() == Some(id) || !self.select(id) {
            return false;
        }
        let Some(start) = self.canvas.get(id).map(|e| e.geometry) else {
            return false;
        };
        let offset = self.canvas.to_local(pointer).delta_from(start.origin());
        self.begin(Gesture::Drag(DragSession {
            element: id,
            offset,
            start,
        }))
    }

    /// Start resizing `id` from `handle` at the page point `pointer`.
    pub fn begin_resize(&mut self, id: ElementId, handle: ResizeHandle, pointer: Point) -> bool {
        if !pointer.is_finite() || !self.gestures.is_idle() || !self.select(id) {
            return false;
        }
        let Some(start) = self.canvas.get(id).map(|e| e.geometry) else {
            return false;
        };
        self.begin(Gesture::Resize(ResizeSession {
            element: id,
            handle,
            start_pointer: self.canvas.to_local(pointer),
            start,
        }))
    }

    fn begin(&mut self, gesture: Gesture) -> bool {
        let baseline = self.canvas.snapshot();
        if !self.gestures.begin(gesture, self.capture.as_ref()) {
            return false;
        }
        self.gesture_baseline = Some(baseline);
        tracing::debug!("Gesture started: {:?}", gesture.state());
        true
    }

    /// Continue the active gesture at the page point `pointer`.
    ///
    /// Each step is computed from the gesture's baseline, never from the
    /// previous step.
    pub fn pointer_move(&mut self, pointer: Point) {
        if !pointer.is_finite() {
            return;
        }
        let Some(gesture) = self.gestures.current().copied() else {
            return;
        };
        let local = self.canvas.to_local(pointer);
        let bounds_width = self.canvas.effective_width();
        let bounds_height = self.canvas.height();
        let limits = self.limits();
        let Some(element) = self.canvas.get_mut(gesture.element()) else {
            return;
        };

        match gesture {
            Gesture::Drag(session) => {
                let position = drag_position(
                    local,
                    session.offset,
                    &element.geometry,
                    bounds_width,
                    bounds_height,
                );
                element.geometry.x = position.x;
                element.geometry.y = position.y;
            }
            Gesture::Resize(session) => {
                let delta = local.delta_from(session.start_pointer);
                element.geometry = resize_geometry(&session.start, session.handle, delta, limits);
            }
        }
        tracing::trace!("Element {} geometry {:?}", element.id, element.geometry);
    }

    /// End the active gesture on pointer release.
    pub fn pointer_up(&mut self) {
        self.finish_gesture();
    }

    /// End the active gesture when the pointer leaves the tracked region.
    pub fn pointer_leave(&mut self) {
        self.finish_gesture();
    }

    /// Abandon the active gesture, e.g. when the window loses focus.
    ///
    /// The element keeps its last written geometry.
    pub fn cancel_gesture(&mut self) -> bool {
        let cancelled = self.finish_gesture().is_some();
        if cancelled {
            tracing::debug!("Gesture cancelled");
        }
        cancelled
    }

    fn finish_gesture(&mut self) -> Option<Gesture> {
        let gesture = self.gestures.end()?;
        let baseline = self.gesture_baseline.take();
        let moved = self
            .canvas
            .get(gesture.element())
            .is_some_and(|e| e.geometry != gesture.start());
        if let (true, Some(baseline)) = (moved, baseline) {
            self.history.record(baseline);
        }
        tracing::debug!("Gesture ended: {:?}", gesture.state());
        Some(gesture)
    }

    /// Click on empty canvas: commit any edit and clear the selection.
    pub fn click_background(&mut self) {
        self.clear_selection();
    }

    /// Dispatch a pointer event from the host.
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event {
            PointerEvent::Down { target, position } => match target {
                PointerTarget::Canvas => self.click_background(),
                PointerTarget::Element { id } => {
                    self.begin_drag(id, position);
                }
                PointerTarget::Handle { id, handle } => {
                    self.begin_resize(id, handle, position);
                }
            },
            PointerEvent::Move { position } => self.pointer_move(position),
            PointerEvent::Up { .. } => self.pointer_up(),
            PointerEvent::Leave => self.pointer_leave(),
            PointerEvent::DoubleClick { target } => {
                if let PointerTarget::Element { id } = target {
                    self.enter_edit(id);
                }
            }
        }
    }

    /// Dispatch a key press. Returns whether the key was consumed.
    pub fn handle_key(&mut self, key: Key) -> bool {
        match key {
            Key::Enter => self.commit_edit(),
            Key::Escape => self.cancel_edit(),
        }
    }

    /// Resolve a page point to what a pointer-down there would hit.
    ///
    /// Handles of the selected element win within `handle_hit_radius`,
    /// then the topmost element, then the background.
    #[must_use]
    pub fn target_at(&self, pointer: Point) -> PointerTarget {
        let local = self.canvas.to_local(pointer);
        let selected = self.selection.get();

        if let Some(element) = selected.and_then(|id| self.canvas.get(id)) {
            let radius = self.config.handle_hit_radius;
            let handle = ResizeHandle::ALL.into_iter().find(|handle| {
                let anchor = handle.anchor(&element.geometry);
                (local.x - anchor.x).abs() <= radius && (local.y - anchor.y).abs() <= radius
            });
            if let Some(handle) = handle {
                return PointerTarget::Handle {
                    id: element.id,
                    handle,
                };
            }
        }

        self.canvas
            .element_at(local, selected)
            .map_or(PointerTarget::Canvas, |id| PointerTarget::Element { id })
    }

    // ------------------------------------------------------------------
    // Edit mode
    // ------------------------------------------------------------------

    /// Enter edit mode on a text element, seeding the draft with its content.
    pub fn enter_edit(&mut self, id: ElementId) -> bool {
        let Some(element) = self.canvas.get(id) else {
            return false;
        };
        if !element.kind.is_editable_in_place() {
            return false;
        }
        if self.editing() == Some(id) {
            return true;
        }
        let draft = element.content.clone();
        self.select(id);
        self.commit_edit();
        self.editing = Some(EditSession { element: id, draft });
        true
    }

    /// Replace the draft text. Returns `false` when not editing.
    pub fn set_draft(&mut self, text: impl Into<String>) -> bool {
        match &mut self.editing {
            Some(session) => {
                session.draft = text.into();
                true
            }
            None => false,
        }
    }

    /// Write the draft into the element's content and leave edit mode.
    ///
    /// Returns `false` when not editing.
    pub fn commit_edit(&mut self) -> bool {
        let Some(session) = self.editing.take() else {
            return false;
        };
        let changed = self
            .canvas
            .get(session.element)
            .is_some_and(|e| e.content != session.draft);
        if changed {
            self.finish_gesture();
            self.record();
            if let Some(element) = self.canvas.get_mut(session.element) {
                element.content = session.draft;
            }
        }
        true
    }

    /// Leave edit mode without touching the content.
    pub fn cancel_edit(&mut self) -> bool {
        self.editing.take().is_some()
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    fn record(&mut self) {
        self.history.record(self.canvas.snapshot());
    }

    /// Restore the contents before the last mutation.
    pub fn undo(&mut self) -> bool {
        self.settle();
        let Some(previous) = self.history.undo(self.canvas.snapshot()) else {
            return false;
        };
        self.restore(previous);
        true
    }

    /// Re-apply the last undone mutation.
    pub fn redo(&mut self) -> bool {
        self.settle();
        let Some(next) = self.history.redo(self.canvas.snapshot()) else {
            return false;
        };
        self.restore(next);
        true
    }

    /// Whether an undo step is available.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether a redo step is available.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    fn settle(&mut self) {
        self.finish_gesture();
        self.editing = None;
    }

    fn restore(&mut self, snapshot: CanvasSnapshot) {
        self.canvas.restore(snapshot);
        if let Some(id) = self.selection.get() {
            if !self.canvas.contains(id) {
                self.selection.clear();
            }
        }
    }

    // ------------------------------------------------------------------
    // Frame
    // ------------------------------------------------------------------

    /// Update the canvas's page-space bounding box.
    pub fn set_canvas_bounds(&mut self, origin: Point, width: f32, height: f32) {
        self.canvas.set_bounds(origin, width, height);
    }

    /// Switch the preview width preset.
    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.canvas.set_view_mode(mode);
    }

    // ------------------------------------------------------------------
    // Outbound
    // ------------------------------------------------------------------

    /// Elements in paint order with per-element render flags.
    #[must_use]
    pub fn render_list(&self) -> Vec<RenderItem> {
        let state = self.gestures.state();
        let dragged = match state {
            GestureState::Dragging { element } => Some(element),
            _ => None,
        };

        self.canvas
            .elements()
            .map(|element| {
                let selected = self.selection.is_selected(element.id);
                let dragging = dragged == Some(element.id);
                RenderItem {
                    id: element.id,
                    kind: element.kind,
                    content: if element.kind.has_text() {
                        element.content.clone()
                    } else {
                        String::new()
                    },
                    geometry: element.geometry,
                    style: element.style.resolve(element.kind),
                    z_index: if selected {
                        self.config.selected_z_index
                    } else {
                        self.config.base_z_index
                    },
                    show_handles: selected && !dragging,
                    dragging,
                    editing: self.editing() == Some(element.id),
                }
            })
            .collect()
    }

    /// Rows for the host's layer list.
    #[must_use]
    pub fn layers(&self) -> Vec<Layer> {
        self.canvas.layers()
    }

    /// Properties panel view of the selected element.
    #[must_use]
    pub fn panel(&self) -> Option<PanelView> {
        self.selection
            .get()
            .and_then(|id| self.canvas.get(id))
            .map(PanelView::of)
    }

    /// Capture the current canvas as a template.
    #[must_use]
    pub fn to_template(&self, id: &str, name: &str) -> TemplateDocument {
        TemplateDocument::from_snapshot(id, name, &self.canvas.snapshot())
    }

    /// Outbound scene feed.
    #[must_use]
    pub fn scene(&self) -> SceneDocument {
        SceneDocument {
            canvas: CanvasDocument {
                width: self.canvas.width(),
                height: self.canvas.height(),
                effective_width: self.canvas.effective_width(),
                view_mode: self.canvas.view_mode(),
            },
            selected: self.selection.get(),
            gesture: self.gestures.state(),
            editing: self.editing(),
            elements: self.canvas.elements().map(ElementDocument::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::gesture::CaptureGuard;

    #[derive(Clone, Default)]
    struct CountingCapture {
        live: Rc<Cell<i32>>,
    }

    impl PointerCapture for CountingCapture {
        fn acquire(&self) -> CaptureGuard {
            self.live.set(self.live.get() + 1);
            let live = Rc::clone(&self.live);
            CaptureGuard::new(move || live.set(live.get() - 1))
        }
    }

    fn editor_with_capture() -> (Editor, Rc<Cell<i32>>) {
        let capture = CountingCapture::default();
        let live = Rc::clone(&capture.live);
        let mut editor = Editor::default();
        editor.set_pointer_capture(Box::new(capture));
        (editor, live)
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    fn x_is(editor: &Editor, id: ElementId, expected: Option<f32>) -> bool {
        match (editor.element(id), expected) {
            (Some(element), Some(x)) => approx(element.geometry.x, x),
            (None, None) => true,
            _ => false,
        }
    }

    #[test]
    fn test_add_uses_kind_defaults_and_selects() {
        let mut editor = Editor::default();
        let id = editor.add_element(ElementKind::Button);
        let element = editor.element(id).expect("added");

        assert_eq!(element.content, "Click Me");
        assert!(approx(element.geometry.width, 120.0));
        assert!(approx(element.geometry.x, 50.0));
        assert_eq!(element.style.background_color.as_deref(), Some("#3b82f6"));
        assert_eq!(editor.selected(), Some(id));
    }

    #[test]
    fn test_unknown_id_is_noop() {
        let mut editor = Editor::default();
        let ghost = ElementId::new();
        assert!(!editor.select(ghost));
        assert!(!editor.update(ghost, &ElementPatch::content("x")));
        assert!(!editor.delete(ghost));
        assert!(editor.duplicate(ghost).is_none());
        assert!(!editor.begin_drag(ghost, Point::new(0.0, 0.0)));
        assert!(!editor.can_undo());
    }

    #[test]
    fn test_update_after_delete_is_noop() {
        let mut editor = Editor::default();
        let id = editor.add_element(ElementKind::Text);
        assert!(editor.delete(id));
        assert!(!editor.update(id, &ElementPatch::content("late")));
        assert!(editor.canvas().is_empty());
    }

    #[test]
    fn test_second_begin_is_ignored() {
        let (mut editor, live) = editor_with_capture();
        let a = editor.add_element(ElementKind::Shape);
        let b = editor.add_element(ElementKind::Text);

        assert!(editor.begin_drag(a, Point::new(60.0, 60.0)));
        assert!(!editor.begin_resize(b, ResizeHandle::Right, Point::new(0.0, 0.0)));
        assert_eq!(editor.gesture_state(), GestureState::Dragging { element: a });
        assert_eq!(editor.selected(), Some(a));
        assert_eq!(live.get(), 1);

        editor.pointer_up();
        assert_eq!(editor.gesture_state(), GestureState::Idle);
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn test_capture_released_on_every_exit() {
        let (mut editor, live) = editor_with_capture();
        let id = editor.add_element(ElementKind::Shape);

        editor.begin_drag(id, Point::new(60.0, 60.0));
        editor.pointer_move(Point::new(160.0, 60.0));
        editor.pointer_leave();
        assert_eq!(live.get(), 0);
        assert_eq!(editor.gesture_state(), GestureState::Idle);
        assert!(approx(editor.element(id).expect("exists").geometry.x, 150.0));

        editor.begin_resize(id, ResizeHandle::Bottom, Point::new(0.0, 0.0));
        assert!(editor.cancel_gesture());
        assert_eq!(live.get(), 0);

        editor.begin_drag(id, Point::new(60.0, 60.0));
        editor.delete(id);
        assert_eq!(live.get(), 0);
        assert_eq!(editor.gesture_state(), GestureState::Idle);

        let id = editor.add_element(ElementKind::Shape);
        editor.begin_drag(id, Point::new(60.0, 60.0));
        editor.undo();
        assert_eq!(live.get(), 0);

        let id = editor.add_element(ElementKind::Shape);
        editor.begin_drag(id, Point::new(60.0, 60.0));
        assert_eq!(live.get(), 1);
        drop(editor);
        assert_eq!(live.get(), 0);
    }

    #[test]
    fn test_drag_uses_canvas_origin() {
        let mut editor = Editor::default();
        editor.set_canvas_bounds(Point::new(100.0, 100.0), 1200.0, 800.0);
        let id = editor.add_element(ElementKind::Shape);

        // Grab 10px into the element, which sits at local (50, 50).
        editor.begin_drag(id, Point::new(160.0, 160.0));
        editor.pointer_move(Point::new(310.0, 260.0));
        editor.pointer_up();

        let g = editor.element(id).expect("exists").geometry;
        assert!(approx(g.x, 200.0));
        assert!(approx(g.y, 150.0));
    }

    #[test]
    fn test_drag_clamps_to_view_mode_width() {
        let mut editor = Editor::default();
        editor.set_view_mode(ViewMode::Mobile);
        let id = editor.add_element(ElementKind::Shape);

        editor.begin_drag(id, Point::new(50.0, 50.0));
        editor.pointer_move(Point::new(5000.0, 50.0));
        editor.pointer_up();

        assert!(approx(editor.element(id).expect("exists").geometry.x, 284.0));
    }

    #[test]
    fn test_non_finite_move_ignored() {
        let mut editor = Editor::default();
        let id = editor.add_element(ElementKind::Shape);
        editor.begin_drag(id, Point::new(50.0, 50.0));
        editor.pointer_move(Point::new(f32::NAN, 10.0));
        let g = editor.element(id).expect("exists").geometry;
        assert!(approx(g.x, 50.0) && approx(g.y, 50.0));
    }

    #[test]
    fn test_edit_mode_only_for_text() {
        let mut editor = Editor::default();
        let button = editor.add_element(ElementKind::Button);
        assert!(!editor.enter_edit(button));

        let text = editor.add_element(ElementKind::Text);
        assert!(editor.enter_edit(text));
        assert_eq!(editor.draft(), Some("Edit this text"));
    }

    #[test]
    fn test_escape_discards_draft() {
        let mut editor = Editor::default();
        let id = editor.add_element(ElementKind::Text);
        editor.enter_edit(id);
        editor.set_draft("Scratch");
        assert!(editor.handle_key(Key::Escape));

        assert_eq!(editor.editing(), None);
        assert_eq!(editor.element(id).expect("exists").content, "Edit this text");
    }

    #[test]
    fn test_selecting_other_commits_edit() {
        let mut editor = Editor::default();
        let text = editor.add_element(ElementKind::Text);
        let shape = editor.add_element(ElementKind::Shape);

        editor.enter_edit(text);
        editor.set_draft("Committed");
        editor.select(shape);

        assert_eq!(editor.editing(), None);
        assert_eq!(editor.element(text).expect("exists").content, "Committed");
    }

    #[test]
    fn test_pointer_down_on_edited_element_does_not_drag() {
        let mut editor = Editor::default();
        let id = editor.add_element(ElementKind::Text);
        editor.enter_edit(id);
        assert!(!editor.begin_drag(id, Point::new(60.0, 60.0)));
        assert_eq!(editor.gesture_state(), GestureState::Idle);
        assert_eq!(editor.editing(), Some(id));
    }

    #[test]
    fn test_render_list_flags() {
        let mut editor = Editor::default();
        let a = editor.add_element(ElementKind::Shape);
        let b = editor.add_element(ElementKind::Text);

        let items = editor.render_list();
        assert_eq!(items[0].id, a);
        assert_eq!(items[0].z_index, 1);
        assert!(!items[0].show_handles);
        assert_eq!(items[1].z_index, 1000);
        assert!(items[1].show_handles);

        editor.begin_drag(b, Point::new(60.0, 60.0));
        let items = editor.render_list();
        assert!(items[1].dragging);
        assert!(!items[1].show_handles);
    }

    #[test]
    fn test_target_at_prefers_handles() {
        let mut editor = Editor::default();
        let id = editor.add_element(ElementKind::Shape);

        assert_eq!(
            editor.target_at(Point::new(151.0, 151.0)),
            PointerTarget::Handle {
                id,
                handle: ResizeHandle::BottomRight
            }
        );
        assert_eq!(editor.target_at(Point::new(100.0, 100.0)), PointerTarget::Element { id });
        assert_eq!(editor.target_at(Point::new(700.0, 700.0)), PointerTarget::Canvas);
    }

    #[test]
    fn test_gesture_history_only_when_moved() {
        let mut editor = Editor::default();
        let id = editor.add_element(ElementKind::Shape);
        editor.history.clear();

        editor.begin_drag(id, Point::new(60.0, 60.0));
        editor.pointer_up();
        assert!(!editor.can_undo());

        editor.begin_drag(id, Point::new(60.0, 60.0));
        editor.pointer_move(Point::new(160.0, 60.0));
        editor.pointer_up();
        assert!(editor.can_undo());

        editor.undo();
        assert!(approx(editor.element(id).expect("exists").geometry.x, 50.0));
        editor.redo();
        assert!(approx(editor.element(id).expect("exists").geometry.x, 150.0));
    }

    #[test]
    fn test_mutation_during_drag_keeps_history_in_order() {
        let (mut editor, live) = editor_with_capture();
        let a = editor.add_element(ElementKind::Shape);
        let b = editor.add_element(ElementKind::Shape);

        editor.begin_drag(b, Point::new(60.0, 60.0));
        editor.pointer_move(Point::new(310.0, 60.0));
        assert!(editor.delete(a));
        assert_eq!(editor.gesture_state(), GestureState::Idle);
        assert_eq!(live.get(), 0);

        // The gesture is over, so later moves change nothing.
        editor.pointer_move(Point::new(510.0, 60.0));
        editor.pointer_up();
        assert!(x_is(&editor, b, Some(300.0)));

        assert!(editor.undo());
        assert!(x_is(&editor, a, Some(50.0)) && x_is(&editor, b, Some(300.0)));
        assert!(editor.undo());
        assert!(x_is(&editor, a, Some(50.0)) && x_is(&editor, b, Some(50.0)));
        assert!(editor.undo());
        assert!(x_is(&editor, a, Some(50.0)) && x_is(&editor, b, None));
    }

    #[test]
    fn test_add_during_drag_ends_gesture() {
        let mut editor = Editor::default();
        let a = editor.add_element(ElementKind::Shape);
        editor.begin_drag(a, Point::new(60.0, 60.0));
        editor.pointer_move(Point::new(160.0, 60.0));

        let b = editor.handle_add(AddRequest { kind: ElementKind::Text });
        assert_eq!(editor.gesture_state(), GestureState::Idle);
        assert_eq!(editor.selected(), Some(b));
        assert!(editor.render_list().iter().all(|item| !item.dragging));

        assert!(editor.undo());
        assert!(!editor.canvas().contains(b));
        assert!(approx(editor.element(a).expect("exists").geometry.x, 150.0));
        assert!(editor.undo());
        assert!(approx(editor.element(a).expect("exists").geometry.x, 50.0));
    }

    #[test]
    fn test_to_template_reinstantiates_with_fresh_ids() {
        let mut editor = Editor::default();
        let id = editor.add_element(ElementKind::Heading);
        let template = editor.to_template("mine", "My Page");
        assert_eq!(template.name, "My Page");
        assert_eq!(template.elements[0].id, id.to_string());

        let copy = Editor::from_template(EditorConfig::default(), &template);
        let element = copy.elements().next().expect("one element");
        assert_eq!(element.kind, ElementKind::Heading);
        assert_ne!(element.id, id);
    }

    #[test]
    fn test_undo_add_clears_selection() {
        let mut editor = Editor::default();
        editor.add_element(ElementKind::Text);
        assert!(editor.undo());
        assert!(editor.canvas().is_empty());
        assert_eq!(editor.selected(), None);
        assert!(editor.can_redo());
    }

    #[test]
    fn test_apply_panel_targets_selection() {
        let mut editor = Editor::default();
        let id = editor.add_element(ElementKind::Shape);
        let edit = PanelEdit::Numeric {
            field: crate::properties::NumericField::Width,
            input: "abc".to_string(),
        };
        assert!(editor.apply_panel(&edit));
        assert!(approx(editor.element(id).expect("exists").geometry.width, 50.0));

        editor.clear_selection();
        assert!(!editor.apply_panel(&edit));
        assert!(editor.panel().is_none());
    }

    #[test]
    fn test_scene_document_shape() {
        let mut editor = Editor::default();
        let id = editor.add_element(ElementKind::Heading);
        let json = serde_json::to_value(editor.scene()).expect("serialize");

        assert_eq!(json["selected"], id.to_string());
        assert_eq!(json["gesture"]["state"], "idle");
        assert_eq!(json["canvas"]["viewMode"], "desktop");
        assert_eq!(json["elements"][0]["type"], "heading");
    }
}
