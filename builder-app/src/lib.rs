//! # Site Builder WASM Application
//!
//! JavaScript bindings for the canvas editor, used by the host page that
//! renders the canvas, layer list and properties panel.
//!
//! ## Usage
//!
//! Build for WASM:
//! ```bash
//! wasm-pack build --target web builder-app
//! ```
//!
//! Then import in JavaScript:
//! ```javascript
//! import init, { EditorApp } from './pkg/builder_app.js';
//!
//! await init();
//! const app = new EditorApp();
//! app.setOnChange(() => paint(JSON.parse(app.getRenderJson())));
//!
//! const rect = canvasEl.getBoundingClientRect();
//! app.setBounds(rect.left, rect.top, rect.width, rect.height);
//! app.addElement('text');
//! ```
//!
//! Pointer positions are client coordinates, the same frame as
//! `getBoundingClientRect`. Once a drag or resize starts, the app listens for
//! `mousemove`/`mouseup` on `document` until the gesture ends.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

use std::cell::RefCell;
use std::fmt::Display;
use std::rc::{Rc, Weak};

use builder_core::{
    AddRequest, CaptureGuard, Editor, EditorConfig, ElementId, ElementKind, ElementPatch, Key, PanelEdit,
    Point, PointerCapture, ResizeHandle, TemplateDocument, ViewMode, PALETTE,
};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, FocusEvent, MouseEvent, Window};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init_wasm() {
    console_error_panic_hook::set_once();
    tracing::info!("Site builder WASM initialized");
}

type EditorHandle = Rc<RefCell<Editor>>;
type ChangeHandle = Rc<RefCell<Option<js_sys::Function>>>;

fn js_error(err: impl Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn parse_id(id: &str) -> Result<ElementId, JsValue> {
    ElementId::parse(id).map_err(js_error)
}

#[allow(clippy::cast_precision_loss)]
fn client_point(event: &MouseEvent) -> Point {
    Point::new(event.client_x() as f32, event.client_y() as f32)
}

fn notify(on_change: &ChangeHandle) {
    let callback = on_change.borrow().clone();
    if let Some(callback) = callback {
        if let Err(err) = callback.call0(&JsValue::NULL) {
            tracing::warn!("onChange callback failed: {:?}", err);
        }
    }
}

/// Document-level listeners used while a gesture is active.
///
/// Created once per app; gestures only add and remove their registration.
struct GestureListeners {
    on_move: Closure<dyn FnMut(MouseEvent)>,
    on_up: Closure<dyn FnMut(MouseEvent)>,
}

impl GestureListeners {
    fn new(editor: Weak<RefCell<Editor>>, on_change: &ChangeHandle) -> Self {
        let move_editor = editor.clone();
        let move_change = Rc::clone(on_change);
        let on_move = Closure::wrap(Box::new(move |event: MouseEvent| {
            let Some(handle) = move_editor.upgrade() else {
                return;
            };
            let Ok(mut editor) = handle.try_borrow_mut() else {
                return;
            };
            editor.pointer_move(client_point(&event));
            drop(editor);
            notify(&move_change);
        }) as Box<dyn FnMut(MouseEvent)>);

        let up_change = Rc::clone(on_change);
        let on_up = Closure::wrap(Box::new(move |_event: MouseEvent| {
            let Some(handle) = editor.upgrade() else {
                return;
            };
            let Ok(mut editor) = handle.try_borrow_mut() else {
                return;
            };
            editor.pointer_up();
            drop(editor);
            notify(&up_change);
        }) as Box<dyn FnMut(MouseEvent)>);

        Self { on_move, on_up }
    }

    fn move_fn(&self) -> &js_sys::Function {
        self.on_move.as_ref().unchecked_ref()
    }

    fn up_fn(&self) -> &js_sys::Function {
        self.on_up.as_ref().unchecked_ref()
    }
}

/// Pointer capture backed by `document` event listeners.
struct DocumentCapture {
    document: Document,
    listeners: Rc<GestureListeners>,
}

impl PointerCapture for DocumentCapture {
    fn acquire(&self) -> CaptureGuard {
        let listeners = &self.listeners;
        if let Err(err) = self
            .document
            .add_event_listener_with_callback("mousemove", listeners.move_fn())
            .and_then(|()| {
                self.document
                    .add_event_listener_with_callback("mouseup", listeners.up_fn())
            })
        {
            tracing::warn!("Failed to subscribe to pointer events: {:?}", err);
        }

        let document = self.document.clone();
        let listeners = Rc::clone(&self.listeners);
        CaptureGuard::new(move || {
            let removed = document
                .remove_event_listener_with_callback("mousemove", listeners.move_fn())
                .and_then(|()| {
                    document.remove_event_listener_with_callback("mouseup", listeners.up_fn())
                });
            if let Err(err) = removed {
                tracing::warn!("Failed to release pointer events: {:?}", err);
            }
        })
    }
}

/// Window `blur` listener that cancels an abandoned gesture.
struct BlurListener {
    window: Window,
    callback: Closure<dyn FnMut(FocusEvent)>,
}

impl BlurListener {
    fn install(
        window: Window,
        editor: Weak<RefCell<Editor>>,
        on_change: &ChangeHandle,
    ) -> Result<Self, JsValue> {
        let on_change = Rc::clone(on_change);
        let callback = Closure::wrap(Box::new(move |_event: FocusEvent| {
            let Some(handle) = editor.upgrade() else {
                return;
            };
            let cancelled = handle
                .try_borrow_mut()
                .is_ok_and(|mut editor| editor.cancel_gesture());
            if cancelled {
                notify(&on_change);
            }
        }) as Box<dyn FnMut(FocusEvent)>);

        window.add_event_listener_with_callback("blur", callback.as_ref().unchecked_ref())?;
        Ok(Self { window, callback })
    }
}

impl Drop for BlurListener {
    fn drop(&mut self) {
        if let Err(err) = self
            .window
            .remove_event_listener_with_callback("blur", self.callback.as_ref().unchecked_ref())
        {
            tracing::warn!("Failed to remove blur listener: {:?}", err);
        }
    }
}

/// The canvas editor exposed to JavaScript.
#[wasm_bindgen]
pub struct EditorApp {
    editor: EditorHandle,
    on_change: ChangeHandle,
    /// Present when running with a DOM.
    blur: Option<BlurListener>,
}

impl EditorApp {
    /// Run `f` against the editor, then notify the page.
    fn mutate<T>(&self, f: impl FnOnce(&mut Editor) -> T) -> T {
        let mut editor = self.editor.borrow_mut();
        let result = f(&mut *editor);
        drop(editor);
        notify(&self.on_change);
        result
    }
}

#[wasm_bindgen]
impl EditorApp {
    /// Create an editor, optionally from a JSON config.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is malformed or fails validation.
    #[wasm_bindgen(constructor)]
    #[allow(clippy::needless_pass_by_value)]
    pub fn new(config_json: Option<String>) -> Result<EditorApp, JsValue> {
        let config = match config_json {
            Some(json) => EditorConfig::from_json(&json).map_err(js_error)?,
            None => EditorConfig::default(),
        };

        let editor = Rc::new(RefCell::new(Editor::new(config)));
        let on_change: ChangeHandle = Rc::new(RefCell::new(None));

        let mut blur = None;
        if let Some(window) = web_sys::window() {
            if let Some(document) = window.document() {
                let listeners = Rc::new(GestureListeners::new(Rc::downgrade(&editor), &on_change));
                editor
                    .borrow_mut()
                    .set_pointer_capture(Box::new(DocumentCapture {
                        document,
                        listeners,
                    }));
            }
            blur = Some(BlurListener::install(
                window,
                Rc::downgrade(&editor),
                &on_change,
            )?);
        } else {
            tracing::debug!("No window object; pointer capture disabled");
        }

        Ok(Self {
            editor,
            on_change,
            blur,
        })
    }

    /// Register a callback invoked after every change. Pass `undefined` to
    /// remove it.
    #[wasm_bindgen(js_name = setOnChange)]
    pub fn set_on_change(&self, callback: Option<js_sys::Function>) {
        *self.on_change.borrow_mut() = callback;
    }

    /// Whether the app is listening for window blur.
    #[wasm_bindgen(js_name = hasDomCapture)]
    #[must_use]
    pub fn has_dom_capture(&self) -> bool {
        self.blur.is_some()
    }

    // ---------------------------------------------------------------
    // Inbound contract
    // ---------------------------------------------------------------

    /// Add an element of the given kind. Returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if `kind` is not an element kind.
    #[wasm_bindgen(js_name = addElement)]
    pub fn add_element(&self, kind: &str) -> Result<String, JsValue> {
        let kind: ElementKind = kind.parse().map_err(js_error)?;
        let request = AddRequest { kind };
        Ok(self.mutate(|editor| editor.handle_add(request)).to_string())
    }

    /// Add the element for the palette entry at `index`, as listed by
    /// `getPaletteJson`. Returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if `index` is past the end of the palette.
    #[wasm_bindgen(js_name = addFromPalette)]
    pub fn add_from_palette(&self, index: usize) -> Result<String, JsValue> {
        let entry = PALETTE
            .get(index)
            .ok_or_else(|| JsValue::from_str(&format!("No palette entry at {index}")))?;
        let request = AddRequest::from(entry);
        Ok(self.mutate(|editor| editor.handle_add(request)).to_string())
    }

    /// Select an element. Returns `false` for an unknown ID.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is not a valid element ID.
    pub fn select(&self, id: &str) -> Result<bool, JsValue> {
        let id = parse_id(id)?;
        Ok(self.mutate(|editor| editor.select(id)))
    }

    /// Select nothing.
    #[wasm_bindgen(js_name = clearSelection)]
    pub fn clear_selection(&self) {
        self.mutate(Editor::clear_selection);
    }

    /// Apply a partial update given as JSON, e.g. `{"x": 10, "style": {"color": "#f00"}}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the ID or the patch JSON is invalid.
    pub fn update(&self, id: &str, patch_json: &str) -> Result<bool, JsValue> {
        let id = parse_id(id)?;
        let patch: ElementPatch = serde_json::from_str(patch_json).map_err(js_error)?;
        Ok(self.mutate(|editor| editor.update(id, &patch)))
    }

    /// Delete an element. Returns `false` for an unknown ID.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is not a valid element ID.
    #[wasm_bindgen(js_name = deleteElement)]
    pub fn delete_element(&self, id: &str) -> Result<bool, JsValue> {
        let id = parse_id(id)?;
        Ok(self.mutate(|editor| editor.delete(id)))
    }

    /// Duplicate an element. Returns the copy's ID.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is not a valid element ID.
    pub fn duplicate(&self, id: &str) -> Result<Option<String>, JsValue> {
        let id = parse_id(id)?;
        Ok(self
            .mutate(|editor| editor.duplicate(id))
            .map(|copy| copy.to_string()))
    }

    /// Apply a properties panel edit to the selected element.
    ///
    /// # Errors
    ///
    /// Returns an error if the edit JSON is invalid.
    #[wasm_bindgen(js_name = applyPanelEdit)]
    pub fn apply_panel_edit(&self, edit_json: &str) -> Result<bool, JsValue> {
        let edit: PanelEdit = serde_json::from_str(edit_json).map_err(js_error)?;
        Ok(self.mutate(|editor| editor.apply_panel(&edit)))
    }

    // ---------------------------------------------------------------
    // Pointer input
    // ---------------------------------------------------------------

    /// Pointer-down on an element body: select it and start a drag.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is not a valid element ID.
    #[wasm_bindgen(js_name = pointerDownElement)]
    pub fn pointer_down_element(&self, id: &str, x: f32, y: f32) -> Result<bool, JsValue> {
        let id = parse_id(id)?;
        Ok(self.mutate(|editor| editor.begin_drag(id, Point::new(x, y))))
    }

    /// Pointer-down on a resize handle, e.g. `"bottom-right"`.
    ///
    /// # Errors
    ///
    /// Returns an error if the ID or handle name is invalid.
    #[wasm_bindgen(js_name = pointerDownHandle)]
    pub fn pointer_down_handle(
        &self,
        id: &str,
        handle: &str,
        x: f32,
        y: f32,
    ) -> Result<bool, JsValue> {
        let id = parse_id(id)?;
        let handle: ResizeHandle = handle.parse().map_err(js_error)?;
        Ok(self.mutate(|editor| editor.begin_resize(id, handle, Point::new(x, y))))
    }

    /// Pointer-down on empty canvas.
    #[wasm_bindgen(js_name = pointerDownCanvas)]
    pub fn pointer_down_canvas(&self) {
        self.mutate(Editor::click_background);
    }

    /// Pointer move, for hosts that forward moves themselves.
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&self, x: f32, y: f32) {
        self.mutate(|editor| editor.pointer_move(Point::new(x, y)));
    }

    /// Pointer release.
    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&self) {
        self.mutate(Editor::pointer_up);
    }

    /// Pointer left the tracked region.
    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&self) {
        self.mutate(Editor::pointer_leave);
    }

    /// Abandon the active gesture.
    #[wasm_bindgen(js_name = cancelGesture)]
    pub fn cancel_gesture(&self) -> bool {
        self.mutate(Editor::cancel_gesture)
    }

    /// Double-click on an element: enter edit mode for text.
    ///
    /// # Errors
    ///
    /// Returns an error if `id` is not a valid element ID.
    #[wasm_bindgen(js_name = doubleClick)]
    pub fn double_click(&self, id: &str) -> Result<bool, JsValue> {
        let id = parse_id(id)?;
        Ok(self.mutate(|editor| editor.enter_edit(id)))
    }

    /// Resolve a point to a target, as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    #[wasm_bindgen(js_name = targetAt)]
    pub fn target_at(&self, x: f32, y: f32) -> Result<String, JsValue> {
        let target = self.editor.borrow().target_at(Point::new(x, y));
        serde_json::to_string(&target).map_err(js_error)
    }

    // ---------------------------------------------------------------
    // Edit mode
    // ---------------------------------------------------------------

    /// Handle a `KeyboardEvent.key`. Returns whether it was consumed.
    #[wasm_bindgen(js_name = keyDown)]
    pub fn key_down(&self, key: &str) -> bool {
        match Key::from_dom(key) {
            Some(key) => self.mutate(|editor| editor.handle_key(key)),
            None => false,
        }
    }

    /// Replace the edit draft.
    #[wasm_bindgen(js_name = setDraft)]
    pub fn set_draft(&self, text: &str) -> bool {
        self.mutate(|editor| editor.set_draft(text))
    }

    /// Commit the edit draft (blur or Enter).
    #[wasm_bindgen(js_name = commitEdit)]
    pub fn commit_edit(&self) -> bool {
        self.mutate(Editor::commit_edit)
    }

    /// Discard the edit draft (Escape).
    #[wasm_bindgen(js_name = cancelEdit)]
    pub fn cancel_edit(&self) -> bool {
        self.mutate(Editor::cancel_edit)
    }

    // ---------------------------------------------------------------
    // History and frame
    // ---------------------------------------------------------------

    /// Undo the last change.
    pub fn undo(&self) -> bool {
        self.mutate(Editor::undo)
    }

    /// Redo the last undone change.
    pub fn redo(&self) -> bool {
        self.mutate(Editor::redo)
    }

    /// Whether undo is available.
    #[wasm_bindgen(js_name = canUndo)]
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.editor.borrow().can_undo()
    }

    /// Whether redo is available.
    #[wasm_bindgen(js_name = canRedo)]
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.editor.borrow().can_redo()
    }

    /// Switch between `desktop`, `tablet` and `mobile`.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown mode.
    #[wasm_bindgen(js_name = setViewMode)]
    pub fn set_view_mode(&self, mode: &str) -> Result<(), JsValue> {
        let mode: ViewMode =
            serde_json::from_value(serde_json::Value::String(mode.to_string())).map_err(js_error)?;
        self.mutate(|editor| editor.set_view_mode(mode));
        Ok(())
    }

    /// Update the canvas bounding box, in client coordinates.
    #[wasm_bindgen(js_name = setBounds)]
    pub fn set_bounds(&self, left: f32, top: f32, width: f32, height: f32) {
        self.mutate(|editor| editor.set_canvas_bounds(Point::new(left, top), width, height));
    }

    /// Replace the canvas contents with a template.
    ///
    /// # Errors
    ///
    /// Returns an error if the template JSON is invalid.
    #[wasm_bindgen(js_name = loadTemplate)]
    pub fn load_template(&self, json: &str) -> Result<(), JsValue> {
        let template = TemplateDocument::from_json(json).map_err(js_error)?;
        self.mutate(|editor| editor.load_template(&template));
        Ok(())
    }

    /// Save the canvas as template JSON, loadable with `loadTemplate`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    #[wasm_bindgen(js_name = saveTemplate)]
    pub fn save_template(&self, id: &str, name: &str) -> Result<String, JsValue> {
        let template = self.editor.borrow().to_template(id, name);
        serde_json::to_string(&template).map_err(js_error)
    }

    // ---------------------------------------------------------------
    // Outbound
    // ---------------------------------------------------------------

    /// Selected element ID.
    #[wasm_bindgen(js_name = selectedId)]
    #[must_use]
    pub fn selected_id(&self) -> Option<String> {
        self.editor.borrow().selected().map(|id| id.to_string())
    }

    /// Number of elements on the canvas.
    #[wasm_bindgen(js_name = elementCount)]
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.editor.borrow().canvas().len()
    }

    /// The scene feed as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    #[wasm_bindgen(js_name = getSceneJson)]
    pub fn get_scene_json(&self) -> Result<String, JsValue> {
        self.editor.borrow().scene().to_json().map_err(js_error)
    }

    /// Elements with render flags, as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    #[wasm_bindgen(js_name = getRenderJson)]
    pub fn get_render_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.editor.borrow().render_list()).map_err(js_error)
    }

    /// Layer list rows, as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    #[wasm_bindgen(js_name = getLayersJson)]
    pub fn get_layers_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.editor.borrow().layers()).map_err(js_error)
    }

    /// Properties panel view of the selection, as JSON (`null` if none).
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    #[wasm_bindgen(js_name = getPanelJson)]
    pub fn get_panel_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&self.editor.borrow().panel()).map_err(js_error)
    }

    /// Palette entries, as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    #[wasm_bindgen(js_name = getPaletteJson)]
    pub fn get_palette_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(&PALETTE).map_err(js_error)
    }
}
