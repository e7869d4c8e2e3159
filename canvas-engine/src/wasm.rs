//! WebAssembly bindings for canvas-engine.
//!
//! This module provides JavaScript-callable functions when compiled to WASM.
//! Structured values cross the boundary as JSON strings in the same shape as
//! the persisted document.

use wasm_bindgen::prelude::*;

use crate::{
    CanvasEditor, CanvasError, EditorConfig, ElementId, ElementPatch, ElementSpec, KeyPress,
    Point, Rect, Size,
};

/// Initialize the canvas WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages
    console_error_panic_hook::set_once();
    web_sys::console::debug_1(&JsValue::from_str(&format!(
        "canvas-engine {} ready",
        crate::VERSION
    )));
}

fn js_err(e: CanvasError) -> String {
    e.to_string()
}

fn parse_id(id: &str) -> Result<ElementId, String> {
    ElementId::parse(id).map_err(|e| format!("invalid element id {id}: {e}"))
}

fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, String> {
    serde_json::to_string(value).map_err(|e| e.to_string())
}

/// Canvas editor instance for WASM.
#[wasm_bindgen]
pub struct WasmCanvasEditor {
    editor: CanvasEditor,
}

#[wasm_bindgen]
impl WasmCanvasEditor {
    /// Create an editor with the default configuration.
    #[wasm_bindgen(constructor)]
    #[must_use]
    pub fn new() -> Self {
        Self {
            editor: CanvasEditor::default(),
        }
    }

    /// Create an editor from a JSON `EditorConfig`.
    ///
    /// # Errors
    ///
    /// Returns an error string if the config is malformed.
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config_json: &str) -> Result<WasmCanvasEditor, String> {
        let config = EditorConfig::from_json(config_json).map_err(js_err)?;
        Ok(Self {
            editor: CanvasEditor::new(config),
        })
    }

    /// Add an element from a JSON spec, returning its id.
    ///
    /// # Errors
    ///
    /// Returns an error string if the spec is invalid.
    #[wasm_bindgen(js_name = addElement)]
    pub fn add_element(&mut self, spec_json: &str) -> Result<String, String> {
        let spec = ElementSpec::from_json(spec_json).map_err(js_err)?;
        let id = self.editor.add_element(spec).map_err(js_err)?;
        Ok(id.to_string())
    }

    /// Get an element as JSON, or `undefined` if it doesn't exist.
    #[wasm_bindgen(js_name = getElement)]
    #[must_use]
    pub fn get_element(&self, id: &str) -> Option<String> {
        let id = ElementId::parse(id).ok()?;
        self.editor
            .element(id)
            .and_then(|element| serde_json::to_string(element).ok())
    }

    /// Get every element as a JSON array in paint order.
    ///
    /// # Errors
    ///
    /// Returns an error string if serialization fails.
    #[wasm_bindgen(js_name = getAllElements)]
    pub fn get_all_elements(&self) -> Result<String, String> {
        to_json(&self.editor.elements())
    }

    /// Apply a JSON patch to an element.
    ///
    /// # Errors
    ///
    /// Returns an error string for unknown ids or invalid patches.
    #[wasm_bindgen(js_name = updateElement)]
    pub fn update_element(&mut self, id: &str, patch_json: &str) -> Result<(), String> {
        let patch: ElementPatch = serde_json::from_str(patch_json).map_err(|e| e.to_string())?;
        self.editor
            .update_element(parse_id(id)?, &patch)
            .map_err(js_err)
    }

    /// Move an element.
    ///
    /// # Errors
    ///
    /// Returns an error string for unknown ids or non-finite positions.
    #[wasm_bindgen(js_name = moveElement)]
    pub fn move_element(&mut self, id: &str, x: f64, y: f64) -> Result<(), String> {
        self.editor
            .move_element(parse_id(id)?, Point::new(x, y))
            .map_err(js_err)
    }

    /// Resize an element.
    ///
    /// # Errors
    ///
    /// Returns an error string for unknown ids, connectors or invalid sizes.
    #[wasm_bindgen(js_name = resizeElement)]
    pub fn resize_element(&mut self, id: &str, width: f64, height: f64) -> Result<(), String> {
        self.editor
            .resize_element(parse_id(id)?, Size::new(width, height))
            .map_err(js_err)
    }

    /// Rotate an element to an absolute angle in degrees.
    ///
    /// # Errors
    ///
    /// Returns an error string for unknown ids, connectors or invalid angles.
    #[wasm_bindgen(js_name = rotateElement)]
    pub fn rotate_element(&mut self, id: &str, degrees: f64) -> Result<(), String> {
        self.editor
            .rotate_element(parse_id(id)?, degrees)
            .map_err(js_err)
    }

    /// Delete an element.
    ///
    /// # Errors
    ///
    /// Returns an error string for unknown ids.
    #[wasm_bindgen(js_name = deleteElement)]
    pub fn delete_element(&mut self, id: &str) -> Result<(), String> {
        self.editor.delete_element(parse_id(id)?).map_err(js_err)
    }

    /// Paint an element above all others.
    ///
    /// # Errors
    ///
    /// Returns an error string for unknown ids.
    #[wasm_bindgen(js_name = bringToFront)]
    pub fn bring_to_front(&mut self, id: &str) -> Result<(), String> {
        self.editor.bring_to_front(parse_id(id)?).map_err(js_err)
    }

    /// Paint an element below all others.
    ///
    /// # Errors
    ///
    /// Returns an error string for unknown ids.
    #[wasm_bindgen(js_name = sendToBack)]
    pub fn send_to_back(&mut self, id: &str) -> Result<(), String> {
        self.editor.send_to_back(parse_id(id)?).map_err(js_err)
    }

    /// Pan the viewport by a document-space delta.
    #[wasm_bindgen(js_name = panViewport)]
    pub fn pan_viewport(&mut self, dx: f64, dy: f64) {
        self.editor.pan_viewport(dx, dy);
    }

    /// Set the zoom, returning the clamped value applied.
    #[wasm_bindgen(js_name = setZoom)]
    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        self.editor.set_zoom(zoom)
    }

    /// Zoom around a container point.
    #[wasm_bindgen(js_name = zoomAt)]
    pub fn zoom_at(&mut self, screen_x: f64, screen_y: f64, factor: f64) {
        self.editor.zoom_at(Point::new(screen_x, screen_y), factor);
    }

    /// Center the view on a document point.
    #[wasm_bindgen(js_name = centerOn)]
    pub fn center_on(&mut self, x: f64, y: f64) {
        self.editor.center_on(Point::new(x, y));
    }

    /// Fit every element into the container.
    #[wasm_bindgen(js_name = fitToView)]
    pub fn fit_to_view(&mut self) {
        self.editor.fit_to_view();
    }

    /// Resize the host container.
    #[wasm_bindgen(js_name = setContainerSize)]
    pub fn set_container_size(&mut self, width: f64, height: f64) {
        self.editor.set_container_size(width, height);
    }

    /// Current zoom factor.
    #[wasm_bindgen(js_name = getZoom)]
    #[must_use]
    pub fn get_zoom(&self) -> f64 {
        self.editor.viewport().zoom()
    }

    /// Visible document rectangle as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error string if serialization fails.
    #[wasm_bindgen(js_name = getVisibleRect)]
    pub fn get_visible_rect(&self) -> Result<String, String> {
        to_json(&self.editor.visible_rect())
    }

    /// Visible elements as a JSON array in paint order.
    ///
    /// # Errors
    ///
    /// Returns an error string if serialization fails.
    #[wasm_bindgen(js_name = getVisibleElements)]
    pub fn get_visible_elements(&self) -> Result<String, String> {
        to_json(&self.editor.visible_elements())
    }

    /// Select an element.
    ///
    /// # Errors
    ///
    /// Returns an error string for unknown ids.
    #[wasm_bindgen(js_name = selectElement)]
    pub fn select_element(&mut self, id: &str, add_to_selection: bool) -> Result<(), String> {
        self.editor
            .select_element(parse_id(id)?, add_to_selection)
            .map_err(js_err)
    }

    /// Select every element intersecting a document rectangle.
    ///
    /// # Errors
    ///
    /// Returns an error string for a non-finite rectangle.
    #[wasm_bindgen(js_name = selectInRect)]
    pub fn select_in_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> Result<usize, String> {
        self.editor
            .select_in_rect(Rect::new(x, y, width, height))
            .map_err(js_err)
    }

    /// Select every element.
    #[wasm_bindgen(js_name = selectAll)]
    pub fn select_all(&mut self) {
        self.editor.select_all();
    }

    /// Empty the selection.
    #[wasm_bindgen(js_name = clearSelection)]
    pub fn clear_selection(&mut self) {
        self.editor.clear_selection();
    }

    /// Selected ids as a JSON array.
    ///
    /// # Errors
    ///
    /// Returns an error string if serialization fails.
    #[wasm_bindgen(js_name = getSelectedElements)]
    pub fn get_selected_elements(&self) -> Result<String, String> {
        to_json(&self.editor.selected_ids())
    }

    /// Move the selection as one undoable step.
    ///
    /// # Errors
    ///
    /// Returns an error string for a non-finite delta.
    #[wasm_bindgen(js_name = moveSelected)]
    pub fn move_selected(&mut self, dx: f64, dy: f64) -> Result<usize, String> {
        self.editor.move_selected(dx, dy).map_err(js_err)
    }

    /// Delete the selection as one undoable step.
    #[wasm_bindgen(js_name = deleteSelected)]
    pub fn delete_selected(&mut self) -> usize {
        self.editor.delete_selected()
    }

    /// Undo the last action.
    pub fn undo(&mut self) -> bool {
        self.editor.undo()
    }

    /// Redo the last undone action.
    pub fn redo(&mut self) -> bool {
        self.editor.redo()
    }

    /// Whether undo is available.
    #[wasm_bindgen(js_name = canUndo)]
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.editor.can_undo()
    }

    /// Whether redo is available.
    #[wasm_bindgen(js_name = canRedo)]
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.editor.can_redo()
    }

    /// Whether there are unsaved changes.
    #[wasm_bindgen(js_name = isDirty)]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.editor.is_dirty()
    }

    /// Handle a DOM-style key descriptor, returning the action performed as
    /// JSON, or `undefined` if the key is unbound.
    ///
    /// # Errors
    ///
    /// Returns an error string if the descriptor is malformed or the action
    /// fails.
    #[wasm_bindgen(js_name = handleKeyPress)]
    pub fn handle_key_press(&mut self, key_json: &str) -> Result<Option<String>, String> {
        let press = KeyPress::from_json(key_json).map_err(|e| e.to_string())?;
        match self.editor.handle_key_press(&press).map_err(js_err)? {
            Some(action) => to_json(&action).map(Some),
            None => Ok(None),
        }
    }

    /// Serialize the document.
    ///
    /// # Errors
    ///
    /// Returns an error string if serialization fails.
    pub fn serialize(&self) -> Result<String, String> {
        self.editor.serialize().map_err(js_err)
    }

    /// Replace the document with a serialized one.
    ///
    /// # Errors
    ///
    /// Returns an error string if the snapshot is invalid; the document is
    /// left untouched.
    pub fn deserialize(&mut self, json: &str) -> Result<(), String> {
        self.editor.deserialize(json).map_err(js_err)
    }
}

impl Default for WasmCanvasEditor {
    fn default() -> Self {
        Self::new()
    }
}
