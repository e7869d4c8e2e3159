//! The canvas editor façade.
//!
//! [`CanvasEditor`] composes the element store, viewport, selection, history
//! and key bindings of one open document. It is the only type a host needs:
//! every document mutation goes through one of its methods, which builds a
//! [`Command`] and commits it through the history engine, so every change is
//! undoable and no unrecorded mutation path exists.
//!
//! ```
//! use canvas_engine::{CanvasEditor, ElementSpec};
//!
//! let mut editor = CanvasEditor::default();
//! let id = editor.add_element(ElementSpec::text("Hello").at(10.0, 20.0).sized(200.0, 50.0))?;
//! editor.select_element(id, false)?;
//! editor.move_selected(5.0, 5.0)?;
//! editor.undo();
//! assert_eq!(editor.element(id).and_then(|e| e.x), Some(10.0));
//! # Ok::<(), canvas_engine::CanvasError>(())
//! ```

use crate::config::EditorConfig;
use crate::element::{CanvasElement, ElementPatch, ElementSpec, ElementType};
use crate::error::{CanvasError, CanvasResult};
use crate::event::KeyPress;
use crate::geometry::{Point, Rect, Size};
use crate::history::{Command, History};
use crate::id::{now_ms, DocumentId, ElementId};
use crate::input::{EditorAction, KeyChord, KeyMap};
use crate::persistence::DocumentStore;
use crate::render::ElementPainter;
use crate::schema::{CanvasDocument, DocumentMetadata};
use crate::selection::Selection;
use crate::store::ElementStore;
use crate::viewport::Viewport;

/// A serialized snapshot waiting to be written to a document store.
///
/// Produced by [`CanvasEditor::prepare_save`] and handed back to
/// [`CanvasEditor::complete_save`] once the bytes are durable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSave {
    document_id: DocumentId,
    title: String,
    saved_at: u64,
    bytes: Vec<u8>,
    generation: u64,
    revision: u64,
}

impl PendingSave {
    /// Key to store the bytes under.
    #[must_use]
    pub const fn document_id(&self) -> DocumentId {
        self.document_id
    }

    /// Serialized document.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// One open canvas document and its editing state.
///
/// Editors share nothing; several can be open side by side.
#[derive(Debug, Clone)]
pub struct CanvasEditor {
    config: EditorConfig,
    store: ElementStore,
    viewport: Viewport,
    selection: Selection,
    history: History,
    keymap: KeyMap,
    metadata: DocumentMetadata,
    /// Bumped on every committed change to the document.
    revision: u64,
    /// Revision captured by the last completed save or load.
    saved_revision: u64,
    /// Bumped whenever the open document is replaced wholesale.
    generation: u64,
}

impl CanvasEditor {
    /// Create an editor with an empty, untitled document.
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self {
            store: ElementStore::new(config.spatial_cell_size),
            viewport: Viewport::new(config.container_width, config.container_height),
            selection: Selection::new(),
            history: History::new(config.max_history_size),
            keymap: KeyMap::with_nudge_steps(config.nudge_step, config.nudge_step_large),
            metadata: DocumentMetadata::default(),
            revision: 0,
            saved_revision: 0,
            generation: 0,
            config,
        }
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// Editor configuration.
    #[must_use]
    pub const fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Read-only view of the element store.
    #[must_use]
    pub const fn store(&self) -> &ElementStore {
        &self.store
    }

    /// Current camera.
    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Current selection.
    #[must_use]
    pub const fn selection(&self) -> &Selection {
        &self.selection
    }

    /// Undo/redo stacks.
    #[must_use]
    pub const fn history(&self) -> &History {
        &self.history
    }

    /// Active key bindings.
    #[must_use]
    pub const fn keymap(&self) -> &KeyMap {
        &self.keymap
    }

    /// Metadata of the open document.
    #[must_use]
    pub const fn metadata(&self) -> &DocumentMetadata {
        &self.metadata
    }

    /// Id of the open document.
    #[must_use]
    pub const fn document_id(&self) -> DocumentId {
        self.metadata.id
    }

    /// Whether the document changed since it was last saved or loaded.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.revision != self.saved_revision
    }

    // -----------------------------------------------------------------------
    // Elements
    // -----------------------------------------------------------------------

    /// Validate a spec and add it as a new element on top of everything.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Validation`] if the spec is malformed; the
    /// document is left unchanged.
    pub fn add_element(&mut self, spec: ElementSpec) -> CanvasResult<ElementId> {
        let id = ElementId::new();
        let element = spec.into_element(id, self.store.next_z_index(), now_ms())?;
        self.commit("add element", Command::Insert(vec![element]));
        Ok(id)
    }

    /// Look up an element. `None` means it doesn't exist.
    #[must_use]
    pub fn element(&self, id: ElementId) -> Option<&CanvasElement> {
        self.store.get(id)
    }

    /// Owned copy of every element in paint order.
    #[must_use]
    pub fn elements(&self) -> Vec<CanvasElement> {
        self.store.snapshot()
    }

    /// Number of elements in the document.
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.store.len()
    }

    /// Apply a partial update to one element. An empty patch is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::ElementNotFound`] for an unknown id and
    /// [`CanvasError::Validation`] if the patched element is invalid.
    pub fn update_element(&mut self, id: ElementId, patch: &ElementPatch) -> CanvasResult<()> {
        let before = self.require(id)?;
        if patch.is_empty() {
            return Ok(());
        }
        let after = patch.apply_to(before)?;
        self.replace_one("update element", after);
        Ok(())
    }

    /// Move an element's origin to `position`.
    ///
    /// Connectors are translated so the minimum corner of their endpoints
    /// lands on `position`.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::ElementNotFound`] for an unknown id and
    /// [`CanvasError::Validation`] for a non-finite position.
    pub fn move_element(&mut self, id: ElementId, position: Point) -> CanvasResult<()> {
        let mut after = self.require(id)?.clone();
        after.move_to(position);
        after.validate()?;
        self.replace_one("move element", after);
        Ok(())
    }

    /// Set an element's width and height.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::ElementNotFound`] for an unknown id,
    /// [`CanvasError::InvalidOperation`] for connectors and
    /// [`CanvasError::Validation`] for a non-positive or non-finite size.
    pub fn resize_element(&mut self, id: ElementId, size: Size) -> CanvasResult<()> {
        let before = self.require(id)?;
        let element_type = before.element_type();
        if !element_type.is_resizable() {
            return Err(CanvasError::InvalidOperation(format!(
                "{element_type} elements cannot be resized"
            )));
        }
        let mut after = before.clone();
        after.width = Some(size.width);
        after.height = Some(size.height);
        after.validate()?;
        self.replace_one("resize element", after);
        Ok(())
    }

    /// Set an element's rotation in degrees.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::ElementNotFound`] for an unknown id,
    /// [`CanvasError::InvalidOperation`] for connectors and
    /// [`CanvasError::Validation`] for a non-finite angle.
    pub fn rotate_element(&mut self, id: ElementId, degrees: f64) -> CanvasResult<()> {
        let before = self.require(id)?;
        if before.element_type() == ElementType::Connector {
            return Err(CanvasError::InvalidOperation(
                "connector elements cannot be rotated".to_string(),
            ));
        }
        let mut after = before.clone();
        after.rotation = degrees;
        after.validate()?;
        self.replace_one("rotate element", after);
        Ok(())
    }

    /// Remove an element, pruning it from the selection.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::ElementNotFound`] for an unknown id.
    pub fn delete_element(&mut self, id: ElementId) -> CanvasResult<()> {
        let element = self.require(id)?.clone();
        self.commit("delete element", Command::Remove(vec![element]));
        Ok(())
    }

    /// Paint an element after all others.
    ///
    /// Does nothing (and records nothing) if it is already the only
    /// element at the top.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::ElementNotFound`] for an unknown id.
    pub fn bring_to_front(&mut self, id: ElementId) -> CanvasResult<()> {
        let before = self.require(id)?.clone();
        let sole_top = {
            let mut from_top = self.store.paint_order().rev();
            let on_top = from_top.next().is_some_and(|top| top.id == id);
            let tied = from_top
                .next()
                .is_some_and(|next| next.z_index == before.z_index);
            on_top && !tied
        };
        if sole_top {
            return Ok(());
        }

        match self.store.max_z_index().and_then(|max| max.checked_add(1)) {
            Some(z_index) => {
                let mut after = before;
                after.z_index = z_index;
                self.replace_one("bring to front", after);
            }
            // No room above the maximum: renumber from 0 with the target last.
            None => self.renumber_paint_order("bring to front", id, false),
        }
        Ok(())
    }

    /// Paint an element before all others.
    ///
    /// The paint order is renumbered contiguously: the element gets z-index
    /// 0 and the rest keep their relative order from 1 upward.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::ElementNotFound`] for an unknown id.
    pub fn send_to_back(&mut self, id: ElementId) -> CanvasResult<()> {
        self.require(id)?;
        self.renumber_paint_order("send to back", id, true);
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Viewport
    // -----------------------------------------------------------------------

    /// Translate the pan offset by a document-space delta.
    pub fn pan_viewport(&mut self, dx: f64, dy: f64) {
        self.viewport.pan(dx, dy);
    }

    /// Set the zoom, clamped into range. Returns the zoom applied.
    pub fn set_zoom(&mut self, zoom: f64) -> f64 {
        self.viewport.set_zoom(zoom)
    }

    /// Zoom by `factor` around a container point (mouse-wheel zoom).
    pub fn zoom_at(&mut self, screen_point: Point, factor: f64) {
        self.viewport.zoom_at(screen_point, factor);
    }

    /// Center the view on a document point.
    pub fn center_on(&mut self, point: Point) {
        self.viewport.center_on(point);
    }

    /// Zoom and pan so every element fits in the container.
    ///
    /// Leaves the viewport alone when the document is empty.
    pub fn fit_to_view(&mut self) {
        if let Some(bounds) = self.store.bounds() {
            self.viewport.fit_to_rect(bounds, self.config.fit_margin);
        }
    }

    /// Zoom and pan so the selected elements fit in the container.
    ///
    /// Leaves the viewport alone when nothing is selected.
    pub fn fit_to_selection(&mut self) {
        let bounds = self
            .selection
            .iter()
            .filter_map(|id| self.store.bounding_box(id))
            .reduce(|acc, rect| acc.union(&rect));
        if let Some(bounds) = bounds {
            self.viewport.fit_to_rect(bounds, self.config.fit_margin);
        }
    }

    /// Resize the host container.
    pub fn set_container_size(&mut self, width: f64, height: f64) {
        self.viewport.set_container_size(width, height);
    }

    /// Visible area in document space.
    #[must_use]
    pub fn visible_rect(&self) -> Rect {
        self.viewport.visible_rect()
    }

    /// Elements whose bounding box intersects the visible area, in paint
    /// order.
    #[must_use]
    pub fn visible_elements(&self) -> Vec<&CanvasElement> {
        let rect = self.viewport.visible_rect();
        let visible = self.store.query_rect(&rect);
        tracing::trace!(
            visible = visible.len(),
            total = self.store.len(),
            "visibility query"
        );
        visible
    }

    /// Topmost element under a container point.
    #[must_use]
    pub fn element_at_screen(&self, screen_point: Point) -> Option<&CanvasElement> {
        self.store
            .element_at(self.viewport.screen_to_document(screen_point))
    }

    /// Paint the visible elements in paint order. Returns how many were
    /// painted.
    ///
    /// Rendering never touches the document or its history.
    pub fn render<P: ElementPainter + ?Sized>(&self, painter: &mut P) -> usize {
        painter.begin_frame(&self.viewport);
        let visible = self.visible_elements();
        for element in &visible {
            let bounds = self
                .store
                .bounding_box(element.id)
                .unwrap_or_else(|| element.bounding_box());
            painter.paint(element, self.viewport.rect_to_screen(&bounds));
        }
        painter.end_frame();
        visible.len()
    }

    // -----------------------------------------------------------------------
    // Selection
    // -----------------------------------------------------------------------

    /// Select an element, replacing the selection unless `add_to_selection`.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::ElementNotFound`] for an unknown id.
    pub fn select_element(&mut self, id: ElementId, add_to_selection: bool) -> CanvasResult<()> {
        self.require(id)?;
        if add_to_selection {
            self.selection.insert(id);
        } else {
            self.selection.replace([id]);
        }
        Ok(())
    }

    /// Replace the selection with every element whose bounding box
    /// intersects `rect` (document space). Returns the number selected.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Validation`] for a non-finite rectangle.
    pub fn select_in_rect(&mut self, rect: Rect) -> CanvasResult<usize> {
        if ![rect.x, rect.y, rect.width, rect.height]
            .into_iter()
            .all(f64::is_finite)
        {
            return Err(CanvasError::validation("selection rectangle must be finite"));
        }
        let hits: Vec<ElementId> = self.store.query_rect(&rect).iter().map(|e| e.id).collect();
        self.selection.replace(hits);
        Ok(self.selection.len())
    }

    /// Select every element.
    pub fn select_all(&mut self) {
        self.selection.replace(self.store.ids());
    }

    /// Empty the selection.
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Selected ids, in creation order.
    #[must_use]
    pub fn selected_ids(&self) -> Vec<ElementId> {
        self.selection.to_vec()
    }

    /// Selected elements, in creation order.
    #[must_use]
    pub fn selected_elements(&self) -> Vec<&CanvasElement> {
        self.selection
            .iter()
            .filter_map(|id| self.store.get(id))
            .collect()
    }

    /// Translate every selected element by the same delta as one history
    /// entry. Returns the number moved.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Validation`] for a non-finite delta.
    pub fn move_selected(&mut self, dx: f64, dy: f64) -> CanvasResult<usize> {
        if !dx.is_finite() || !dy.is_finite() {
            return Err(CanvasError::validation("move delta must be finite"));
        }
        let now = now_ms();
        let mut before = Vec::with_capacity(self.selection.len());
        let mut after = Vec::with_capacity(self.selection.len());
        for element in self.selected_elements() {
            let mut moved = element.clone();
            moved.translate(dx, dy);
            moved.validate()?;
            touch(&mut moved, now);
            before.push(element.clone());
            after.push(moved);
        }
        let count = after.len();
        if count > 0 {
            self.commit("move selection", Command::Replace { before, after });
        }
        Ok(count)
    }

    /// Delete every selected element as one history entry. Returns the
    /// number deleted.
    pub fn delete_selected(&mut self) -> usize {
        let removed: Vec<CanvasElement> = self.selected_elements().into_iter().cloned().collect();
        let count = removed.len();
        if count > 0 {
            self.commit("delete selection", Command::Remove(removed));
        }
        count
    }

    // -----------------------------------------------------------------------
    // History
    // -----------------------------------------------------------------------

    /// Revert the most recent action. Returns `false` if there was none.
    pub fn undo(&mut self) -> bool {
        let undone = self.history.undo(&mut self.store, &mut self.selection);
        if undone {
            self.revision += 1;
        }
        undone
    }

    /// Re-apply the most recently undone action. Returns `false` if there
    /// was none.
    pub fn redo(&mut self) -> bool {
        let redone = self.history.redo(&mut self.store, &mut self.selection);
        if redone {
            self.revision += 1;
        }
        redone
    }

    /// Whether [`undo`](Self::undo) would do anything.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether [`redo`](Self::redo) would do anything.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    // -----------------------------------------------------------------------
    // Keyboard
    // -----------------------------------------------------------------------

    /// Dispatch a host key press through the key map.
    ///
    /// Returns the action performed, or `None` if the key is unbound.
    ///
    /// # Errors
    ///
    /// Propagates errors from the triggered operation.
    pub fn handle_key_press(&mut self, press: &KeyPress) -> CanvasResult<Option<EditorAction>> {
        let Some(action) = self.keymap.resolve(press) else {
            return Ok(None);
        };
        tracing::debug!(key = %press.key, ?action, "key press");
        self.perform(action)?;
        Ok(Some(action))
    }

    /// Perform an editor action directly.
    ///
    /// # Errors
    ///
    /// Propagates errors from the triggered operation.
    pub fn perform(&mut self, action: EditorAction) -> CanvasResult<()> {
        match action {
            EditorAction::DeleteSelection => {
                self.delete_selected();
            }
            EditorAction::Undo => {
                self.undo();
            }
            EditorAction::Redo => {
                self.redo();
            }
            EditorAction::SelectAll => self.select_all(),
            EditorAction::ClearSelection => self.clear_selection(),
            EditorAction::Nudge { dx, dy } => {
                self.move_selected(dx, dy)?;
            }
        }
        Ok(())
    }

    /// Bind a key chord, returning the action it previously triggered.
    pub fn bind_key(&mut self, chord: KeyChord, action: EditorAction) -> Option<EditorAction> {
        self.keymap.bind(chord, action)
    }

    // -----------------------------------------------------------------------
    // Serialization
    // -----------------------------------------------------------------------

    /// Snapshot the open document.
    #[must_use]
    pub fn to_document(&self) -> CanvasDocument {
        CanvasDocument::new(
            self.store.snapshot(),
            self.viewport.state(),
            self.metadata.clone(),
        )
    }

    /// Serialize the open document to JSON.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Serialization`] if encoding fails.
    pub fn serialize(&self) -> CanvasResult<String> {
        self.to_document().to_json()
    }

    /// Replace the open document with a serialized one.
    ///
    /// The snapshot is fully parsed and validated before anything changes;
    /// on success the selection and history are cleared.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Validation`] if the snapshot is malformed, in
    /// which case the editor is left untouched.
    pub fn deserialize(&mut self, json: &str) -> CanvasResult<()> {
        let document = CanvasDocument::from_json(json)?;
        self.replace_document(document);
        Ok(())
    }

    /// Serialize the document for saving, optionally under a new title.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Serialization`] if encoding fails.
    pub fn prepare_save(&self, title: Option<&str>) -> CanvasResult<PendingSave> {
        let saved_at = now_ms().max(self.metadata.updated_at);
        let mut document = self.to_document();
        if let Some(title) = title {
            document.metadata.title = title.to_string();
        }
        document.metadata.updated_at = saved_at;
        Ok(PendingSave {
            document_id: document.metadata.id,
            title: document.metadata.title.clone(),
            saved_at,
            bytes: document.to_json()?.into_bytes(),
            generation: self.generation,
            revision: self.revision,
        })
    }

    /// Record that a prepared save is durable.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::StaleSave`] if another document was loaded
    /// since the save was prepared; the editor is left untouched.
    pub fn complete_save(&mut self, pending: PendingSave) -> CanvasResult<DocumentId> {
        if pending.generation != self.generation {
            tracing::warn!(
                document = %pending.document_id,
                "save completed after the document was replaced; ignoring"
            );
            return Err(CanvasError::StaleSave(pending.document_id));
        }
        self.metadata.title = pending.title;
        self.metadata.updated_at = pending.saved_at;
        self.saved_revision = pending.revision;
        tracing::info!(
            document = %pending.document_id,
            elements = self.store.len(),
            "document saved"
        );
        Ok(pending.document_id)
    }

    /// Serialize the document and write it to `store`.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Store`] if the write fails, leaving the
    /// in-memory document untouched.
    pub async fn save<S>(&mut self, store: &S, title: Option<&str>) -> CanvasResult<DocumentId>
    where
        S: DocumentStore + ?Sized,
    {
        let mut pending = self.prepare_save(title)?;
        let bytes = std::mem::take(&mut pending.bytes);
        store.put(pending.document_id, bytes).await?;
        self.complete_save(pending)
    }

    /// Open a stored document in a fresh editor.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::DocumentNotFound`] if nothing is stored under
    /// `id`, [`CanvasError::Store`] if the read fails and
    /// [`CanvasError::Validation`] if the stored bytes are corrupt.
    pub async fn load<S>(store: &S, id: DocumentId, config: EditorConfig) -> CanvasResult<Self>
    where
        S: DocumentStore + ?Sized,
    {
        let document = fetch_document(store, id).await?;
        let mut editor = Self::new(config);
        editor.replace_document(document);
        editor.saved_revision = editor.revision;
        Ok(editor)
    }

    /// Replace the open document with a stored one.
    ///
    /// # Errors
    ///
    /// Same as [`load`](Self::load). On error the open document is left
    /// untouched.
    pub async fn reload_from<S>(&mut self, store: &S, id: DocumentId) -> CanvasResult<()>
    where
        S: DocumentStore + ?Sized,
    {
        let document = fetch_document(store, id).await?;
        self.replace_document(document);
        self.saved_revision = self.revision;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn require(&self, id: ElementId) -> CanvasResult<&CanvasElement> {
        self.store.get(id).ok_or(CanvasError::ElementNotFound(id))
    }

    fn commit(&mut self, label: &str, command: Command) {
        self.history
            .execute(label, command, &mut self.store, &mut self.selection);
        self.revision += 1;
    }

    /// Commit a single-element replacement, stamping `updated_at`.
    fn replace_one(&mut self, label: &str, mut after: CanvasElement) {
        let Some(before) = self.store.get(after.id).cloned() else {
            return;
        };
        touch(&mut after, now_ms());
        self.commit(
            label,
            Command::Replace {
                before: vec![before],
                after: vec![after],
            },
        );
    }

    /// Renumber z-indices contiguously from 0, moving `id` to the bottom
    /// or the top and keeping everyone else's relative order. Only changed
    /// elements are recorded.
    fn renumber_paint_order(&mut self, label: &str, id: ElementId, to_back: bool) {
        let Some(target) = self.store.get(id) else {
            return;
        };
        let others = self.store.paint_order().filter(|e| e.id != id);
        let order: Vec<&CanvasElement> = if to_back {
            std::iter::once(target).chain(others).collect()
        } else {
            others.chain(std::iter::once(target)).collect()
        };

        let now = now_ms();
        let mut before = Vec::new();
        let mut after = Vec::new();
        for (z_index, element) in (0_i64..).zip(order) {
            if element.z_index != z_index {
                let mut renumbered = element.clone();
                renumbered.z_index = z_index;
                touch(&mut renumbered, now);
                before.push(element.clone());
                after.push(renumbered);
            }
        }
        if !after.is_empty() {
            self.commit(label, Command::Replace { before, after });
        }
    }

    fn replace_document(&mut self, document: CanvasDocument) {
        let CanvasDocument {
            elements,
            viewport,
            metadata,
            ..
        } = document;
        tracing::info!(
            document = %metadata.id,
            elements = elements.len(),
            "document loaded"
        );
        self.store.reset(elements);
        self.viewport.restore(viewport);
        self.metadata = metadata;
        self.selection.clear();
        self.history.clear();
        self.generation += 1;
        self.revision += 1;
    }
}

impl Default for CanvasEditor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

fn touch(element: &mut CanvasElement, now: u64) {
    element.updated_at = now.max(element.updated_at);
}

async fn fetch_document<S>(store: &S, id: DocumentId) -> CanvasResult<CanvasDocument>
where
    S: DocumentStore + ?Sized,
{
    let bytes = store.get(id).await?.ok_or(CanvasError::DocumentNotFound(id))?;
    let json = std::str::from_utf8(&bytes)
        .map_err(|e| CanvasError::validation(format!("document {id} is not UTF-8: {e}")))?;
    let document = CanvasDocument::from_json(json).inspect_err(|e| {
        tracing::warn!(document = %id, "stored document rejected: {e}");
    })?;
    if document.metadata.id != id {
        return Err(CanvasError::validation(format!(
            "stored document {id} carries id {}",
            document.metadata.id
        )));
    }
    Ok(document)
}
