//! Command-based undo/redo.
//!
//! Every document mutation is expressed as a [`Command`] holding the full
//! before/after records of the elements it touches, and is applied through
//! [`History::execute`]. That makes the history engine the single path by
//! which the element store changes, and lets a bulk operation over many
//! elements be one entry.
//!
//! ```text
//!   execute(cmd)          undo()                 redo()
//!   ┌──────────┐        ┌──────────┐          ┌──────────┐
//!   │ undo: +1 │        │ undo: -1 │          │ redo: -1 │
//!   │ redo: ∅  │        │ redo: +1 │          │ undo: +1 │
//!   └──────────┘        └──────────┘          └──────────┘
//! ```
//!
//! Both stacks are bounded; once full, the oldest entry is evicted.

use std::collections::VecDeque;

use crate::element::CanvasElement;
use crate::id::ElementId;
use crate::selection::Selection;
use crate::store::ElementStore;

/// Default number of undoable entries kept.
pub const DEFAULT_MAX_HISTORY: usize = 100;

/// A reversible change to the element store.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Add elements.
    Insert(Vec<CanvasElement>),
    /// Delete elements (full records kept for restoration).
    Remove(Vec<CanvasElement>),
    /// Overwrite elements.
    Replace {
        /// Records before the change.
        before: Vec<CanvasElement>,
        /// Records after the change.
        after: Vec<CanvasElement>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Forward,
    Backward,
}

impl Command {
    /// The command that undoes this one.
    #[must_use]
    pub fn inverse(&self) -> Self {
        match self {
            Self::Insert(elements) => Self::Remove(elements.clone()),
            Self::Remove(elements) => Self::Insert(elements.clone()),
            Self::Replace { before, after } => Self::Replace {
                before: after.clone(),
                after: before.clone(),
            },
        }
    }

    /// Ids of the elements this command touches.
    #[must_use]
    pub fn element_ids(&self) -> Vec<ElementId> {
        let elements = match self {
            Self::Insert(elements) | Self::Remove(elements) => elements,
            Self::Replace { after, .. } => after,
        };
        elements.iter().map(|e| e.id).collect()
    }

    /// Number of elements touched.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Insert(elements) | Self::Remove(elements) => elements.len(),
            Self::Replace { after, .. } => after.len(),
        }
    }

    /// Whether the command touches nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn apply(&self, direction: Direction, store: &mut ElementStore, selection: &mut Selection) {
        match (self, direction) {
            (Self::Insert(elements), Direction::Forward)
            | (Self::Remove(elements), Direction::Backward) => {
                for element in elements {
                    store.put(element.clone());
                }
            }
            (Self::Insert(elements), Direction::Backward)
            | (Self::Remove(elements), Direction::Forward) => {
                for element in elements {
                    if store.take(element.id).is_none() {
                        tracing::warn!(element = %element.id, "remove skipped: element missing");
                    }
                    selection.remove(element.id);
                }
            }
            (Self::Replace { after, .. }, Direction::Forward) => overwrite(after, store),
            (Self::Replace { before, .. }, Direction::Backward) => overwrite(before, store),
        }
    }
}

fn overwrite(elements: &[CanvasElement], store: &mut ElementStore) {
    for element in elements {
        if store.contains(element.id) {
            store.put(element.clone());
        } else {
            tracing::warn!(element = %element.id, "replace skipped: element missing");
        }
    }
}

/// One undoable user action.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    label: String,
    command: Command,
    selection_before: Vec<ElementId>,
    selection_after: Vec<ElementId>,
}

impl HistoryEntry {
    /// Human-readable action name, e.g. `"move selection"`.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The recorded forward command.
    #[must_use]
    pub fn command(&self) -> &Command {
        &self.command
    }
}

/// Bounded undo and redo stacks.
#[derive(Debug, Clone)]
pub struct History {
    undo: VecDeque<HistoryEntry>,
    redo: VecDeque<HistoryEntry>,
    max_size: usize,
}

impl History {
    /// Create an empty history keeping at most `max_size` entries per stack.
    ///
    /// A `max_size` of zero disables undo entirely.
    #[must_use]
    pub fn new(max_size: usize) -> Self {
        Self {
            undo: VecDeque::new(),
            redo: VecDeque::new(),
            max_size,
        }
    }

    /// Maximum entries kept per stack.
    #[must_use]
    pub const fn max_size(&self) -> usize {
        self.max_size
    }

    /// Whether `undo` would do anything.
    #[must_use]
    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    /// Whether `redo` would do anything.
    #[must_use]
    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    /// Number of undoable entries.
    #[must_use]
    pub fn undo_len(&self) -> usize {
        self.undo.len()
    }

    /// Number of redoable entries.
    #[must_use]
    pub fn redo_len(&self) -> usize {
        self.redo.len()
    }

    /// Label of the entry `undo` would revert.
    #[must_use]
    pub fn undo_label(&self) -> Option<&str> {
        self.undo.back().map(HistoryEntry::label)
    }

    /// Label of the entry `redo` would re-apply.
    #[must_use]
    pub fn redo_label(&self) -> Option<&str> {
        self.redo.back().map(HistoryEntry::label)
    }

    /// Drop both stacks.
    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }

    /// Apply a command and record it as one entry. Clears the redo stack.
    pub(crate) fn execute(
        &mut self,
        label: impl Into<String>,
        command: Command,
        store: &mut ElementStore,
        selection: &mut Selection,
    ) {
        let selection_before = selection.to_vec();
        command.apply(Direction::Forward, store, selection);
        let entry = HistoryEntry {
            label: label.into(),
            command,
            selection_before,
            selection_after: selection.to_vec(),
        };
        tracing::debug!(
            action = %entry.label,
            elements = entry.command.len(),
            "command committed"
        );
        self.redo.clear();
        push_bounded(&mut self.undo, entry, self.max_size);
    }

    /// Revert the most recent entry. Returns `false` when there is nothing
    /// to undo.
    pub(crate) fn undo(&mut self, store: &mut ElementStore, selection: &mut Selection) -> bool {
        let Some(entry) = self.undo.pop_back() else {
            return false;
        };
        entry.command.apply(Direction::Backward, store, selection);
        restore_selection(selection, &entry.selection_before, store);
        tracing::debug!(action = %entry.label, "undo");
        push_bounded(&mut self.redo, entry, self.max_size);
        true
    }

    /// Re-apply the most recently undone entry. Returns `false` when there
    /// is nothing to redo.
    pub(crate) fn redo(&mut self, store: &mut ElementStore, selection: &mut Selection) -> bool {
        let Some(entry) = self.redo.pop_back() else {
            return false;
        };
        entry.command.apply(Direction::Forward, store, selection);
        restore_selection(selection, &entry.selection_after, store);
        tracing::debug!(action = %entry.label, "redo");
        push_bounded(&mut self.undo, entry, self.max_size);
        true
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HISTORY)
    }
}

fn push_bounded(stack: &mut VecDeque<HistoryEntry>, entry: HistoryEntry, max_size: usize) {
    if max_size == 0 {
        return;
    }
    // Drop oldest if at capacity
    while stack.len() >= max_size {
        if let Some(evicted) = stack.pop_front() {
            tracing::trace!(action = %evicted.label, "history entry evicted");
        }
    }
    stack.push_back(entry);
}

fn restore_selection(selection: &mut Selection, ids: &[ElementId], store: &ElementStore) {
    selection.replace(ids.iter().copied().filter(|id| store.contains(*id)));
}
