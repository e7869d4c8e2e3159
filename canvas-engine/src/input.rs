//! Key bindings for the interaction router.
//!
//! [`KeyMap`] is a plain lookup table from a normalized [`KeyChord`] to an
//! [`EditorAction`]. It owns no editor state; the editor carries the
//! resulting action out through its public, history-recorded operations.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::event::KeyPress;

/// An editor operation a key can trigger.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum EditorAction {
    /// Delete every selected element as one history entry.
    DeleteSelection,
    /// Undo the last entry.
    Undo,
    /// Redo the last undone entry.
    Redo,
    /// Select every element.
    SelectAll,
    /// Empty the selection.
    ClearSelection,
    /// Move the selection by a document-space delta as one history entry.
    Nudge {
        /// Horizontal delta.
        dx: f64,
        /// Vertical delta.
        dy: f64,
    },
}

/// Normalized key combination.
///
/// Keys compare case-insensitively and Meta folds into the primary
/// (Ctrl) modifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyChord {
    key: String,
    primary: bool,
    shift: bool,
    alt: bool,
}

impl KeyChord {
    /// A bare key.
    #[must_use]
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_lowercase(),
            primary: false,
            shift: false,
            alt: false,
        }
    }

    /// Require Ctrl (or Meta).
    #[must_use]
    pub fn primary(mut self) -> Self {
        self.primary = true;
        self
    }

    /// Require Shift.
    #[must_use]
    pub fn shift(mut self) -> Self {
        self.shift = true;
        self
    }

    /// Require Alt.
    #[must_use]
    pub fn alt(mut self) -> Self {
        self.alt = true;
        self
    }

    /// Normalized key name.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

impl From<&KeyPress> for KeyChord {
    fn from(press: &KeyPress) -> Self {
        Self {
            key: press.key.to_lowercase(),
            primary: press.modifiers.primary(),
            shift: press.modifiers.shift,
            alt: press.modifiers.alt,
        }
    }
}

impl fmt::Display for KeyChord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.primary {
            f.write_str("Ctrl+")?;
        }
        if self.alt {
            f.write_str("Alt+")?;
        }
        if self.shift {
            f.write_str("Shift+")?;
        }
        f.write_str(&self.key)
    }
}

/// Mapping table from key chords to editor actions.
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: HashMap<KeyChord, EditorAction>,
}

impl KeyMap {
    /// An empty map.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// The default bindings, nudging by `step` (Shift: `large_step`).
    #[must_use]
    pub fn with_nudge_steps(step: f64, large_step: f64) -> Self {
        let mut map = Self::empty();
        map.bind(KeyChord::new("Delete"), EditorAction::DeleteSelection);
        map.bind(KeyChord::new("Backspace"), EditorAction::DeleteSelection);
        map.bind(KeyChord::new("z").primary(), EditorAction::Undo);
        map.bind(KeyChord::new("z").primary().shift(), EditorAction::Redo);
        map.bind(KeyChord::new("y").primary(), EditorAction::Redo);
        map.bind(KeyChord::new("a").primary(), EditorAction::SelectAll);
        map.bind(KeyChord::new("Escape"), EditorAction::ClearSelection);

        let arrows = [
            ("ArrowLeft", -1.0, 0.0),
            ("ArrowRight", 1.0, 0.0),
            ("ArrowUp", 0.0, -1.0),
            ("ArrowDown", 0.0, 1.0),
        ];
        for (key, ux, uy) in arrows {
            map.bind(
                KeyChord::new(key),
                EditorAction::Nudge {
                    dx: ux * step,
                    dy: uy * step,
                },
            );
            map.bind(
                KeyChord::new(key).shift(),
                EditorAction::Nudge {
                    dx: ux * large_step,
                    dy: uy * large_step,
                },
            );
        }
        map
    }

    /// Bind a chord, returning the action it previously triggered.
    pub fn bind(&mut self, chord: KeyChord, action: EditorAction) -> Option<EditorAction> {
        self.bindings.insert(chord, action)
    }

    /// Remove a binding.
    pub fn unbind(&mut self, chord: &KeyChord) -> Option<EditorAction> {
        self.bindings.remove(chord)
    }

    /// Look up the action for a key press.
    #[must_use]
    pub fn resolve(&self, press: &KeyPress) -> Option<EditorAction> {
        self.bindings.get(&KeyChord::from(press)).copied()
    }

    /// Number of bindings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether the map has no bindings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

impl Default for KeyMap {
    fn default() -> Self {
        Self::with_nudge_steps(1.0, 10.0)
    }
}
