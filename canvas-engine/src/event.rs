//! Input events forwarded by the host.

use serde::{Deserialize, Serialize};

/// Keyboard modifiers, named like DOM `KeyboardEvent` flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct KeyModifiers {
    /// Shift key pressed.
    #[serde(default, rename = "shiftKey")]
    pub shift: bool,
    /// Control key pressed.
    #[serde(default, rename = "ctrlKey")]
    pub ctrl: bool,
    /// Alt/Option key pressed.
    #[serde(default, rename = "altKey")]
    pub alt: bool,
    /// Meta/Command key pressed.
    #[serde(default, rename = "metaKey")]
    pub meta: bool,
}

impl KeyModifiers {
    /// Whether the platform's primary shortcut modifier is held.
    ///
    /// Meta (Command on macOS) counts the same as Control.
    #[must_use]
    pub const fn primary(self) -> bool {
        self.ctrl || self.meta
    }
}

/// A key press as described by the host, e.g. `{"key": "z", "ctrlKey": true}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyPress {
    /// DOM key value (`"Delete"`, `"z"`, `"ArrowLeft"`, …).
    pub key: String,
    /// Held modifiers.
    #[serde(flatten)]
    pub modifiers: KeyModifiers,
}

impl KeyPress {
    /// A key press with no modifiers.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            modifiers: KeyModifiers::default(),
        }
    }

    /// Hold Control.
    #[must_use]
    pub fn ctrl(mut self) -> Self {
        self.modifiers.ctrl = true;
        self
    }

    /// Hold Shift.
    #[must_use]
    pub fn shift(mut self) -> Self {
        self.modifiers.shift = true;
        self
    }

    /// Hold Alt.
    #[must_use]
    pub fn alt(mut self) -> Self {
        self.modifiers.alt = true;
        self
    }

    /// Hold Meta.
    #[must_use]
    pub fn meta(mut self) -> Self {
        self.modifiers.meta = true;
        self
    }

    /// Parse a descriptor from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or `key` is missing.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
