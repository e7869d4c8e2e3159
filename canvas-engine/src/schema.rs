//! Canonical serialized representation of a canvas document.
//!
//! ```json
//! {
//!   "version": 1,
//!   "elements": [ { "id": "…", "type": "text", … } ],
//!   "viewport": { "x": 0.0, "y": 0.0, "zoom": 1.0 },
//!   "metadata": { "id": "…", "title": "Untitled", "createdAt": 0, "updatedAt": 0 }
//! }
//! ```
//!
//! Elements are written in paint order and the encoding is compact, so the
//! same document always serializes to the same bytes.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::element::CanvasElement;
use crate::error::{CanvasError, CanvasResult};
use crate::id::{now_ms, DocumentId};
use crate::viewport::{ViewportState, MAX_ZOOM, MIN_ZOOM};

/// Current snapshot format version.
pub const SCHEMA_VERSION: u32 = 1;

/// Default title for new documents.
pub const DEFAULT_TITLE: &str = "Untitled";

/// Document-level metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentMetadata {
    /// Document identifier, the key in the document store.
    pub id: DocumentId,
    /// Human-readable title.
    pub title: String,
    /// Creation time (Unix ms).
    pub created_at: u64,
    /// Last save time (Unix ms).
    pub updated_at: u64,
}

impl DocumentMetadata {
    /// Metadata for a brand-new document.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        let now = now_ms();
        Self {
            id: DocumentId::new(),
            title: title.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self::new(DEFAULT_TITLE)
    }
}

fn default_version() -> u32 {
    SCHEMA_VERSION
}

/// Canonical canvas document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasDocument {
    /// Snapshot format version.
    #[serde(default = "default_version")]
    pub version: u32,
    /// Elements in paint order.
    pub elements: Vec<CanvasElement>,
    /// Camera state.
    pub viewport: ViewportState,
    /// Document metadata.
    pub metadata: DocumentMetadata,
}

impl CanvasDocument {
    /// Assemble a document at the current schema version.
    #[must_use]
    pub fn new(
        elements: Vec<CanvasElement>,
        viewport: ViewportState,
        metadata: DocumentMetadata,
    ) -> Self {
        Self {
            version: SCHEMA_VERSION,
            elements,
            viewport,
            metadata,
        }
    }

    /// Serialize to compact JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> CanvasResult<String> {
        serde_json::to_string(self).map_err(CanvasError::Serialization)
    }

    /// Parse and structurally validate a document.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Validation`] if the JSON is malformed or the
    /// document fails [`CanvasDocument::validate`].
    pub fn from_json(json: &str) -> CanvasResult<Self> {
        let document: Self = serde_json::from_str(json)
            .map_err(|e| CanvasError::validation(format!("invalid canvas document: {e}")))?;
        document.validate()?;
        Ok(document)
    }

    /// Check the schema version, viewport and every element.
    ///
    /// # Errors
    ///
    /// Returns [`CanvasError::Validation`] describing the first violation.
    pub fn validate(&self) -> CanvasResult<()> {
        if self.version != SCHEMA_VERSION {
            return Err(CanvasError::validation(format!(
                "unsupported document version {} (expected {SCHEMA_VERSION})",
                self.version
            )));
        }

        let vp = &self.viewport;
        if !vp.x.is_finite() || !vp.y.is_finite() {
            return Err(CanvasError::validation("viewport offset must be finite"));
        }
        if !(MIN_ZOOM..=MAX_ZOOM).contains(&vp.zoom) {
            return Err(CanvasError::validation(format!(
                "viewport zoom {} outside [{MIN_ZOOM}, {MAX_ZOOM}]",
                vp.zoom
            )));
        }

        let mut seen = HashSet::with_capacity(self.elements.len());
        for element in &self.elements {
            if !seen.insert(element.id) {
                return Err(CanvasError::validation(format!(
                    "duplicate element id {}",
                    element.id
                )));
            }
            element.validate().map_err(|e| match e {
                CanvasError::Validation(msg) => {
                    CanvasError::validation(format!("element {}: {msg}", element.id))
                }
                other => other,
            })?;
        }
        Ok(())
    }
}
