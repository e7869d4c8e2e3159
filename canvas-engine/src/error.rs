//! Error types for canvas operations.

use thiserror::Error;

use crate::id::{DocumentId, ElementId};
use crate::persistence::StoreError;

/// Result type for canvas operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors that can occur in canvas operations.
///
/// Every variant is recoverable: a failed call leaves the element store,
/// selection, viewport and history exactly as they were.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// Malformed element spec, patch or snapshot.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Element not found in the store.
    #[error("Element not found: {0}")]
    ElementNotFound(ElementId),

    /// Operation that does not apply to the element's type.
    #[error("Invalid operation on element: {0}")]
    InvalidOperation(String),

    /// Snapshot serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The document store has no document under this id.
    #[error("Document not found: {0}")]
    DocumentNotFound(DocumentId),

    /// The document store collaborator failed.
    #[error("Document store error: {0}")]
    Store(#[from] StoreError),

    /// A save finished after a different document was loaded into the editor.
    #[error("Save of document {0} was superseded by a later load")]
    StaleSave(DocumentId),
}

impl CanvasError {
    /// Shorthand for a [`CanvasError::Validation`] error.
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Whether this error reports malformed input.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Whether this error reports an unknown element or document id.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ElementNotFound(_) | Self::DocumentNotFound(_))
    }
}
