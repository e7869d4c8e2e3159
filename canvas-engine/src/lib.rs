//! # Canvas Engine
//!
//! Infinite-canvas editing engine: a spatial document model with freeform
//! placement, layering, multi-selection, pan/zoom, undo/redo and
//! persistence. Per-frame cost follows what is visible, not document size.
//! Compiles to WASM for browser hosts.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                CanvasEditor                 │
//! ├─────────────────────────────────────────────┤
//! │  KeyMap          │  Serialization           │
//! │  - Key chords    │  - CanvasDocument        │
//! │  - Actions       │  - Save / load guard     │
//! ├─────────────────────────────────────────────┤
//! │  History         │  Selection │  Viewport   │
//! │  - Commands      │  - Id set  │  - Pan/zoom │
//! │  - Bounded stacks│            │  - Visible  │
//! ├─────────────────────────────────────────────┤
//! │  ElementStore                               │
//! │  - Arena by id   - Paint order - Grid index │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod config;
pub mod editor;
pub mod element;
pub mod error;
pub mod event;
pub mod geometry;
pub mod history;
pub mod id;
pub mod input;
pub mod persistence;
pub mod render;
pub mod schema;
pub mod selection;
pub mod spatial;
pub mod store;
pub mod viewport;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use config::EditorConfig;
pub use editor::{CanvasEditor, PendingSave};
pub use element::{
    ArrowHead, CanvasElement, ConnectorStyle, ElementKind, ElementPatch, ElementSpec,
    ElementType, ImageFormat, StrokePath, StrokeStyle,
};
pub use error::{CanvasError, CanvasResult};
pub use event::{KeyModifiers, KeyPress};
pub use geometry::{Point, Rect, Size};
pub use history::{Command, History, HistoryEntry};
pub use id::{DocumentId, ElementId};
pub use input::{EditorAction, KeyChord, KeyMap};
#[cfg(not(target_arch = "wasm32"))]
pub use persistence::FileDocumentStore;
pub use persistence::{DocumentStore, MemoryDocumentStore, StoreError};
pub use render::ElementPainter;
pub use schema::{CanvasDocument, DocumentMetadata, SCHEMA_VERSION};
pub use selection::Selection;
pub use store::ElementStore;
pub use viewport::{Viewport, ViewportState, MAX_ZOOM, MIN_ZOOM};

/// Canvas engine version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
