//! Document-store collaborators.
//!
//! The editor only needs a narrow key/value contract for durable bytes:
//! [`DocumentStore::put`] and [`DocumentStore::get`], keyed by
//! [`DocumentId`]. Whether the bytes land in an embedded database, a file or
//! a remote service is up to the implementation.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::id::DocumentId;

/// Errors that can occur during store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// An I/O error occurred during persistence.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// The backing store rejected or failed the request.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Durable key/value storage for serialized documents.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Store `bytes` under `id`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable or the write fails.
    async fn put(&self, id: DocumentId, bytes: Vec<u8>) -> Result<(), StoreError>;

    /// Fetch the bytes stored under `id`, or `None` if there are none.
    ///
    /// # Errors
    ///
    /// Returns an error if the store is unreachable or the read fails.
    async fn get(&self, id: DocumentId) -> Result<Option<Vec<u8>>, StoreError>;
}

/// In-memory store for tests and ephemeral sessions.
///
/// # Example
///
/// ```
/// use canvas_engine::persistence::MemoryDocumentStore;
///
/// let store = MemoryDocumentStore::new();
/// assert!(store.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    documents: RwLock<HashMap<DocumentId, Vec<u8>>>,
}

impl MemoryDocumentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored documents.
    #[must_use]
    pub fn len(&self) -> usize {
        self.documents
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    /// Whether no documents are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids of every stored document.
    #[must_use]
    pub fn document_ids(&self) -> Vec<DocumentId> {
        self.documents
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .keys()
            .copied()
            .collect()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn put(&self, id: DocumentId, bytes: Vec<u8>) -> Result<(), StoreError> {
        self.documents
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .insert(id, bytes);
        Ok(())
    }

    async fn get(&self, id: DocumentId) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self
            .documents
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .get(&id)
            .cloned())
    }
}

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileDocumentStore;

#[cfg(not(target_arch = "wasm32"))]
mod file {
    use std::path::{Path, PathBuf};

    use async_trait::async_trait;

    use super::{DocumentStore, StoreError};
    use crate::id::DocumentId;

    /// Filesystem store writing one `<id>.json` file per document.
    #[derive(Debug, Clone)]
    pub struct FileDocumentStore {
        data_dir: PathBuf,
    }

    impl FileDocumentStore {
        /// Create a store rooted at `data_dir`.
        ///
        /// The directory is created if it doesn't exist.
        ///
        /// # Errors
        ///
        /// Returns [`StoreError::Io`] if the directory cannot be created.
        pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
            let data_dir = data_dir.into();
            std::fs::create_dir_all(&data_dir)?;
            Ok(Self { data_dir })
        }

        /// Directory holding the document files.
        #[must_use]
        pub fn data_dir(&self) -> &Path {
            &self.data_dir
        }

        /// Path of the file backing a document.
        #[must_use]
        pub fn path_for(&self, id: DocumentId) -> PathBuf {
            self.data_dir.join(format!("{id}.json"))
        }

        /// Discover the ids of all documents on disk.
        ///
        /// Files whose stem is not a document id are skipped.
        ///
        /// # Errors
        ///
        /// Returns an error if the data directory can't be read.
        pub async fn document_ids(&self) -> Result<Vec<DocumentId>, StoreError> {
            let mut ids = Vec::new();
            let mut entries = tokio::fs::read_dir(&self.data_dir).await?;
            while let Some(entry) = entries.next_entry().await? {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "json") {
                    if let Some(id) = path
                        .file_stem()
                        .and_then(std::ffi::OsStr::to_str)
                        .and_then(|s| DocumentId::parse(s).ok())
                    {
                        ids.push(id);
                    }
                }
            }
            Ok(ids)
        }
    }

    #[async_trait]
    impl DocumentStore for FileDocumentStore {
        async fn put(&self, id: DocumentId, bytes: Vec<u8>) -> Result<(), StoreError> {
            let path = self.path_for(id);
            let tmp = path.with_extension("json.tmp");
            tokio::fs::write(&tmp, &bytes).await?;
            if let Err(e) = tokio::fs::rename(&tmp, &path).await {
                tracing::warn!("Failed to persist document {id} to {}: {e}", path.display());
                let _ = tokio::fs::remove_file(&tmp).await;
                return Err(e.into());
            }
            Ok(())
        }

        async fn get(&self, id: DocumentId) -> Result<Option<Vec<u8>>, StoreError> {
            match tokio::fs::read(self.path_for(id)).await {
                Ok(bytes) => Ok(Some(bytes)),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
                Err(e) => Err(e.into()),
            }
        }
    }
}
