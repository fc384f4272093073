//! Persistence for the server: one JSON document on disk.
//!
//! # File: `CHEF_DATA_FILE` (default `database.json`)
//!
//! Holds `{ users, recipes, shoppingLists }`. Every operation reads the
//! whole document, mutates it in memory and writes it back whole.
//!
//! - A missing or empty file is created with the starter catalog.
//! - A file that does not parse is moved aside to
//!   `<file>.corrupt-<timestamp>` and replaced with the starter catalog.
//!
//! Read-modify-write cycles are serialized by a single async mutex, so the
//! process is the only writer.

pub mod recipes;
pub mod shopping;
pub mod users;

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chef_em_casa_core::{Document, DocumentError, LoadStatus, ValidationError};
use thiserror::Error;
use tokio::sync::Mutex;

pub use recipes::RecipeRepository;
pub use shopping::ShoppingRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Reading or writing the data file failed.
    #[error("storage error: {0}")]
    Io(#[from] std::io::Error),

    /// The document could not be serialized.
    #[error("encoding error: {0}")]
    Encode(#[from] serde_json::Error),

    /// Input rejected before anything was written.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Requested entity was not found.
    #[error("not found: {0}")]
    NotFound(String),
}

impl From<DocumentError> for RepositoryError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::Validation(e) => Self::Validation(e),
            DocumentError::UserNotFound(who) => Self::NotFound(format!("user {who}")),
        }
    }
}

/// The data file plus the lock that makes this process its only writer.
#[derive(Clone)]
pub struct FileStore {
    inner: Arc<FileStoreInner>,
}

struct FileStoreInner {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    /// Open the data file, creating it with the starter catalog if needed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Io` if the file cannot be read or created.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self, RepositoryError> {
        let store = Self {
            inner: Arc::new(FileStoreInner {
                path: path.into(),
                lock: Mutex::new(()),
            }),
        };
        {
            let _guard = store.inner.lock.lock().await;
            store.load().await?;
        }
        tracing::info!(path = %store.path().display(), "Data file ready");
        Ok(store)
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.inner.path
    }

    /// Run `f` against the current document.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Io` if the file cannot be read.
    pub async fn read<T>(&self, f: impl FnOnce(&Document) -> T) -> Result<T, RepositoryError> {
        let _guard = self.inner.lock.lock().await;
        let document = self.load().await?;
        Ok(f(&document))
    }

    /// Run `f` against the current document and persist the result.
    ///
    /// Nothing is written when `f` fails.
    ///
    /// # Errors
    ///
    /// Returns the error from `f`, or `RepositoryError::Io`/`Encode` if the
    /// document cannot be loaded or saved.
    pub async fn update<T>(
        &self,
        f: impl FnOnce(&mut Document) -> Result<T, RepositoryError>,
    ) -> Result<T, RepositoryError> {
        let _guard = self.inner.lock.lock().await;
        let mut document = self.load().await?;
        let value = f(&mut document)?;
        self.save(&document).await?;
        Ok(value)
    }

    /// Load the document. The caller must hold the lock.
    async fn load(&self) -> Result<Document, RepositoryError> {
        let raw = match tokio::fs::read_to_string(self.path()).await {
            Ok(raw) => Some(raw),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        let loaded = Document::load_or_seed(raw.as_deref());
        match &loaded.status {
            LoadStatus::Existing => {}
            LoadStatus::Seeded => {
                tracing::info!(path = %self.path().display(), "Seeding new data file");
            }
            LoadStatus::Reseeded { reason } => {
                let backup = self.quarantine().await?;
                tracing::warn!(
                    path = %self.path().display(),
                    backup = %backup.display(),
                    reason = %reason,
                    "Data file unreadable, starting from the starter catalog"
                );
            }
        }

        if loaded.needs_write() {
            self.save(&loaded.document).await?;
        }
        Ok(loaded.document)
    }

    /// Move an unreadable data file out of the way.
    async fn quarantine(&self) -> Result<PathBuf, RepositoryError> {
        let stamp = chrono::Utc::now().format("%Y%m%d%H%M%S");
        let mut name = self.path().as_os_str().to_owned();
        name.push(format!(".corrupt-{stamp}"));
        let backup = PathBuf::from(name);
        tokio::fs::rename(self.path(), &backup).await?;
        Ok(backup)
    }

    /// Write through a temporary file so a crash never leaves half a document.
    async fn save(&self, document: &Document) -> Result<(), RepositoryError> {
        let json = document.to_json()?;
        if let Some(parent) = self.path().parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut tmp = self.path().as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, self.path()).await?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_open_seeds_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("database.json");

        let store = FileStore::open(&path).await.unwrap();
        let count = store.read(|doc| doc.recipes().len()).await.unwrap();
        assert_eq!(count, 2);

        let on_disk = std::fs::read_to_string(&path).unwrap();
        assert!(Document::parse(&on_disk).is_ok());
    }

    #[tokio::test]
    async fn test_corrupt_file_is_moved_aside_and_reseeded() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = FileStore::open(&path).await.unwrap();
        assert_eq!(store.read(|doc| doc.recipes().len()).await.unwrap(), 2);

        let backups: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.file_name().to_string_lossy().contains(".corrupt-"))
            .collect();
        assert_eq!(backups.len(), 1);
        assert_eq!(
            std::fs::read_to_string(backups.first().unwrap().path()).unwrap(),
            "{ not json"
        );
    }

    #[tokio::test]
    async fn test_failed_update_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.json");
        let store = FileStore::open(&path).await.unwrap();
        let before = std::fs::read_to_string(&path).unwrap();

        let result: Result<(), _> = store
            .update(|_| Err(RepositoryError::NotFound("nobody".to_string())))
            .await;
        assert!(matches!(result, Err(RepositoryError::NotFound(_))));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), before);
    }

    #[test]
    fn test_document_error_mapping() {
        let err = RepositoryError::from(DocumentError::UserNotFound("u1".to_string()));
        assert!(matches!(err, RepositoryError::NotFound(msg) if msg == "user u1"));

        let err = RepositoryError::from(DocumentError::Validation(ValidationError::MissingField(
            "title",
        )));
        assert!(matches!(err, RepositoryError::Validation(_)));
    }
}
