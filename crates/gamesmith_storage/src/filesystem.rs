//! Filesystem-based artifact storage implementation.
//!
//! Artifacts live in a sharded directory tree keyed by identifier, one HTML
//! file per artifact.

use crate::ArtifactStorage;
use chrono::{DateTime, Utc};
use gamesmith_core::{Artifact, ArtifactContent, ArtifactId};
use gamesmith_error::{StorageError, StorageErrorKind};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Extension of stored artifacts.
const ARTIFACT_EXTENSION: &str = "html";

/// Suffix of in-progress writes. Never addressable by an identifier.
const TEMP_SUFFIX: &str = ".tmp";

/// Filesystem storage backend.
///
/// Stores artifacts as `{base_path}/{id[0:2]}/{id}.html`.
///
/// # Example Structure
///
/// ```text
/// /var/gamesmith/games/
/// ├── 3f/
/// │   ├── 3f2a9c1e-0b7d-4c55-9a0e-6f1d2b3c4d5e.html
/// │   └── 3fe01b44-52c1-4d8e-8f3a-0c9b8a7d6e5f.html
/// └── a0/
///     └── a07c5d2e-1f3b-4a6c-8d9e-0f1a2b3c4d5e.html
/// ```
///
/// # Features
///
/// - **Atomic writes**: unique temp file, `fsync`, then rename into place
/// - **Sharded layout**: the two-character prefix keeps directories small
/// - **Lock-free**: concurrent saves never share a path
#[derive(Debug, Clone)]
pub struct FileSystemStorage {
    base_path: PathBuf,
}

impl FileSystemStorage {
    /// Create a new filesystem storage backend.
    ///
    /// Creates the base directory if it doesn't exist and removes temp files
    /// left behind by writes that were interrupted in a previous run.
    ///
    /// # Errors
    ///
    /// Returns error if the directory cannot be created or accessed.
    #[tracing::instrument(skip(base_path))]
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self, StorageError> {
        let base_path = base_path.into();

        std::fs::create_dir_all(&base_path).map_err(|e| {
            StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                "{}: {}",
                base_path.display(),
                e
            )))
        })?;

        let storage = Self { base_path };
        let swept = storage.sweep_temp_files();
        if swept > 0 {
            tracing::warn!(count = swept, "Removed interrupted artifact writes");
        }

        tracing::info!(path = %storage.base_path.display(), "Created filesystem storage");
        Ok(storage)
    }

    /// Root directory of this store.
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Get the filesystem path for an identifier.
    ///
    /// Structure: `{base}/{id[0:2]}/{id}.html`
    fn artifact_path(&self, id: &ArtifactId) -> PathBuf {
        let name = id.to_string();
        self.base_path
            .join(&name[0..2])
            .join(format!("{}.{}", name, ARTIFACT_EXTENSION))
    }

    /// Path of the in-progress write for an identifier.
    fn temp_path(&self, id: &ArtifactId) -> PathBuf {
        let name = id.to_string();
        self.base_path
            .join(&name[0..2])
            .join(format!(".{}.{}{}", name, ARTIFACT_EXTENSION, TEMP_SUFFIX))
    }

    /// Parse a caller-supplied identifier into a storage path.
    fn resolve(&self, identifier: &str) -> Result<(ArtifactId, PathBuf), StorageError> {
        let id = ArtifactId::parse(identifier).ok_or_else(|| {
            tracing::debug!(identifier = %identifier, "Rejected malformed artifact identifier");
            StorageError::new(StorageErrorKind::NotFound(identifier.to_string()))
        })?;
        let path = self.artifact_path(&id);
        Ok((id, path))
    }

    /// Remove leftover temp files. Returns how many were removed.
    fn sweep_temp_files(&self) -> usize {
        let Ok(shards) = std::fs::read_dir(&self.base_path) else {
            return 0;
        };

        let mut removed = 0;
        for shard in shards.flatten() {
            let Ok(entries) = std::fs::read_dir(shard.path()) else {
                continue;
            };
            for entry in entries.flatten() {
                let is_temp = entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| name.ends_with(TEMP_SUFFIX));
                if is_temp && std::fs::remove_file(entry.path()).is_ok() {
                    removed += 1;
                }
            }
        }
        removed
    }

    /// Write `data` to `temp`, flush it to disk, rename it to `path`, then
    /// flush the shard directory so the new name survives a crash.
    async fn write_atomic(&self, temp: &Path, path: &Path, data: &[u8]) -> Result<(), StorageError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                StorageError::new(StorageErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        let write_err = |e: std::io::Error| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "{}: {}",
                temp.display(),
                e
            )))
        };

        let mut file = tokio::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(temp)
            .await
            .map_err(write_err)?;
        file.write_all(data).await.map_err(write_err)?;
        file.sync_all().await.map_err(write_err)?;
        drop(file);

        tokio::fs::rename(temp, path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileWrite(format!(
                "rename {} to {}: {}",
                temp.display(),
                path.display(),
                e
            )))
        })?;

        match path.parent() {
            Some(parent) => sync_dir(parent).await,
            None => Ok(()),
        }
    }

    /// Whether an artifact file exists for `id`.
    async fn occupied(&self, id: &ArtifactId) -> Result<bool, StorageError> {
        let path = self.artifact_path(id);
        tokio::fs::try_exists(&path).await.map_err(|e| {
            StorageError::new(StorageErrorKind::FileRead(format!(
                "{}: {}",
                path.display(),
                e
            )))
        })
    }

    async fn read(&self, identifier: &str, path: &Path) -> Result<Vec<u8>, StorageError> {
        tokio::fs::read(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StorageError::new(StorageErrorKind::NotFound(identifier.to_string()))
            } else {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            }
        })
    }
}

#[async_trait::async_trait]
impl ArtifactStorage for FileSystemStorage {
    #[tracing::instrument(skip(self, content), fields(size = content.len()))]
    async fn save(&self, content: &ArtifactContent) -> Result<ArtifactId, StorageError> {
        if content.is_empty() {
            return Err(StorageError::new(StorageErrorKind::EmptyContent));
        }

        // A v4 collision is astronomically unlikely; still never overwrite.
        let mut id = ArtifactId::generate();
        while self.occupied(&id).await? {
            tracing::warn!(id = %id, "Artifact identifier already in use, regenerating");
            id = ArtifactId::generate();
        }

        let path = self.artifact_path(&id);
        let temp = self.temp_path(&id);

        if let Err(e) = self.write_atomic(&temp, &path, content.as_bytes()).await {
            let _ = tokio::fs::remove_file(&temp).await;
            tracing::error!(id = %id, error = %e, "Failed to store artifact");
            return Err(e);
        }

        tracing::info!(
            id = %id,
            path = %path.display(),
            size = content.len(),
            "Stored artifact"
        );

        Ok(id)
    }

    #[tracing::instrument(skip(self))]
    async fn load(&self, identifier: &str) -> Result<ArtifactContent, StorageError> {
        let (_, path) = self.resolve(identifier)?;
        let data = self.read(identifier, &path).await?;

        tracing::debug!(path = %path.display(), size = data.len(), "Retrieved artifact");
        Ok(ArtifactContent::from(data))
    }

    #[tracing::instrument(skip(self))]
    async fn load_artifact(&self, identifier: &str) -> Result<Artifact, StorageError> {
        let (id, path) = self.resolve(identifier)?;
        let data = self.read(identifier, &path).await?;

        let created_at = tokio::fs::metadata(&path)
            .await
            .and_then(|m| m.modified())
            .map(DateTime::<Utc>::from)
            .map_err(|e| {
                StorageError::new(StorageErrorKind::FileRead(format!(
                    "{}: {}",
                    path.display(),
                    e
                )))
            })?;

        Ok(Artifact::new(id, ArtifactContent::from(data), created_at))
    }

    #[tracing::instrument(skip(self))]
    async fn exists(&self, identifier: &str) -> Result<bool, StorageError> {
        let Some(id) = ArtifactId::parse(identifier) else {
            return Ok(false);
        };
        self.occupied(&id).await
    }
}

/// Flush directory entries of `dir` to disk.
#[cfg(unix)]
async fn sync_dir(dir: &Path) -> Result<(), StorageError> {
    let sync_err = |e: std::io::Error| {
        StorageError::new(StorageErrorKind::FileWrite(format!(
            "sync {}: {}",
            dir.display(),
            e
        )))
    };
    tokio::fs::File::open(dir)
        .await
        .map_err(sync_err)?
        .sync_all()
        .await
        .map_err(sync_err)
}

// Directory handles cannot be opened for syncing on this platform.
#[cfg(not(unix))]
async fn sync_dir(_dir: &Path) -> Result<(), StorageError> {
    Ok(())
}
