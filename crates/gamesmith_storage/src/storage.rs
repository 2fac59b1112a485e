//! Storage trait definition.

use gamesmith_core::{Artifact, ArtifactContent, ArtifactId};
use gamesmith_error::StorageError;

/// Trait for pluggable artifact storage backends.
///
/// Backends are append-only and must be safe to call concurrently.
#[async_trait::async_trait]
pub trait ArtifactStorage: Send + Sync {
    /// Persist `content` under a fresh identifier.
    ///
    /// The implementation should:
    /// - Generate an identifier that cannot collide with concurrent saves
    /// - Make the content visible atomically (never partially)
    /// - Return only after the write is durable
    ///
    /// # Errors
    ///
    /// `EmptyContent` for zero-length input, `FileWrite`/`DirectoryCreation`
    /// when the medium fails.
    async fn save(&self, content: &ArtifactContent) -> Result<ArtifactId, StorageError>;

    /// Resolve an identifier, as received from a caller, to its bytes.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown or malformed identifiers, including any attempt
    /// to address something outside the storage root.
    async fn load(&self, identifier: &str) -> Result<ArtifactContent, StorageError>;

    /// Like [`load`](Self::load), with the creation timestamp attached.
    async fn load_artifact(&self, identifier: &str) -> Result<Artifact, StorageError>;

    /// Check whether an artifact exists. Malformed identifiers never exist.
    async fn exists(&self, identifier: &str) -> Result<bool, StorageError>;
}
