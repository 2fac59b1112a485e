//! Append-only artifact storage for Gamesmith.
//!
//! An artifact is written once under a freshly generated [`ArtifactId`] and
//! never modified or removed afterwards.
//!
//! # Features
//!
//! - **Collision-free identifiers**: random v4 UUIDs, no shared counter or lock
//! - **Atomic writes**: temp file + fsync + rename, so readers see all or nothing
//! - **Strict addressing**: identifiers are parsed before any path is built
//!
//! # Example
//!
//! ```rust
//! use gamesmith_core::ArtifactContent;
//! use gamesmith_storage::{ArtifactStorage, FileSystemStorage};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let storage = FileSystemStorage::new("/tmp/gamesmith-games")?;
//!
//! let content = ArtifactContent::from("<!DOCTYPE html><html></html>");
//! let id = storage.save(&content).await?;
//!
//! let loaded = storage.load(&id.to_string()).await?;
//! assert_eq!(loaded, content);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod filesystem;
mod storage;

pub use filesystem::FileSystemStorage;
pub use gamesmith_error::{StorageError, StorageErrorKind};
pub use storage::ArtifactStorage;
