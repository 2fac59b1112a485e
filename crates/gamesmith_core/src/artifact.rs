//! Backend responses and stored artifacts.

use crate::ArtifactId;
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// Verbatim text returned by the generative backend.
///
/// Nothing is interpreted at this point; the extractor decides what part of it,
/// if any, is the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_more::From)]
pub struct RawResponse(String);

impl RawResponse {
    /// Wrap backend output.
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    /// The raw text.
    pub fn text(&self) -> &str {
        &self.0
    }

    /// Length of the raw text in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the backend returned nothing.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The bytes of a self-contained playable document.
///
/// # Examples
///
/// ```
/// use gamesmith_core::ArtifactContent;
///
/// let content = ArtifactContent::from("<!DOCTYPE html><html></html>");
/// assert_eq!(content.len(), 28);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::From)]
pub struct ArtifactContent(Vec<u8>);

impl ArtifactContent {
    /// The document bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consume and return the document bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Size in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for zero-length content.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<String> for ArtifactContent {
    fn from(text: String) -> Self {
        Self(text.into_bytes())
    }
}

impl From<&str> for ArtifactContent {
    fn from(text: &str) -> Self {
        Self(text.as_bytes().to_vec())
    }
}

impl From<&[u8]> for ArtifactContent {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

/// A persisted artifact, as resolved from storage.
///
/// Immutable once written: regenerating from the same prompt yields a new
/// artifact under a new identifier.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct Artifact {
    /// Handle the artifact was stored under
    identifier: ArtifactId,
    /// Document bytes
    content: ArtifactContent,
    /// When the artifact was persisted
    created_at: DateTime<Utc>,
}

impl Artifact {
    /// Assemble an artifact from its parts.
    pub fn new(identifier: ArtifactId, content: ArtifactContent, created_at: DateTime<Utc>) -> Self {
        Self {
            identifier,
            content,
            created_at,
        }
    }

    /// Consume the artifact and return its content.
    pub fn into_content(self) -> ArtifactContent {
        self.content
    }
}
