//! Generation requests and their caller-facing results.

use crate::ArtifactId;
use chrono::{DateTime, Utc};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};

/// One inbound "generate a game" call. Lives only as long as the request.
#[derive(Debug, Clone, PartialEq, Eq, Getters)]
pub struct GenerationRequest {
    /// Raw user prompt, unvalidated
    prompt: String,
    /// When the request arrived
    submitted_at: DateTime<Utc>,
}

impl GenerationRequest {
    /// Stamp a new request with the current time.
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            submitted_at: Utc::now(),
        }
    }
}

/// Caller-facing classification of a failed generation.
///
/// Each internal failure maps to exactly one of these.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum FailureKind {
    /// The prompt failed validation
    InvalidPrompt,
    /// The backend could not be reached or errored
    Unavailable,
    /// The backend did not answer in time
    Timeout,
    /// The backend rejected the call for rate or quota reasons
    QuotaExceeded,
    /// The backend answered with something that is not a document
    MalformedResponse,
    /// The artifact could not be persisted
    StorageFailure,
}

impl FailureKind {
    /// Whether resubmitting the same prompt may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            FailureKind::Unavailable
                | FailureKind::Timeout
                | FailureKind::MalformedResponse
                | FailureKind::StorageFailure
        )
    }

    /// Suggested wait before resubmitting, in seconds.
    pub fn retry_after_secs(&self) -> Option<u64> {
        match self {
            FailureKind::QuotaExceeded => Some(60),
            FailureKind::Unavailable => Some(5),
            _ => None,
        }
    }
}

/// Terminal status of a generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerationStatus {
    /// Artifact persisted
    Succeeded,
    /// Pipeline stopped at the first failure
    Failed {
        /// Caller-facing classification
        kind: FailureKind,
        /// Human-readable reason
        reason: String,
    },
}

/// Outcome of `handle_generate`.
///
/// The identifier is present exactly when the status is
/// [`GenerationStatus::Succeeded`]; the constructors enforce this.
///
/// # Examples
///
/// ```
/// use gamesmith_core::{ArtifactId, FailureKind, GenerationResult};
///
/// let ok = GenerationResult::succeeded(ArtifactId::generate());
/// assert!(ok.is_success());
///
/// let failed = GenerationResult::failed(FailureKind::Timeout, "slow backend");
/// assert!(failed.identifier().is_none());
/// assert_eq!(failed.failure_kind(), Some(FailureKind::Timeout));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Getters)]
pub struct GenerationResult {
    /// Handle for later retrieval, only on success
    identifier: Option<ArtifactId>,
    /// Terminal status
    status: GenerationStatus,
}

impl GenerationResult {
    /// A successful generation stored under `identifier`.
    pub fn succeeded(identifier: ArtifactId) -> Self {
        Self {
            identifier: Some(identifier),
            status: GenerationStatus::Succeeded,
        }
    }

    /// A failed generation. Never carries an identifier.
    pub fn failed(kind: FailureKind, reason: impl Into<String>) -> Self {
        Self {
            identifier: None,
            status: GenerationStatus::Failed {
                kind,
                reason: reason.into(),
            },
        }
    }

    /// True if the artifact was persisted.
    pub fn is_success(&self) -> bool {
        matches!(self.status, GenerationStatus::Succeeded)
    }

    /// The failure classification, if any.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match &self.status {
            GenerationStatus::Succeeded => None,
            GenerationStatus::Failed { kind, .. } => Some(*kind),
        }
    }
}
