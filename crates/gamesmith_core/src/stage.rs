//! Per-request generation stage machine.

use crate::FailureKind;

/// Where a generation request currently is.
///
/// ```text
/// Received → Normalizing → Generating → Extracting → Persisting → Completed
///     └───────────┴────────────┴────────────┴────────────┴──→ Failed(kind)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
pub enum GenerationStage {
    /// Request accepted, nothing done yet
    Received,
    /// Validating the prompt
    Normalizing,
    /// Waiting on the backend
    Generating,
    /// Pulling the document out of the response
    Extracting,
    /// Writing the artifact
    Persisting,
    /// Artifact stored and identifier issued
    Completed,
    /// Stopped on a component failure
    #[display("Failed({})", _0)]
    Failed(FailureKind),
}

impl GenerationStage {
    /// `Completed` and `Failed` accept no further transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(self, GenerationStage::Completed | GenerationStage::Failed(_))
    }

    /// The stage that follows on success, if any.
    pub fn successor(&self) -> Option<GenerationStage> {
        match self {
            GenerationStage::Received => Some(GenerationStage::Normalizing),
            GenerationStage::Normalizing => Some(GenerationStage::Generating),
            GenerationStage::Generating => Some(GenerationStage::Extracting),
            GenerationStage::Extracting => Some(GenerationStage::Persisting),
            GenerationStage::Persisting => Some(GenerationStage::Completed),
            GenerationStage::Completed | GenerationStage::Failed(_) => None,
        }
    }

    /// Whether moving from `self` to `next` is allowed.
    pub fn can_transition_to(&self, next: GenerationStage) -> bool {
        if self.is_terminal() {
            return false;
        }
        match next {
            GenerationStage::Failed(_) => true,
            other => self.successor() == Some(other),
        }
    }
}

/// Rejected stage transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("Invalid stage transition: {} -> {}", from, to)]
pub struct InvalidTransition {
    /// Stage the run was in
    pub from: GenerationStage,
    /// Stage that was requested
    pub to: GenerationStage,
}

/// Tracks one request through the stage machine.
///
/// # Examples
///
/// ```
/// use gamesmith_core::{FailureKind, GenerationRun, GenerationStage};
///
/// let mut run = GenerationRun::new();
/// run.advance(GenerationStage::Normalizing).unwrap();
/// run.fail(FailureKind::InvalidPrompt).unwrap();
/// assert!(run.stage().is_terminal());
/// assert!(run.advance(GenerationStage::Generating).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRun {
    stage: GenerationStage,
    history: Vec<GenerationStage>,
}

impl Default for GenerationRun {
    fn default() -> Self {
        Self::new()
    }
}

impl GenerationRun {
    /// Start a run in [`GenerationStage::Received`].
    pub fn new() -> Self {
        Self {
            stage: GenerationStage::Received,
            history: vec![GenerationStage::Received],
        }
    }

    /// Current stage.
    pub fn stage(&self) -> GenerationStage {
        self.stage
    }

    /// Every stage visited, in order.
    pub fn history(&self) -> &[GenerationStage] {
        &self.history
    }

    /// Move to `next`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidTransition`] when `next` does not follow the current stage.
    pub fn advance(&mut self, next: GenerationStage) -> Result<(), InvalidTransition> {
        if !self.stage.can_transition_to(next) {
            return Err(InvalidTransition {
                from: self.stage,
                to: next,
            });
        }
        tracing::debug!(from = %self.stage, to = %next, "Generation stage transition");
        self.stage = next;
        self.history.push(next);
        Ok(())
    }

    /// Move to `Failed(kind)`.
    pub fn fail(&mut self, kind: FailureKind) -> Result<(), InvalidTransition> {
        self.advance(GenerationStage::Failed(kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut run = GenerationRun::new();
        for stage in [
            GenerationStage::Normalizing,
            GenerationStage::Generating,
            GenerationStage::Extracting,
            GenerationStage::Persisting,
            GenerationStage::Completed,
        ] {
            run.advance(stage).unwrap();
        }
        assert_eq!(run.stage(), GenerationStage::Completed);
        assert_eq!(run.history().len(), 6);
    }

    #[test]
    fn test_cannot_skip_stages() {
        let mut run = GenerationRun::new();
        let err = run.advance(GenerationStage::Persisting).unwrap_err();
        assert_eq!(err.from, GenerationStage::Received);
        assert_eq!(run.stage(), GenerationStage::Received);
    }

    #[test]
    fn test_failure_from_any_non_terminal_stage() {
        let path = [
            GenerationStage::Received,
            GenerationStage::Normalizing,
            GenerationStage::Generating,
            GenerationStage::Extracting,
            GenerationStage::Persisting,
        ];
        for stage in path {
            assert!(stage.can_transition_to(GenerationStage::Failed(FailureKind::Timeout)));
        }
    }

    #[test]
    fn test_terminal_stages_are_final() {
        let mut run = GenerationRun::new();
        run.fail(FailureKind::Unavailable).unwrap();
        assert!(run.fail(FailureKind::Timeout).is_err());
        assert!(run.advance(GenerationStage::Normalizing).is_err());

        assert!(!GenerationStage::Completed.can_transition_to(GenerationStage::Failed(
            FailureKind::StorageFailure
        )));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            GenerationStage::Failed(FailureKind::QuotaExceeded).to_string(),
            "Failed(quota_exceeded)"
        );
        assert_eq!(GenerationStage::Extracting.to_string(), "Extracting");
    }
}
