//! Request orchestration.
//!
//! The orchestrator owns the sequence normalize → generate → extract →
//! persist for one request, and the lookup path for play requests. It holds
//! no per-request state; everything about a request lives on the stack of
//! [`Orchestrator::handle_request`], so one instance serves any number of
//! concurrent callers.

use std::sync::Arc;

use gamesmith_core::{
    ArtifactContent, ArtifactId, FailureKind, GenerationRequest, GenerationResult, GenerationRun,
    GenerationStage, PromptPolicy,
};
use gamesmith_error::{GamesmithErrorKind, GamesmithResult, GatewayErrorKind, StorageError};
use gamesmith_interface::GameGenerator;
use gamesmith_storage::ArtifactStorage;
use tracing::instrument;

use crate::extract;

/// Sequences the generation pipeline and serves stored artifacts.
///
/// Failures short-circuit: the first failing stage decides the
/// [`FailureKind`], nothing after it runs, and nothing is persisted. The
/// backend is called at most once per request.
#[derive(Clone)]
pub struct Orchestrator {
    generator: Arc<dyn GameGenerator>,
    storage: Arc<dyn ArtifactStorage>,
    policy: PromptPolicy,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("provider", &self.generator.provider_name())
            .field("model", &self.generator.model_name())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Orchestrator {
    /// Wire a backend and a store together.
    pub fn new(
        generator: Arc<dyn GameGenerator>,
        storage: Arc<dyn ArtifactStorage>,
        policy: PromptPolicy,
    ) -> Self {
        tracing::info!(
            provider = generator.provider_name(),
            model = generator.model_name(),
            min_chars = policy.min_chars,
            max_chars = policy.max_chars,
            "Created orchestrator"
        );
        Self {
            generator,
            storage,
            policy,
        }
    }

    /// The backend used for generation.
    pub fn generator(&self) -> &Arc<dyn GameGenerator> {
        &self.generator
    }

    /// The artifact store.
    pub fn storage(&self) -> &Arc<dyn ArtifactStorage> {
        &self.storage
    }

    /// Prompt length bounds in force.
    pub fn policy(&self) -> &PromptPolicy {
        &self.policy
    }

    /// Generate and store a game for `raw_prompt`.
    pub async fn handle_generate(&self, raw_prompt: &str) -> GenerationResult {
        self.handle_request(&GenerationRequest::new(raw_prompt)).await
    }

    /// Run one request through the pipeline.
    ///
    /// Never panics and never returns an identifier for a failed run.
    #[instrument(
        skip(self, request),
        fields(
            prompt_len = request.prompt().len(),
            submitted_at = %request.submitted_at(),
            provider = self.generator.provider_name(),
        )
    )]
    pub async fn handle_request(&self, request: &GenerationRequest) -> GenerationResult {
        let mut run = GenerationRun::new();

        match self.run_pipeline(request, &mut run).await {
            Ok(id) => {
                transition(&mut run, GenerationStage::Completed);
                tracing::info!(id = %id, stages = run.history().len(), "Generation completed");
                GenerationResult::succeeded(id)
            }
            Err(err) => {
                let failed_at = run.stage();
                let kind = classify(err.kind());
                transition(&mut run, GenerationStage::Failed(kind));
                tracing::warn!(
                    stage = %failed_at,
                    kind = %kind,
                    error = %err,
                    "Generation failed"
                );
                GenerationResult::failed(kind, reason(err.kind()))
            }
        }
    }

    async fn run_pipeline(
        &self,
        request: &GenerationRequest,
        run: &mut GenerationRun,
    ) -> GamesmithResult<ArtifactId> {
        transition(run, GenerationStage::Normalizing);
        let prompt = self.policy.normalize(request.prompt())?;

        transition(run, GenerationStage::Generating);
        let raw = self.generator.generate(&prompt).await?;

        transition(run, GenerationStage::Extracting);
        let content = extract(&raw)?;

        transition(run, GenerationStage::Persisting);
        let id = self.storage.save(&content).await?;

        Ok(id)
    }

    /// Fetch the stored artifact for a caller-supplied identifier.
    ///
    /// # Errors
    ///
    /// `NotFound` for unknown or malformed identifiers; read failures of the
    /// underlying medium otherwise.
    #[instrument(skip(self))]
    pub async fn handle_play(&self, identifier: &str) -> Result<ArtifactContent, StorageError> {
        let content = self.storage.load(identifier).await;
        if let Err(e) = &content {
            if e.is_not_found() {
                tracing::debug!("Artifact not found");
            } else {
                tracing::error!(error = %e, "Failed to load artifact");
            }
        }
        content
    }
}

/// Advance `run`, logging a stage machine violation instead of panicking.
fn transition(run: &mut GenerationRun, next: GenerationStage) {
    if let Err(e) = run.advance(next) {
        tracing::error!(error = %e, "Orchestrator attempted an invalid stage transition");
    }
}

/// Map an internal error to the one caller-facing [`FailureKind`] it stands for.
///
/// # Examples
///
/// ```
/// use gamesmith_core::FailureKind;
/// use gamesmith_error::{GamesmithErrorKind, GatewayError, GatewayErrorKind};
/// use gamesmith_pipeline::classify;
///
/// let kind: GamesmithErrorKind = GatewayError::new(GatewayErrorKind::Timeout(500)).into();
/// assert_eq!(classify(&kind), FailureKind::Timeout);
/// ```
pub fn classify(kind: &GamesmithErrorKind) -> FailureKind {
    match kind {
        GamesmithErrorKind::Prompt(_) => FailureKind::InvalidPrompt,
        GamesmithErrorKind::Gateway(e) => match &e.kind {
            GatewayErrorKind::Unavailable(_) => FailureKind::Unavailable,
            GatewayErrorKind::Timeout(_) => FailureKind::Timeout,
            GatewayErrorKind::QuotaExceeded(_) => FailureKind::QuotaExceeded,
            GatewayErrorKind::MalformedResponse(_) => FailureKind::MalformedResponse,
        },
        GamesmithErrorKind::Extraction(_) => FailureKind::MalformedResponse,
        GamesmithErrorKind::Storage(_) => FailureKind::StorageFailure,
        // Misconfiguration surfaces as an unusable backend.
        GamesmithErrorKind::Config(_) => FailureKind::Unavailable,
    }
}

/// Caller-facing reason. Never includes paths or source locations.
fn reason(kind: &GamesmithErrorKind) -> String {
    match kind {
        GamesmithErrorKind::Prompt(e) => e.kind.to_string(),
        GamesmithErrorKind::Gateway(e) => match &e.kind {
            GatewayErrorKind::MalformedResponse(_) => {
                "The AI backend returned a response that could not be read".to_string()
            }
            other => other.to_string(),
        },
        GamesmithErrorKind::Extraction(_) => {
            "The AI backend did not return a playable HTML game".to_string()
        }
        GamesmithErrorKind::Storage(_) => "The generated game could not be saved".to_string(),
        GamesmithErrorKind::Config(_) => "The AI backend is not configured".to_string(),
    }
}
