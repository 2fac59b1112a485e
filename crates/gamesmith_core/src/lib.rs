//! Core data types for the Gamesmith game generation pipeline.
//!
//! This crate holds the values that flow between pipeline stages: prompts,
//! backend responses, artifacts and their identifiers, and the per-request
//! stage machine.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod artifact;
mod ids;
mod prompt;
mod request;
mod stage;

pub use artifact::{Artifact, ArtifactContent, RawResponse};
pub use ids::ArtifactId;
pub use prompt::{
    NormalizedPrompt, PromptPolicy, SYSTEM_INSTRUCTION, SYSTEM_INSTRUCTION_VERSION, normalize,
};
pub use request::{FailureKind, GenerationRequest, GenerationResult, GenerationStatus};
pub use stage::{GenerationRun, GenerationStage, InvalidTransition};
