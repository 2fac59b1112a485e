//! Trait definitions for text-generation backends.

use async_trait::async_trait;
use gamesmith_core::{NormalizedPrompt, RawResponse};
use gamesmith_error::GatewayError;

/// Core trait that every generation backend implements.
///
/// Implementations make at most one outbound attempt per call, enforce their
/// own bounded wait, and return the backend text verbatim. They keep no
/// mutable state between calls, so one instance can serve concurrent requests.
#[async_trait]
pub trait GameGenerator: Send + Sync {
    /// Generate raw output for a normalized prompt.
    ///
    /// # Errors
    ///
    /// Returns a [`GatewayError`] whose kind is one of `Unavailable`, `Timeout`,
    /// `QuotaExceeded` or `MalformedResponse`.
    async fn generate(&self, prompt: &NormalizedPrompt) -> Result<RawResponse, GatewayError>;

    /// Provider name (e.g., "gemini", "stub").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g., "gemini-2.0-flash").
    fn model_name(&self) -> &str;
}
