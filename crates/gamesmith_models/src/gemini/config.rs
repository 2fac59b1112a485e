//! Connection settings for the Gemini client.

use derive_builder::Builder;
use derive_getters::Getters;
use std::time::Duration;

/// Default Gemini REST endpoint.
pub(crate) const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model used for game generation.
pub(crate) const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Settings for [`GeminiClient`](super::GeminiClient).
///
/// Captured once at startup and handed to the client; nothing is read from
/// the process environment after construction.
///
/// # Examples
///
/// ```
/// use gamesmith_models::GeminiConfigBuilder;
/// use std::time::Duration;
///
/// let config = GeminiConfigBuilder::default()
///     .api_key("test-key")
///     .timeout(Duration::from_secs(5))
///     .build()
///     .unwrap();
/// assert_eq!(config.model(), "gemini-2.0-flash");
/// assert!(!format!("{:?}", config).contains("test-key"));
/// ```
#[derive(Clone, PartialEq, Builder, Getters)]
#[builder(setter(into))]
pub struct GeminiConfig {
    /// API credential sent as `x-goog-api-key`
    api_key: String,
    /// Model name, without the `models/` prefix
    #[builder(default = "DEFAULT_MODEL.to_string()")]
    model: String,
    /// Scheme and host of the REST API
    #[builder(default = "DEFAULT_BASE_URL.to_string()")]
    base_url: String,
    /// Upper bound on one generation call, including reading the body
    #[builder(default = "Duration::from_secs(120)")]
    timeout: Duration,
    /// Sampling temperature
    #[builder(default = "0.7")]
    temperature: f32,
    /// Output token cap
    #[builder(default = "8192")]
    max_output_tokens: u32,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .field("temperature", &self.temperature)
            .field("max_output_tokens", &self.max_output_tokens)
            .finish()
    }
}

impl GeminiConfig {
    /// Full `generateContent` URL for the configured model.
    pub fn endpoint(&self) -> String {
        let model = self.model.strip_prefix("models/").unwrap_or(&self.model);
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            model
        )
    }
}
