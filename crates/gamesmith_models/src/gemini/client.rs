//! Google Gemini API implementation.
//!
//! [`GeminiClient`] issues exactly one `generateContent` request per call.
//! It never retries: a failed generation is reported to the caller, who can
//! resubmit. The whole exchange (connect, send, read body) is bounded by the
//! configured timeout.
//!
//! # Status mapping
//!
//! | Backend answer                         | Gateway error        |
//! |----------------------------------------|----------------------|
//! | 429, or `RESOURCE_EXHAUSTED` status    | `QuotaExceeded`      |
//! | 408, 504, or local timeout             | `Timeout`            |
//! | any other non-2xx, connection failure  | `Unavailable`        |
//! | 2xx without decodable candidate text   | `MalformedResponse`  |

use async_trait::async_trait;
use std::time::Instant;
use tracing::instrument;

use gamesmith_core::{NormalizedPrompt, RawResponse};
use gamesmith_error::{ConfigError, GatewayError, GatewayErrorKind};
use gamesmith_interface::GameGenerator;

use super::GeminiConfig;
use super::dto::{ErrorEnvelope, GenerateContentRequest, GenerateContentResponse};

/// Longest slice of an error body kept in error messages.
const ERROR_EXCERPT_LEN: usize = 300;

/// Client for the Google Gemini REST API.
///
/// Holds only immutable state (configuration and a pooled `reqwest::Client`),
/// so a single instance can be shared across concurrent requests.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: GeminiConfig,
    endpoint: String,
    http: reqwest::Client,
}

impl GeminiClient {
    /// Create a client from explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the API key is blank or the HTTP client
    /// cannot be built.
    #[instrument(name = "gemini_client_new", skip(config), fields(model = %config.model()))]
    pub fn new(config: GeminiConfig) -> Result<Self, ConfigError> {
        if config.api_key().trim().is_empty() {
            return Err(ConfigError::invalid_setting("gemini.api_key", "is empty"));
        }

        let http = reqwest::Client::builder()
            .timeout(*config.timeout())
            .build()
            .map_err(|e| ConfigError::new(format!("Failed to build HTTP client: {}", e)))?;

        let endpoint = config.endpoint();
        tracing::debug!(endpoint = %endpoint, "Created Gemini client");

        Ok(Self {
            config,
            endpoint,
            http,
        })
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }

    fn timeout_error(&self) -> GatewayError {
        GatewayError::new(GatewayErrorKind::Timeout(
            self.config.timeout().as_millis() as u64,
        ))
    }

    /// Map a transport-level failure.
    fn classify_transport(&self, err: reqwest::Error) -> GatewayError {
        if err.is_timeout() {
            self.timeout_error()
        } else {
            GatewayError::new(GatewayErrorKind::Unavailable(format!(
                "request failed: {}",
                err
            )))
        }
    }

    /// Map a non-2xx status and its body.
    fn classify_status(&self, status: u16, body: &str) -> GatewayError {
        let envelope = serde_json::from_str::<ErrorEnvelope>(body).ok();
        let detail = match &envelope {
            Some(env) if !env.error.message.is_empty() => env.error.message.clone(),
            _ => excerpt(body, ERROR_EXCERPT_LEN).to_string(),
        };
        let exhausted = envelope
            .as_ref()
            .is_some_and(|env| env.error.status == "RESOURCE_EXHAUSTED");

        match status {
            429 => GatewayError::new(GatewayErrorKind::QuotaExceeded(detail)),
            _ if exhausted => GatewayError::new(GatewayErrorKind::QuotaExceeded(detail)),
            408 | 504 => self.timeout_error(),
            _ => GatewayError::new(GatewayErrorKind::Unavailable(format!(
                "HTTP {}: {}",
                status, detail
            ))),
        }
    }

    async fn call(&self, prompt: &NormalizedPrompt) -> Result<RawResponse, GatewayError> {
        let body = GenerateContentRequest::new(prompt, &self.config);

        let response = self
            .http
            .post(&self.endpoint)
            .header("x-goog-api-key", self.config.api_key())
            .json(&body)
            .send()
            .await
            .map_err(|e| self.classify_transport(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let err = self.classify_status(status.as_u16(), &text);
            tracing::warn!(status = status.as_u16(), error = %err, "Gemini returned error status");
            return Err(err);
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| self.classify_transport(e))?;

        let decoded: GenerateContentResponse = serde_json::from_slice(&bytes).map_err(|e| {
            GatewayError::new(GatewayErrorKind::MalformedResponse(format!(
                "undecodable body ({} bytes): {}",
                bytes.len(),
                e
            )))
        })?;

        decoded
            .into_text()
            .map(RawResponse::new)
            .map_err(|reason| GatewayError::new(GatewayErrorKind::MalformedResponse(reason)))
    }
}

#[async_trait]
impl GameGenerator for GeminiClient {
    #[instrument(
        name = "gemini_generate",
        skip(self, prompt),
        fields(model = %self.config.model(), prompt_len = prompt.user_text().len())
    )]
    async fn generate(&self, prompt: &NormalizedPrompt) -> Result<RawResponse, GatewayError> {
        let started = Instant::now();

        let result = match tokio::time::timeout(*self.config.timeout(), self.call(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(self.timeout_error()),
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(raw) => tracing::info!(elapsed_ms, response_len = raw.len(), "Gemini generation succeeded"),
            Err(e) => tracing::warn!(elapsed_ms, error = %e, "Gemini generation failed"),
        }

        result
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }

    fn model_name(&self) -> &str {
        self.config.model()
    }
}

/// Longest prefix of `text` that fits in `max` bytes without splitting a char.
fn excerpt(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GeminiConfigBuilder;

    fn client() -> GeminiClient {
        let config = GeminiConfigBuilder::default().api_key("k").build().unwrap();
        GeminiClient::new(config).unwrap()
    }

    #[test]
    fn test_blank_key_rejected() {
        let config = GeminiConfigBuilder::default().api_key("  ").build().unwrap();
        assert!(GeminiClient::new(config).is_err());
    }

    #[test]
    fn test_status_mapping() {
        let client = client();
        let kind = |status, body| client.classify_status(status, body).kind;

        assert!(matches!(kind(429, ""), GatewayErrorKind::QuotaExceeded(_)));
        assert!(matches!(
            kind(
                403,
                r#"{"error":{"code":403,"message":"quota","status":"RESOURCE_EXHAUSTED"}}"#
            ),
            GatewayErrorKind::QuotaExceeded(_)
        ));
        assert!(matches!(kind(504, ""), GatewayErrorKind::Timeout(_)));
        assert!(matches!(kind(408, ""), GatewayErrorKind::Timeout(_)));
        assert!(matches!(kind(503, "overloaded"), GatewayErrorKind::Unavailable(_)));
        assert!(matches!(kind(401, ""), GatewayErrorKind::Unavailable(_)));
    }

    #[test]
    fn test_error_message_prefers_envelope() {
        let client = client();
        let err = client.classify_status(
            400,
            r#"{"error":{"code":400,"message":"API key not valid","status":"INVALID_ARGUMENT"}}"#,
        );
        assert_eq!(
            err.kind,
            GatewayErrorKind::Unavailable("HTTP 400: API key not valid".to_string())
        );
    }

    #[test]
    fn test_excerpt_respects_char_boundaries() {
        assert_eq!(excerpt("héllo", 2), "h");
        assert_eq!(excerpt("short", 100), "short");
    }
}
