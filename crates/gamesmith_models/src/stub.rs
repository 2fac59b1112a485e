//! Deterministic in-process backend.
//!
//! Used by tests throughout the workspace and by the server's `--stub` mode
//! for offline development. Never touches the network.

use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use gamesmith_core::{NormalizedPrompt, RawResponse};
use gamesmith_error::{GatewayError, GatewayErrorKind};
use gamesmith_interface::GameGenerator;

/// What a [`StubGenerator`] does when called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StubBehavior {
    /// Return the given text verbatim
    Respond(String),
    /// Return a minimal HTML document embedding the user turn
    Echo,
    /// Fail with the given error kind
    Fail(GatewayErrorKind),
    /// Wait, then return the given text
    Delayed {
        /// How long the "backend" takes
        delay: Duration,
        /// Text returned once the delay elapses
        text: String,
    },
}

/// Backend stub with fixed, deterministic behavior.
///
/// Enforces its own bounded wait like a real gateway: a `Delayed` stub whose
/// delay exceeds the timeout fails with `Timeout` once the timeout elapses.
///
/// # Examples
///
/// ```
/// use gamesmith_core::normalize;
/// use gamesmith_interface::GameGenerator;
/// use gamesmith_models::StubGenerator;
///
/// # #[tokio::main]
/// # async fn main() {
/// let stub = StubGenerator::respond("<!DOCTYPE html><html></html>");
/// let prompt = normalize("A quiz about volcanoes").unwrap();
/// let raw = stub.generate(&prompt).await.unwrap();
/// assert_eq!(raw.text(), "<!DOCTYPE html><html></html>");
/// assert_eq!(stub.call_count(), 1);
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct StubGenerator {
    behavior: StubBehavior,
    timeout: Duration,
    calls: Arc<AtomicUsize>,
}

impl StubGenerator {
    /// Stub with an explicit behavior and a 30 second bound.
    pub fn new(behavior: StubBehavior) -> Self {
        Self {
            behavior,
            timeout: Duration::from_secs(30),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Always answer with `text`.
    pub fn respond(text: impl Into<String>) -> Self {
        Self::new(StubBehavior::Respond(text.into()))
    }

    /// Answer with a document containing the user turn.
    pub fn echo() -> Self {
        Self::new(StubBehavior::Echo)
    }

    /// Always fail with `kind`.
    pub fn fail(kind: GatewayErrorKind) -> Self {
        Self::new(StubBehavior::Fail(kind))
    }

    /// Answer with `text` after `delay`.
    pub fn delayed(delay: Duration, text: impl Into<String>) -> Self {
        Self::new(StubBehavior::Delayed {
            delay,
            text: text.into(),
        })
    }

    /// Replace the bounded wait.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Number of times `generate` has been invoked, across clones.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn run(&self, prompt: &NormalizedPrompt) -> Result<RawResponse, GatewayError> {
        match &self.behavior {
            StubBehavior::Respond(text) => Ok(RawResponse::new(text.clone())),
            StubBehavior::Echo => Ok(RawResponse::new(format!(
                "<!DOCTYPE html>\n<html>\n<body>\n<p>{}</p>\n</body>\n</html>",
                prompt.user_text()
            ))),
            StubBehavior::Fail(kind) => Err(GatewayError::new(kind.clone())),
            StubBehavior::Delayed { delay, text } => {
                tokio::time::sleep(*delay).await;
                Ok(RawResponse::new(text.clone()))
            }
        }
    }
}

#[async_trait]
impl GameGenerator for StubGenerator {
    async fn generate(&self, prompt: &NormalizedPrompt) -> Result<RawResponse, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match tokio::time::timeout(self.timeout, self.run(prompt)).await {
            Ok(result) => result,
            Err(_) => Err(GatewayError::new(GatewayErrorKind::Timeout(
                self.timeout.as_millis() as u64,
            ))),
        }
    }

    fn provider_name(&self) -> &'static str {
        "stub"
    }

    fn model_name(&self) -> &str {
        "stub"
    }
}
