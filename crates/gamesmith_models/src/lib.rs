//! Generative backend integrations for Gamesmith.
//!
//! - [`GeminiClient`] talks to the Google Gemini `generateContent` REST API.
//! - [`StubGenerator`] is a deterministic in-process backend for tests and
//!   offline development.
//!
//! Both implement [`gamesmith_interface::GameGenerator`].
//!
//! # Example
//!
//! ```no_run
//! use gamesmith_core::normalize;
//! use gamesmith_interface::GameGenerator;
//! use gamesmith_models::{GeminiClient, GeminiConfigBuilder};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = GeminiConfigBuilder::default()
//!     .api_key(std::env::var("GEMINI_API_KEY")?)
//!     .build()?;
//! let client = GeminiClient::new(config)?;
//!
//! let prompt = normalize("A counting game with apples for preschoolers")?;
//! let raw = client.generate(&prompt).await?;
//! println!("{} bytes", raw.len());
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod gemini;
mod stub;

pub use gemini::{GeminiClient, GeminiConfig, GeminiConfigBuilder, GeminiConfigBuilderError};
pub use stub::{StubBehavior, StubGenerator};
