//! Generation pipeline for Gamesmith.
//!
//! - [`extract`] turns a backend's raw response into a servable HTML document
//! - [`Orchestrator`] sequences normalize → generate → extract → persist and
//!   resolves identifiers back to artifacts
//!
//! # Example
//!
//! ```rust,no_run
//! use gamesmith_core::PromptPolicy;
//! use gamesmith_models::StubGenerator;
//! use gamesmith_pipeline::Orchestrator;
//! use gamesmith_storage::FileSystemStorage;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let orchestrator = Orchestrator::new(
//!     Arc::new(StubGenerator::echo()),
//!     Arc::new(FileSystemStorage::new("/tmp/gamesmith-games")?),
//!     PromptPolicy::default(),
//! );
//!
//! let result = orchestrator.handle_generate("A word search about ocean animals").await;
//! if let Some(id) = result.identifier() {
//!     let html = orchestrator.handle_play(&id.to_string()).await?;
//!     println!("{} bytes", html.len());
//! }
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod extraction;
mod orchestrator;

pub use extraction::{extract, extract_document};
pub use orchestrator::{Orchestrator, classify};
