//! HTTP server for Gamesmith.
//!
//! Exposes the generation pipeline over HTTP with axum:
//! - `POST /games` generates and stores a game
//! - `GET /games/{id}` serves a stored game with immutable caching headers
//! - `GET /health` for liveness checks
//!
//! Configuration is layered with the `config` crate (see [`GamesmithConfig`]),
//! and logging goes through `tracing` (see [`init_tracing`]).
//!
//! # Example
//!
//! ```rust,no_run
//! use gamesmith_core::PromptPolicy;
//! use gamesmith_models::StubGenerator;
//! use gamesmith_pipeline::Orchestrator;
//! use gamesmith_server::{ApiState, create_router};
//! use gamesmith_storage::FileSystemStorage;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let orchestrator = Orchestrator::new(
//!     Arc::new(StubGenerator::echo()),
//!     Arc::new(FileSystemStorage::new("games")?),
//!     PromptPolicy::default(),
//! );
//! let app = create_router(ApiState::new(Arc::new(orchestrator)));
//!
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod api;
mod config;
mod response;
mod telemetry;

pub use api::{ApiState, create_router, etag_for};
pub use config::{
    API_KEY_ENV, GamesmithConfig, GeminiSettings, ServerSettings, StorageSettings,
};
pub use response::{ApiError, ErrorBody, GenerateGameRequest, GenerateGameResponse, status_for};
pub use telemetry::init_tracing;
