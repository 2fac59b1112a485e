//! Error types for Gamesmith.
//!
//! Every pipeline stage owns one error type, and the top-level [`GamesmithError`]
//! wraps them so `?` works across crate boundaries.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - Constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use gamesmith_error::{GamesmithResult, PromptError, PromptErrorKind};
//!
//! fn check(prompt: &str) -> GamesmithResult<()> {
//!     if prompt.trim().is_empty() {
//!         Err(PromptError::new(PromptErrorKind::Empty))?
//!     }
//!     Ok(())
//! }
//!
//! assert!(check("   ").is_err());
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod extraction;
mod gateway;
mod prompt;
mod storage;

pub use config::ConfigError;
pub use error::{GamesmithError, GamesmithErrorKind, GamesmithResult};
pub use extraction::{ExtractionError, ExtractionErrorKind};
pub use gateway::{GatewayError, GatewayErrorKind};
pub use prompt::{PromptError, PromptErrorKind};
pub use storage::{StorageError, StorageErrorKind};
