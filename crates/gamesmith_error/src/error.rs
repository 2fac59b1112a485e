//! Top-level error wrapper types.

use crate::{ConfigError, ExtractionError, GatewayError, PromptError, StorageError};

/// All error conditions surfaced by Gamesmith crates.
///
/// # Examples
///
/// ```
/// use gamesmith_error::{GamesmithError, StorageError, StorageErrorKind};
///
/// let storage_err = StorageError::new(StorageErrorKind::EmptyContent);
/// let err: GamesmithError = storage_err.into();
/// assert!(format!("{}", err).contains("Storage Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum GamesmithErrorKind {
    /// Prompt rejected by the normalizer
    #[from(PromptError)]
    Prompt(PromptError),
    /// Generative backend call failed
    #[from(GatewayError)]
    Gateway(GatewayError),
    /// Backend output was not a usable document
    #[from(ExtractionError)]
    Extraction(ExtractionError),
    /// Artifact storage error
    #[from(StorageError)]
    Storage(StorageError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
}

/// Gamesmith error with kind discrimination.
///
/// # Examples
///
/// ```
/// use gamesmith_error::{GamesmithErrorKind, GamesmithResult, ConfigError};
///
/// fn might_fail() -> GamesmithResult<()> {
///     Err(ConfigError::new("Missing field"))?
/// }
///
/// let err = might_fail().unwrap_err();
/// assert!(matches!(err.kind(), GamesmithErrorKind::Config(_)));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Gamesmith Error: {}", _0)]
pub struct GamesmithError(Box<GamesmithErrorKind>);

impl GamesmithError {
    /// Create a new error from a kind.
    pub fn new(kind: GamesmithErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &GamesmithErrorKind {
        &self.0
    }
}

// Generic From implementation for any type that converts to GamesmithErrorKind
impl<T> From<T> for GamesmithError
where
    T: Into<GamesmithErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Gamesmith operations.
pub type GamesmithResult<T> = std::result::Result<T, GamesmithError>;
