//! Prompt validation error types.

/// Reasons a user prompt is rejected before any backend call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum PromptErrorKind {
    /// Prompt is empty or whitespace only
    #[display("Prompt is empty")]
    Empty,
    /// Prompt is shorter than the configured minimum
    #[display("Prompt too short: {} characters, minimum is {}", actual, min)]
    TooShort {
        /// Minimum accepted length in characters
        min: usize,
        /// Length of the trimmed prompt in characters
        actual: usize,
    },
    /// Prompt exceeds the configured maximum
    #[display("Prompt too long: {} characters, maximum is {}", actual, max)]
    TooLong {
        /// Maximum accepted length in characters
        max: usize,
        /// Length of the trimmed prompt in characters
        actual: usize,
    },
}

/// Prompt error with location tracking.
///
/// # Examples
///
/// ```
/// use gamesmith_error::{PromptError, PromptErrorKind};
///
/// let err = PromptError::new(PromptErrorKind::TooLong { max: 10, actual: 12 });
/// assert!(format!("{}", err).contains("too long"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Prompt Error: {} at line {} in {}", kind, line, file)]
pub struct PromptError {
    /// The kind of error that occurred
    pub kind: PromptErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl PromptError {
    /// Create a new prompt error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: PromptErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
