//! Artifact extraction error types.

/// Reasons a backend response could not be turned into a playable document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum ExtractionErrorKind {
    /// Response (or its fenced block) contained no text
    #[display("Response is empty")]
    EmptyResponse,
    /// No `<html` root element was found
    #[display("No HTML root element in response ({} bytes)", _0)]
    MissingRootElement(usize),
    /// The root element is never closed, usually a truncated response
    #[display("HTML document is not closed ({} bytes)", _0)]
    UnclosedDocument(usize),
}

/// Extraction error with location tracking.
///
/// # Examples
///
/// ```
/// use gamesmith_error::{ExtractionError, ExtractionErrorKind};
///
/// let err = ExtractionError::new(ExtractionErrorKind::MissingRootElement(42));
/// assert!(format!("{}", err).contains("No HTML root"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Extraction Error: {} at line {} in {}", kind, line, file)]
pub struct ExtractionError {
    /// The kind of error that occurred
    pub kind: ExtractionErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl ExtractionError {
    /// Create a new extraction error with automatic location tracking.
    #[track_caller]
    pub fn new(kind: ExtractionErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
