//! AI gateway error types.

/// Failures of a single call to the generative backend.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum GatewayErrorKind {
    /// Backend unreachable or returned a non-quota error status
    #[display("Backend unavailable: {}", _0)]
    Unavailable(String),
    /// No response within the configured bound
    #[display("Backend did not respond within {} ms", _0)]
    Timeout(u64),
    /// Backend reported a rate limit or exhausted quota
    #[display("Backend quota exceeded: {}", _0)]
    QuotaExceeded(String),
    /// Backend answered, but the body could not be decoded into text
    #[display("Malformed backend response: {}", _0)]
    MalformedResponse(String),
}

/// Gateway error with source location tracking.
///
/// # Examples
///
/// ```
/// use gamesmith_error::{GatewayError, GatewayErrorKind};
///
/// let err = GatewayError::new(GatewayErrorKind::Timeout(30_000));
/// assert!(format!("{}", err).contains("30000 ms"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Gateway Error: {} at line {} in {}", kind, line, file)]
pub struct GatewayError {
    /// The kind of error that occurred
    pub kind: GatewayErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl GatewayError {
    /// Create a new GatewayError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GatewayErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }
}
