//! Startup configuration errors.
//!
//! Every one of these stops the server before it binds, so the message names
//! the setting or variable to fix.

/// Configuration error with source location.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// What went wrong, including the offending setting
    pub message: String,
    /// Dotted setting path or environment variable at fault, when known
    pub setting: Option<&'static str>,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a ConfigError not tied to a single setting.
    ///
    /// # Examples
    ///
    /// ```
    /// use gamesmith_error::ConfigError;
    ///
    /// let err = ConfigError::new("Failed to initialize logging: already set");
    /// assert!(err.setting.is_none());
    /// ```
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        Self::located(message.into(), None)
    }

    /// A required environment variable is unset or blank.
    ///
    /// # Examples
    ///
    /// ```
    /// use gamesmith_error::ConfigError;
    ///
    /// let err = ConfigError::missing_env("GEMINI_API_KEY");
    /// assert_eq!(err.setting, Some("GEMINI_API_KEY"));
    /// assert!(err.message.contains("not set"));
    /// ```
    #[track_caller]
    pub fn missing_env(var: &'static str) -> Self {
        Self::located(format!("{} environment variable not set", var), Some(var))
    }

    /// A setting holds a value the server cannot run with.
    ///
    /// # Examples
    ///
    /// ```
    /// use gamesmith_error::ConfigError;
    ///
    /// let err = ConfigError::invalid_setting("gemini.request_timeout_secs", "must be positive");
    /// assert_eq!(err.message, "gemini.request_timeout_secs must be positive");
    /// ```
    #[track_caller]
    pub fn invalid_setting(setting: &'static str, detail: impl std::fmt::Display) -> Self {
        Self::located(format!("{} {}", setting, detail), Some(setting))
    }

    #[track_caller]
    fn located(message: String, setting: Option<&'static str>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message,
            setting,
            line: location.line(),
            file: location.file(),
        }
    }
}
