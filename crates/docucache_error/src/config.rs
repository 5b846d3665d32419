//! Configuration error types.

/// Configuration could not be loaded: a file failed to parse, or a
/// required variable was absent.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", message, line, file)]
pub struct ConfigError {
    /// Error message
    pub message: String,
    /// Line number where the error occurred
    pub line: u32,
    /// File where the error occurred
    pub file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError with the given message at the current location.
    #[track_caller]
    pub fn new(message: impl Into<String>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: location.line(),
            file: location.file(),
        }
    }

    /// A required environment variable is unset or blank.
    ///
    /// # Examples
    ///
    /// ```
    /// use docucache_error::ConfigError;
    ///
    /// let err = ConfigError::missing_variable("DOCUCACHE_DB_ENDPOINT");
    /// assert_eq!(err.message, "DOCUCACHE_DB_ENDPOINT environment variable not set");
    /// ```
    #[track_caller]
    pub fn missing_variable(name: &str) -> Self {
        Self::new(format!("{} environment variable not set", name))
    }
}
