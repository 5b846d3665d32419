//! Errors from assembling configuration with a generated builder.

/// Why a configuration builder refused to build.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum BuilderErrorKind {
    /// A required setting was never supplied
    #[display("Missing setting '{}'", _0)]
    MissingSetting(String),
    /// A supplied setting was rejected
    #[display("Invalid setting: {}", _0)]
    InvalidSetting(String),
}

/// Configuration builder error with location tracking.
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Builder Error: {} at line {} in {}", kind, line, file)]
pub struct BuilderError {
    kind: BuilderErrorKind,
    line: u32,
    file: &'static str,
}

impl BuilderError {
    /// Create a new builder error with caller location tracking.
    ///
    /// # Examples
    ///
    /// ```
    /// use docucache_error::{BuilderError, BuilderErrorKind};
    ///
    /// let err = BuilderError::new(BuilderErrorKind::MissingSetting("master_key".to_string()));
    /// assert!(err.to_string().contains("Missing setting 'master_key'"));
    /// ```
    #[track_caller]
    pub fn new(kind: BuilderErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &BuilderErrorKind {
        &self.kind
    }
}
