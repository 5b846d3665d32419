//! Top-level error wrapper types.

use crate::{BuilderError, ConfigError, DataSourceError};

/// Every error condition a docucache operation can report.
///
/// # Examples
///
/// ```
/// use docucache_error::{ConfigError, DocucacheError};
///
/// let err: DocucacheError = ConfigError::new("Missing field").into();
/// assert!(format!("{}", err).contains("Configuration Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum DocucacheErrorKind {
    /// Data source failure (connection, not found, query)
    #[from(DataSourceError)]
    DataSource(DataSourceError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Builder error
    #[from(BuilderError)]
    Builder(BuilderError),
}

/// Docucache error with kind discrimination.
///
/// # Examples
///
/// ```
/// use docucache_error::{DataSourceError, DataSourceErrorKind, DocucacheErrorKind, DocucacheResult};
///
/// fn might_fail() -> DocucacheResult<()> {
///     Err(DataSourceError::new(DataSourceErrorKind::Query("bad syntax".to_string())))?
/// }
///
/// let err = might_fail().unwrap_err();
/// assert!(matches!(err.kind(), DocucacheErrorKind::DataSource(_)));
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Docucache Error: {}", _0)]
pub struct DocucacheError(Box<DocucacheErrorKind>);

impl DocucacheError {
    /// Create a new error from a kind.
    pub fn new(kind: DocucacheErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &DocucacheErrorKind {
        &self.0
    }

    /// The data source error, if this error came from a data source.
    pub fn as_data_source(&self) -> Option<&DataSourceError> {
        match self.kind() {
            DocucacheErrorKind::DataSource(e) => Some(e),
            _ => None,
        }
    }
}

// Generic From implementation for any type that converts to DocucacheErrorKind
impl<T> From<T> for DocucacheError
where
    T: Into<DocucacheErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for docucache operations.
pub type DocucacheResult<T> = std::result::Result<T, DocucacheError>;
