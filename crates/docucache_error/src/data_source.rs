//! Data source error types.

/// Failure conditions reported by a document data source.
///
/// The cache treats every kind the same way; the distinction exists for
/// diagnostics only.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
pub enum DataSourceErrorKind {
    /// Data source unreachable or misconfigured (endpoint, credentials)
    #[display("Data source connection error: {}", _0)]
    Connection(String),
    /// Referenced database does not exist
    #[display("A database with id '{}' does not exist", _0)]
    DatabaseNotFound(String),
    /// Referenced container does not exist
    #[display("A container with id '{}' does not exist", _0)]
    ContainerNotFound(String),
    /// Query or parameter payload rejected
    #[display("Query execution error: {}", _0)]
    Query(String),
}

impl DataSourceErrorKind {
    /// Whether this kind reports a missing database or container.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            DataSourceErrorKind::DatabaseNotFound(_) | DataSourceErrorKind::ContainerNotFound(_)
        )
    }
}

/// Data source error with source location tracking.
///
/// # Examples
///
/// ```
/// use docucache_error::{DataSourceError, DataSourceErrorKind};
///
/// let err = DataSourceError::new(DataSourceErrorKind::ContainerNotFound("orders".to_string()));
/// assert!(format!("{}", err).contains("'orders' does not exist"));
/// assert!(err.kind().is_not_found());
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Data Source Error: {} at line {} in {}", kind, line, file)]
pub struct DataSourceError {
    /// The kind of error that occurred
    pub kind: DataSourceErrorKind,
    /// Line number where error was created
    pub line: u32,
    /// File where error was created
    pub file: &'static str,
}

impl DataSourceError {
    /// Create a new DataSourceError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: DataSourceErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &DataSourceErrorKind {
        &self.kind
    }
}
