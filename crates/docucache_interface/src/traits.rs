//! The data source capability.

use crate::{QueryParameters, ResultSet};
use async_trait::async_trait;
use docucache_error::DocucacheResult;

/// Authoritative source of query results that the cache reads through.
///
/// Implementations own their connection lifecycle: every call is expected to
/// connect (or reuse a connection) internally. Failures are reported as
/// `DataSourceError` wrapped in `DocucacheError`.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Run `query` with `parameters` against `container`.
    ///
    /// Returns records in the order the underlying query produced them.
    async fn fetch(
        &self,
        container: &str,
        query: &str,
        parameters: &QueryParameters,
    ) -> DocucacheResult<ResultSet>;
}

#[async_trait]
impl<T> DataSource for std::sync::Arc<T>
where
    T: DataSource + ?Sized,
{
    async fn fetch(
        &self,
        container: &str,
        query: &str,
        parameters: &QueryParameters,
    ) -> DocucacheResult<ResultSet> {
        (**self).fetch(container, query, parameters).await
    }
}
