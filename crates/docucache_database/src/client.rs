//! Document database client.

use crate::{DocumentDbConfig, InMemoryDocumentStore, Query};
use async_trait::async_trait;
use docucache_error::{DataSourceError, DataSourceErrorKind, DocucacheResult};
use docucache_interface::{DataSource, QueryParameters, ResultSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Client for a document database account.
///
/// Every fetch connects from scratch: the client authenticates against the
/// account, opens the configured database, then the requested container.
/// Each stage fails with its own error kind.
#[derive(Debug)]
pub struct DocumentClient {
    config: DocumentDbConfig,
    store: Arc<InMemoryDocumentStore>,
    fetches: AtomicUsize,
}

/// A container reached through [`DocumentClient::connect`].
#[derive(Debug)]
pub struct ContainerConnection<'a> {
    store: &'a InMemoryDocumentStore,
    database_id: &'a str,
    container_id: String,
}

impl DocumentClient {
    /// Create a client for the account behind `store`.
    pub fn new(config: DocumentDbConfig, store: Arc<InMemoryDocumentStore>) -> Self {
        Self {
            config,
            store,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Client configuration.
    pub fn config(&self) -> &DocumentDbConfig {
        &self.config
    }

    /// Number of fetches issued through this client, failed ones included.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    /// Connect to `container` in the configured database.
    ///
    /// # Errors
    ///
    /// - `Connection` if the endpoint or master key is rejected
    /// - `DatabaseNotFound` if the configured database does not exist
    /// - `ContainerNotFound` if the container does not exist
    #[tracing::instrument(skip(self), fields(database_id = %self.config.database_id()))]
    pub fn connect(&self, container: &str) -> DocucacheResult<ContainerConnection<'_>> {
        self.open_client().inspect_err(|e| {
            tracing::error!(error = %e, "Failed to get connection to the database");
        })?;
        let database_id = self.open_database()?;
        let container_id = self.find_container(database_id, container)?;

        tracing::debug!("Connected to container");
        Ok(ContainerConnection {
            store: &self.store,
            database_id,
            container_id,
        })
    }

    fn open_client(&self) -> DocucacheResult<()> {
        let endpoint = self.config.endpoint();
        if endpoint.trim().is_empty() {
            return Err(DataSourceError::new(DataSourceErrorKind::Connection(
                "endpoint is not configured".to_string(),
            ))
            .into());
        }
        if !self.store.authenticates(endpoint, self.config.master_key()) {
            return Err(DataSourceError::new(DataSourceErrorKind::Connection(format!(
                "authorization rejected by {}",
                endpoint
            )))
            .into());
        }
        Ok(())
    }

    fn open_database(&self) -> DocucacheResult<&str> {
        let database_id = self.config.database_id().as_str();
        if !self.store.has_database(database_id) {
            tracing::error!("A database with id '{}' does not exist", database_id);
            return Err(DataSourceError::new(DataSourceErrorKind::DatabaseNotFound(
                database_id.to_string(),
            ))
            .into());
        }
        Ok(database_id)
    }

    fn find_container(&self, database_id: &str, container: &str) -> DocucacheResult<String> {
        if !self.store.has_container(database_id, container) {
            tracing::error!("A container with id '{}' does not exist", container);
            return Err(DataSourceError::new(DataSourceErrorKind::ContainerNotFound(
                container.to_string(),
            ))
            .into());
        }
        Ok(container.to_string())
    }
}

impl ContainerConnection<'_> {
    /// Container this connection points at.
    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    /// Run a query against the container.
    ///
    /// # Errors
    ///
    /// Returns a `Query` error for unsupported syntax or unbound parameters.
    #[tracing::instrument(skip(self, parameters), fields(container = %self.container_id))]
    pub fn get_items(&self, query: &str, parameters: &QueryParameters) -> DocucacheResult<ResultSet> {
        let query = Query::parse(query)?;
        let rows = self
            .store
            .with_documents(self.database_id, &self.container_id, |documents| {
                query.execute(documents, parameters)
            })?;
        tracing::debug!(rows = rows.len(), "Query executed");
        Ok(rows)
    }
}

#[async_trait]
impl DataSource for DocumentClient {
    async fn fetch(
        &self,
        container: &str,
        query: &str,
        parameters: &QueryParameters,
    ) -> DocucacheResult<ResultSet> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.connect(container)?.get_items(query, parameters)
    }
}
