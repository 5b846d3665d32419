//! In-memory document store.
//!
//! Stands in for a document database account: databases hold containers,
//! containers hold JSON documents in insertion order.

use docucache_error::{DataSourceError, DataSourceErrorKind, DocucacheResult};
use serde_json::Value as JsonValue;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

type Containers = HashMap<String, Vec<JsonValue>>;

/// Document database account kept in memory.
///
/// Clients must present the account's endpoint and master key before they
/// can reach a database.
#[derive(Debug)]
pub struct InMemoryDocumentStore {
    endpoint: String,
    master_key: String,
    databases: RwLock<HashMap<String, Containers>>,
}

impl InMemoryDocumentStore {
    /// Create an empty account reachable at `endpoint` with `master_key`.
    pub fn new(endpoint: impl Into<String>, master_key: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            master_key: master_key.into(),
            databases: RwLock::new(HashMap::new()),
        }
    }

    /// Account endpoint.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Whether `endpoint` and `master_key` identify this account.
    pub fn authenticates(&self, endpoint: &str, master_key: &str) -> bool {
        self.endpoint == endpoint && self.master_key == master_key
    }

    /// Create a database; existing databases are left as they are.
    #[tracing::instrument(skip(self))]
    pub fn create_database(&self, database_id: &str) {
        let mut databases = self.write();
        if !databases.contains_key(database_id) {
            databases.insert(database_id.to_string(), Containers::new());
            tracing::info!("Created database");
        }
    }

    /// Create a container; existing containers are left as they are.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseNotFound` if the database does not exist.
    #[tracing::instrument(skip(self))]
    pub fn create_container(&self, database_id: &str, container_id: &str) -> DocucacheResult<()> {
        let mut databases = self.write();
        let containers = databases.get_mut(database_id).ok_or_else(|| {
            DataSourceError::new(DataSourceErrorKind::DatabaseNotFound(
                database_id.to_string(),
            ))
        })?;
        containers.entry(container_id.to_string()).or_default();
        tracing::info!("Created container");
        Ok(())
    }

    /// Insert a document, replacing any document with the same `id`.
    ///
    /// Documents without an `id` field are always appended.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseNotFound` or `ContainerNotFound` if the target does
    /// not exist.
    #[tracing::instrument(skip(self, document))]
    pub fn upsert_document(
        &self,
        database_id: &str,
        container_id: &str,
        document: JsonValue,
    ) -> DocucacheResult<()> {
        let mut databases = self.write();
        let containers = databases.get_mut(database_id).ok_or_else(|| {
            DataSourceError::new(DataSourceErrorKind::DatabaseNotFound(
                database_id.to_string(),
            ))
        })?;
        let documents = containers.get_mut(container_id).ok_or_else(|| {
            DataSourceError::new(DataSourceErrorKind::ContainerNotFound(
                container_id.to_string(),
            ))
        })?;

        let existing = document.get("id").and_then(|id| {
            documents
                .iter()
                .position(|candidate| candidate.get("id") == Some(id))
        });
        match existing {
            Some(index) => documents[index] = document,
            None => documents.push(document),
        }
        tracing::debug!(documents = documents.len(), "Upserted document");
        Ok(())
    }

    /// Whether the database exists.
    pub fn has_database(&self, database_id: &str) -> bool {
        self.read().contains_key(database_id)
    }

    /// Whether the container exists in the database.
    pub fn has_container(&self, database_id: &str, container_id: &str) -> bool {
        self.read()
            .get(database_id)
            .is_some_and(|containers| containers.contains_key(container_id))
    }

    /// Run `f` over the container's documents.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseNotFound` or `ContainerNotFound` if the container has
    /// gone away since the caller connected.
    pub(crate) fn with_documents<T>(
        &self,
        database_id: &str,
        container_id: &str,
        f: impl FnOnce(&[JsonValue]) -> DocucacheResult<T>,
    ) -> DocucacheResult<T> {
        let databases = self.read();
        let containers = databases.get(database_id).ok_or_else(|| {
            DataSourceError::new(DataSourceErrorKind::DatabaseNotFound(
                database_id.to_string(),
            ))
        })?;
        let documents = containers.get(container_id).ok_or_else(|| {
            DataSourceError::new(DataSourceErrorKind::ContainerNotFound(
                container_id.to_string(),
            ))
        })?;
        f(documents)
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Containers>> {
        self.databases.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Containers>> {
        self.databases.write().unwrap_or_else(PoisonError::into_inner)
    }
}
