//! docucache - TTL read-through cache for document database queries.
//!
//! Repeated identical queries within a freshness window are answered from
//! memory instead of the database. On a miss, or once an entry has expired,
//! the query goes to the data source; non-empty results are stored for the
//! configured TTL (19 minutes by default).
//!
//! # Quick Start
//!
//! ```rust
//! use docucache::{
//!     CacheConfig, DocumentClient, DocumentDbConfig, InMemoryDocumentStore, QueryParameters,
//!     TtlCache,
//! };
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = Arc::new(InMemoryDocumentStore::new("https://localhost:8081", "secret"));
//! store.create_database("shop");
//! store.create_container("shop", "orders")?;
//! store.upsert_document("shop", "orders", json!({"id": "1", "status": "open"}))?;
//!
//! let client = DocumentClient::new(
//!     DocumentDbConfig::new("https://localhost:8081", "secret", "shop"),
//!     store,
//! );
//! let cache = TtlCache::new(client, CacheConfig::default());
//!
//! let params = QueryParameters::new().with("@status", "open");
//! let query = "SELECT * FROM c WHERE c.status = @status";
//! let rows = cache.get("orders", "open-orders", query, &params).await;
//! assert_eq!(rows.map(|r| r.len()), Some(1));
//!
//! // Served from memory this time.
//! cache.get("orders", "open-orders", query, &params).await;
//! assert_eq!(cache.source().fetch_count(), 1);
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - `docucache_error` - Error types
//! - `docucache_interface` - `DataSource` trait, query and result types
//! - `docucache_cache` - The TTL cache
//! - `docucache_database` - Document database client and in-memory store
//!
//! This crate re-exports everything and adds configuration loading and
//! tracing setup.

mod config;
mod logging;

pub use config::DocucacheConfig;
pub use logging::{LoggingConfig, init_tracing};

pub use docucache_cache::*;
pub use docucache_database::*;
pub use docucache_error::*;
pub use docucache_interface::*;

use std::sync::Arc;

/// Build a cache over a [`DocumentClient`] from loaded configuration.
///
/// Database settings come from the `[database]` section or, failing that,
/// from the environment.
///
/// # Errors
///
/// Returns a configuration error if no database settings are available.
pub fn connect_cache(
    config: &DocucacheConfig,
    store: Arc<InMemoryDocumentStore>,
) -> DocucacheResult<TtlCache<DocumentClient>> {
    let database = config.database_or_env()?;
    tracing::info!(
        endpoint = %database.endpoint(),
        database_id = %database.database_id(),
        ttl_seconds = config.cache.ttl_seconds(),
        "Creating document cache"
    );
    Ok(TtlCache::new(
        DocumentClient::new(database, store),
        config.cache.clone(),
    ))
}
