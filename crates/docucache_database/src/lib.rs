//! Document database integration for docucache.
//!
//! This crate provides the data source side of the cache: connection
//! configuration for a document database account, an in-memory document
//! store, and a [`DocumentClient`] that connects to a container in stages
//! (client, database, container) before running a query.
//!
//! # Example
//!
//! ```rust
//! use docucache_database::{DocumentClient, DocumentDbConfig, InMemoryDocumentStore};
//! use docucache_interface::{DataSource, QueryParameters};
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
//! let config = DocumentDbConfig::new("https://localhost:8081", "secret", "shop");
//! let client = DocumentClient::new(config, store);
//!
//! let params = QueryParameters::new().with("@status", "open");
//! let rows = client
//!     .fetch("orders", "SELECT * FROM c WHERE c.status = @status", &params)
//!     .await?;
//! assert_eq!(rows.len(), 1);
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod query;
mod store;

pub use client::{ContainerConnection, DocumentClient};
pub use config::{
    DATABASE_ID_VAR, DocumentDbConfig, DocumentDbConfigBuilder, DocumentDbConfigBuilderError,
    ENDPOINT_VAR, MASTER_KEY_VAR,
};
pub use query::{Condition, Operand, Query};
pub use store::InMemoryDocumentStore;
