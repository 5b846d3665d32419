//! Connection settings for a document database account.

use derive_getters::Getters;
use docucache_error::{BuilderError, BuilderErrorKind, ConfigError, DocucacheResult};
use serde::{Deserialize, Serialize};

/// Environment variable holding the account endpoint.
pub const ENDPOINT_VAR: &str = "DOCUCACHE_DB_ENDPOINT";
/// Environment variable holding the account master key.
pub const MASTER_KEY_VAR: &str = "DOCUCACHE_DB_MASTER_KEY";
/// Environment variable holding the database id.
pub const DATABASE_ID_VAR: &str = "DOCUCACHE_DB_DATABASE_ID";

/// Where and how to connect to the document database.
///
/// These settings belong to the data source, not to the cache.
///
/// # Example
///
/// ```toml
/// [database]
/// endpoint = "https://myaccount.documents.example.com:443/"
/// master_key = "..."
/// database_id = "shop"
/// ```
#[derive(
    Clone,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    Getters,
    derive_setters::Setters,
    derive_builder::Builder,
)]
#[setters(prefix = "with_", into)]
#[builder(setter(into))]
pub struct DocumentDbConfig {
    /// Account endpoint URL
    endpoint: String,
    /// Account master key
    #[serde(skip_serializing)]
    master_key: String,
    /// Database holding the queried containers
    database_id: String,
}

impl DocumentDbConfig {
    /// Create a configuration from its three parts.
    pub fn new(
        endpoint: impl Into<String>,
        master_key: impl Into<String>,
        database_id: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.into(),
            master_key: master_key.into(),
            database_id: database_id.into(),
        }
    }

    /// Read the configuration from the process environment.
    ///
    /// A `.env` file in the current directory is loaded first if present.
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the first missing variable.
    pub fn from_env() -> DocucacheResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable lookup.
    ///
    /// # Example
    ///
    /// ```
    /// use docucache_database::DocumentDbConfig;
    /// use std::collections::HashMap;
    ///
    /// let vars = HashMap::from([
    ///     ("DOCUCACHE_DB_ENDPOINT", "https://localhost:8081"),
    ///     ("DOCUCACHE_DB_MASTER_KEY", "secret"),
    ///     ("DOCUCACHE_DB_DATABASE_ID", "shop"),
    /// ]);
    /// let config = DocumentDbConfig::from_lookup(|name| vars.get(name).map(|v| v.to_string())).unwrap();
    /// assert_eq!(config.database_id(), "shop");
    /// ```
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> DocucacheResult<Self> {
        let require = |name: &str| {
            lookup(name)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| ConfigError::missing_variable(name))
        };

        let config = DocumentDbConfigBuilder::default()
            .endpoint(require(ENDPOINT_VAR)?)
            .master_key(require(MASTER_KEY_VAR)?)
            .database_id(require(DATABASE_ID_VAR)?)
            .build()
            .map_err(BuilderError::from)?;

        tracing::debug!(endpoint = %config.endpoint, database_id = %config.database_id, "Loaded document database configuration");
        Ok(config)
    }
}

impl From<DocumentDbConfigBuilderError> for BuilderError {
    #[track_caller]
    fn from(err: DocumentDbConfigBuilderError) -> Self {
        match err {
            DocumentDbConfigBuilderError::UninitializedField(field) => {
                BuilderError::new(BuilderErrorKind::MissingSetting(field.to_string()))
            }
            other => BuilderError::new(BuilderErrorKind::InvalidSetting(other.to_string())),
        }
    }
}

impl std::fmt::Debug for DocumentDbConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentDbConfig")
            .field("endpoint", &self.endpoint)
            .field("master_key", &"<redacted>")
            .field("database_id", &self.database_id)
            .finish()
    }
}
