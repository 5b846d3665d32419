//! Layered configuration loading.
//!
//! Configuration is TOML. Sources, later ones overriding earlier ones:
//! - Bundled defaults (include_str! from docucache.toml)
//! - `~/.config/docucache/docucache.toml`
//! - `./docucache.toml`

use config::{Config, File, FileFormat};
use docucache_cache::CacheConfig;
use docucache_database::DocumentDbConfig;
use docucache_error::{ConfigError, DocucacheError, DocucacheResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Bundled default configuration.
const DEFAULT_CONFIG: &str = include_str!("../../../docucache.toml");

/// Top-level docucache configuration.
///
/// # Example
///
/// ```no_run
/// use docucache::DocucacheConfig;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let config = DocucacheConfig::load()?;
/// println!("TTL: {}s", config.cache.ttl_seconds());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Default)]
pub struct DocucacheConfig {
    /// Cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Document database connection, if configured in a file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<DocumentDbConfig>,
}

impl DocucacheConfig {
    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> DocucacheResult<Self> {
        debug!("Loading configuration from file");

        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                DocucacheError::from(ConfigError::new(format!(
                    "Failed to read configuration from {}: {}",
                    path.as_ref().display(),
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                DocucacheError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Load configuration with precedence: current dir > home dir > bundled defaults.
    ///
    /// User config files are optional and silently skipped if not found.
    #[instrument]
    pub fn load() -> DocucacheResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/docucache/docucache.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("docucache").required(false));

        builder
            .build()
            .map_err(|e| {
                DocucacheError::from(ConfigError::new(format!(
                    "Failed to build configuration: {}",
                    e
                )))
            })?
            .try_deserialize()
            .map_err(|e| {
                DocucacheError::from(ConfigError::new(format!(
                    "Failed to parse configuration: {}",
                    e
                )))
            })
    }

    /// Bundled defaults only, ignoring user files.
    pub fn bundled() -> DocucacheResult<Self> {
        Config::builder()
            .add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml))
            .build()
            .and_then(Config::try_deserialize)
            .map_err(|e| {
                DocucacheError::from(ConfigError::new(format!(
                    "Failed to parse bundled configuration: {}",
                    e
                )))
            })
    }

    /// Database settings from the configuration, falling back to the environment.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if neither source provides them.
    pub fn database_or_env(&self) -> DocucacheResult<DocumentDbConfig> {
        match &self.database {
            Some(database) => Ok(database.clone()),
            None => {
                debug!("No [database] section, reading connection settings from environment");
                DocumentDbConfig::from_env()
            }
        }
    }
}
