//! Tests for layered configuration loading.

use docucache::{DEFAULT_TTL_SECONDS, DocucacheConfig};
use std::io::Write;
use tempfile::NamedTempFile;

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn test_bundled_defaults() {
    let config = DocucacheConfig::bundled().unwrap();

    assert_eq!(*config.cache.ttl_seconds(), DEFAULT_TTL_SECONDS);
    assert_eq!(*config.cache.ttl_seconds(), 1140);
    assert!(*config.cache.single_flight());
    assert!(*config.cache.enabled());
    assert!(config.database.is_none());
}

#[test]
fn test_from_file_overrides_ttl() {
    let file = write_config(
        r#"
        [cache]
        ttl_seconds = 60
        "#,
    );

    let config = DocucacheConfig::from_file(file.path()).unwrap();

    assert_eq!(*config.cache.ttl_seconds(), 60);
    // Unspecified fields fall back to their defaults.
    assert!(*config.cache.single_flight());
    assert!(config.database.is_none());
}

#[test]
fn test_from_file_with_database_section() {
    let file = write_config(
        r#"
        [cache]
        single_flight = false

        [database]
        endpoint = "https://localhost:8081"
        master_key = "secret"
        database_id = "shop"
        "#,
    );

    let config = DocucacheConfig::from_file(file.path()).unwrap();

    assert!(!*config.cache.single_flight());
    let database = config.database_or_env().unwrap();
    assert_eq!(database.database_id(), "shop");
}

#[test]
fn test_from_file_missing() {
    let err = DocucacheConfig::from_file("/nonexistent/docucache.toml").unwrap_err();

    assert!(err.to_string().contains("Failed to read configuration"));
}

#[test]
fn test_from_file_bad_value() {
    let file = write_config(
        r#"
        [cache]
        ttl_seconds = "soon"
        "#,
    );

    assert!(DocucacheConfig::from_file(file.path()).is_err());
}
