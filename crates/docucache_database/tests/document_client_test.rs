//! Tests for the document client and in-memory store.

use docucache_database::{DocumentClient, DocumentDbConfig, InMemoryDocumentStore};
use docucache_error::{DataSourceErrorKind, DocucacheError};
use docucache_interface::{DataSource, QueryParameters};
use serde_json::json;
use std::sync::Arc;

const ENDPOINT: &str = "https://localhost:8081";
const KEY: &str = "master-key";

fn seeded_store() -> Arc<InMemoryDocumentStore> {
    let store = Arc::new(InMemoryDocumentStore::new(ENDPOINT, KEY));
    store.create_database("shop");
    store.create_container("shop", "orders").unwrap();
    store
        .upsert_document("shop", "orders", json!({"id": "1", "status": "open", "total": 10}))
        .unwrap();
    store
        .upsert_document("shop", "orders", json!({"id": "2", "status": "closed", "total": 25}))
        .unwrap();
    store
        .upsert_document("shop", "orders", json!({"id": "3", "status": "open", "total": 7}))
        .unwrap();
    store
}

fn client(store: Arc<InMemoryDocumentStore>) -> DocumentClient {
    DocumentClient::new(DocumentDbConfig::new(ENDPOINT, KEY, "shop"), store)
}

fn data_source_kind(err: &DocucacheError) -> DataSourceErrorKind {
    err.as_data_source()
        .expect("data source error")
        .kind()
        .clone()
}

#[tokio::test]
async fn test_fetch_all_documents_in_order() {
    let client = client(seeded_store());

    let rows = client
        .fetch("orders", "SELECT * FROM c", &QueryParameters::new())
        .await
        .unwrap();

    let ids: Vec<_> = rows.records().iter().map(|r| r["id"].clone()).collect();
    assert_eq!(ids, vec![json!("1"), json!("2"), json!("3")]);
    assert_eq!(client.fetch_count(), 1);
}

#[tokio::test]
async fn test_fetch_with_parameters() {
    let client = client(seeded_store());
    let params = QueryParameters::new().with("@status", "open");

    let rows = client
        .fetch("orders", "SELECT * FROM c WHERE c.status = @status", &params)
        .await
        .unwrap();

    assert_eq!(rows.len(), 2);
    assert!(rows.records().iter().all(|r| r["status"] == "open"));
}

#[tokio::test]
async fn test_fetch_no_match_is_empty() {
    let client = client(seeded_store());
    let params = QueryParameters::new().with("@status", "cancelled");

    let rows = client
        .fetch("orders", "SELECT * FROM c WHERE c.status = @status", &params)
        .await
        .unwrap();

    assert!(rows.is_empty());
}

#[tokio::test]
async fn test_wrong_master_key_is_connection_error() {
    let store = seeded_store();
    let client = DocumentClient::new(DocumentDbConfig::new(ENDPOINT, "wrong", "shop"), store);

    let err = client
        .fetch("orders", "SELECT * FROM c", &QueryParameters::new())
        .await
        .unwrap_err();

    assert!(matches!(data_source_kind(&err), DataSourceErrorKind::Connection(_)));
    assert_eq!(client.fetch_count(), 1);
}

#[tokio::test]
async fn test_empty_endpoint_is_connection_error() {
    let store = seeded_store();
    let client = DocumentClient::new(DocumentDbConfig::new("", KEY, "shop"), store);

    let err = client.connect("orders").unwrap_err();

    assert!(matches!(data_source_kind(&err), DataSourceErrorKind::Connection(_)));
}

#[tokio::test]
async fn test_missing_database() {
    let store = seeded_store();
    let client = DocumentClient::new(DocumentDbConfig::new(ENDPOINT, KEY, "warehouse"), store);

    let err = client
        .fetch("orders", "SELECT * FROM c", &QueryParameters::new())
        .await
        .unwrap_err();

    assert_eq!(
        data_source_kind(&err),
        DataSourceErrorKind::DatabaseNotFound("warehouse".to_string())
    );
}

#[tokio::test]
async fn test_missing_container() {
    let client = client(seeded_store());

    let err = client
        .fetch("invoices", "SELECT * FROM c", &QueryParameters::new())
        .await
        .unwrap_err();

    assert_eq!(
        data_source_kind(&err),
        DataSourceErrorKind::ContainerNotFound("invoices".to_string())
    );
}

#[tokio::test]
async fn test_bad_query_is_query_error() {
    let client = client(seeded_store());

    let err = client
        .fetch("orders", "DELETE FROM c", &QueryParameters::new())
        .await
        .unwrap_err();

    assert!(matches!(data_source_kind(&err), DataSourceErrorKind::Query(_)));
}

#[tokio::test]
async fn test_unbound_parameter_is_query_error() {
    let client = client(seeded_store());

    let err = client
        .fetch(
            "orders",
            "SELECT * FROM c WHERE c.status = @status",
            &QueryParameters::new(),
        )
        .await
        .unwrap_err();

    assert!(matches!(data_source_kind(&err), DataSourceErrorKind::Query(_)));
}

#[test]
fn test_connect_reaches_container() {
    let client = client(seeded_store());

    let connection = client.connect("orders").unwrap();
    let rows = connection
        .get_items("SELECT * FROM o WHERE o.total = 25", &QueryParameters::new())
        .unwrap();

    assert_eq!(connection.container_id(), "orders");
    assert_eq!(rows.records(), &[json!({"id": "2", "status": "closed", "total": 25})]);
}

#[test]
fn test_upsert_replaces_by_id() {
    let store = seeded_store();
    store
        .upsert_document("shop", "orders", json!({"id": "2", "status": "open", "total": 25}))
        .unwrap();
    store
        .upsert_document("shop", "orders", json!({"note": "no id"}))
        .unwrap();

    let client = client(store);
    let rows = client
        .connect("orders")
        .unwrap()
        .get_items("SELECT * FROM c", &QueryParameters::new())
        .unwrap();

    assert_eq!(rows.len(), 4);
    assert_eq!(rows.records()[1]["status"], "open");
    assert_eq!(rows.records()[3], json!({"note": "no id"}));
}

#[test]
fn test_seeding_missing_targets() {
    let store = InMemoryDocumentStore::new(ENDPOINT, KEY);

    let err = store.create_container("nope", "orders").unwrap_err();
    assert_eq!(
        data_source_kind(&err),
        DataSourceErrorKind::DatabaseNotFound("nope".to_string())
    );

    store.create_database("shop");
    let err = store
        .upsert_document("shop", "orders", json!({"id": "1"}))
        .unwrap_err();
    assert_eq!(
        data_source_kind(&err),
        DataSourceErrorKind::ContainerNotFound("orders".to_string())
    );
}
