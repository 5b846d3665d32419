//! Query and result types exchanged with a data source.

use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Ordered set of opaque records returned by a query.
///
/// Records keep the order the data source produced them in; nothing in the
/// cache re-sorts or deduplicates them.
///
/// # Example
///
/// ```
/// use docucache_interface::ResultSet;
/// use serde_json::json;
///
/// let rows = ResultSet::from(vec![json!({"id": 1}), json!({"id": 2})]);
/// assert_eq!(rows.len(), 2);
/// assert!(!rows.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, derive_more::From)]
#[serde(transparent)]
pub struct ResultSet(Vec<JsonValue>);

impl ResultSet {
    /// An empty result set.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Records in source order.
    pub fn records(&self) -> &[JsonValue] {
        &self.0
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the query matched nothing.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consume into the underlying records.
    pub fn into_records(self) -> Vec<JsonValue> {
        self.0
    }
}

impl FromIterator<JsonValue> for ResultSet {
    fn from_iter<I: IntoIterator<Item = JsonValue>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ResultSet {
    type Item = JsonValue;
    type IntoIter = std::vec::IntoIter<JsonValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// A named query parameter, bound as `@name` inside the query text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters)]
pub struct QueryParameter {
    name: String,
    value: JsonValue,
}

impl QueryParameter {
    /// Create a parameter. A missing leading `@` is added.
    pub fn new(name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        let name = name.into();
        let name = if name.starts_with('@') {
            name
        } else {
            format!("@{}", name)
        };
        Self {
            name,
            value: value.into(),
        }
    }
}

/// Ordered list of query parameters, forwarded verbatim to the data source.
///
/// # Example
///
/// ```
/// use docucache_interface::QueryParameters;
/// use serde_json::json;
///
/// let params = QueryParameters::new()
///     .with("@status", "open")
///     .with("region", json!("eu"));
///
/// assert_eq!(params.len(), 2);
/// assert_eq!(params.get("@region"), Some(&json!("eu")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, derive_more::From)]
#[serde(transparent)]
pub struct QueryParameters(Vec<QueryParameter>);

impl QueryParameters {
    /// No parameters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<JsonValue>) -> Self {
        self.0.push(QueryParameter::new(name, value));
        self
    }

    /// Look up a bound value by name (with or without the leading `@`).
    pub fn get(&self, name: &str) -> Option<&JsonValue> {
        let name = name.strip_prefix('@').unwrap_or(name);
        self.0
            .iter()
            .find(|p| p.name.strip_prefix('@') == Some(name))
            .map(|p| &p.value)
    }

    /// Parameters in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, QueryParameter> {
        self.0.iter()
    }

    /// Number of parameters.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether there are no parameters.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
