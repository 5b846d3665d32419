//! The query subset understood by the in-memory store.
//!
//! Supported forms:
//!
//! ```text
//! SELECT * FROM c
//! SELECT * FROM c WHERE c.status = @status AND c.address.city = 'Oslo'
//! ```
//!
//! Operands are `@name` parameters, single-quoted strings, numbers, `true`,
//! `false` or `null`. Keywords are case-insensitive.

use docucache_error::{DataSourceError, DataSourceErrorKind, DocucacheResult};
use docucache_interface::{QueryParameters, ResultSet};
use regex::Regex;
use serde_json::Value as JsonValue;
use std::sync::LazyLock;

static SELECT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)^\s*SELECT\s+\*\s+FROM\s+(\w+)(?:\s+WHERE\s+(.+?))?\s*;?\s*$")
        .expect("Valid select regex")
});

static AND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\s+AND\s+").expect("Valid conjunction regex"));

static CONDITION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\w+)((?:\.\w+)+)\s*=\s*(.+?)$").expect("Valid condition regex")
});

/// Right-hand side of an equality condition.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    /// Bound by name from the query parameters
    Parameter(String),
    /// Inline literal
    Literal(JsonValue),
}

/// `alias.path = operand`
#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    /// Field path below the document root
    pub path: Vec<String>,
    /// Value the field must equal
    pub operand: Operand,
}

/// A parsed query.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Alias the FROM clause gives the container
    pub alias: String,
    /// Conditions joined with AND
    pub conditions: Vec<Condition>,
}

fn query_error(message: String) -> DataSourceError {
    DataSourceError::new(DataSourceErrorKind::Query(message))
}

impl Query {
    /// Parse query text.
    ///
    /// # Errors
    ///
    /// Returns a query error if the text is outside the supported subset.
    ///
    /// # Example
    ///
    /// ```
    /// use docucache_database::{Operand, Query};
    ///
    /// let query = Query::parse("SELECT * FROM c WHERE c.status = @status").unwrap();
    /// assert_eq!(query.alias, "c");
    /// assert_eq!(query.conditions[0].path, vec!["status".to_string()]);
    /// assert_eq!(query.conditions[0].operand, Operand::Parameter("@status".to_string()));
    /// ```
    pub fn parse(text: &str) -> DocucacheResult<Self> {
        let captures = SELECT_RE
            .captures(text)
            .ok_or_else(|| query_error(format!("Unsupported query syntax: {}", text)))?;
        let alias = captures[1].to_string();

        let conditions = match captures.get(2) {
            Some(clause) => split_conjunctions(clause.as_str())
                .into_iter()
                .map(|part| Self::parse_condition(&alias, part.trim()))
                .collect::<DocucacheResult<Vec<_>>>()?,
            None => Vec::new(),
        };

        Ok(Self { alias, conditions })
    }

    fn parse_condition(alias: &str, text: &str) -> DocucacheResult<Condition> {
        let captures = CONDITION_RE
            .captures(text)
            .ok_or_else(|| query_error(format!("Unsupported condition: {}", text)))?;

        if &captures[1] != alias {
            return Err(query_error(format!(
                "Unknown alias '{}' in condition, expected '{}'",
                &captures[1], alias
            ))
            .into());
        }

        let path = captures[2]
            .split('.')
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect();

        Ok(Condition {
            path,
            operand: Self::parse_operand(captures[3].trim())?,
        })
    }

    fn parse_operand(text: &str) -> DocucacheResult<Operand> {
        if text.starts_with('@') {
            return Ok(Operand::Parameter(text.to_string()));
        }
        if let Some(inner) = text.strip_prefix('\'').and_then(|t| t.strip_suffix('\'')) {
            return Ok(Operand::Literal(JsonValue::String(inner.to_string())));
        }
        // Numbers, booleans and null share JSON syntax.
        serde_json::from_str::<JsonValue>(text)
            .ok()
            .filter(|value| !value.is_object() && !value.is_array() && !value.is_string())
            .map(Operand::Literal)
            .ok_or_else(|| query_error(format!("Unsupported operand: {}", text)).into())
    }

    /// Keep the documents matching every condition, in their original order.
    ///
    /// # Errors
    ///
    /// Returns a query error if a referenced parameter is not bound.
    pub fn execute(
        &self,
        documents: &[JsonValue],
        parameters: &QueryParameters,
    ) -> DocucacheResult<ResultSet> {
        let expected = self
            .conditions
            .iter()
            .map(|condition| match &condition.operand {
                Operand::Literal(value) => Ok(value),
                Operand::Parameter(name) => parameters
                    .get(name)
                    .ok_or_else(|| query_error(format!("Parameter {} is not bound", name)).into()),
            })
            .collect::<DocucacheResult<Vec<_>>>()?;

        Ok(documents
            .iter()
            .filter(|document| {
                self.conditions
                    .iter()
                    .zip(&expected)
                    .all(|(condition, value)| lookup(document, &condition.path) == Some(*value))
            })
            .cloned()
            .collect())
    }
}

/// Split a WHERE clause on `AND`, ignoring any inside a quoted literal.
fn split_conjunctions(clause: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    for found in AND_RE.find_iter(clause) {
        let quotes = clause[..found.start()].matches('\'').count();
        if quotes % 2 == 0 {
            parts.push(&clause[start..found.start()]);
            start = found.end();
        }
    }
    parts.push(&clause[start..]);
    parts
}

fn lookup<'a>(document: &'a JsonValue, path: &[String]) -> Option<&'a JsonValue> {
    path.iter()
        .try_fold(document, |current, segment| current.get(segment))
}
