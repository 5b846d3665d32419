//! Trait definitions for docucache.
//!
//! This crate provides the `DataSource` capability the cache reads through,
//! plus the query and result types that cross that boundary.

mod traits;
mod types;

pub use traits::DataSource;
pub use types::{QueryParameter, QueryParameters, ResultSet};
