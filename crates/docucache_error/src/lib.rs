//! Error types for docucache.
//!
//! This crate provides the error types shared by every docucache crate.
//!
//! # Error Hierarchy
//!
//! Errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - Constructors use `#[track_caller]` for automatic location capture
//!
//! # Examples
//!
//! ```
//! use docucache_error::{DataSourceError, DataSourceErrorKind, DocucacheResult};
//!
//! fn query() -> DocucacheResult<Vec<u8>> {
//!     Err(DataSourceError::new(DataSourceErrorKind::Connection(
//!         "endpoint unreachable".to_string(),
//!     )))?
//! }
//!
//! match query() {
//!     Ok(rows) => println!("Got {} rows", rows.len()),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod config;
mod data_source;
mod error;

pub use builder::{BuilderError, BuilderErrorKind};
pub use config::ConfigError;
pub use data_source::{DataSourceError, DataSourceErrorKind};
pub use error::{DocucacheError, DocucacheErrorKind, DocucacheResult};
