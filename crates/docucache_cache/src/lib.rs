//! Read-through caching with TTL support.
//!
//! This crate provides a time-to-live cache that sits in front of a
//! [`DataSource`](docucache_interface::DataSource), answering repeated
//! queries from memory until their entry expires.

#![warn(missing_docs)]

mod cache;
mod clock;
mod config;
mod entry;

pub use cache::TtlCache;
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{CacheConfig, CacheConfigBuilder, DEFAULT_TTL_SECONDS};
pub use entry::CacheEntry;
