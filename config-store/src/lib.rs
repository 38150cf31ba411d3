//! Cached, read-mostly access to fee, pair, swap and setting configuration
//!
//! The store insulates the fee resolver from repeated storage round-trips.
//! Caching is a pure performance layer: every lookup stays correct with the
//! TTL set to zero.

pub mod cache;
pub mod config;
pub mod repository;
pub mod service;

pub use cache::TtlCache;
pub use config::ConfigStoreConfig;
pub use repository::{ConfigRepository, InMemoryConfigRepository, PostgresConfigRepository};
pub use service::ConfigStore;
