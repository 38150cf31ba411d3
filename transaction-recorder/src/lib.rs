//! Persistence of completed external swaps
//!
//! Swaps execute on-chain through the client's wallet; this crate records
//! them after the fact as immutable rows. The recorded fee is cross-checked
//! against a freshly computed expectation for observability, never for
//! enforcement: the chain is the source of truth.

pub mod repository;
pub mod service;

pub use repository::{InMemoryTransactionRepository, PostgresTransactionRepository, TransactionRepository};
pub use service::{NewSwapRecord, TransactionService};
