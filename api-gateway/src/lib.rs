// api-gateway/src/lib.rs
pub mod api;
pub mod config;
pub mod error;

use std::sync::Arc;

use config_store::ConfigStore;
use fee_engine::FeeService;
use transaction_recorder::TransactionService;

/// App state shared across handlers
pub struct AppState {
    /// Cached configuration access
    pub store: Arc<ConfigStore>,
    /// Fee resolution and quoting
    pub fees: Arc<FeeService>,
    /// Swap transaction recording
    pub transactions: Arc<TransactionService>,
}
