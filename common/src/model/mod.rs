//! Domain models for the fee and quote engine

pub mod chain;
pub mod fee;
pub mod pair;
pub mod swap;
pub mod transaction;
pub mod setting;

pub use chain::{Chain, Token};
pub use fee::{FeeConfig, FeeType};
pub use pair::TradingPair;
pub use swap::SwapConfig;
pub use transaction::{Transaction, TransactionStatus, TransactionType};
pub use setting::{SettingRow, SettingValue};
