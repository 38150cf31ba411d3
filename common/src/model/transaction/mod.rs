//! Transaction record models

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Amount;
use crate::error::Error;
#[cfg(feature = "utoipa")]
use crate::utoipa::ToSchema;

/// Kind of value movement a transaction records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Trade,
    Swap,
    Deposit,
    Withdrawal,
}

impl TransactionType {
    /// Stable string form used in storage
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Trade => "trade",
            TransactionType::Swap => "swap",
            TransactionType::Deposit => "deposit",
            TransactionType::Withdrawal => "withdrawal",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trade" => Ok(TransactionType::Trade),
            "swap" => Ok(TransactionType::Swap),
            "deposit" => Ok(TransactionType::Deposit),
            "withdrawal" => Ok(TransactionType::Withdrawal),
            other => Err(Error::ValidationError(format!("Unknown transaction type: {}", other))),
        }
    }
}

/// Confirmation status of a recorded transaction
///
/// Records are created as Pending; transitions are driven by an external
/// chain-confirmation watcher, never by this engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Confirming,
    Completed,
    Failed,
    Cancelled,
}

impl TransactionStatus {
    /// Stable string form used in storage
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Confirming => "confirming",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Failed => "failed",
            TransactionStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TransactionStatus::Pending),
            "confirming" => Ok(TransactionStatus::Confirming),
            "completed" => Ok(TransactionStatus::Completed),
            "failed" => Ok(TransactionStatus::Failed),
            "cancelled" => Ok(TransactionStatus::Cancelled),
            other => Err(Error::ValidationError(format!("Unknown transaction status: {}", other))),
        }
    }
}

/// Immutable record of a swap that already happened on-chain
///
/// The chain is the source of truth; this record is bookkeeping. It is
/// created once after on-chain execution and never mutated by this engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
pub struct Transaction {
    /// Server-generated unique ID
    pub id: Uuid,
    /// Kind of value movement
    pub tx_type: TransactionType,
    /// Wallet that signed the swap
    pub wallet_address: String,
    /// Chain the swap executed on
    pub chain_id: i64,
    /// Source token contract address
    pub from_token: String,
    /// Destination token contract address
    pub to_token: String,
    /// Amount of the source token spent
    pub from_amount: Amount,
    /// Amount of the destination token received
    pub to_amount: Amount,
    /// Fee deducted, denominated in the source token
    pub fee_amount: Amount,
    /// On-chain transaction hash, globally unique
    pub tx_hash: String,
    /// Confirmation status
    pub status: TransactionStatus,
    /// Free-form record metadata (expected fee rate, fee collector, ...)
    pub metadata: Option<serde_json::Value>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}
