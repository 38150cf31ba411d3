//! Chain and token models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(feature = "utoipa")]
use crate::utoipa::ToSchema;

/// A supported blockchain network
///
/// The id is the EVM chain id (e.g. 56 for BNB Smart Chain), not a surrogate
/// key, so it can be compared directly against wallet-provided chain ids.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
pub struct Chain {
    /// EVM chain id
    pub id: i64,
    /// Human-readable chain name (e.g. "BNB Smart Chain")
    pub name: String,
    /// Short symbol (e.g. "BSC")
    pub symbol: String,
    /// Native currency symbol (e.g. "BNB")
    pub native_symbol: String,
    /// Default JSON-RPC endpoint
    pub rpc_url: Option<String>,
    /// Block explorer base URL
    pub explorer_url: Option<String>,
    /// Whether the chain is available for swaps
    pub is_active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// A token listed on a chain
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
pub struct Token {
    /// Unique token ID
    pub id: i64,
    /// Chain the token lives on
    pub chain_id: i64,
    /// Token contract address
    pub contract_address: String,
    /// Token symbol (e.g. "WBNB")
    pub symbol: String,
    /// Token name (e.g. "Wrapped BNB")
    pub name: String,
    /// Number of decimals of the token contract
    pub decimals: u8,
    /// Whether the token is available for swaps
    pub is_active: bool,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}
