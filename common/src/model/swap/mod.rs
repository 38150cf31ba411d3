//! Swap router configuration model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Decimal;
#[cfg(feature = "utoipa")]
use crate::utoipa::ToSchema;

/// Per-chain DEX router descriptor
///
/// Supplies the router/factory addresses the client signs against and the
/// default slippage tolerance used when the caller does not override it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
pub struct SwapConfig {
    /// Unique config ID
    pub id: i64,
    /// Chain the router is deployed on
    pub chain_id: i64,
    /// Display name (e.g. "PancakeSwap V2")
    pub name: String,
    /// DEX protocol identifier (e.g. "uniswap_v2", "pancakeswap_v2")
    pub protocol: String,
    /// Router contract address
    pub router_address: String,
    /// Factory contract address
    pub factory_address: Option<String>,
    /// Default slippage tolerance percentage, 0.01..=50
    pub slippage_tolerance: Decimal,
    /// Whether the route is offered
    pub is_active: bool,
    /// Free-form protocol metadata
    pub metadata: Option<serde_json::Value>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}
