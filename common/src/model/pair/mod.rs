//! Trading pair model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Amount, Rate};
#[cfg(feature = "utoipa")]
use crate::utoipa::ToSchema;

/// A tradeable token pair on a chain
///
/// Base and quote token must be distinct. The pair is owned by its chain and
/// references two Token entities. For fee-lookup purposes the pair is
/// direction-agnostic: a swap of quote into base matches the same pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
pub struct TradingPair {
    /// Unique pair ID
    pub id: i64,
    /// Base token ID
    pub base_token_id: i64,
    /// Quote token ID
    pub quote_token_id: i64,
    /// Chain the pair trades on
    pub chain_id: i64,
    /// Pair symbol (e.g. "WBNB/BUSD")
    pub symbol: String,
    /// Whether the pair is tradeable
    pub is_active: bool,
    /// Minimum trade amount
    pub min_trade_amount: Option<Amount>,
    /// Maximum trade amount (greater than the minimum when both are set)
    pub max_trade_amount: Option<Amount>,
    /// Display precision for prices, 0..=18
    pub price_precision: u8,
    /// Display precision for amounts, 0..=18
    pub amount_precision: u8,
    /// Maker fee override; carried but unused by the swap quote path
    pub maker_fee_override: Option<Rate>,
    /// Taker fee override; wins over any FeeConfig when present
    pub taker_fee_override: Option<Rate>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}
