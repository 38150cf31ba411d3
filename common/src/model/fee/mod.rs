//! Fee configuration models

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::{Amount, Rate};
use crate::error::Error;
#[cfg(feature = "utoipa")]
use crate::utoipa::ToSchema;

/// Fee type an individual fee rule applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum FeeType {
    /// Order-book style trading fees
    Trading,
    /// DEX swap fees (the only type consulted by the quote path)
    Swap,
    /// Withdrawal fees
    Withdrawal,
    /// Deposit fees
    Deposit,
}

impl FeeType {
    /// Stable string form, used for storage columns and cache keys
    pub fn as_str(&self) -> &'static str {
        match self {
            FeeType::Trading => "trading",
            FeeType::Swap => "swap",
            FeeType::Withdrawal => "withdrawal",
            FeeType::Deposit => "deposit",
        }
    }
}

impl fmt::Display for FeeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FeeType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trading" => Ok(FeeType::Trading),
            "swap" => Ok(FeeType::Swap),
            "withdrawal" => Ok(FeeType::Withdrawal),
            "deposit" => Ok(FeeType::Deposit),
            other => Err(Error::ValidationError(format!("Unknown fee type: {}", other))),
        }
    }
}

/// A fee rule, optionally scoped to a single chain
///
/// At most one active config is expected per (fee_type, chain_id) pair.
/// The data model does not enforce that, so resolution picks the most
/// recently created active row when duplicates exist.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
pub struct FeeConfig {
    /// Unique config ID
    pub id: i64,
    /// Display name (e.g. "BSC Swap Fee")
    pub name: String,
    /// Fee type the rule applies to
    pub fee_type: FeeType,
    /// Maker fee percentage. Carried for maker/taker differentiation but
    /// not consulted by the swap quote path.
    pub maker_fee: Rate,
    /// Taker fee percentage, the rate used for swap quoting
    pub taker_fee: Rate,
    /// Minimum amount the rule applies to
    pub min_amount: Option<Amount>,
    /// Maximum amount threshold, also used by the price impact heuristic
    pub max_amount: Option<Amount>,
    /// Chain scope; None means the rule is the global default for its type
    pub chain_id: Option<i64>,
    /// Whether the rule participates in resolution
    pub is_active: bool,
    /// Creation timestamp (resolution tie-break among duplicates)
    pub created_at: DateTime<Utc>,
}
