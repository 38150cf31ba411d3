//! Fee and quote output contracts

use common::decimal::{Amount, Decimal, Rate};
use common::model::FeeType;
use serde::{Deserialize, Serialize};

#[cfg(feature = "utoipa")]
use utoipa::ToSchema;

/// Fee breakdown for a single swap amount
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
pub struct SwapFee {
    /// Fee deducted from the input amount, 8 decimal places
    pub fee_amount: Amount,
    /// Input amount net of the fee, 8 decimal places
    pub net_amount: Amount,
    /// Effective fee rate percentage after resolution and capping,
    /// 4 decimal places
    pub fee_rate: Rate,
    /// Fee type the rate was resolved for
    pub fee_type: FeeType,
}

/// A full swap quote
///
/// The output estimate equals the net amount after fees: exchange-rate
/// discovery is delegated to the on-chain router by the client, so the quote
/// answers "how much fee will be deducted", not "what is the live price".
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "utoipa", derive(ToSchema))]
pub struct SwapQuote {
    /// Input amount, 8 decimal places
    pub from_amount: Amount,
    /// Estimated output before slippage, 8 decimal places
    pub to_amount_estimate: Amount,
    /// Fee deducted from the input amount, 8 decimal places
    pub fee_amount: Amount,
    /// Effective fee rate percentage, 4 decimal places
    pub fee_rate: Rate,
    /// Coarse size-based price impact estimate percentage, 4 decimal
    /// places. Not a liquidity-curve model.
    pub price_impact: Decimal,
    /// Worst acceptable output after slippage, 8 decimal places
    pub minimum_received: Amount,
    /// Slippage tolerance percentage applied, 2 decimal places
    pub slippage: Decimal,
}
