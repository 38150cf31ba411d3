//! Fee resolution and quote computation

use std::sync::Arc;

use common::decimal::{dec, precision, Amount, Decimal, Rate};
use common::error::{Error, Result};
use common::model::FeeType;
use config_store::ConfigStore;
use tracing::debug;

use crate::quote::{SwapFee, SwapQuote};

/// Slippage tolerance applied when neither the caller nor the chain's swap
/// config supplies one, in percent
pub const DEFAULT_SLIPPAGE: Decimal = dec!(0.5);

/// Fallback fee rate when no config and no site setting exist, in percent
const DEFAULT_FEE_RATE: Decimal = dec!(0.3);

/// Fallback fee rate cap, in percent
const DEFAULT_MAX_FEE_RATE: Decimal = dec!(5.0);

/// Lower bound for a caller-supplied slippage override, in percent
const MIN_SLIPPAGE_OVERRIDE: Decimal = dec!(0.01);

/// Upper bound for a caller-supplied slippage override, in percent
const MAX_SLIPPAGE_OVERRIDE: Decimal = dec!(50);

/// Fee resolution and swap-quote computation service
pub struct FeeService {
    /// Cached configuration access
    store: Arc<ConfigStore>,
}

impl FeeService {
    /// Create a fee service over a config store
    pub fn new(store: Arc<ConfigStore>) -> Self {
        Self { store }
    }

    /// Resolve the effective fee rate for a type and optional chain
    ///
    /// Precedence is strict, first match wins: chain-scoped active config,
    /// then global active config, then the `trading.default_fee_rate` site
    /// setting. Only the taker fee is consulted.
    pub async fn effective_fee_rate(&self, fee_type: FeeType, chain_id: Option<i64>) -> Result<Rate> {
        if let Some(chain_id) = chain_id {
            if let Some(config) = self.store.fee_config(fee_type, Some(chain_id)).await? {
                return Ok(config.taker_fee);
            }
        }

        if let Some(config) = self.store.fee_config(fee_type, None).await? {
            return Ok(config.taker_fee);
        }

        self.store
            .decimal_setting("trading", "default_fee_rate", DEFAULT_FEE_RATE)
            .await
    }

    /// Calculate the swap fee for an amount on a chain
    ///
    /// A trading-pair taker override, when given and set, wins over every
    /// config level. The resolved rate is capped at the
    /// `trading.max_fee_rate` site setting.
    pub async fn calculate_swap_fee(
        &self,
        amount: Amount,
        chain_id: i64,
        pair_id: Option<i64>,
    ) -> Result<SwapFee> {
        if amount <= Decimal::ZERO {
            return Err(Error::ValidationError(format!(
                "Swap amount must be positive, got {}",
                amount
            )));
        }

        let resolved = self.resolve_swap_fee_rate(chain_id, pair_id).await?;
        let effective = self.cap_rate(resolved).await?;

        // Net amount is derived from the rounded fee so the two always sum
        // back to the input at amount precision.
        let fee_amount = precision::round_amount(amount * effective / dec!(100));
        let net_amount = precision::round_amount((amount - fee_amount).max(Decimal::ZERO));

        debug!(
            "Swap fee for {} on chain {}: rate {} fee {}",
            amount, chain_id, effective, fee_amount
        );

        Ok(SwapFee {
            fee_amount,
            net_amount,
            fee_rate: precision::round_rate(effective),
            fee_type: FeeType::Swap,
        })
    }

    /// Generate a full swap quote
    ///
    /// Locates the trading pair for the token addresses (direction-agnostic)
    /// for a potential fee override, computes the fee breakdown, and applies
    /// slippage and the price-impact heuristic.
    ///
    /// The slippage tolerance is rounded to its 2-decimal display precision
    /// before it is applied, so `minimum_received` is always consistent with
    /// the `slippage` figure reported back to the caller.
    pub async fn swap_quote(
        &self,
        from_amount: Amount,
        from_token: &str,
        to_token: &str,
        chain_id: i64,
        slippage_override: Option<Decimal>,
    ) -> Result<SwapQuote> {
        if let Some(slippage) = slippage_override {
            if !(MIN_SLIPPAGE_OVERRIDE..=MAX_SLIPPAGE_OVERRIDE).contains(&slippage) {
                return Err(Error::ValidationError(format!(
                    "Slippage must be between {} and {}, got {}",
                    MIN_SLIPPAGE_OVERRIDE, MAX_SLIPPAGE_OVERRIDE, slippage
                )));
            }
        }

        let pair_id = self.store.find_pair_id(chain_id, from_token, to_token).await?;
        let fee = self.calculate_swap_fee(from_amount, chain_id, pair_id).await?;

        // Price ratio is discovered by the on-chain router client-side; the
        // estimate is simply the input net of fees.
        let to_amount_estimate = fee.net_amount;

        let slippage = match slippage_override {
            Some(slippage) => slippage,
            None => self.default_slippage(chain_id).await?,
        };
        let slippage = precision::round_slippage(slippage);

        let price_impact = self.estimate_price_impact(from_amount, chain_id).await?;

        let minimum_received = precision::round_amount(
            (to_amount_estimate * (Decimal::ONE - slippage / dec!(100))).max(Decimal::ZERO),
        );

        Ok(SwapQuote {
            from_amount: precision::round_amount(from_amount),
            to_amount_estimate,
            fee_amount: fee.fee_amount,
            fee_rate: fee.fee_rate,
            price_impact: precision::round_rate(price_impact),
            minimum_received,
            slippage,
        })
    }

    /// Default slippage tolerance for a chain, from its swap config when one
    /// exists
    pub async fn default_slippage(&self, chain_id: i64) -> Result<Decimal> {
        Ok(self
            .store
            .swap_config(chain_id)
            .await?
            .map(|config| config.slippage_tolerance)
            .unwrap_or(DEFAULT_SLIPPAGE))
    }

    /// Capped effective swap fee rate for a chain, without pair overrides
    ///
    /// Used where a rate is displayed outside the context of a concrete
    /// trade, such as the route listing.
    pub async fn swap_fee_rate(&self, chain_id: i64) -> Result<Rate> {
        let resolved = self.effective_fee_rate(FeeType::Swap, Some(chain_id)).await?;
        let effective = self.cap_rate(resolved).await?;
        Ok(precision::round_rate(effective))
    }

    /// Fee collector wallet address from site settings
    pub async fn fee_collector(&self) -> Result<String> {
        self.store.text_setting("trading", "fee_collector_wallet", "").await
    }

    /// Clamp a resolved rate to `[0, trading.max_fee_rate]`
    async fn cap_rate(&self, resolved: Rate) -> Result<Rate> {
        let max_rate = self
            .store
            .decimal_setting("trading", "max_fee_rate", DEFAULT_MAX_FEE_RATE)
            .await?;
        Ok(resolved.min(max_rate).max(Decimal::ZERO))
    }

    async fn resolve_swap_fee_rate(&self, chain_id: i64, pair_id: Option<i64>) -> Result<Rate> {
        if let Some(pair_id) = pair_id {
            if let Some(pair) = self.store.trading_pair(pair_id).await? {
                if let Some(override_rate) = pair.taker_fee_override {
                    return Ok(override_rate);
                }
            }
        }

        self.effective_fee_rate(FeeType::Swap, Some(chain_id)).await
    }

    /// Coarse price impact estimate based on trade size
    ///
    /// Uses the chain's swap FeeConfig max-amount threshold as a reference
    /// point when one exists; otherwise scales linearly with the amount.
    /// A deliberate placeholder, not a liquidity-curve model.
    async fn estimate_price_impact(&self, amount: Amount, chain_id: i64) -> Result<Decimal> {
        let config = self.store.fee_config(FeeType::Swap, Some(chain_id)).await?;

        let impact = match config.and_then(|c| c.max_amount).filter(|max| *max > Decimal::ZERO) {
            Some(max_amount) => (amount / max_amount * dec!(2.0)).min(dec!(10.0)),
            None => (amount * dec!(0.001)).min(dec!(5.0)),
        };

        Ok(impact)
    }
}
