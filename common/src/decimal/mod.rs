//! Decimal type utilities for precise fee and amount calculations

pub use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
pub use rust_decimal_macros::dec;

/// Monetary amount type with high precision
pub type Amount = Decimal;

/// Fee rate type, expressed as a percentage (0.3 = 0.3%)
pub type Rate = Decimal;

/// Precision helpers for common operations
///
/// All rounding is half-up (midpoint away from zero), matching the rounding
/// applied to monetary values throughout the platform.
pub mod precision {
    use super::*;

    /// Monetary amount precision (8 decimal places)
    pub const AMOUNT_PRECISION: u32 = 8;

    /// Fee rate precision (4 decimal places)
    pub const RATE_PRECISION: u32 = 4;

    /// Slippage tolerance precision (2 decimal places)
    pub const SLIPPAGE_PRECISION: u32 = 2;

    /// Round a monetary amount to standard precision
    pub fn round_amount(amount: Amount) -> Amount {
        amount.round_dp_with_strategy(AMOUNT_PRECISION, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Round a fee rate to standard precision
    ///
    /// The result always carries exactly `RATE_PRECISION` decimal places so
    /// serialized rates are consistent regardless of the stored scale.
    pub fn round_rate(rate: Rate) -> Rate {
        let mut rounded =
            rate.round_dp_with_strategy(RATE_PRECISION, RoundingStrategy::MidpointAwayFromZero);
        rounded.rescale(RATE_PRECISION);
        rounded
    }

    /// Round a slippage tolerance to standard precision
    pub fn round_slippage(slippage: Decimal) -> Decimal {
        slippage.round_dp_with_strategy(SLIPPAGE_PRECISION, RoundingStrategy::MidpointAwayFromZero)
    }
}

#[cfg(test)]
mod tests {
    use super::precision::*;
    use super::*;

    #[test]
    fn test_round_amount_half_up() {
        assert_eq!(round_amount(dec!(1.234567895)), dec!(1.23456790));
        assert_eq!(round_amount(dec!(1.234567885)), dec!(1.23456789));
        assert_eq!(round_amount(dec!(2.5)), dec!(2.5));
    }

    #[test]
    fn test_round_rate_half_up() {
        assert_eq!(round_rate(dec!(0.29995)), dec!(0.3000));
        assert_eq!(round_rate(dec!(0.12344)), dec!(0.1234));
    }

    #[test]
    fn test_round_slippage() {
        assert_eq!(round_slippage(dec!(0.505)), dec!(0.51));
        assert_eq!(round_slippage(dec!(50)), dec!(50));
    }
}
