//! Fee resolution and swap-quote computation
//!
//! Resolves the effective fee rate for a swap by walking the override
//! hierarchy (trading-pair override, then chain-scoped config, then global
//! config, then the site default) and composes it with slippage and a
//! price-impact estimate into a full quote.

pub mod quote;
pub mod service;

pub use quote::{SwapFee, SwapQuote};
pub use service::FeeService;
