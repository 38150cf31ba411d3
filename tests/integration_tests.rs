// File: tests/integration_tests.rs
//
// End-to-end tests over the in-memory stores, exercising the full
// quote -> record flow the way the gateway wires it together.

use std::sync::Arc;

use chrono::Utc;
use common::error::Error;
use common::model::{Chain, FeeConfig, FeeType, SwapConfig, Token, TradingPair, TransactionStatus};
use config_store::{ConfigRepository, ConfigStore, ConfigStoreConfig, InMemoryConfigRepository};
use fee_engine::FeeService;
use rust_decimal_macros::dec;
use transaction_recorder::{InMemoryTransactionRepository, NewSwapRecord, TransactionService};

const WBNB: &str = "0xbb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c";
const BUSD: &str = "0xe9e7CEA3DedcA5984780Bafc599bD69ADd087D56";

struct Engine {
    repo: Arc<InMemoryConfigRepository>,
    store: Arc<ConfigStore>,
    fees: Arc<FeeService>,
    transactions: TransactionService,
}

async fn seeded_engine() -> Engine {
    let repo = Arc::new(InMemoryConfigRepository::new());
    let now = Utc::now();

    repo.insert_chain(Chain {
        id: 56,
        name: "BNB Smart Chain".to_string(),
        symbol: "BSC".to_string(),
        native_symbol: "BNB".to_string(),
        rpc_url: None,
        explorer_url: None,
        is_active: true,
        created_at: now,
        updated_at: now,
    });

    repo.insert_token(Token {
        id: 1,
        chain_id: 56,
        contract_address: WBNB.to_string(),
        symbol: "WBNB".to_string(),
        name: "Wrapped BNB".to_string(),
        decimals: 18,
        is_active: true,
        created_at: now,
        updated_at: now,
    });
    repo.insert_token(Token {
        id: 2,
        chain_id: 56,
        contract_address: BUSD.to_string(),
        symbol: "BUSD".to_string(),
        name: "BUSD Token".to_string(),
        decimals: 18,
        is_active: true,
        created_at: now,
        updated_at: now,
    });

    repo.insert_fee_config(FeeConfig {
        id: 1,
        name: "BSC Swap Fee".to_string(),
        fee_type: FeeType::Swap,
        maker_fee: dec!(0.10),
        taker_fee: dec!(0.25),
        min_amount: None,
        max_amount: None,
        chain_id: Some(56),
        is_active: true,
        created_at: now,
    });

    repo.insert_swap_config(SwapConfig {
        id: 1,
        chain_id: 56,
        name: "PancakeSwap".to_string(),
        protocol: "pancakeswap_v2".to_string(),
        router_address: "0x10ED43C718714eb63d5aA57B78B54704E256024E".to_string(),
        factory_address: None,
        slippage_tolerance: dec!(0.5),
        is_active: true,
        metadata: None,
        created_at: now,
    });

    for (key, value, value_type) in [
        ("default_fee_rate", "0.3", "number"),
        ("max_fee_rate", "5.0", "number"),
        ("fee_collector_wallet", "0x0000000000000000000000000000000000000001", "string"),
    ] {
        repo.upsert_setting("trading", key, Some(value.to_string()), value_type)
            .await
            .unwrap();
    }

    let store = Arc::new(ConfigStore::new(
        Arc::clone(&repo) as Arc<dyn ConfigRepository>,
        &ConfigStoreConfig::uncached(),
    ));
    let fees = Arc::new(FeeService::new(Arc::clone(&store)));
    let transactions = TransactionService::new(
        Arc::new(InMemoryTransactionRepository::new()),
        Arc::clone(&fees),
    );

    Engine {
        repo,
        store,
        fees,
        transactions,
    }
}

#[tokio::test]
async fn test_quote_then_record_flow() {
    let engine = seeded_engine().await;

    let quote = engine
        .fees
        .swap_quote(dec!(1000), WBNB, BUSD, 56, None)
        .await
        .unwrap();

    assert_eq!(quote.fee_rate, dec!(0.2500));
    assert_eq!(quote.fee_amount, dec!(2.5));
    assert_eq!(quote.to_amount_estimate, dec!(997.5));
    assert_eq!(quote.slippage, dec!(0.5));

    // Record the swap the client executed against that quote
    let transaction = engine
        .transactions
        .record(NewSwapRecord {
            wallet_address: "0x1111111111111111111111111111111111111111".to_string(),
            chain_id: 56,
            from_token: WBNB.to_string(),
            to_token: BUSD.to_string(),
            from_amount: quote.from_amount,
            to_amount: quote.to_amount_estimate,
            fee_amount: quote.fee_amount,
            tx_hash: "0xflow".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(transaction.status, TransactionStatus::Pending);
    let metadata = transaction.metadata.unwrap();
    assert_eq!(metadata["fee_rate"], serde_json::json!("0.2500"));
    assert_eq!(
        metadata["fee_collector"],
        serde_json::json!("0x0000000000000000000000000000000000000001")
    );

    // Resubmitting the same hash is an idempotency error
    let duplicate = engine
        .transactions
        .record(NewSwapRecord {
            wallet_address: "0x1111111111111111111111111111111111111111".to_string(),
            chain_id: 56,
            from_token: WBNB.to_string(),
            to_token: BUSD.to_string(),
            from_amount: quote.from_amount,
            to_amount: quote.to_amount_estimate,
            fee_amount: quote.fee_amount,
            tx_hash: "0xflow".to_string(),
        })
        .await;
    assert!(matches!(duplicate, Err(Error::DuplicateTransaction(_))));
}

#[tokio::test]
async fn test_pair_override_applies_to_quote() {
    let engine = seeded_engine().await;

    // A pair-level taker override beats the 0.25 chain config
    engine.repo.insert_trading_pair(TradingPair {
        id: 1,
        base_token_id: 1,
        quote_token_id: 2,
        chain_id: 56,
        symbol: "WBNB/BUSD".to_string(),
        is_active: true,
        min_trade_amount: None,
        max_trade_amount: None,
        price_precision: 8,
        amount_precision: 8,
        maker_fee_override: None,
        taker_fee_override: Some(dec!(0.15)),
        created_at: Utc::now(),
    });

    let quote = engine
        .fees
        .swap_quote(dec!(1000), WBNB, BUSD, 56, None)
        .await
        .unwrap();

    assert_eq!(quote.fee_rate, dec!(0.1500));
    assert_eq!(quote.fee_amount, dec!(1.5));
}

#[tokio::test]
async fn test_max_fee_rate_cap_applies_end_to_end() {
    let engine = seeded_engine().await;

    engine
        .store
        .set_setting("trading", "max_fee_rate", Some("0.1".to_string()), "number")
        .await
        .unwrap();

    let quote = engine
        .fees
        .swap_quote(dec!(1000), WBNB, BUSD, 56, None)
        .await
        .unwrap();

    assert_eq!(quote.fee_rate, dec!(0.1000));
    assert_eq!(quote.fee_amount, dec!(1.0));
}
