use std::sync::Arc;

use chrono::{Duration, Utc};
use common::decimal::dec;
use common::model::{Chain, FeeConfig, FeeType, SettingValue, SwapConfig, Token, TradingPair};
use config_store::{ConfigRepository, ConfigStore, ConfigStoreConfig, InMemoryConfigRepository};

fn test_chain(id: i64) -> Chain {
    let now = Utc::now();
    Chain {
        id,
        name: "BNB Smart Chain".to_string(),
        symbol: "BSC".to_string(),
        native_symbol: "BNB".to_string(),
        rpc_url: None,
        explorer_url: None,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

fn test_token(id: i64, chain_id: i64, address: &str, symbol: &str) -> Token {
    let now = Utc::now();
    Token {
        id,
        chain_id,
        contract_address: address.to_string(),
        symbol: symbol.to_string(),
        name: symbol.to_string(),
        decimals: 18,
        is_active: true,
        created_at: now,
        updated_at: now,
    }
}

fn test_fee_config(id: i64, fee_type: FeeType, taker_fee: &str, chain_id: Option<i64>) -> FeeConfig {
    FeeConfig {
        id,
        name: format!("Fee config {}", id),
        fee_type,
        maker_fee: dec!(0.1),
        taker_fee: taker_fee.parse().unwrap(),
        min_amount: None,
        max_amount: None,
        chain_id,
        is_active: true,
        created_at: Utc::now(),
    }
}

fn test_pair(id: i64, chain_id: i64, base: i64, quote: i64) -> TradingPair {
    TradingPair {
        id,
        base_token_id: base,
        quote_token_id: quote,
        chain_id,
        symbol: "WBNB/BUSD".to_string(),
        is_active: true,
        min_trade_amount: None,
        max_trade_amount: None,
        price_precision: 8,
        amount_precision: 8,
        maker_fee_override: None,
        taker_fee_override: None,
        created_at: Utc::now(),
    }
}

fn test_swap_config(id: i64, chain_id: i64, slippage: &str) -> SwapConfig {
    SwapConfig {
        id,
        chain_id,
        name: "PancakeSwap V2".to_string(),
        protocol: "pancakeswap_v2".to_string(),
        router_address: "0x10ED43C718714eb63d5aA57B78B54704E256024E".to_string(),
        factory_address: None,
        slippage_tolerance: slippage.parse().unwrap(),
        is_active: true,
        metadata: None,
        created_at: Utc::now(),
    }
}

fn uncached_store(repo: Arc<InMemoryConfigRepository>) -> ConfigStore {
    ConfigStore::new(repo, &ConfigStoreConfig::uncached())
}

fn cached_store(repo: Arc<InMemoryConfigRepository>) -> ConfigStore {
    ConfigStore::new(repo, &ConfigStoreConfig::new(600, 3600))
}

#[tokio::test]
async fn test_fee_config_exact_chain_scope() {
    let repo = Arc::new(InMemoryConfigRepository::new());
    repo.insert_fee_config(test_fee_config(1, FeeType::Swap, "0.25", Some(56)));
    repo.insert_fee_config(test_fee_config(2, FeeType::Swap, "0.30", None));

    let store = uncached_store(repo);

    let chain_config = store.fee_config(FeeType::Swap, Some(56)).await.unwrap().unwrap();
    assert_eq!(chain_config.taker_fee, dec!(0.25));

    let global_config = store.fee_config(FeeType::Swap, None).await.unwrap().unwrap();
    assert_eq!(global_config.taker_fee, dec!(0.30));

    // A chain without its own rule resolves to nothing at this level
    let missing = store.fee_config(FeeType::Swap, Some(1)).await.unwrap();
    assert!(missing.is_none());
}

#[tokio::test]
async fn test_fee_config_newest_wins_among_duplicates() {
    let repo = Arc::new(InMemoryConfigRepository::new());

    let mut older = test_fee_config(1, FeeType::Swap, "0.20", Some(56));
    older.created_at = Utc::now() - Duration::hours(2);
    let mut newer = test_fee_config(2, FeeType::Swap, "0.40", Some(56));
    newer.created_at = Utc::now() - Duration::hours(1);

    repo.insert_fee_config(older);
    repo.insert_fee_config(newer);

    let store = uncached_store(repo);
    let resolved = store.fee_config(FeeType::Swap, Some(56)).await.unwrap().unwrap();
    assert_eq!(resolved.taker_fee, dec!(0.40));
}

#[tokio::test]
async fn test_inactive_fee_config_is_ignored() {
    let repo = Arc::new(InMemoryConfigRepository::new());
    let mut config = test_fee_config(1, FeeType::Swap, "0.25", Some(56));
    config.is_active = false;
    repo.insert_fee_config(config);

    let store = uncached_store(repo);
    assert!(store.fee_config(FeeType::Swap, Some(56)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_find_pair_id_either_direction() {
    let repo = Arc::new(InMemoryConfigRepository::new());
    repo.insert_chain(test_chain(56));
    repo.insert_token(test_token(1, 56, "0xaaa", "WBNB"));
    repo.insert_token(test_token(2, 56, "0xbbb", "BUSD"));
    repo.insert_trading_pair(test_pair(7, 56, 1, 2));

    let store = uncached_store(repo);

    let forward = store.find_pair_id(56, "0xaaa", "0xbbb").await.unwrap();
    assert_eq!(forward, Some(7));

    let reverse = store.find_pair_id(56, "0xbbb", "0xaaa").await.unwrap();
    assert_eq!(reverse, Some(7));

    let unknown = store.find_pair_id(56, "0xaaa", "0xccc").await.unwrap();
    assert_eq!(unknown, None);
}

#[tokio::test]
async fn test_find_pair_id_address_case_insensitive() {
    let repo = Arc::new(InMemoryConfigRepository::new());
    repo.insert_token(test_token(1, 56, "0xAbCd", "WBNB"));
    repo.insert_token(test_token(2, 56, "0xBBBB", "BUSD"));
    repo.insert_trading_pair(test_pair(3, 56, 1, 2));

    let store = uncached_store(repo);
    let found = store.find_pair_id(56, "0xABCD", "0xbbbb").await.unwrap();
    assert_eq!(found, Some(3));
}

#[tokio::test]
async fn test_swap_config_lookup() {
    let repo = Arc::new(InMemoryConfigRepository::new());
    repo.insert_swap_config(test_swap_config(1, 56, "0.8"));

    let store = uncached_store(repo);
    let config = store.swap_config(56).await.unwrap().unwrap();
    assert_eq!(config.slippage_tolerance, dec!(0.8));

    assert!(store.swap_config(1).await.unwrap().is_none());
}

#[tokio::test]
async fn test_setting_decode_and_defaults() {
    let repo = Arc::new(InMemoryConfigRepository::new());
    repo.upsert_setting("trading", "default_fee_rate", Some("0.3".to_string()), "number")
        .await
        .unwrap();
    repo.upsert_setting("trading", "fee_collector_wallet", Some("0xfee".to_string()), "string")
        .await
        .unwrap();

    let store = uncached_store(repo);

    let rate = store.decimal_setting("trading", "default_fee_rate", dec!(1)).await.unwrap();
    assert_eq!(rate, dec!(0.3));

    let collector = store.text_setting("trading", "fee_collector_wallet", "").await.unwrap();
    assert_eq!(collector, "0xfee");

    // Missing keys fall back to the caller's default
    let missing = store.decimal_setting("trading", "max_fee_rate", dec!(5.0)).await.unwrap();
    assert_eq!(missing, dec!(5.0));
}

#[tokio::test]
async fn test_settings_group() {
    let repo = Arc::new(InMemoryConfigRepository::new());
    repo.upsert_setting("trading", "default_fee_rate", Some("0.3".to_string()), "number")
        .await
        .unwrap();
    repo.upsert_setting("trading", "max_fee_rate", Some("5.0".to_string()), "number")
        .await
        .unwrap();
    repo.upsert_setting("general", "site_name", Some("DEX".to_string()), "string")
        .await
        .unwrap();

    let store = uncached_store(repo);
    let group = store.settings_group("trading").await.unwrap();

    assert_eq!(group.len(), 2);
    assert_eq!(group["default_fee_rate"], SettingValue::Float(dec!(0.3)));
    assert_eq!(group["max_fee_rate"], SettingValue::Float(dec!(5.0)));
}

#[tokio::test]
async fn test_cached_read_is_stale_until_ttl_or_invalidation() {
    let repo = Arc::new(InMemoryConfigRepository::new());
    repo.upsert_setting("trading", "max_fee_rate", Some("5.0".to_string()), "number")
        .await
        .unwrap();

    let store = cached_store(repo.clone());

    // Prime the cache
    assert_eq!(
        store.decimal_setting("trading", "max_fee_rate", dec!(0)).await.unwrap(),
        dec!(5.0)
    );

    // A write that bypasses the store is invisible within the TTL window
    repo.upsert_setting("trading", "max_fee_rate", Some("0.1".to_string()), "number")
        .await
        .unwrap();
    assert_eq!(
        store.decimal_setting("trading", "max_fee_rate", dec!(0)).await.unwrap(),
        dec!(5.0)
    );
}

#[tokio::test]
async fn test_set_setting_invalidates_key_and_group() {
    let repo = Arc::new(InMemoryConfigRepository::new());
    repo.upsert_setting("trading", "max_fee_rate", Some("5.0".to_string()), "number")
        .await
        .unwrap();

    let store = cached_store(repo);

    // Prime both the key cache and the group cache
    assert_eq!(
        store.decimal_setting("trading", "max_fee_rate", dec!(0)).await.unwrap(),
        dec!(5.0)
    );
    assert_eq!(store.settings_group("trading").await.unwrap().len(), 1);

    // A write through the store is visible immediately
    store
        .set_setting("trading", "max_fee_rate", Some("0.1".to_string()), "number")
        .await
        .unwrap();

    assert_eq!(
        store.decimal_setting("trading", "max_fee_rate", dec!(0)).await.unwrap(),
        dec!(0.1)
    );
    assert_eq!(
        store.settings_group("trading").await.unwrap()["max_fee_rate"],
        SettingValue::Float(dec!(0.1))
    );
}

#[tokio::test]
async fn test_invalidate_fee_config() {
    let repo = Arc::new(InMemoryConfigRepository::new());
    repo.insert_fee_config(test_fee_config(1, FeeType::Swap, "0.25", Some(56)));

    let store = cached_store(repo.clone());
    assert_eq!(
        store.fee_config(FeeType::Swap, Some(56)).await.unwrap().unwrap().taker_fee,
        dec!(0.25)
    );

    let mut updated = test_fee_config(1, FeeType::Swap, "0.50", Some(56));
    updated.created_at = Utc::now();
    repo.insert_fee_config(updated);

    // Still stale until the entry is dropped
    assert_eq!(
        store.fee_config(FeeType::Swap, Some(56)).await.unwrap().unwrap().taker_fee,
        dec!(0.25)
    );

    store.invalidate_fee_config(FeeType::Swap, Some(56));
    assert_eq!(
        store.fee_config(FeeType::Swap, Some(56)).await.unwrap().unwrap().taker_fee,
        dec!(0.50)
    );
}
