//! Cache-or-load configuration store
//!
//! Wraps a [`ConfigRepository`] with explicit TTL caches for each config
//! class. Writes go through the store so the affected key and its group
//! aggregate can be invalidated immediately; readers elsewhere converge
//! within the TTL window.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use common::decimal::Decimal;
use common::error::Result;
use common::model::{Chain, FeeConfig, FeeType, SettingRow, SettingValue, SwapConfig, Token, TradingPair};
use tracing::debug;

use crate::cache::TtlCache;
use crate::config::ConfigStoreConfig;
use crate::repository::ConfigRepository;

/// Cached read access to fee configs, trading pairs, swap configs and
/// site settings
pub struct ConfigStore {
    repo: Arc<dyn ConfigRepository>,
    fee_configs: TtlCache<String, Option<FeeConfig>>,
    pairs: TtlCache<i64, Option<TradingPair>>,
    pair_lookups: TtlCache<String, Option<i64>>,
    swap_configs: TtlCache<i64, Option<SwapConfig>>,
    settings: TtlCache<String, Option<SettingValue>>,
    setting_groups: TtlCache<String, HashMap<String, SettingValue>>,
}

impl ConfigStore {
    /// Create a store over a repository with the given cache configuration
    pub fn new(repo: Arc<dyn ConfigRepository>, config: &ConfigStoreConfig) -> Self {
        let config_ttl = Duration::from_secs(config.config_ttl_secs);
        let setting_ttl = Duration::from_secs(config.setting_ttl_secs);

        Self {
            repo,
            fee_configs: TtlCache::new(config_ttl),
            pairs: TtlCache::new(config_ttl),
            pair_lookups: TtlCache::new(config_ttl),
            swap_configs: TtlCache::new(config_ttl),
            settings: TtlCache::new(setting_ttl),
            setting_groups: TtlCache::new(setting_ttl),
        }
    }

    /// Create a store with the default cache TTLs
    pub fn with_defaults(repo: Arc<dyn ConfigRepository>) -> Self {
        Self::new(repo, &ConfigStoreConfig::from_env())
    }

    fn fee_config_key(fee_type: FeeType, chain_id: Option<i64>) -> String {
        match chain_id {
            Some(id) => format!("{}.{}", fee_type, id),
            None => format!("{}.global", fee_type),
        }
    }

    // Direction-agnostic: both orderings of the same address pair share one
    // cache entry.
    fn pair_lookup_key(chain_id: i64, token_a: &str, token_b: &str) -> String {
        let a = token_a.to_ascii_lowercase();
        let b = token_b.to_ascii_lowercase();
        if a <= b {
            format!("{}.{}:{}", chain_id, a, b)
        } else {
            format!("{}.{}:{}", chain_id, b, a)
        }
    }

    fn setting_key(group: &str, key: &str) -> String {
        format!("{}.{}", group, key)
    }

    /// Get an active chain by id (uncached)
    pub async fn chain(&self, id: i64) -> Result<Option<Chain>> {
        self.repo.chain(id).await
    }

    /// Get an active token by chain and contract address (uncached)
    pub async fn token(&self, chain_id: i64, contract_address: &str) -> Result<Option<Token>> {
        self.repo.token(chain_id, contract_address).await
    }

    /// Get the active fee config for a (type, chain) key, cache-or-load
    pub async fn fee_config(&self, fee_type: FeeType, chain_id: Option<i64>) -> Result<Option<FeeConfig>> {
        let key = Self::fee_config_key(fee_type, chain_id);

        if let Some(cached) = self.fee_configs.get(&key) {
            return Ok(cached);
        }

        let config = self.repo.fee_config(fee_type, chain_id).await?;
        self.fee_configs.insert(key, config.clone());
        Ok(config)
    }

    /// Get a trading pair by id, cache-or-load
    pub async fn trading_pair(&self, id: i64) -> Result<Option<TradingPair>> {
        if let Some(cached) = self.pairs.get(&id) {
            return Ok(cached);
        }

        let pair = self.repo.trading_pair(id).await?;
        self.pairs.insert(id, pair.clone());
        Ok(pair)
    }

    /// Find the id of the active pair matching two token addresses on a
    /// chain, in either direction, cache-or-load
    pub async fn find_pair_id(&self, chain_id: i64, token_a: &str, token_b: &str) -> Result<Option<i64>> {
        let key = Self::pair_lookup_key(chain_id, token_a, token_b);

        if let Some(cached) = self.pair_lookups.get(&key) {
            return Ok(cached);
        }

        let pair_id = self
            .repo
            .find_pair(chain_id, token_a, token_b)
            .await?
            .map(|p| p.id);
        self.pair_lookups.insert(key, pair_id);
        Ok(pair_id)
    }

    /// Get the active swap config for a chain, cache-or-load
    pub async fn swap_config(&self, chain_id: i64) -> Result<Option<SwapConfig>> {
        if let Some(cached) = self.swap_configs.get(&chain_id) {
            return Ok(cached);
        }

        let config = self.repo.swap_config(chain_id).await?;
        self.swap_configs.insert(chain_id, config.clone());
        Ok(config)
    }

    /// List active swap configs, optionally restricted to one chain
    /// (uncached; only the admin-facing routes listing uses it)
    pub async fn list_swap_configs(&self, chain_id: Option<i64>) -> Result<Vec<SwapConfig>> {
        self.repo.list_swap_configs(chain_id).await
    }

    /// Get a decoded setting value, cache-or-load
    pub async fn setting(&self, group: &str, key: &str) -> Result<Option<SettingValue>> {
        let cache_key = Self::setting_key(group, key);

        if let Some(cached) = self.settings.get(&cache_key) {
            return Ok(cached);
        }

        let value = self
            .repo
            .setting(group, key)
            .await?
            .and_then(|row| row.decode());
        self.settings.insert(cache_key, value.clone());
        Ok(value)
    }

    /// Get a setting as a decimal, falling back to a default when the
    /// setting is missing or not numeric
    pub async fn decimal_setting(&self, group: &str, key: &str, default: Decimal) -> Result<Decimal> {
        Ok(self
            .setting(group, key)
            .await?
            .and_then(|v| v.as_decimal())
            .unwrap_or(default))
    }

    /// Get a setting as text, falling back to a default
    pub async fn text_setting(&self, group: &str, key: &str, default: &str) -> Result<String> {
        Ok(self
            .setting(group, key)
            .await?
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_else(|| default.to_string()))
    }

    /// Get all decoded settings in a group, cache-or-load
    pub async fn settings_group(&self, group: &str) -> Result<HashMap<String, SettingValue>> {
        if let Some(cached) = self.setting_groups.get(&group.to_string()) {
            return Ok(cached);
        }

        let decoded: HashMap<String, SettingValue> = self
            .repo
            .settings_group(group)
            .await?
            .into_iter()
            .filter_map(|row| row.decode().map(|value| (row.key, value)))
            .collect();

        self.setting_groups.insert(group.to_string(), decoded.clone());
        Ok(decoded)
    }

    /// Write a setting through to storage and invalidate the key entry and
    /// the group aggregate it participates in
    pub async fn set_setting(
        &self,
        group: &str,
        key: &str,
        value: Option<String>,
        value_type: &str,
    ) -> Result<SettingRow> {
        let row = self.repo.upsert_setting(group, key, value, value_type).await?;

        self.settings.invalidate(&Self::setting_key(group, key));
        self.setting_groups.invalidate(&group.to_string());
        debug!("Setting {}.{} updated, caches invalidated", group, key);

        Ok(row)
    }

    /// Drop the cached fee config for a (type, chain) key after an admin
    /// edit to the underlying rule
    pub fn invalidate_fee_config(&self, fee_type: FeeType, chain_id: Option<i64>) {
        self.fee_configs
            .invalidate(&Self::fee_config_key(fee_type, chain_id));
    }

    /// Drop the cached pair and every pair-address lookup after an admin
    /// edit to a trading pair
    pub fn invalidate_trading_pair(&self, id: i64) {
        self.pairs.invalidate(&id);
        // Lookup entries are keyed by address, not pair id; clearing them
        // all keeps invalidation simple for a rarely-hit admin path.
        self.pair_lookups.clear();
    }

    /// Drop the cached swap config for a chain
    pub fn invalidate_swap_config(&self, chain_id: i64) {
        self.swap_configs.invalidate(&chain_id);
    }

    /// Drop every cached entry
    pub fn clear_caches(&self) {
        self.fee_configs.clear();
        self.pairs.clear();
        self.pair_lookups.clear();
        self.swap_configs.clear();
        self.settings.clear();
        self.setting_groups.clear();
    }
}
