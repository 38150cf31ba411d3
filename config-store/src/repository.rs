//! Repository for configuration data
//!
//! Two implementations are provided: an in-memory store used by tests and
//! local development, and a PostgreSQL store for deployments. Both resolve
//! duplicate active fee configs deterministically by most recent creation
//! time (highest id as the final tie-break).

use std::str::FromStr;

use async_trait::async_trait;
use chrono::Utc;
use common::decimal::Decimal;
use common::error::{Error, Result};
use common::model::{Chain, FeeConfig, FeeType, SettingRow, SwapConfig, Token, TradingPair};
use dashmap::DashMap;
use sqlx::{postgres::PgPoolOptions, PgPool, Row};
use tracing::{debug, info};

/// Configuration repository trait defining read access to the config classes
/// consumed by the fee resolver, plus the single admin write path (settings)
#[async_trait]
pub trait ConfigRepository: Send + Sync {
    /// Get an active chain by its EVM chain id
    async fn chain(&self, id: i64) -> Result<Option<Chain>>;

    /// Get an active token by chain and contract address
    async fn token(&self, chain_id: i64, contract_address: &str) -> Result<Option<Token>>;

    /// Get the active fee config for a (type, chain) key
    ///
    /// `chain_id = None` matches only global rows. Among duplicate active
    /// rows the most recently created wins.
    async fn fee_config(&self, fee_type: FeeType, chain_id: Option<i64>) -> Result<Option<FeeConfig>>;

    /// Get a trading pair by id, active or not
    async fn trading_pair(&self, id: i64) -> Result<Option<TradingPair>>;

    /// Find an active trading pair on a chain whose base/quote token
    /// contract addresses match the two addresses in either direction
    async fn find_pair(&self, chain_id: i64, token_a: &str, token_b: &str) -> Result<Option<TradingPair>>;

    /// Get the active swap config for a chain
    async fn swap_config(&self, chain_id: i64) -> Result<Option<SwapConfig>>;

    /// List active swap configs, optionally restricted to one chain
    async fn list_swap_configs(&self, chain_id: Option<i64>) -> Result<Vec<SwapConfig>>;

    /// Get a setting row by group and key
    async fn setting(&self, group: &str, key: &str) -> Result<Option<SettingRow>>;

    /// Get all setting rows in a group
    async fn settings_group(&self, group: &str) -> Result<Vec<SettingRow>>;

    /// Create or update a setting row
    async fn upsert_setting(
        &self,
        group: &str,
        key: &str,
        value: Option<String>,
        value_type: &str,
    ) -> Result<SettingRow>;
}

/// In-memory repository for configuration data
pub struct InMemoryConfigRepository {
    chains: DashMap<i64, Chain>,
    tokens: DashMap<i64, Token>,
    fee_configs: DashMap<i64, FeeConfig>,
    pairs: DashMap<i64, TradingPair>,
    swap_configs: DashMap<i64, SwapConfig>,
    settings: DashMap<(String, String), SettingRow>,
}

impl InMemoryConfigRepository {
    /// Create an empty in-memory config repository
    pub fn new() -> Self {
        Self {
            chains: DashMap::new(),
            tokens: DashMap::new(),
            fee_configs: DashMap::new(),
            pairs: DashMap::new(),
            swap_configs: DashMap::new(),
            settings: DashMap::new(),
        }
    }

    /// Insert or replace a chain
    pub fn insert_chain(&self, chain: Chain) {
        self.chains.insert(chain.id, chain);
    }

    /// Insert or replace a token
    pub fn insert_token(&self, token: Token) {
        self.tokens.insert(token.id, token);
    }

    /// Insert or replace a fee config
    pub fn insert_fee_config(&self, config: FeeConfig) {
        self.fee_configs.insert(config.id, config);
    }

    /// Insert or replace a trading pair
    pub fn insert_trading_pair(&self, pair: TradingPair) {
        self.pairs.insert(pair.id, pair);
    }

    /// Insert or replace a swap config
    pub fn insert_swap_config(&self, config: SwapConfig) {
        self.swap_configs.insert(config.id, config);
    }

    fn token_id_by_address(&self, chain_id: i64, contract_address: &str) -> Option<i64> {
        self.tokens.iter().find_map(|entry| {
            let token = entry.value();
            if token.chain_id == chain_id
                && token.is_active
                && token.contract_address.eq_ignore_ascii_case(contract_address)
            {
                Some(token.id)
            } else {
                None
            }
        })
    }
}

impl Default for InMemoryConfigRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ConfigRepository for InMemoryConfigRepository {
    async fn chain(&self, id: i64) -> Result<Option<Chain>> {
        Ok(self.chains.get(&id).filter(|c| c.is_active).map(|c| c.clone()))
    }

    async fn token(&self, chain_id: i64, contract_address: &str) -> Result<Option<Token>> {
        Ok(self.tokens.iter().find_map(|entry| {
            let token = entry.value();
            if token.chain_id == chain_id
                && token.is_active
                && token.contract_address.eq_ignore_ascii_case(contract_address)
            {
                Some(token.clone())
            } else {
                None
            }
        }))
    }

    async fn fee_config(&self, fee_type: FeeType, chain_id: Option<i64>) -> Result<Option<FeeConfig>> {
        let mut matches: Vec<FeeConfig> = self
            .fee_configs
            .iter()
            .filter(|entry| {
                let config = entry.value();
                config.is_active && config.fee_type == fee_type && config.chain_id == chain_id
            })
            .map(|entry| entry.value().clone())
            .collect();

        // Newest active row wins among duplicates
        matches.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(matches.into_iter().next())
    }

    async fn trading_pair(&self, id: i64) -> Result<Option<TradingPair>> {
        Ok(self.pairs.get(&id).map(|p| p.clone()))
    }

    async fn find_pair(&self, chain_id: i64, token_a: &str, token_b: &str) -> Result<Option<TradingPair>> {
        let id_a = self.token_id_by_address(chain_id, token_a);
        let id_b = self.token_id_by_address(chain_id, token_b);

        let (Some(id_a), Some(id_b)) = (id_a, id_b) else {
            return Ok(None);
        };

        Ok(self.pairs.iter().find_map(|entry| {
            let pair = entry.value();
            let matches_either_direction = (pair.base_token_id == id_a && pair.quote_token_id == id_b)
                || (pair.base_token_id == id_b && pair.quote_token_id == id_a);

            if pair.chain_id == chain_id && pair.is_active && matches_either_direction {
                Some(pair.clone())
            } else {
                None
            }
        }))
    }

    async fn swap_config(&self, chain_id: i64) -> Result<Option<SwapConfig>> {
        Ok(self.swap_configs.iter().find_map(|entry| {
            let config = entry.value();
            if config.chain_id == chain_id && config.is_active {
                Some(config.clone())
            } else {
                None
            }
        }))
    }

    async fn list_swap_configs(&self, chain_id: Option<i64>) -> Result<Vec<SwapConfig>> {
        let mut configs: Vec<SwapConfig> = self
            .swap_configs
            .iter()
            .filter(|entry| {
                let config = entry.value();
                config.is_active && chain_id.map_or(true, |id| config.chain_id == id)
            })
            .map(|entry| entry.value().clone())
            .collect();

        configs.sort_by_key(|c| c.id);
        Ok(configs)
    }

    async fn setting(&self, group: &str, key: &str) -> Result<Option<SettingRow>> {
        Ok(self
            .settings
            .get(&(group.to_string(), key.to_string()))
            .map(|s| s.clone()))
    }

    async fn settings_group(&self, group: &str) -> Result<Vec<SettingRow>> {
        Ok(self
            .settings
            .iter()
            .filter(|entry| entry.key().0 == group)
            .map(|entry| entry.value().clone())
            .collect())
    }

    async fn upsert_setting(
        &self,
        group: &str,
        key: &str,
        value: Option<String>,
        value_type: &str,
    ) -> Result<SettingRow> {
        let row = SettingRow {
            group: group.to_string(),
            key: key.to_string(),
            value,
            value_type: value_type.to_string(),
            updated_at: Utc::now(),
        };

        self.settings
            .insert((group.to_string(), key.to_string()), row.clone());
        Ok(row)
    }
}

/// PostgreSQL repository for configuration data
pub struct PostgresConfigRepository {
    pool: PgPool,
}

impl PostgresConfigRepository {
    /// Create a repository from an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to the database and create a repository
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(Error::Database)?;

        info!("Connected to PostgreSQL configuration database");
        Ok(Self { pool })
    }
}

fn parse_decimal(raw: String) -> Result<Decimal> {
    Decimal::from_str(&raw).map_err(|e| Error::DecimalError(e.to_string()))
}

fn parse_opt_decimal(raw: Option<String>) -> Result<Option<Decimal>> {
    raw.map(parse_decimal).transpose()
}

fn fee_config_from_row(row: &sqlx::postgres::PgRow) -> Result<FeeConfig> {
    Ok(FeeConfig {
        id: row.get("id"),
        name: row.get("name"),
        fee_type: FeeType::from_str(&row.get::<String, _>("fee_type"))?,
        maker_fee: parse_decimal(row.get("maker_fee"))?,
        taker_fee: parse_decimal(row.get("taker_fee"))?,
        min_amount: parse_opt_decimal(row.get("min_amount"))?,
        max_amount: parse_opt_decimal(row.get("max_amount"))?,
        chain_id: row.get("chain_id"),
        is_active: row.get("is_active"),
        created_at: row.get("created_at"),
    })
}

fn trading_pair_from_row(row: &sqlx::postgres::PgRow) -> Result<TradingPair> {
    Ok(TradingPair {
        id: row.get("id"),
        base_token_id: row.get("base_token_id"),
        quote_token_id: row.get("quote_token_id"),
        chain_id: row.get("chain_id"),
        symbol: row.get("symbol"),
        is_active: row.get("is_active"),
        min_trade_amount: parse_opt_decimal(row.get("min_trade_amount"))?,
        max_trade_amount: parse_opt_decimal(row.get("max_trade_amount"))?,
        price_precision: row.get::<i16, _>("price_precision") as u8,
        amount_precision: row.get::<i16, _>("amount_precision") as u8,
        maker_fee_override: parse_opt_decimal(row.get("maker_fee_override"))?,
        taker_fee_override: parse_opt_decimal(row.get("taker_fee_override"))?,
        created_at: row.get("created_at"),
    })
}

fn swap_config_from_row(row: &sqlx::postgres::PgRow) -> Result<SwapConfig> {
    Ok(SwapConfig {
        id: row.get("id"),
        chain_id: row.get("chain_id"),
        name: row.get("name"),
        protocol: row.get("protocol"),
        router_address: row.get("router_address"),
        factory_address: row.get("factory_address"),
        slippage_tolerance: parse_decimal(row.get("slippage_tolerance"))?,
        is_active: row.get("is_active"),
        metadata: row.get("metadata"),
        created_at: row.get("created_at"),
    })
}

fn setting_from_row(row: &sqlx::postgres::PgRow) -> SettingRow {
    SettingRow {
        group: row.get("group"),
        key: row.get("key"),
        value: row.get("value"),
        value_type: row.get("value_type"),
        updated_at: row.get("updated_at"),
    }
}

#[async_trait]
impl ConfigRepository for PostgresConfigRepository {
    async fn chain(&self, id: i64) -> Result<Option<Chain>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, symbol, native_symbol, rpc_url, explorer_url,
                   is_active, created_at, updated_at
            FROM chains
            WHERE id = $1 AND is_active = TRUE
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| Chain {
            id: r.get("id"),
            name: r.get("name"),
            symbol: r.get("symbol"),
            native_symbol: r.get("native_symbol"),
            rpc_url: r.get("rpc_url"),
            explorer_url: r.get("explorer_url"),
            is_active: r.get("is_active"),
            created_at: r.get("created_at"),
            updated_at: r.get("updated_at"),
        }))
    }

    async fn token(&self, chain_id: i64, contract_address: &str) -> Result<Option<Token>> {
        let row = sqlx::query(
            r#"
            SELECT id, chain_id, contract_address, symbol, name, decimals,
                   is_active, created_at, updated_at
            FROM tokens
            WHERE chain_id = $1
              AND LOWER(contract_address) = LOWER($2)
              AND is_active = TRUE
            "#,
        )
        .bind(chain_id)
        .bind(contract_address)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| Token {
            id: r.get("id"),
            chain_id: r.get("chain_id"),
            contract_address: r.get("contract_address"),
            symbol: r.get("symbol"),
            name: r.get("name"),
            decimals: r.get::<i16, _>("decimals") as u8,
            is_active: r.get("is_active"),
            created_at: r.get("created_at"),
            updated_at: r.get("updated_at"),
        }))
    }

    async fn fee_config(&self, fee_type: FeeType, chain_id: Option<i64>) -> Result<Option<FeeConfig>> {
        debug!("Loading fee config for type {} chain {:?}", fee_type, chain_id);

        let row = match chain_id {
            Some(chain_id) => {
                sqlx::query(
                    r#"
                    SELECT id, name, fee_type, maker_fee::TEXT AS maker_fee,
                           taker_fee::TEXT AS taker_fee,
                           min_amount::TEXT AS min_amount, max_amount::TEXT AS max_amount,
                           chain_id, is_active, created_at
                    FROM fee_configs
                    WHERE fee_type = $1 AND chain_id = $2 AND is_active = TRUE
                    ORDER BY created_at DESC, id DESC
                    LIMIT 1
                    "#,
                )
                .bind(fee_type.as_str())
                .bind(chain_id)
                .fetch_optional(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT id, name, fee_type, maker_fee::TEXT AS maker_fee,
                           taker_fee::TEXT AS taker_fee,
                           min_amount::TEXT AS min_amount, max_amount::TEXT AS max_amount,
                           chain_id, is_active, created_at
                    FROM fee_configs
                    WHERE fee_type = $1 AND chain_id IS NULL AND is_active = TRUE
                    ORDER BY created_at DESC, id DESC
                    LIMIT 1
                    "#,
                )
                .bind(fee_type.as_str())
                .fetch_optional(&self.pool)
                .await?
            }
        };

        row.as_ref().map(fee_config_from_row).transpose()
    }

    async fn trading_pair(&self, id: i64) -> Result<Option<TradingPair>> {
        let row = sqlx::query(
            r#"
            SELECT id, base_token_id, quote_token_id, chain_id, symbol, is_active,
                   min_trade_amount::TEXT AS min_trade_amount,
                   max_trade_amount::TEXT AS max_trade_amount,
                   price_precision, amount_precision,
                   maker_fee_override::TEXT AS maker_fee_override,
                   taker_fee_override::TEXT AS taker_fee_override,
                   created_at
            FROM trading_pairs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(trading_pair_from_row).transpose()
    }

    async fn find_pair(&self, chain_id: i64, token_a: &str, token_b: &str) -> Result<Option<TradingPair>> {
        let row = sqlx::query(
            r#"
            SELECT p.id, p.base_token_id, p.quote_token_id, p.chain_id, p.symbol, p.is_active,
                   p.min_trade_amount::TEXT AS min_trade_amount,
                   p.max_trade_amount::TEXT AS max_trade_amount,
                   p.price_precision, p.amount_precision,
                   p.maker_fee_override::TEXT AS maker_fee_override,
                   p.taker_fee_override::TEXT AS taker_fee_override,
                   p.created_at
            FROM trading_pairs p
            JOIN tokens base_token ON base_token.id = p.base_token_id
            JOIN tokens quote_token ON quote_token.id = p.quote_token_id
            WHERE p.chain_id = $1
              AND p.is_active = TRUE
              AND (
                    (LOWER(base_token.contract_address) = LOWER($2)
                     AND LOWER(quote_token.contract_address) = LOWER($3))
                 OR (LOWER(base_token.contract_address) = LOWER($3)
                     AND LOWER(quote_token.contract_address) = LOWER($2))
              )
            LIMIT 1
            "#,
        )
        .bind(chain_id)
        .bind(token_a)
        .bind(token_b)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(trading_pair_from_row).transpose()
    }

    async fn swap_config(&self, chain_id: i64) -> Result<Option<SwapConfig>> {
        let row = sqlx::query(
            r#"
            SELECT id, chain_id, name, protocol, router_address, factory_address,
                   slippage_tolerance::TEXT AS slippage_tolerance,
                   is_active, metadata, created_at
            FROM swap_configs
            WHERE chain_id = $1 AND is_active = TRUE
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(chain_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(swap_config_from_row).transpose()
    }

    async fn list_swap_configs(&self, chain_id: Option<i64>) -> Result<Vec<SwapConfig>> {
        let rows = match chain_id {
            Some(chain_id) => {
                sqlx::query(
                    r#"
                    SELECT id, chain_id, name, protocol, router_address, factory_address,
                           slippage_tolerance::TEXT AS slippage_tolerance,
                           is_active, metadata, created_at
                    FROM swap_configs
                    WHERE chain_id = $1 AND is_active = TRUE
                    ORDER BY id
                    "#,
                )
                .bind(chain_id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query(
                    r#"
                    SELECT id, chain_id, name, protocol, router_address, factory_address,
                           slippage_tolerance::TEXT AS slippage_tolerance,
                           is_active, metadata, created_at
                    FROM swap_configs
                    WHERE is_active = TRUE
                    ORDER BY id
                    "#,
                )
                .fetch_all(&self.pool)
                .await?
            }
        };

        rows.iter().map(swap_config_from_row).collect()
    }

    async fn setting(&self, group: &str, key: &str) -> Result<Option<SettingRow>> {
        let row = sqlx::query(
            r#"
            SELECT "group", key, value, value_type, updated_at
            FROM site_settings
            WHERE "group" = $1 AND key = $2
            "#,
        )
        .bind(group)
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(setting_from_row))
    }

    async fn settings_group(&self, group: &str) -> Result<Vec<SettingRow>> {
        let rows = sqlx::query(
            r#"
            SELECT "group", key, value, value_type, updated_at
            FROM site_settings
            WHERE "group" = $1
            ORDER BY key
            "#,
        )
        .bind(group)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(setting_from_row).collect())
    }

    async fn upsert_setting(
        &self,
        group: &str,
        key: &str,
        value: Option<String>,
        value_type: &str,
    ) -> Result<SettingRow> {
        let row = sqlx::query(
            r#"
            INSERT INTO site_settings ("group", key, value, value_type, updated_at)
            VALUES ($1, $2, $3, $4, NOW())
            ON CONFLICT ("group", key)
            DO UPDATE SET value = EXCLUDED.value,
                          value_type = EXCLUDED.value_type,
                          updated_at = NOW()
            RETURNING "group", key, value, value_type, updated_at
            "#,
        )
        .bind(group)
        .bind(key)
        .bind(value)
        .bind(value_type)
        .fetch_one(&self.pool)
        .await?;

        Ok(setting_from_row(&row))
    }
}
