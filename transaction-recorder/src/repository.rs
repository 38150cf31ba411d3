//! Repository for transaction records

use std::str::FromStr;

use async_trait::async_trait;
use common::decimal::Decimal;
use common::error::{Error, Result};
use common::model::{Transaction, TransactionStatus, TransactionType};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use sqlx::{postgres::PgPoolOptions, PgPool, Row};
use tracing::info;
use uuid::Uuid;

/// Transaction repository trait defining the interface for record storage
///
/// Inserts are insert-or-fail on the transaction hash: duplicate detection
/// must be atomic in the store, not a read-then-write in the caller, so
/// concurrent submissions of the same hash cannot both succeed.
#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Insert a new record, failing if the hash is already recorded
    async fn insert(&self, transaction: Transaction) -> Result<Transaction>;

    /// Get a record by id
    async fn get(&self, id: Uuid) -> Result<Option<Transaction>>;

    /// Get a record by transaction hash
    async fn get_by_hash(&self, tx_hash: &str) -> Result<Option<Transaction>>;

    /// List the most recent records for a wallet, newest first
    async fn list_by_wallet(&self, wallet_address: &str, limit: usize) -> Result<Vec<Transaction>>;
}

/// In-memory repository for transaction records
pub struct InMemoryTransactionRepository {
    /// Records keyed by transaction hash (the uniqueness domain)
    by_hash: DashMap<String, Transaction>,
    /// Hash lookup by record id
    hash_by_id: DashMap<Uuid, String>,
}

impl InMemoryTransactionRepository {
    /// Create a new in-memory transaction repository
    pub fn new() -> Self {
        Self {
            by_hash: DashMap::new(),
            hash_by_id: DashMap::new(),
        }
    }
}

impl Default for InMemoryTransactionRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TransactionRepository for InMemoryTransactionRepository {
    async fn insert(&self, transaction: Transaction) -> Result<Transaction> {
        // The entry API makes the existence check and the insert one atomic
        // operation on the shard.
        match self.by_hash.entry(transaction.tx_hash.clone()) {
            Entry::Occupied(_) => Err(Error::DuplicateTransaction(format!(
                "Transaction hash already recorded: {}",
                transaction.tx_hash
            ))),
            Entry::Vacant(slot) => {
                self.hash_by_id.insert(transaction.id, transaction.tx_hash.clone());
                slot.insert(transaction.clone());
                Ok(transaction)
            }
        }
    }

    async fn get(&self, id: Uuid) -> Result<Option<Transaction>> {
        Ok(self
            .hash_by_id
            .get(&id)
            .and_then(|hash| self.by_hash.get(hash.value()).map(|t| t.clone())))
    }

    async fn get_by_hash(&self, tx_hash: &str) -> Result<Option<Transaction>> {
        Ok(self.by_hash.get(tx_hash).map(|t| t.clone()))
    }

    async fn list_by_wallet(&self, wallet_address: &str, limit: usize) -> Result<Vec<Transaction>> {
        let mut records: Vec<Transaction> = self
            .by_hash
            .iter()
            .filter(|entry| entry.value().wallet_address.eq_ignore_ascii_case(wallet_address))
            .map(|entry| entry.value().clone())
            .collect();

        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(limit);
        Ok(records)
    }
}

/// PostgreSQL repository for transaction records
///
/// Relies on a unique constraint on `tx_hash` so concurrent duplicate
/// submissions are rejected by the database itself.
pub struct PostgresTransactionRepository {
    pool: PgPool,
}

impl PostgresTransactionRepository {
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

        info!("Connected to PostgreSQL transaction database");
        Ok(Self { pool })
    }
}

fn transaction_from_row(row: &sqlx::postgres::PgRow) -> Result<Transaction> {
    let parse = |raw: String| {
        Decimal::from_str(&raw).map_err(|e| Error::DecimalError(e.to_string()))
    };

    Ok(Transaction {
        id: row.get("id"),
        tx_type: TransactionType::from_str(&row.get::<String, _>("tx_type"))?,
        wallet_address: row.get("wallet_address"),
        chain_id: row.get("chain_id"),
        from_token: row.get("from_token"),
        to_token: row.get("to_token"),
        from_amount: parse(row.get("from_amount"))?,
        to_amount: parse(row.get("to_amount"))?,
        fee_amount: parse(row.get("fee_amount"))?,
        tx_hash: row.get("tx_hash"),
        status: TransactionStatus::from_str(&row.get::<String, _>("status"))?,
        metadata: row.get("metadata"),
        created_at: row.get("created_at"),
    })
}

const TRANSACTION_COLUMNS: &str = r#"
    id, tx_type, wallet_address, chain_id, from_token, to_token,
    from_amount::TEXT AS from_amount, to_amount::TEXT AS to_amount,
    fee_amount::TEXT AS fee_amount, tx_hash, status, metadata, created_at
"#;

#[async_trait]
impl TransactionRepository for PostgresTransactionRepository {
    async fn insert(&self, transaction: Transaction) -> Result<Transaction> {
        let query = format!(
            r#"
            INSERT INTO transactions (
                id, tx_type, wallet_address, chain_id, from_token, to_token,
                from_amount, to_amount, fee_amount, tx_hash, status, metadata, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7::NUMERIC, $8::NUMERIC, $9::NUMERIC, $10, $11, $12, $13)
            RETURNING {}
            "#,
            TRANSACTION_COLUMNS
        );

        let row = sqlx::query(&query)
            .bind(transaction.id)
            .bind(transaction.tx_type.as_str())
            .bind(&transaction.wallet_address)
            .bind(transaction.chain_id)
            .bind(&transaction.from_token)
            .bind(&transaction.to_token)
            .bind(transaction.from_amount.to_string())
            .bind(transaction.to_amount.to_string())
            .bind(transaction.fee_amount.to_string())
            .bind(&transaction.tx_hash)
            .bind(transaction.status.as_str())
            .bind(&transaction.metadata)
            .bind(transaction.created_at)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match &e {
                sqlx::Error::Database(db) if db.is_unique_violation() => Error::DuplicateTransaction(
                    format!("Transaction hash already recorded: {}", transaction.tx_hash),
                ),
                _ => Error::Database(e),
            })?;

        transaction_from_row(&row)
    }

    async fn get(&self, id: Uuid) -> Result<Option<Transaction>> {
        let query = format!("SELECT {} FROM transactions WHERE id = $1", TRANSACTION_COLUMNS);
        let row = sqlx::query(&query).bind(id).fetch_optional(&self.pool).await?;
        row.as_ref().map(transaction_from_row).transpose()
    }

    async fn get_by_hash(&self, tx_hash: &str) -> Result<Option<Transaction>> {
        let query = format!("SELECT {} FROM transactions WHERE tx_hash = $1", TRANSACTION_COLUMNS);
        let row = sqlx::query(&query).bind(tx_hash).fetch_optional(&self.pool).await?;
        row.as_ref().map(transaction_from_row).transpose()
    }

    async fn list_by_wallet(&self, wallet_address: &str, limit: usize) -> Result<Vec<Transaction>> {
        let query = format!(
            r#"
            SELECT {}
            FROM transactions
            WHERE LOWER(wallet_address) = LOWER($1)
            ORDER BY created_at DESC
            LIMIT $2
            "#,
            TRANSACTION_COLUMNS
        );

        let rows = sqlx::query(&query)
            .bind(wallet_address)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(transaction_from_row).collect()
    }
}
