//! Transaction recording service

use std::sync::Arc;

use chrono::Utc;
use common::decimal::{dec, Amount, Decimal};
use common::error::{Error, Result};
use common::model::{Transaction, TransactionStatus, TransactionType};
use fee_engine::FeeService;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::repository::TransactionRepository;

/// Tolerated relative deviation between the submitted fee and the freshly
/// recomputed expectation before an anomaly is flagged
const FEE_MISMATCH_TOLERANCE: Decimal = dec!(0.01);

/// A completed on-chain swap to be recorded
#[derive(Debug, Clone)]
pub struct NewSwapRecord {
    /// Wallet that signed the swap
    pub wallet_address: String,
    /// Chain the swap executed on
    pub chain_id: i64,
    /// Source token contract address
    pub from_token: String,
    /// Destination token contract address
    pub to_token: String,
    /// Amount of the source token spent
    pub from_amount: Amount,
    /// Amount of the destination token received
    pub to_amount: Amount,
    /// Fee deducted, as reported by the client
    pub fee_amount: Amount,
    /// On-chain transaction hash
    pub tx_hash: String,
}

/// Service for persisting completed external swaps
pub struct TransactionService {
    /// Repository for transaction records
    repo: Arc<dyn TransactionRepository>,
    /// Fee engine used to recompute the expected fee for cross-validation
    fees: Arc<FeeService>,
}

impl TransactionService {
    /// Create a new transaction service
    pub fn new(repo: Arc<dyn TransactionRepository>, fees: Arc<FeeService>) -> Self {
        Self { repo, fees }
    }

    /// Record a completed swap
    ///
    /// The submitted fee is compared against a freshly recomputed
    /// expectation; a deviation beyond 1% emits a warning-level anomaly
    /// signal but never rejects the write, because the chain already
    /// settled the swap. Records are created with `pending` status; later
    /// transitions belong to an external confirmation watcher.
    pub async fn record(&self, record: NewSwapRecord) -> Result<Transaction> {
        if record.from_amount <= Decimal::ZERO {
            return Err(Error::ValidationError(format!(
                "Swap amount must be positive, got {}",
                record.from_amount
            )));
        }
        if record.to_amount < Decimal::ZERO || record.fee_amount < Decimal::ZERO {
            return Err(Error::ValidationError(
                "Received and fee amounts must not be negative".to_string(),
            ));
        }

        let expected = self
            .fees
            .calculate_swap_fee(record.from_amount, record.chain_id, None)
            .await?;

        if expected.fee_amount > Decimal::ZERO {
            let deviation = (record.fee_amount - expected.fee_amount).abs() / expected.fee_amount;
            if deviation > FEE_MISMATCH_TOLERANCE {
                warn!(
                    submitted_fee = %record.fee_amount,
                    expected_fee = %expected.fee_amount,
                    wallet = %record.wallet_address,
                    tx_hash = %record.tx_hash,
                    "Swap fee mismatch"
                );
            }
        }

        let fee_collector = self.fees.fee_collector().await?;
        let transaction = Transaction {
            id: Uuid::new_v4(),
            tx_type: TransactionType::Swap,
            wallet_address: record.wallet_address,
            chain_id: record.chain_id,
            from_token: record.from_token,
            to_token: record.to_token,
            from_amount: record.from_amount,
            to_amount: record.to_amount,
            fee_amount: record.fee_amount,
            tx_hash: record.tx_hash,
            status: TransactionStatus::Pending,
            metadata: Some(json!({
                "fee_rate": expected.fee_rate,
                "fee_collector": fee_collector,
            })),
            created_at: Utc::now(),
        };

        let recorded = self.repo.insert(transaction).await?;
        info!("Recorded swap transaction {} ({})", recorded.id, recorded.tx_hash);
        Ok(recorded)
    }

    /// Get a recorded transaction by id
    pub async fn get(&self, id: Uuid) -> Result<Option<Transaction>> {
        self.repo.get(id).await
    }

    /// Get a recorded transaction by its on-chain hash
    pub async fn get_by_hash(&self, tx_hash: &str) -> Result<Option<Transaction>> {
        self.repo.get_by_hash(tx_hash).await
    }

    /// List the most recent transactions for a wallet, newest first
    pub async fn list_by_wallet(&self, wallet_address: &str, limit: usize) -> Result<Vec<Transaction>> {
        self.repo.list_by_wallet(wallet_address, limit).await
    }
}
