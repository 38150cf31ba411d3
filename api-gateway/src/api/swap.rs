//! Swap API handlers
//!
//! Handlers for the swap endpoints:
//! - Quote a swap (fee, slippage, price impact, minimum received)
//! - Record an executed on-chain swap
//! - List available swap routes for a chain

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use common::decimal::{Amount, Decimal, Rate};
use common::model::{Chain, Token};
use fee_engine::SwapQuote;
use serde::{Deserialize, Serialize};
use transaction_recorder::NewSwapRecord;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::api::response::ApiResponse;
use crate::error::ApiError;
use crate::AppState;

/// Quote request parameters
#[derive(Debug, Clone, Deserialize, IntoParams, ToSchema)]
pub struct QuoteParams {
    /// Source token contract address
    pub from_token: String,
    /// Destination token contract address
    pub to_token: String,
    /// Amount of the source token to swap
    pub amount: Amount,
    /// EVM chain id
    pub chain_id: i64,
    /// Slippage tolerance override in percent, 0.01 to 50
    pub slippage: Option<Decimal>,
}

/// Token summary returned alongside a quote
#[derive(Debug, Serialize, ToSchema)]
pub struct TokenInfo {
    /// Token symbol
    pub symbol: String,
    /// Token name
    pub name: String,
    /// Contract address
    pub address: String,
    /// On-chain decimal places
    pub decimals: u8,
}

impl From<Token> for TokenInfo {
    fn from(token: Token) -> Self {
        Self {
            symbol: token.symbol,
            name: token.name,
            address: token.contract_address,
            decimals: token.decimals,
        }
    }
}

/// Chain summary returned alongside a quote
#[derive(Debug, Serialize, ToSchema)]
pub struct ChainInfo {
    /// EVM chain id
    pub id: i64,
    /// Chain name
    pub name: String,
}

impl From<&Chain> for ChainInfo {
    fn from(chain: &Chain) -> Self {
        Self {
            id: chain.id,
            name: chain.name.clone(),
        }
    }
}

/// Quote response payload
#[derive(Debug, Serialize, ToSchema)]
pub struct QuoteData {
    /// The computed quote
    pub quote: SwapQuote,
    /// Source token details
    pub from_token: TokenInfo,
    /// Destination token details
    pub to_token: TokenInfo,
    /// Chain the quote applies to
    pub chain: ChainInfo,
    /// Address collecting the fee
    pub fee_collector: String,
}

/// Get a swap quote
#[utoipa::path(
    get,
    path = "/api/v1/swap/quote",
    params(QuoteParams),
    responses(
        (status = 200, description = "Quote generated successfully"),
        (status = 404, description = "Chain or token not found"),
        (status = 422, description = "Invalid quote parameters"),
        (status = 500, description = "Quote computation failed")
    ),
    tag = "swap"
)]
pub async fn get_quote(
    State(state): State<Arc<AppState>>,
    Query(params): Query<QuoteParams>,
) -> Result<ApiResponse<QuoteData>, ApiError> {
    build_quote(state, params).await
}

/// Get a swap quote (POST body variant)
#[utoipa::path(
    post,
    path = "/api/v1/swap/quote",
    request_body = QuoteParams,
    responses(
        (status = 200, description = "Quote generated successfully"),
        (status = 404, description = "Chain or token not found"),
        (status = 422, description = "Invalid quote parameters"),
        (status = 500, description = "Quote computation failed")
    ),
    tag = "swap"
)]
pub async fn post_quote(
    State(state): State<Arc<AppState>>,
    Json(params): Json<QuoteParams>,
) -> Result<ApiResponse<QuoteData>, ApiError> {
    build_quote(state, params).await
}

async fn build_quote(
    state: Arc<AppState>,
    params: QuoteParams,
) -> Result<ApiResponse<QuoteData>, ApiError> {
    if params.amount <= Decimal::ZERO {
        return Err(ApiError::Validation(format!(
            "Amount must be positive, got {}",
            params.amount
        )));
    }

    let chain = state
        .store
        .chain(params.chain_id)
        .await
        .map_err(|e| quote_error(e, &params))?
        .filter(|c| c.is_active)
        .ok_or(ApiError::InvalidChain(params.chain_id))?;

    let from_token = lookup_token(&state, &params, &params.from_token).await?;
    let to_token = lookup_token(&state, &params, &params.to_token).await?;

    let quote = state
        .fees
        .swap_quote(
            params.amount,
            &params.from_token,
            &params.to_token,
            params.chain_id,
            params.slippage,
        )
        .await
        .map_err(|e| quote_error(e, &params))?;

    let fee_collector = state
        .fees
        .fee_collector()
        .await
        .map_err(|e| quote_error(e, &params))?;

    Ok(ApiResponse::new(QuoteData {
        quote,
        from_token: from_token.into(),
        to_token: to_token.into(),
        chain: ChainInfo::from(&chain),
        fee_collector,
    }))
}

async fn lookup_token(
    state: &AppState,
    params: &QuoteParams,
    address: &str,
) -> Result<Token, ApiError> {
    state
        .store
        .token(params.chain_id, address)
        .await
        .map_err(|e| quote_error(e, params))?
        .filter(|t| t.is_active)
        .ok_or_else(|| ApiError::InvalidToken {
            chain_id: params.chain_id,
            address: address.to_string(),
        })
}

/// Log unexpected quote failures with the offending parameters before they
/// collapse into the generic 500
fn quote_error(err: common::error::Error, params: &QuoteParams) -> ApiError {
    if !matches!(err, common::error::Error::ValidationError(_)) {
        tracing::error!(
            from_token = %params.from_token,
            to_token = %params.to_token,
            amount = %params.amount,
            chain_id = params.chain_id,
            "Quote failed: {}",
            err
        );
    }
    ApiError::from_quote(err)
}

/// Record-swap request
#[derive(Debug, Deserialize, ToSchema)]
pub struct ExecuteRequest {
    /// Source token contract address
    pub from_token: String,
    /// Destination token contract address
    pub to_token: String,
    /// Amount of the source token spent
    pub from_amount: Amount,
    /// Amount of the destination token received
    pub to_amount: Amount,
    /// Fee deducted, as observed by the client
    pub fee_amount: Amount,
    /// On-chain transaction hash
    pub tx_hash: String,
    /// EVM chain id the swap executed on
    pub chain_id: i64,
    /// Wallet that signed the swap
    pub wallet_address: String,
}

/// Recorded-swap response payload
#[derive(Debug, Serialize, ToSchema)]
pub struct ExecuteData {
    /// Id of the created record
    pub transaction_id: Uuid,
    /// On-chain transaction hash
    pub tx_hash: String,
    /// Record status, always `pending` on creation
    pub status: String,
    /// Source token contract address
    pub from_token: String,
    /// Destination token contract address
    pub to_token: String,
    /// Amount of the source token spent
    pub from_amount: Amount,
    /// Amount of the destination token received
    pub to_amount: Amount,
    /// Fee deducted
    pub fee_amount: Amount,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// Record an executed on-chain swap
#[utoipa::path(
    post,
    path = "/api/v1/swap/execute",
    request_body = ExecuteRequest,
    responses(
        (status = 201, description = "Swap recorded successfully"),
        (status = 404, description = "Chain not found"),
        (status = 422, description = "Invalid swap submission or duplicate transaction hash"),
        (status = 500, description = "Recording failed")
    ),
    tag = "swap"
)]
pub async fn execute_swap(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ExecuteRequest>,
) -> Result<(StatusCode, ApiResponse<ExecuteData>), ApiError> {
    if !is_evm_address(&request.wallet_address) {
        return Err(ApiError::Validation(format!(
            "Invalid wallet address: {}",
            request.wallet_address
        )));
    }
    if request.tx_hash.trim().is_empty() {
        return Err(ApiError::Validation(
            "Transaction hash must not be empty".to_string(),
        ));
    }

    state
        .store
        .chain(request.chain_id)
        .await
        .map_err(ApiError::from_execute)?
        .filter(|c| c.is_active)
        .ok_or(ApiError::InvalidChain(request.chain_id))?;

    let transaction = state
        .transactions
        .record(NewSwapRecord {
            wallet_address: request.wallet_address,
            chain_id: request.chain_id,
            from_token: request.from_token,
            to_token: request.to_token,
            from_amount: request.from_amount,
            to_amount: request.to_amount,
            fee_amount: request.fee_amount,
            tx_hash: request.tx_hash,
        })
        .await
        .map_err(ApiError::from_execute)?;

    Ok((
        StatusCode::CREATED,
        ApiResponse::new(ExecuteData {
            transaction_id: transaction.id,
            tx_hash: transaction.tx_hash,
            status: transaction.status.to_string(),
            from_token: transaction.from_token,
            to_token: transaction.to_token,
            from_amount: transaction.from_amount,
            to_amount: transaction.to_amount,
            fee_amount: transaction.fee_amount,
            created_at: transaction.created_at,
        }),
    ))
}

/// Route listing query
#[derive(Debug, Deserialize, IntoParams)]
pub struct RoutesQuery {
    /// EVM chain id
    pub chain_id: i64,
}

/// A swap route available on a chain
#[derive(Debug, Serialize, ToSchema)]
pub struct RouteInfo {
    /// Route display name
    pub name: String,
    /// DEX protocol identifier
    pub protocol: String,
    /// Router contract address
    pub router_address: String,
    /// Factory contract address, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub factory_address: Option<String>,
    /// Default slippage tolerance in percent
    pub slippage_tolerance: Decimal,
    /// Effective swap fee rate in percent
    pub fee_rate: Rate,
}

/// Route listing response payload
#[derive(Debug, Serialize, ToSchema)]
pub struct RoutesData {
    /// Chain the routes belong to
    pub chain: ChainInfo,
    /// Active routes
    pub routes: Vec<RouteInfo>,
}

/// List active swap routes for a chain
#[utoipa::path(
    get,
    path = "/api/v1/swap/routes",
    params(RoutesQuery),
    responses(
        (status = 200, description = "Routes listed successfully"),
        (status = 404, description = "Chain not found"),
        (status = 422, description = "Invalid parameters"),
        (status = 500, description = "Route listing failed")
    ),
    tag = "swap"
)]
pub async fn get_routes(
    State(state): State<Arc<AppState>>,
    Query(query): Query<RoutesQuery>,
) -> Result<ApiResponse<RoutesData>, ApiError> {
    let chain = state
        .store
        .chain(query.chain_id)
        .await
        .map_err(ApiError::from_routes)?
        .filter(|c| c.is_active)
        .ok_or(ApiError::InvalidChain(query.chain_id))?;

    // The rate depends on the chain, not the route, so resolve it once.
    let fee_rate = state
        .fees
        .swap_fee_rate(query.chain_id)
        .await
        .map_err(ApiError::from_routes)?;

    let routes = state
        .store
        .list_swap_configs(Some(query.chain_id))
        .await
        .map_err(ApiError::from_routes)?
        .into_iter()
        .filter(|config| config.is_active)
        .map(|config| RouteInfo {
            name: config.name,
            protocol: config.protocol,
            router_address: config.router_address,
            factory_address: config.factory_address,
            slippage_tolerance: config.slippage_tolerance,
            fee_rate,
        })
        .collect();

    Ok(ApiResponse::new(RoutesData {
        chain: ChainInfo::from(&chain),
        routes,
    }))
}

/// Check for a `0x`-prefixed 20-byte hex address
fn is_evm_address(address: &str) -> bool {
    address.len() == 42
        && address.starts_with("0x")
        && address[2..].chars().all(|c| c.is_ascii_hexdigit())
}
