// Handler-level tests driving the swap endpoints against seeded in-memory
// stores, asserting both the error classification and the response envelope.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use common::model::{Chain, FeeConfig, FeeType, SwapConfig, Token};
use config_store::{ConfigRepository, ConfigStore, ConfigStoreConfig, InMemoryConfigRepository};
use fee_engine::FeeService;
use rust_decimal_macros::dec;
use transaction_recorder::{InMemoryTransactionRepository, TransactionService};

use api_gateway::api::swap::{execute_swap, get_quote, get_routes, ExecuteRequest, QuoteParams, RoutesQuery};
use api_gateway::error::ApiError;
use api_gateway::AppState;

const WBNB: &str = "0xbb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c";
const BUSD: &str = "0xe9e7CEA3DedcA5984780Bafc599bD69ADd087D56";
const WALLET: &str = "0x1111111111111111111111111111111111111111";

fn chain(id: i64, name: &str, is_active: bool) -> Chain {
    let now = Utc::now();
    Chain {
        id,
        name: name.to_string(),
        symbol: "BSC".to_string(),
        native_symbol: "BNB".to_string(),
        rpc_url: None,
        explorer_url: None,
        is_active,
        created_at: now,
        updated_at: now,
    }
}

fn token(id: i64, chain_id: i64, address: &str, symbol: &str) -> Token {
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

async fn seeded_state() -> Arc<AppState> {
    let repo = Arc::new(InMemoryConfigRepository::new());

    repo.insert_chain(chain(56, "BNB Smart Chain", true));
    repo.insert_chain(chain(97, "BSC Testnet", false));
    repo.insert_token(token(1, 56, WBNB, "WBNB"));
    repo.insert_token(token(2, 56, BUSD, "BUSD"));

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
        created_at: Utc::now(),
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
        created_at: Utc::now(),
    });

    repo.upsert_setting("trading", "fee_collector_wallet", Some(WALLET.to_string()), "string")
        .await
        .unwrap();

    let store = Arc::new(ConfigStore::new(repo, &ConfigStoreConfig::uncached()));
    let fees = Arc::new(FeeService::new(Arc::clone(&store)));
    let transactions = Arc::new(TransactionService::new(
        Arc::new(InMemoryTransactionRepository::new()),
        Arc::clone(&fees),
    ));

    Arc::new(AppState {
        store,
        fees,
        transactions,
    })
}

fn quote_params(chain_id: i64, from_token: &str, to_token: &str) -> QuoteParams {
    QuoteParams {
        from_token: from_token.to_string(),
        to_token: to_token.to_string(),
        amount: dec!(1000),
        chain_id,
        slippage: None,
    }
}

fn execute_request(tx_hash: &str) -> ExecuteRequest {
    ExecuteRequest {
        from_token: WBNB.to_string(),
        to_token: BUSD.to_string(),
        from_amount: dec!(1000),
        to_amount: dec!(997.5),
        fee_amount: dec!(2.5),
        tx_hash: tx_hash.to_string(),
        chain_id: 56,
        wallet_address: WALLET.to_string(),
    }
}

async fn error_envelope(err: ApiError) -> (StatusCode, serde_json::Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_quote_unknown_chain_returns_invalid_chain_404() {
    let state = seeded_state().await;

    let err = get_quote(State(state), Query(quote_params(999999, WBNB, BUSD)))
        .await
        .unwrap_err();

    let (status, body) = error_envelope(err).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], serde_json::json!(false));
    assert_eq!(body["error"]["code"], serde_json::json!("INVALID_CHAIN"));
}

#[tokio::test]
async fn test_quote_inactive_chain_returns_invalid_chain_404() {
    let state = seeded_state().await;

    let err = get_quote(State(state), Query(quote_params(97, WBNB, BUSD)))
        .await
        .unwrap_err();

    let (status, body) = error_envelope(err).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], serde_json::json!("INVALID_CHAIN"));
}

#[tokio::test]
async fn test_quote_unknown_token_returns_invalid_token_404() {
    let state = seeded_state().await;
    let unknown = "0x000000000000000000000000000000000000dEaD";

    let err = get_quote(State(state), Query(quote_params(56, unknown, BUSD)))
        .await
        .unwrap_err();

    let (status, body) = error_envelope(err).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], serde_json::json!(false));
    assert_eq!(body["error"]["code"], serde_json::json!("INVALID_TOKEN"));
    assert_eq!(body["error"]["details"]["address"], serde_json::json!(unknown));
}

#[tokio::test]
async fn test_quote_handler_success_envelope() {
    let state = seeded_state().await;

    let response = get_quote(State(state), Query(quote_params(56, WBNB, BUSD)))
        .await
        .unwrap();

    assert!(response.success);
    assert_eq!(response.data.quote.fee_amount, dec!(2.5));
    assert_eq!(response.data.quote.to_amount_estimate, dec!(997.5));
    assert_eq!(response.data.from_token.symbol, "WBNB");
    assert_eq!(response.data.to_token.symbol, "BUSD");
    assert_eq!(response.data.chain.id, 56);
    assert_eq!(response.data.fee_collector, WALLET);
}

#[tokio::test]
async fn test_execute_created_then_duplicate_hash_is_422() {
    let state = seeded_state().await;

    let (status, response) = execute_swap(State(Arc::clone(&state)), Json(execute_request("0xdup")))
        .await
        .unwrap();
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(response.data.status, "pending");

    let err = execute_swap(State(state), Json(execute_request("0xdup")))
        .await
        .unwrap_err();

    let (status, body) = error_envelope(err).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], serde_json::json!("VALIDATION_ERROR"));
}

#[tokio::test]
async fn test_execute_malformed_wallet_is_422() {
    let state = seeded_state().await;

    let mut request = execute_request("0xbadwallet");
    request.wallet_address = "not-an-address".to_string();

    let err = execute_swap(State(state), Json(request)).await.unwrap_err();

    let (status, body) = error_envelope(err).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], serde_json::json!("VALIDATION_ERROR"));
}

#[tokio::test]
async fn test_routes_unknown_chain_returns_invalid_chain_404() {
    let state = seeded_state().await;

    let err = get_routes(State(state), Query(RoutesQuery { chain_id: 999999 }))
        .await
        .unwrap_err();

    let (status, body) = error_envelope(err).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], serde_json::json!("INVALID_CHAIN"));
}

#[tokio::test]
async fn test_routes_lists_active_configs_with_resolved_rate() {
    let state = seeded_state().await;

    let response = get_routes(State(state), Query(RoutesQuery { chain_id: 56 }))
        .await
        .unwrap();

    assert!(response.success);
    assert_eq!(response.data.chain.id, 56);
    assert_eq!(response.data.routes.len(), 1);
    assert_eq!(response.data.routes[0].name, "PancakeSwap");
    assert_eq!(response.data.routes[0].fee_rate, dec!(0.2500));
}
