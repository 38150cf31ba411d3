//! API Gateway for the swap fee and quote engine

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use chrono::Utc;
use clap::Parser;
use dotenv::dotenv;
use rust_decimal_macros::dec;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::{debug, info, Level};
use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter, FmtSubscriber};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::model::{Chain, FeeConfig, FeeType, SwapConfig, Token};
use config_store::{
    ConfigRepository, ConfigStore, ConfigStoreConfig, InMemoryConfigRepository,
    PostgresConfigRepository,
};
use fee_engine::FeeService;
use transaction_recorder::{
    InMemoryTransactionRepository, PostgresTransactionRepository, TransactionRepository,
    TransactionService,
};

use api_gateway::api::swap::{execute_swap, get_quote, get_routes, post_quote};
use api_gateway::config::AppConfig;
use api_gateway::AppState;

/// API documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        api_gateway::api::swap::get_quote,
        api_gateway::api::swap::post_quote,
        api_gateway::api::swap::execute_swap,
        api_gateway::api::swap::get_routes,
    ),
    components(
        schemas(
            api_gateway::api::swap::QuoteParams,
            api_gateway::api::swap::ExecuteRequest,
            api_gateway::api::swap::TokenInfo,
            api_gateway::api::swap::ChainInfo,
            api_gateway::api::swap::QuoteData,
            api_gateway::api::swap::ExecuteData,
            api_gateway::api::swap::RouteInfo,
            api_gateway::api::swap::RoutesData,
            fee_engine::SwapQuote,
            api_gateway::api::response::ApiResponse<api_gateway::api::swap::QuoteData>,
            api_gateway::api::response::ApiResponse<api_gateway::api::swap::ExecuteData>,
            api_gateway::api::response::ApiResponse<api_gateway::api::swap::RoutesData>,
        )
    ),
    tags(
        (name = "swap", description = "Swap quoting, recording, and route listing endpoints")
    ),
    info(
        title = "Swap Fee Engine API",
        version = "1.0.0",
        description = "API for swap fee resolution, quote calculation, and recording of executed swaps"
    )
)]
struct ApiDoc;

/// Swap fee engine API server
#[derive(Parser, Debug)]
#[clap(author, version, about)]
struct Args {
    /// Listening address
    #[clap(short, long, default_value = "127.0.0.1:8080")]
    addr: String,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Parse command line arguments
    let args = Args::parse();

    // Initialize logging with debug level when DEBUG=1 env var is set
    let env = std::env::var("DEBUG").unwrap_or_else(|_| "0".to_string());
    let log_level = if env == "1" { Level::DEBUG } else { Level::INFO };

    let env_filter = EnvFilter::builder()
        .with_default_directive(log_level.into())
        .parse("tower_http=debug,api_gateway=debug")
        .unwrap();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_span_events(FmtSpan::NEW | FmtSpan::CLOSE)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .expect("Failed to set tracing subscriber");

    debug!("Debug logging enabled");

    // Initialize services, against PostgreSQL when configured and seeded
    // in-memory stores otherwise
    let app_config = AppConfig::new();
    let store_config = ConfigStoreConfig::from_env();

    let (config_repo, transaction_repo): (
        Arc<dyn ConfigRepository>,
        Arc<dyn TransactionRepository>,
    ) = match &app_config.database_url {
        Some(url) => {
            let config_repo = PostgresConfigRepository::connect(url, app_config.db_max_connections)
                .await
                .expect("Failed to connect to configuration database");
            let transaction_repo =
                PostgresTransactionRepository::connect(url, app_config.db_max_connections)
                    .await
                    .expect("Failed to connect to transaction database");
            (Arc::new(config_repo), Arc::new(transaction_repo))
        }
        None => {
            info!("DATABASE_URL not set, running on seeded in-memory stores");
            let config_repo = Arc::new(InMemoryConfigRepository::new());
            seed_demo_data(&config_repo).await;
            (config_repo, Arc::new(InMemoryTransactionRepository::new()))
        }
    };

    let store = Arc::new(ConfigStore::new(config_repo, &store_config));
    let fees = Arc::new(FeeService::new(Arc::clone(&store)));
    let transactions = Arc::new(TransactionService::new(transaction_repo, Arc::clone(&fees)));

    // Create app state
    let state = Arc::new(AppState {
        store,
        fees,
        transactions,
    });

    // Set up CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Set up API routes
    let swap_routes = Router::new()
        .route("/quote", get(get_quote).post(post_quote))
        .route("/execute", post(execute_swap))
        .route("/routes", get(get_routes));

    // Set up Swagger UI
    let swagger_ui = SwaggerUi::new("/swagger-ui")
        .url("/api-docs/openapi.json", ApiDoc::openapi());

    // Combine all routes
    let app = Router::new()
        .nest("/api/v1/swap", swap_routes)
        .merge(swagger_ui)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(log_level))
                .on_request(DefaultOnRequest::new().level(log_level))
                .on_response(DefaultOnResponse::new().level(log_level)),
        )
        .with_state(state);

    // Start the server
    let addr: std::net::SocketAddr = args.addr.parse().expect("Invalid address");
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    // Run until interrupt signal
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

/// Seed the in-memory repository with a BNB Smart Chain demo dataset
async fn seed_demo_data(repo: &Arc<InMemoryConfigRepository>) {
    let now = Utc::now();

    repo.insert_chain(Chain {
        id: 56,
        name: "BNB Smart Chain".to_string(),
        symbol: "BSC".to_string(),
        native_symbol: "BNB".to_string(),
        rpc_url: Some("https://bsc-dataseed.binance.org".to_string()),
        explorer_url: Some("https://bscscan.com".to_string()),
        is_active: true,
        created_at: now,
        updated_at: now,
    });

    repo.insert_token(Token {
        id: 1,
        chain_id: 56,
        contract_address: "0xbb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c".to_string(),
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
        contract_address: "0xe9e7CEA3DedcA5984780Bafc599bD69ADd087D56".to_string(),
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
        factory_address: Some("0xcA143Ce32Fe78f1f7019d7d551a6402fC5350c73".to_string()),
        slippage_tolerance: dec!(0.5),
        is_active: true,
        metadata: None,
        created_at: now,
    });

    for (key, value, value_type) in [
        ("default_fee_rate", "0.3", "number"),
        ("max_fee_rate", "5.0", "number"),
        ("fee_collector_wallet", "", "string"),
    ] {
        repo.upsert_setting("trading", key, Some(value.to_string()), value_type)
            .await
            .expect("Failed to seed demo settings");
    }

    info!("Seeded demo configuration for chain 56");
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
