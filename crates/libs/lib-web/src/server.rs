//! # Server Setup
//!
//! Server initialization, route registration, and HTTP server startup.
//!
//! Startup order: `.env`, tracing, configuration, signing wallet, Solana RPC client,
//! router client, then the [`SwapService`] shared by every request.
//!
//! ## Environment
//!
//! | Variable       | Meaning                                        |
//! |----------------|------------------------------------------------|
//! | `PRIVATE_KEY`  | Base58 signing key (required)                  |
//! | `BIND_ADDRESS` | Listen address, default `127.0.0.1:3001`       |
//! | `LOG_LEVEL`    | `trace`/`debug`/`info`/`warn`/`error`          |
//!
//! The remaining variables are read by [`lib_core::config::Config::from_env`].

// region: --- Imports
use axum::{
    extract::FromRef,
    http::{header, HeaderValue, Method, Request, StatusCode},
    routing::get,
    Router,
};
use lib_core::config::{core_config, init_config};
use lib_solana::{RouterClient, RpcBalanceReader, SolanaClient};
use lib_utils::envs::{get_env, get_env_or};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::handlers;
use crate::middleware::{log_requests, stamp_req, RequestStamp};
use crate::services::SwapService;
use crate::wallet::{address_of, load_keypair_from_base58};
// endregion: --- Imports

// region: --- AppState
/// Application state shared across all routes
#[derive(Clone)]
pub struct AppState {
    pub swap: Arc<SwapService>,
}

impl FromRef<AppState> for Arc<SwapService> {
    fn from_ref(state: &AppState) -> Self {
        state.swap.clone()
    }
}
// endregion: --- AppState

// region: --- Server Configuration
/// Server configuration
pub struct ServerConfig {
    /// Bind address (e.g., "127.0.0.1:3001")
    pub bind_address: String,
    /// Allowed CORS origins
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: get_env_or("BIND_ADDRESS", "127.0.0.1:3001"),
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
                "http://localhost:8080".to_string(),
                "http://127.0.0.1:8080".to_string(),
            ],
        }
    }
}
// endregion: --- Server Configuration

// region: --- Server Setup
/// Initialize and start the HTTP server
///
/// # Errors
///
/// Fails when configuration is invalid, `PRIVATE_KEY` is missing or malformed,
/// or the listener cannot bind.
pub async fn start_server(config: ServerConfig) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    init_tracing();

    info!("Loading configuration...");
    init_config().map_err(|e| anyhow::anyhow!(e))?;
    let app_config = core_config().ok_or_else(|| anyhow::anyhow!("configuration not initialized"))?;
    info!("Router API host: {}", app_config.router_api_host);
    info!("Solana RPC: {}", app_config.solana_rpc_url);

    let private_key = get_env("PRIVATE_KEY").map_err(|e| anyhow::anyhow!(e))?;
    let keypair = Arc::new(load_keypair_from_base58(&private_key).map_err(|e| anyhow::anyhow!(e.user_message()))?);
    info!("Signing wallet: {}", address_of(&keypair));

    let solana = SolanaClient::builder()
        .rpc_url(app_config.solana_rpc_url.clone())
        .build();
    if let Err(e) = solana.health_check().await {
        // Balance reads degrade to zero; swaps can still run
        warn!("Solana RPC health check failed: {}", e);
    }

    let router = RouterClient::builder()
        .api_host(app_config.router_api_host.clone())
        .slippage_pct(app_config.slippage_pct)
        .fee_sol(app_config.fee_sol)
        .build()?;
    info!("Router client ready (slippage {}%, fee {} SOL)", app_config.slippage_pct, app_config.fee_sol);

    let service = SwapService::new(
        Arc::new(router),
        Arc::new(RpcBalanceReader::new(solana)),
        keypair,
        app_config,
    );

    let state = AppState { swap: Arc::new(service) };
    let app = create_router(state, &config.allowed_origins);

    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;

    info!("SERVER READY: http://{}", config.bind_address);
    log_server_info();

    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing() {
    let log_level = get_env_or("LOG_LEVEL", "info").to_lowercase();
    let filter = match log_level.as_str() {
        "trace" | "debug" | "info" | "warn" | "error" => tracing_subscriber::EnvFilter::new(&log_level),
        _ => tracing_subscriber::EnvFilter::new("info"),
    };

    let initialized = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .try_init();

    // A subscriber already installed by the embedding binary stays in place
    if initialized.is_ok() {
        info!("Log level: {}", log_level);
    }
}

/// Create the application router with all routes and middleware.
pub fn create_router(state: AppState, allowed_origins: &[String]) -> Router {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .merge(handlers::swap::routes())
        .route("/health", get(|| async { "OK" }))
        .fallback(|| async {
            info!("[404 HANDLER] Unmatched route - returning 404");
            (StatusCode::NOT_FOUND, "Route not found")
        })
        .with_state(state)
        // Last layer runs first: stamp, then logging, then the trace span
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(|request: &Request<_>| {
                    let request_id = RequestStamp::id_of(request);
                    tracing::info_span!(
                        "http_request",
                        request_id = %request_id,
                        method = %request.method(),
                        uri = %request.uri(),
                    )
                })
                .on_failure(
                    |error: tower_http::classify::ServerErrorsFailureClass,
                     latency: std::time::Duration,
                     _span: &tracing::Span| {
                        tracing::error!(
                            error = ?error,
                            latency_ms = latency.as_millis(),
                            "[HTTP FAILURE] {:?}",
                            error
                        );
                    },
                ),
        )
        .layer(axum::middleware::from_fn(log_requests))
        .layer(axum::middleware::from_fn(stamp_req))
        .layer(cors)
}

fn log_server_info() {
    info!(" SWAP:");
    info!("   • POST /api/swap          {{inputToken, outputToken, amount}}");
    info!("   • POST /api/check-status  {{hash, lastValidBlockHeight}}");
    info!(" HEALTH:");
    info!("   • GET  /health");
}
// endregion: --- Server Setup
