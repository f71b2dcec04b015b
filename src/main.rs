use clap::Parser;
use prompt_gateway::config::Args;
use prompt_gateway::gateway::GatewayClient;
use prompt_gateway::rate_limit::{RateLimiter, run_sweeper};
use prompt_gateway::router;
use prompt_gateway::state::AppState;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    // parse cli arguments
    let args = Args::parse();

    let gateway = match GatewayClient::with_timeout(
        &args.gateway_url,
        args.api_key.clone(),
        args.upstream_timeout(),
    ) {
        Ok(gateway) => gateway,
        Err(e) => {
            error!(error = %e, "failed to build HTTP client");
            std::process::exit(1);
        }
    };
    if !gateway.is_configured() {
        warn!("AI_GATEWAY_API_KEY is not set, protected endpoints will answer 503");
    }

    // creating shared state
    let state = Arc::new(AppState::new(gateway, RateLimiter::new(), args.rate_window()));

    // every endpoint shares the window, so it is also the retention
    tokio::spawn(run_sweeper(
        state.rate_limiter.clone(),
        args.sweep_interval(),
        args.rate_window(),
    ));

    let app = router::build(state, args.max_body_bytes);

    let addr = args.bind_address();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(error = %e, %addr, "failed to bind");
            std::process::exit(1);
        }
    };

    info!("Gateway running on http://{}", addr);
    info!("Forwarding to AI gateway at {}", args.gateway_url);
    info!("Rate limit window: {} seconds", args.rate_window);

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "server error");
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "failed to listen for shutdown signal");
    }
    info!("shutting down");
}
