//! Pitchside Gateway Server

use std::net::SocketAddr;

use pitchside_gateway::{build_router, config::GatewayConfig, state::AppState, ResultExt};
use pitchside_session::RouteTable;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize tracing/logging.
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,pitchside_gateway=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    init_tracing();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting Pitchside gateway");

    let config = GatewayConfig::load().log("Failed to load gateway configuration")?;
    tracing::info!(
        bind = %config.server.bind,
        port = config.server.port,
        backend = %config.backend.base_url,
        "Configuration loaded"
    );

    let shell = AppState::load_shell(&config).await.log("Failed to load application shell")?;
    let addr: SocketAddr = config.bind_address().parse()?;

    let state = AppState::new(config, RouteTable::standard(), shell);
    let app = build_router(state);

    let listener = TcpListener::bind(addr).await.log("Failed to bind to address")?;
    tracing::info!(address = %addr, "Gateway listening");
    tracing::info!("Auth endpoints: POST /api/auth/login, POST /api/auth/logout, GET /api/auth/session");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .log("Failed to serve app")?;

    tracing::info!("Gateway shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
