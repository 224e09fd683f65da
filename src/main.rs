use std::sync::Arc;

use anyhow::Result;
use tokio::{net::TcpListener, signal};
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use smart_hub_service::{
    api,
    config::Config,
    settings::{window::WindowResolver, SettingsStore},
    state::AppState,
    sunset::SunriseSunsetClient,
    telemetry::TelemetryHistory,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env (absent file is fine; env vars may be set externally)
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let sunset = SunriseSunsetClient::new(config.sunset_api_url.clone(), config.sunset_timeout)?;
    let resolver = WindowResolver::new(Arc::new(sunset), config.sunset_coords);
    let state = AppState::new(SettingsStore::new(resolver), TelemetryHistory::new());

    let settings = state.settings.current().await;
    info!(
        temperature_threshold = settings.temperature_threshold,
        light_on = %settings.light_on,
        light_off = %settings.light_off,
        "Starting with default settings"
    );

    let app = api::router(state)
        .layer(api::cors_layer(&config.cors_origins)?)
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.server_host, config.server_port);
    let listener = TcpListener::bind(&addr).await?;
    info!(addr = %addr, origins = ?config.cors_origins, "HTTP server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
