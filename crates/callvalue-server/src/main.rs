mod api;
mod middleware;

use std::sync::Arc;

use callvalue_callrail::CallRailClient;
use callvalue_core::{load_catalog, ValuationConfig};
use callvalue_sink::SheetsClient;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, AppState},
    middleware::AuthState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = callvalue_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let catalog = load_catalog(&config.catalog_path)?;
    tracing::info!(
        path = %config.catalog_path.display(),
        products = catalog.products.len(),
        "product catalog loaded"
    );

    let callrail = CallRailClient::from_app_config(&config)?;
    let sheets = config
        .sheets
        .as_ref()
        .map(|s| SheetsClient::from_config(Some(s), config.request_timeout_secs, &config.user_agent))
        .transpose()?;
    if sheets.is_none() {
        tracing::warn!("no spreadsheet destination configured; format=sheet will be rejected");
    }

    let state = AppState {
        valuation: Arc::new(ValuationConfig::from_app_config(&config, catalog)),
        callrail: Arc::new(callrail),
        sheets: sheets.map(Arc::new),
    };

    let auth = AuthState::from_env(matches!(config.env, callvalue_core::Environment::Development))?;
    let app = build_app(state, auth);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, env = %config.env, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
