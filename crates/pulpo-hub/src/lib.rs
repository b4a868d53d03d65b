pub mod config;
pub mod doctor;
pub mod export;
pub mod store;
pub mod views;
pub mod web;

use std::sync::Arc;

use tracing::{error, info, warn};

use config::Configuration;
use store::Store;
use web::AppState;

pub async fn run_hub() -> anyhow::Result<()> {
    let config = Configuration::create()?;

    info!(
        port = config.listen_port,
        host = %config.listen_host,
        public_url = %config.public_url,
        "starting hub"
    );

    let session_secret = config::session_secret::get_or_create_session_secret(&config.data_dir)?;

    let store = Arc::new(Store::new(&config.airtable));
    for (table, ready) in store.status() {
        if !ready {
            warn!(table, "table not configured; its routes will answer with an error");
        }
    }
    if config.app_password.is_none() {
        warn!("APP_PASSWORD is not set; every login attempt will be rejected");
    }

    let app_state = AppState {
        store,
        session_secret,
        app_password: config.app_password.clone(),
        secure_cookies: config.secure_cookies,
        cors_origins: config.cors_origins.clone(),
    };
    let app = web::build_router(app_state);

    let addr = format!("{}:{}", config.listen_host, config.listen_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "listening");
    info!(url = %config.public_url, "hub ready");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("hub stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "failed to install Ctrl+C handler");
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
                error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("shutdown signal received");
}
