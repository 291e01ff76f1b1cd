// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::process::ExitCode;

use chrono::Duration;
use tokio::{net::TcpListener, signal};
use tracing::{error, info};

use devconnector_server::{
    api::router,
    auth::TokenService,
    config::AppConfig,
    providers::GithubClient,
    state::AppState,
    storage::Database,
    telemetry::{init_tracing, LogFormat},
};

#[tokio::main]
async fn main() -> ExitCode {
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing(LogFormat::Pretty);
            error!("Configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };
    init_tracing(config.log_format);

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Server failed: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let ttl = Duration::try_seconds(config.token_ttl_secs).ok_or("TOKEN_TTL_SECS is out of range")?;
    let tokens = TokenService::new(&config.jwt_secret, ttl)?;
    let db = Database::open(&config.database_path)?;
    let github = GithubClient::new(&config.github_api_url, config.github_token.clone())?;
    info!(path = %config.database_path.display(), "Database opened");

    let app = router(AppState::new(db, tokens, github));

    let addr = config.bind_addr()?;
    let listener = TcpListener::bind(addr).await?;
    info!("DevConnector server listening on http://{addr} (docs at /docs)");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {e}");
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
}
