// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Shiftline

use std::{env, net::SocketAddr, sync::Arc, time::Duration};

use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use shiftline_auth_server::api::router;
use shiftline_auth_server::config::Config;
use shiftline_auth_server::models::PhoneNumber;
use shiftline_auth_server::sms::{HttpSmsDelivery, LogSmsDelivery, SmsDelivery};
use shiftline_auth_server::state::AppState;
use shiftline_auth_server::sweep::ChallengeSweeper;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    // Pick the delivery backend: HTTP gateway when configured, log-only
    // otherwise (development).
    let sms: Arc<dyn SmsDelivery> = match config.sms_gateway_url.clone() {
        Some(url) => {
            info!(gateway = %url, "Using HTTP SMS gateway");
            Arc::new(HttpSmsDelivery::new(url, config.sms_gateway_token.clone()))
        }
        None => {
            warn!("No SMS gateway configured, verification codes will be logged");
            Arc::new(LogSmsDelivery)
        }
    };

    let state = AppState::new(config, sms);

    if let Ok(raw) = env::var("SEED_ACCOUNT_PHONE") {
        match PhoneNumber::normalize(&raw) {
            Some(phone) => {
                let account = state.accounts.insert_account(phone).await;
                info!(account_id = %account.id, "Seeded account");
            }
            None => warn!("SEED_ACCOUNT_PHONE is not a valid phone number, skipping seed"),
        }
    }

    // Background sweep of expired challenges.
    let shutdown = CancellationToken::new();
    let sweeper = ChallengeSweeper::new(
        Arc::clone(&state.challenges),
        state.config.sweep_interval,
    );
    let sweeper_handle = tokio::spawn(sweeper.run(shutdown.clone()));

    let app = router(state);

    // Parse bind address
    let host = env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = env::var("PORT")
        .unwrap_or_else(|_| "8080".to_string())
        .parse()
        .unwrap_or(8080);

    let addr: SocketAddr = format!("{host}:{port}")
        .parse()
        .expect("Failed to parse bind address");

    info!(%addr, "Shiftline auth server listening (docs at /docs)");

    let server_handle = axum_server::Handle::new();
    tokio::spawn(wait_for_shutdown(
        server_handle.clone(),
        shutdown.clone(),
    ));

    axum_server::bind(addr)
        .handle(server_handle)
        .serve(app.into_make_service())
        .await
        .expect("HTTP server failed");

    let _ = sweeper_handle.await;
    info!("Shutdown complete");
}

/// Cancel background tasks and drain the server on SIGINT.
async fn wait_for_shutdown(handle: axum_server::Handle<SocketAddr>, shutdown: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_err() {
        warn!("Failed to listen for shutdown signal");
        return;
    }
    info!("Shutdown signal received");
    shutdown.cancel();
    handle.graceful_shutdown(Some(Duration::from_secs(10)));
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,tower_http=debug"));

    let format = env::var("LOG_FORMAT").unwrap_or_else(|_| "pretty".to_string());
    if format == "json" {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
