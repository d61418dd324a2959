// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Walk-Tracker API Server
//!
//! Records walks from sensor samples posted by a device client and keeps
//! finished walks in a local data directory.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use walk_tracker::{
    config::Config, db::FileActivityStore, services::LogNotifier, time_utils::SystemClock,
    AppState,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        data_dir = %config.data_dir.display(),
        required = ?config.required_capabilities,
        "Starting Walk-Tracker API"
    );

    // Open the activity store
    let store = FileActivityStore::open(&config.data_dir).await?;

    // Build shared state
    let state = Arc::new(AppState::new(
        config.clone(),
        Arc::new(store),
        Arc::new(LogNotifier),
        Arc::new(SystemClock::new()),
    ));

    // Build router
    let app = walk_tracker::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("walk_tracker=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
