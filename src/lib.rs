// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Walk-Tracker: record walks from device sensor streams
//!
//! This crate collects location, accelerometer, gyroscope and hardware step
//! samples into a recording session, derives steps and distance when the
//! walk stops, and persists finished walks for later review.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
pub mod sources;
pub mod time_utils;

use config::Config;
use db::ActivityStore;
use services::{ForegroundNotifier, RecordingSession, SessionConfig};
use sources::PushSources;
use std::sync::Arc;
use time_utils::Clock;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: Arc<dyn ActivityStore>,
    pub session: RecordingSession,
    /// Ingestion handles the HTTP sample endpoints push into
    pub sources: PushSources,
}

impl AppState {
    /// Wire a session to push sources fed by the HTTP API.
    pub fn new(
        config: Config,
        store: Arc<dyn ActivityStore>,
        notifier: Arc<dyn ForegroundNotifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let sources = PushSources::new();
        let session = RecordingSession::new(
            SessionConfig {
                required_capabilities: config.required_capabilities.clone(),
                drain_grace: config.drain_grace,
                step_detector: config.step_detector.clone(),
            },
            sources.sensor_sources(),
            store.clone(),
            notifier,
            clock,
        );

        Self {
            config,
            store,
            session,
            sources,
        }
    }
}
