// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod activity;
pub mod aggregator;
pub mod distance;
pub mod notifier;
pub mod session;
pub mod steps;

pub use activity::{activity_details, encode_route, ActivityDetails, DetailsError};
pub use aggregator::{AggregatorError, BufferSnapshot, StreamAggregator, DEFAULT_DRAIN_GRACE};
pub use distance::total_distance;
pub use notifier::{ForegroundNotifier, LogNotifier};
pub use session::{RecordingSession, SessionConfig, SessionError};
pub use steps::{detect_steps, StepDetectorConfig};
