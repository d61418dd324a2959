// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! The recording session state machine.
//!
//! ```text
//! Idle --start--> Recording --stop--> Stopped --save--> (Saved) --> Idle
//!                                             --cancel--> (Cancelled) --> Idle
//! ```
//!
//! Transitions requested from any other state are ignored rather than
//! rejected, so duplicate or late requests from a client are harmless.
//! All transitions are serialized by one async mutex.

use crate::db::{ActivityStore, StoreError};
use crate::models::{
    Capability, CapabilityProvider, RecordId, SampleCounts, SessionSnapshot, SessionState,
    SessionStatus, SnapshotSummary, Transition,
};
use crate::services::aggregator::{AggregatorError, StreamAggregator, DEFAULT_DRAIN_GRACE};
use crate::services::distance::total_distance;
use crate::services::notifier::ForegroundNotifier;
use crate::services::steps::StepDetectorConfig;
use crate::sources::SensorSources;
use crate::time_utils::Clock;
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Duration;

/// Session tuning.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Capabilities that must be granted before recording starts
    pub required_capabilities: BTreeSet<Capability>,
    /// Time allowed for queued samples to drain on stop
    pub drain_grace: Duration,
    /// Detector used for the calculated step count in summaries
    pub step_detector: StepDetectorConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            required_capabilities: Capability::ALL.into_iter().collect(),
            drain_grace: DEFAULT_DRAIN_GRACE,
            step_detector: StepDetectorConfig::default(),
        }
    }
}

/// Errors surfaced by session transitions.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Missing required capabilities: {0:?}")]
    CapabilityRequired(Vec<Capability>),

    #[error("Required capabilities were denied: {0:?}")]
    CapabilityDenied(Vec<Capability>),

    #[error("Walk name must not be blank")]
    InvalidName,

    #[error("Failed to save walk: {0}")]
    PersistFailed(#[source] StoreError),

    #[error(transparent)]
    Aggregator(#[from] AggregatorError),
}

enum Phase {
    Idle,
    Recording { start_time_ms: i64 },
    Stopped {
        snapshot: SessionSnapshot,
        summary: SnapshotSummary,
    },
}

impl Phase {
    fn state(&self) -> SessionState {
        match self {
            Phase::Idle => SessionState::Idle,
            Phase::Recording { .. } => SessionState::Recording,
            Phase::Stopped { .. } => SessionState::Stopped,
        }
    }
}

/// Records one walk at a time.
pub struct RecordingSession {
    config: SessionConfig,
    sources: SensorSources,
    aggregator: StreamAggregator,
    store: Arc<dyn ActivityStore>,
    notifier: Arc<dyn ForegroundNotifier>,
    clock: Arc<dyn Clock>,
    phase: tokio::sync::Mutex<Phase>,
}

impl RecordingSession {
    pub fn new(
        config: SessionConfig,
        sources: SensorSources,
        store: Arc<dyn ActivityStore>,
        notifier: Arc<dyn ForegroundNotifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let aggregator = StreamAggregator::new(config.drain_grace);
        Self {
            config,
            sources,
            aggregator,
            store,
            notifier,
            clock,
            phase: tokio::sync::Mutex::new(Phase::Idle),
        }
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Start recording. Returns the start time on success.
    ///
    /// Refused with a capability error, without any state change, if a
    /// required capability is missing or denied.
    pub async fn start(
        &self,
        capabilities: &dyn CapabilityProvider,
    ) -> Result<Transition<i64>, SessionError> {
        let mut phase = self.phase.lock().await;
        if !matches!(*phase, Phase::Idle) {
            tracing::debug!(state = ?phase.state(), "Start ignored");
            return Ok(Transition::Ignored(phase.state()));
        }

        let report = capabilities.check_capabilities();
        let required = &self.config.required_capabilities;

        let denied = report.denied_of(required);
        if !denied.is_empty() {
            tracing::warn!(?denied, "Recording refused: capabilities denied");
            return Err(SessionError::CapabilityDenied(denied));
        }

        let missing = report.missing_of(required);
        if !missing.is_empty() {
            tracing::info!(?missing, "Recording needs capabilities");
            return Err(SessionError::CapabilityRequired(missing));
        }

        self.aggregator.reset().await?;
        let start_time_ms = self.clock.now_ms();
        self.aggregator.start(&self.sources).await;
        self.notifier.on_recording_started();

        *phase = Phase::Recording { start_time_ms };
        tracing::info!(start_time_ms, "Recording started");
        Ok(Transition::Applied(start_time_ms))
    }

    /// Stop recording and build the snapshot.
    pub async fn stop(&self) -> Transition<SnapshotSummary> {
        let mut phase = self.phase.lock().await;
        let Phase::Recording { start_time_ms } = *phase else {
            tracing::debug!(state = ?phase.state(), "Stop ignored");
            return Transition::Ignored(phase.state());
        };

        let stop_time_ms = self.clock.now_ms();
        self.aggregator.stop().await;
        let buffers = self.aggregator.snapshot();

        let snapshot = SessionSnapshot {
            elapsed_time_ms: (stop_time_ms - start_time_ms).max(0),
            hardware_step_count: u32::try_from(buffers.inertial.step_events.len())
                .unwrap_or(u32::MAX),
            distance_meters: total_distance(&buffers.locations),
            location_samples: buffers.locations,
            inertial: buffers.inertial,
            start_time_ms,
        };
        self.notifier.on_recording_stopped();

        let summary = snapshot.summary(&self.config.step_detector);
        tracing::info!(
            elapsed_time_ms = summary.elapsed_time_ms,
            hardware_steps = summary.hardware_step_count,
            calculated_steps = summary.calculated_steps,
            distance_meters = summary.distance_meters,
            "Recording stopped"
        );

        *phase = Phase::Stopped {
            snapshot,
            summary: summary.clone(),
        };
        Transition::Applied(summary)
    }

    /// Persist the stopped walk under `name`.
    ///
    /// On a store failure the snapshot is kept so the caller can retry or
    /// cancel.
    pub async fn save(&self, name: &str) -> Result<Transition<RecordId>, SessionError> {
        let mut phase = self.phase.lock().await;
        let Phase::Stopped { snapshot, .. } = &*phase else {
            tracing::debug!(state = ?phase.state(), "Save ignored");
            return Ok(Transition::Ignored(phase.state()));
        };

        let name = name.trim();
        if name.is_empty() {
            return Err(SessionError::InvalidName);
        }

        let saved = self.store.save(name, snapshot).await;
        match saved {
            Ok(record_id) => {
                *phase = Phase::Idle;
                self.aggregator.reset().await?;
                tracing::info!(record_id, "Walk saved, session idle");
                Ok(Transition::Applied(record_id))
            }
            Err(StoreError::InvalidName) => Err(SessionError::InvalidName),
            Err(e) => {
                tracing::error!(error = %e, "Failed to save walk, keeping snapshot");
                Err(SessionError::PersistFailed(e))
            }
        }
    }

    /// Discard the stopped walk.
    pub async fn cancel(&self) -> Result<Transition<()>, SessionError> {
        let mut phase = self.phase.lock().await;
        if !matches!(*phase, Phase::Stopped { .. }) {
            tracing::debug!(state = ?phase.state(), "Cancel ignored");
            return Ok(Transition::Ignored(phase.state()));
        }

        *phase = Phase::Idle;
        self.aggregator.reset().await?;
        tracing::info!("Walk discarded");
        Ok(Transition::Applied(()))
    }

    pub async fn state(&self) -> SessionState {
        self.phase.lock().await.state()
    }

    /// Copy of the walk waiting to be saved, if any.
    pub async fn pending_snapshot(&self) -> Option<SessionSnapshot> {
        match &*self.phase.lock().await {
            Phase::Stopped { snapshot, .. } => Some(snapshot.clone()),
            _ => None,
        }
    }

    pub async fn status(&self) -> SessionStatus {
        let phase = self.phase.lock().await;
        match &*phase {
            Phase::Idle => SessionStatus {
                state: SessionState::Idle,
                start_time_ms: None,
                elapsed_time_ms: None,
                samples: SampleCounts::default(),
                pending: None,
            },
            Phase::Recording { start_time_ms } => SessionStatus {
                state: SessionState::Recording,
                start_time_ms: Some(*start_time_ms),
                elapsed_time_ms: Some((self.clock.now_ms() - start_time_ms).max(0)),
                samples: self.aggregator.live_counts(),
                pending: None,
            },
            Phase::Stopped { snapshot, summary } => SessionStatus {
                state: SessionState::Stopped,
                start_time_ms: Some(snapshot.start_time_ms),
                elapsed_time_ms: Some(snapshot.elapsed_time_ms),
                samples: snapshot.sample_counts(),
                pending: Some(summary.clone()),
            },
        }
    }
}
