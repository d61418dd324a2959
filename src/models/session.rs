// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Recording session state and the snapshot produced when a walk stops.

use crate::models::sample::{InertialBundle, LocationSample};
use crate::services::steps::{detect_steps, StepDetectorConfig};
use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// Lifecycle state of the recording session.
///
/// `Saved` and `Cancelled` are only ever reported as the outcome of a
/// transition; the session itself goes straight back to `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum SessionState {
    Idle,
    Recording,
    Stopped,
    Saved,
    Cancelled,
}

/// Result of asking the session to change state.
///
/// Transitions requested from a state that does not allow them are not
/// errors: duplicate or late requests are reported as `Ignored` with the
/// state the session was in.
#[derive(Debug, Clone, PartialEq)]
pub enum Transition<T> {
    Applied(T),
    Ignored(SessionState),
}

impl<T> Transition<T> {
    pub fn is_applied(&self) -> bool {
        matches!(self, Transition::Applied(_))
    }

    pub fn applied(self) -> Option<T> {
        match self {
            Transition::Applied(value) => Some(value),
            Transition::Ignored(_) => None,
        }
    }
}

/// Everything captured for one walk at the moment it stopped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub elapsed_time_ms: i64,
    pub hardware_step_count: u32,
    pub location_samples: Vec<LocationSample>,
    pub inertial: InertialBundle,
    pub start_time_ms: i64,
    pub distance_meters: f64,
}

impl SessionSnapshot {
    /// Step count derived from the raw accelerometer buffer.
    ///
    /// Independent of `hardware_step_count`; both are kept.
    pub fn calculated_steps(&self, config: &StepDetectorConfig) -> u32 {
        detect_steps(&self.inertial.accelerometer, config)
    }

    pub fn sample_counts(&self) -> SampleCounts {
        SampleCounts {
            locations: self.location_samples.len(),
            accelerometer: self.inertial.accelerometer.len(),
            gyroscope: self.inertial.gyroscope.len(),
            step_events: self.inertial.step_events.len(),
        }
    }

    /// Metrics of the walk without the raw samples.
    pub fn summary(&self, config: &StepDetectorConfig) -> SnapshotSummary {
        SnapshotSummary {
            start_time_ms: self.start_time_ms,
            elapsed_time_ms: self.elapsed_time_ms,
            hardware_step_count: self.hardware_step_count,
            calculated_steps: self.calculated_steps(config),
            distance_meters: self.distance_meters,
            samples: self.sample_counts(),
        }
    }
}

/// Derived metrics of a stopped walk.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SnapshotSummary {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub start_time_ms: i64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub elapsed_time_ms: i64,
    pub hardware_step_count: u32,
    pub calculated_steps: u32,
    pub distance_meters: f64,
    pub samples: SampleCounts,
}

/// Per-buffer sample counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SampleCounts {
    pub locations: usize,
    pub accelerometer: usize,
    pub gyroscope: usize,
    pub step_events: usize,
}

/// Point-in-time view of the session for progress display.
#[derive(Debug, Clone, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct SessionStatus {
    pub state: SessionState,
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub start_time_ms: Option<i64>,
    /// Live while recording, frozen once stopped
    #[cfg_attr(feature = "binding-generation", ts(type = "number | null"))]
    pub elapsed_time_ms: Option<i64>,
    /// Advisory counts; may lag behind in-flight samples
    pub samples: SampleCounts,
    /// The walk waiting for a name, while stopped
    pub pending: Option<SnapshotSummary>,
}
