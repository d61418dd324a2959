// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod capability;
pub mod record;
pub mod sample;
pub mod session;

pub use capability::{Capability, CapabilityProvider, CapabilityReport};
pub use record::{ActivityRecord, RecordId};
pub use sample::{AccelerometerSample, GyroscopeSample, InertialBundle, LocationSample, StepEvent};
pub use session::{
    SampleCounts, SessionSnapshot, SessionState, SessionStatus, SnapshotSummary, Transition,
};
