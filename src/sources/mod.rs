// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sensor sample sources.
//!
//! A source pushes samples into an unbounded channel handed to it by the
//! aggregator. Producers never block: a full queue cannot happen, and a
//! source that goes away simply drops its sender, which closes the queue.

pub mod push;
pub mod replay;

pub use push::{PushSource, PushSources};
pub use replay::ReplaySource;

use crate::models::{AccelerometerSample, GyroscopeSample, LocationSample, StepEvent};
use std::fmt;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;

/// Receiving end handed to a source on subscription.
pub type SampleSink<T> = UnboundedSender<T>;

/// A producer of timestamped samples of one kind.
pub trait SampleSource<T>: Send + Sync {
    /// Short name used in logs ("location", "accelerometer", ...).
    fn name(&self) -> &str;

    /// Start delivering samples into `sink` until the returned
    /// subscription is dropped or unsubscribed.
    fn subscribe(&self, sink: SampleSink<T>) -> Result<Subscription, SourceError>;
}

/// Handle that detaches a source from its sink.
///
/// Dropping the handle unsubscribes as well.
#[must_use = "dropping a subscription immediately detaches the source"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Detach now.
    pub fn unsubscribe(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Errors from subscribing to a source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Sensor not available on this device: {0}")]
    Unavailable(String),

    #[error("Source already has a subscriber: {0}")]
    AlreadySubscribed(String),
}

/// Source for a sensor the device does not have.
#[derive(Debug, Clone)]
pub struct UnavailableSource {
    name: String,
}

impl UnavailableSource {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl<T> SampleSource<T> for UnavailableSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn subscribe(&self, _sink: SampleSink<T>) -> Result<Subscription, SourceError> {
        Err(SourceError::Unavailable(self.name.clone()))
    }
}

/// One source per sample kind recorded during a walk.
#[derive(Clone)]
pub struct SensorSources {
    pub location: Arc<dyn SampleSource<LocationSample>>,
    pub accelerometer: Arc<dyn SampleSource<AccelerometerSample>>,
    pub gyroscope: Arc<dyn SampleSource<GyroscopeSample>>,
    pub step_detector: Arc<dyn SampleSource<StepEvent>>,
}
