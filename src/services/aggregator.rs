// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Concurrent collection of sensor streams into per-kind buffers.
//!
//! Each source gets its own unbounded queue and drain task. Drain tasks
//! append to their buffer in arrival order; snapshots and resets take the
//! same per-buffer lock, so a snapshot never sees a half-appended sample.
//!
//! Stopping unsubscribes every source and then waits for the drain tasks to
//! empty their queues, up to a grace period. A task still running after the
//! grace period is aborted and awaited, so nothing is appended once `stop()`
//! returns.

use crate::models::{
    AccelerometerSample, GyroscopeSample, InertialBundle, LocationSample, SampleCounts, StepEvent,
};
use crate::sources::{SampleSource, SensorSources, SourceError, Subscription};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Default time allowed for queued samples to drain on stop.
pub const DEFAULT_DRAIN_GRACE: Duration = Duration::from_millis(500);

/// Append-only buffer shared between one drain task and the session.
#[derive(Debug)]
pub struct SampleBuffer<T> {
    items: Mutex<Vec<T>>,
    len: AtomicUsize,
}

impl<T: Clone> SampleBuffer<T> {
    fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
            len: AtomicUsize::new(0),
        }
    }

    fn append(&self, item: T) {
        let mut items = self.lock();
        items.push(item);
        self.len.store(items.len(), Ordering::Relaxed);
    }

    fn snapshot(&self) -> Vec<T> {
        self.lock().clone()
    }

    fn clear(&self) {
        let mut items = self.lock();
        items.clear();
        self.len.store(0, Ordering::Relaxed);
    }

    /// Advisory length, read without taking the lock.
    pub fn live_len(&self) -> usize {
        self.len.load(Ordering::Relaxed)
    }

    fn lock(&self) -> MutexGuard<'_, Vec<T>> {
        self.items.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug)]
struct Buffers {
    locations: SampleBuffer<LocationSample>,
    accelerometer: SampleBuffer<AccelerometerSample>,
    gyroscope: SampleBuffer<GyroscopeSample>,
    step_events: SampleBuffer<StepEvent>,
}

impl Buffers {
    fn new() -> Self {
        Self {
            locations: SampleBuffer::new(),
            accelerometer: SampleBuffer::new(),
            gyroscope: SampleBuffer::new(),
            step_events: SampleBuffer::new(),
        }
    }
}

/// Immutable copy of every buffer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BufferSnapshot {
    pub locations: Vec<LocationSample>,
    pub inertial: InertialBundle,
}

/// A running drain task and the subscription feeding it.
struct Drain {
    source: String,
    subscription: Option<Subscription>,
    task: JoinHandle<usize>,
}

/// Drains that belong to one `start()`..`stop()` window.
struct ActiveDrains {
    drains: Vec<Drain>,
    stopping: Arc<AtomicBool>,
}

/// Errors from aggregator control operations.
#[derive(Debug, thiserror::Error)]
pub enum AggregatorError {
    #[error("Buffers cannot be reset while sources are draining")]
    Draining,
}

/// Collects samples from all sensor sources for one recording.
pub struct StreamAggregator {
    buffers: Arc<Buffers>,
    active: tokio::sync::Mutex<Option<ActiveDrains>>,
    draining: AtomicBool,
    grace: Duration,
}

impl StreamAggregator {
    pub fn new(grace: Duration) -> Self {
        Self {
            buffers: Arc::new(Buffers::new()),
            active: tokio::sync::Mutex::new(None),
            draining: AtomicBool::new(false),
            grace,
        }
    }

    /// Subscribe to every source and start draining.
    ///
    /// Returns `false` without doing anything if already draining. A source
    /// that cannot be subscribed is logged and left out; its buffer stays
    /// empty.
    pub async fn start(&self, sources: &SensorSources) -> bool {
        let mut active = self.active.lock().await;
        if active.is_some() {
            tracing::debug!("Aggregator already draining, start ignored");
            return false;
        }

        let stopping = Arc::new(AtomicBool::new(false));
        let buffers = &self.buffers;
        let drains: Vec<Drain> = [
            spawn_drain(sources.location.as_ref(), buffers, &stopping, |b| &b.locations),
            spawn_drain(sources.accelerometer.as_ref(), buffers, &stopping, |b| {
                &b.accelerometer
            }),
            spawn_drain(sources.gyroscope.as_ref(), buffers, &stopping, |b| &b.gyroscope),
            spawn_drain(sources.step_detector.as_ref(), buffers, &stopping, |b| {
                &b.step_events
            }),
        ]
        .into_iter()
        .flatten()
        .collect();

        tracing::info!(sources = drains.len(), "Sensor collection started");
        *active = Some(ActiveDrains { drains, stopping });
        self.draining.store(true, Ordering::SeqCst);
        true
    }

    /// Detach every source and freeze the buffers.
    ///
    /// Returns `false` if the aggregator was not draining.
    pub async fn stop(&self) -> bool {
        let mut active = self.active.lock().await;
        let Some(ActiveDrains {
            mut drains,
            stopping,
        }) = active.take()
        else {
            return false;
        };

        stopping.store(true, Ordering::SeqCst);
        for drain in &mut drains {
            if let Some(subscription) = drain.subscription.take() {
                subscription.unsubscribe();
            }
        }

        let deadline = tokio::time::Instant::now() + self.grace;
        for mut drain in drains {
            match tokio::time::timeout_at(deadline, &mut drain.task).await {
                Ok(Ok(received)) => {
                    tracing::debug!(source = %drain.source, received, "Drain finished");
                }
                Ok(Err(e)) => {
                    tracing::error!(source = %drain.source, error = %e, "Drain task failed");
                }
                Err(_) => {
                    tracing::warn!(
                        source = %drain.source,
                        grace_ms = self.grace.as_millis() as u64,
                        "Source still delivering after grace period, aborting drain"
                    );
                    drain.task.abort();
                    // Wait for the abort so no append can land after stop returns
                    let _ = drain.task.await;
                }
            }
        }

        self.draining.store(false, Ordering::SeqCst);
        tracing::info!(counts = ?self.live_counts(), "Sensor collection stopped");
        true
    }

    pub fn is_draining(&self) -> bool {
        self.draining.load(Ordering::SeqCst)
    }

    /// Copy every buffer.
    pub fn snapshot(&self) -> BufferSnapshot {
        BufferSnapshot {
            locations: self.buffers.locations.snapshot(),
            inertial: InertialBundle {
                accelerometer: self.buffers.accelerometer.snapshot(),
                gyroscope: self.buffers.gyroscope.snapshot(),
                step_events: self.buffers.step_events.snapshot(),
            },
        }
    }

    /// Empty every buffer. Only allowed while not draining.
    pub async fn reset(&self) -> Result<(), AggregatorError> {
        let active = self.active.lock().await;
        if active.is_some() {
            return Err(AggregatorError::Draining);
        }

        self.buffers.locations.clear();
        self.buffers.accelerometer.clear();
        self.buffers.gyroscope.clear();
        self.buffers.step_events.clear();
        Ok(())
    }

    /// Relaxed per-buffer counts for progress display.
    pub fn live_counts(&self) -> SampleCounts {
        SampleCounts {
            locations: self.buffers.locations.live_len(),
            accelerometer: self.buffers.accelerometer.live_len(),
            gyroscope: self.buffers.gyroscope.live_len(),
            step_events: self.buffers.step_events.live_len(),
        }
    }
}

impl Default for StreamAggregator {
    fn default() -> Self {
        Self::new(DEFAULT_DRAIN_GRACE)
    }
}

/// Subscribe to one source and spawn the task draining its queue into the
/// buffer picked by `select`.
fn spawn_drain<T>(
    source: &dyn SampleSource<T>,
    buffers: &Arc<Buffers>,
    stopping: &Arc<AtomicBool>,
    select: fn(&Buffers) -> &SampleBuffer<T>,
) -> Option<Drain>
where
    T: Clone + Send + 'static,
{
    let name = source.name().to_string();
    let (sink, mut queue) = tokio::sync::mpsc::unbounded_channel();

    let subscription = match source.subscribe(sink) {
        Ok(subscription) => subscription,
        Err(SourceError::Unavailable(reason)) => {
            tracing::warn!(source = %name, reason = %reason, "Sensor unavailable, recording without it");
            return None;
        }
        Err(e) => {
            tracing::error!(source = %name, error = %e, "Failed to subscribe to sensor");
            return None;
        }
    };

    let buffers = buffers.clone();
    let stopping = stopping.clone();
    let source_name = name.clone();
    let task = tokio::spawn(async move {
        let mut received = 0usize;
        while let Some(sample) = queue.recv().await {
            select(&buffers).append(sample);
            received += 1;
        }
        if !stopping.load(Ordering::SeqCst) {
            tracing::warn!(source = %source_name, received, "Sensor queue closed while recording");
        }
        received
    });

    Some(Drain {
        source: name,
        subscription: Some(subscription),
        task,
    })
}
