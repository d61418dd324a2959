// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sources fed by an external producer, e.g. samples uploaded over HTTP.

use crate::models::{AccelerometerSample, GyroscopeSample, LocationSample, StepEvent};
use crate::sources::{SampleSink, SampleSource, SensorSources, SourceError, Subscription};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Current subscriber, tagged with the subscription generation so a stale
/// unsubscribe never detaches a newer subscriber.
struct Slot<T> {
    generation: u64,
    sink: Option<SampleSink<T>>,
}

/// A source that forwards whatever is pushed into it.
///
/// Samples pushed while nobody is subscribed are dropped.
pub struct PushSource<T> {
    name: String,
    slot: Arc<Mutex<Slot<T>>>,
}

impl<T: Send + 'static> PushSource<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slot: Arc::new(Mutex::new(Slot {
                generation: 0,
                sink: None,
            })),
        }
    }

    /// Forward one sample. Returns `false` if it was dropped.
    pub fn push(&self, sample: T) -> bool {
        match lock(&self.slot).sink.as_ref() {
            Some(sink) => sink.send(sample).is_ok(),
            None => false,
        }
    }

    /// Forward a batch in order. Returns how many samples were accepted.
    pub fn push_batch(&self, samples: impl IntoIterator<Item = T>) -> usize {
        let slot = lock(&self.slot);
        let Some(sink) = slot.sink.as_ref() else {
            return 0;
        };

        let mut accepted = 0;
        for sample in samples {
            if sink.send(sample).is_err() {
                break;
            }
            accepted += 1;
        }
        accepted
    }

    pub fn is_subscribed(&self) -> bool {
        lock(&self.slot)
            .sink
            .as_ref()
            .is_some_and(|sink| !sink.is_closed())
    }
}

impl<T: Send + 'static> SampleSource<T> for PushSource<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn subscribe(&self, sink: SampleSink<T>) -> Result<Subscription, SourceError> {
        let mut slot = lock(&self.slot);
        if slot.sink.as_ref().is_some_and(|s| !s.is_closed()) {
            return Err(SourceError::AlreadySubscribed(self.name.clone()));
        }

        slot.generation += 1;
        slot.sink = Some(sink);
        let generation = slot.generation;

        let shared = self.slot.clone();
        Ok(Subscription::new(move || {
            let mut slot = lock(&shared);
            if slot.generation == generation {
                slot.sink = None;
            }
        }))
    }
}

fn lock<T>(slot: &Mutex<Slot<T>>) -> MutexGuard<'_, Slot<T>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Push sources for every sample kind.
#[derive(Clone)]
pub struct PushSources {
    pub location: Arc<PushSource<LocationSample>>,
    pub accelerometer: Arc<PushSource<AccelerometerSample>>,
    pub gyroscope: Arc<PushSource<GyroscopeSample>>,
    pub step_detector: Arc<PushSource<StepEvent>>,
}

impl PushSources {
    pub fn new() -> Self {
        Self {
            location: Arc::new(PushSource::new("location")),
            accelerometer: Arc::new(PushSource::new("accelerometer")),
            gyroscope: Arc::new(PushSource::new("gyroscope")),
            step_detector: Arc::new(PushSource::new("step_detector")),
        }
    }

    /// The same sources viewed as generic sample sources.
    pub fn sensor_sources(&self) -> SensorSources {
        SensorSources {
            location: self.location.clone(),
            accelerometer: self.accelerometer.clone(),
            gyroscope: self.gyroscope.clone(),
            step_detector: self.step_detector.clone(),
        }
    }
}

impl Default for PushSources {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::unbounded_channel;

    #[test]
    fn test_push_without_subscriber_drops() {
        let source = PushSource::new("steps");
        assert!(!source.push(StepEvent { timestamp_ms: 1 }));
        assert_eq!(source.push_batch([StepEvent { timestamp_ms: 2 }]), 0);
    }

    #[test]
    fn test_push_reaches_subscriber_in_order() {
        let source = PushSource::new("steps");
        let (tx, mut rx) = unbounded_channel();
        let _subscription = source.subscribe(tx).unwrap();

        assert!(source.push(StepEvent { timestamp_ms: 1 }));
        assert_eq!(
            source.push_batch([StepEvent { timestamp_ms: 2 }, StepEvent { timestamp_ms: 3 }]),
            2
        );

        let received: Vec<i64> = std::iter::from_fn(|| rx.try_recv().ok())
            .map(|e| e.timestamp_ms)
            .collect();
        assert_eq!(received, vec![1, 2, 3]);
    }

    #[test]
    fn test_second_subscriber_rejected() {
        let source = PushSource::<StepEvent>::new("steps");
        let (tx1, _rx1) = unbounded_channel();
        let (tx2, _rx2) = unbounded_channel();

        let _first = source.subscribe(tx1).unwrap();
        assert!(matches!(
            source.subscribe(tx2),
            Err(SourceError::AlreadySubscribed(_))
        ));
    }

    #[test]
    fn test_unsubscribe_closes_queue() {
        let source = PushSource::new("steps");
        let (tx, mut rx) = unbounded_channel();
        let subscription = source.subscribe(tx).unwrap();

        source.push(StepEvent { timestamp_ms: 1 });
        subscription.unsubscribe();

        assert!(!source.is_subscribed());
        assert!(!source.push(StepEvent { timestamp_ms: 2 }));
        // Queued sample still drains, then the queue reports closed
        assert_eq!(rx.try_recv().unwrap().timestamp_ms, 1);
        assert!(matches!(
            rx.try_recv(),
            Err(tokio::sync::mpsc::error::TryRecvError::Disconnected)
        ));
    }

    #[test]
    fn test_stale_unsubscribe_keeps_new_subscriber() {
        let source = PushSource::<StepEvent>::new("steps");
        let (tx1, rx1) = unbounded_channel();
        let first = source.subscribe(tx1).unwrap();

        // Receiver gone: the old sink is closed, so resubscribing is allowed
        drop(rx1);
        let (tx2, _rx2) = unbounded_channel();
        let _second = source.subscribe(tx2).unwrap();

        first.unsubscribe();
        assert!(source.is_subscribed());
    }
}
