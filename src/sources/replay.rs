// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Replays a recorded list of samples, for simulations and tests.

use crate::sources::{SampleSink, SampleSource, SourceError, Subscription};
use std::time::Duration;

/// Emits a fixed sequence of samples from a background task.
///
/// The queue closes once the last sample has been sent.
#[derive(Debug, Clone)]
pub struct ReplaySource<T> {
    name: String,
    samples: Vec<T>,
    pace: Option<Duration>,
}

impl<T: Clone + Send + Sync + 'static> ReplaySource<T> {
    pub fn new(name: impl Into<String>, samples: Vec<T>) -> Self {
        Self {
            name: name.into(),
            samples,
            pace: None,
        }
    }

    /// Wait `pace` between consecutive samples.
    pub fn with_pace(mut self, pace: Duration) -> Self {
        self.pace = Some(pace);
        self
    }
}

impl<T: Clone + Send + Sync + 'static> SampleSource<T> for ReplaySource<T> {
    fn name(&self) -> &str {
        &self.name
    }

    fn subscribe(&self, sink: SampleSink<T>) -> Result<Subscription, SourceError> {
        let samples = self.samples.clone();
        let pace = self.pace;

        let task = tokio::spawn(async move {
            for sample in samples {
                if sink.send(sample).is_err() {
                    break;
                }
                match pace {
                    Some(pace) => tokio::time::sleep(pace).await,
                    None => tokio::task::yield_now().await,
                }
            }
        });

        Ok(Subscription::new(move || task.abort()))
    }
}
