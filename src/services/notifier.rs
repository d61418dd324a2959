// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Foreground "recording in progress" indication.

/// Told when a recording starts and stops. Fire-and-forget.
pub trait ForegroundNotifier: Send + Sync {
    fn on_recording_started(&self);
    fn on_recording_stopped(&self);
}

/// Notifier that only emits log events.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

impl ForegroundNotifier for LogNotifier {
    fn on_recording_started(&self) {
        tracing::info!(indicator = "foreground", "Recording in progress");
    }

    fn on_recording_stopped(&self) {
        tracing::info!(indicator = "foreground", "Recording stopped");
    }
}
