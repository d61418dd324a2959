// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Step counting from raw accelerometer data.
//!
//! Works on the magnitude of the acceleration vector so the result does not
//! depend on phone orientation:
//! 1. Exponential low-pass filter over the magnitudes
//! 2. Adaptive threshold: mean + k * standard deviation of the filtered signal
//! 3. Peaks that dominate two samples on each side and clear the threshold
//! 4. Debounce: the signal must sit above the threshold for a few samples
//!    before the peak, and peaks closer than the minimum step interval are
//!    dropped

use crate::models::AccelerometerSample;

/// Number of neighbours on each side a peak must strictly exceed.
const PEAK_HALF_WINDOW: usize = 2;

/// Tuning for [`detect_steps`].
///
/// The defaults were tuned by hand against recorded walks; they are not
/// derived from first principles.
#[derive(Debug, Clone, PartialEq)]
pub struct StepDetectorConfig {
    /// Low-pass smoothing factor in (0, 1]; lower = more smoothing.
    pub smoothing_alpha: f64,
    /// Threshold multiplier on the standard deviation.
    pub threshold_k: f64,
    /// Consecutive above-threshold samples required right before a peak.
    pub min_above_threshold: u32,
    /// Minimum time between two accepted steps (caps cadence).
    pub min_step_interval_ms: i64,
}

impl Default for StepDetectorConfig {
    fn default() -> Self {
        Self {
            smoothing_alpha: 0.3,
            threshold_k: 0.9,
            min_above_threshold: 2,
            min_step_interval_ms: 300,
        }
    }
}

/// Count steps in an accelerometer series.
///
/// Samples are taken in the order given; they are not re-sorted by
/// timestamp. Pure and deterministic.
pub fn detect_steps(samples: &[AccelerometerSample], config: &StepDetectorConfig) -> u32 {
    if samples.is_empty() {
        return 0;
    }

    let filtered = low_pass(samples, config.smoothing_alpha);
    let threshold = adaptive_threshold(&filtered, config.threshold_k);

    let mut steps = 0;
    let mut above_run: u32 = 0;
    // The series start counts as the previous step
    let mut last_step_ms = samples[0].timestamp_ms;

    for (i, &value) in filtered.iter().enumerate() {
        if value > threshold && is_peak(&filtered, i) && above_run >= config.min_above_threshold {
            let timestamp = samples[i].timestamp_ms;
            if timestamp - last_step_ms >= config.min_step_interval_ms {
                steps += 1;
                above_run = 0;
                last_step_ms = timestamp;
                continue;
            }
        }

        if value > threshold {
            above_run += 1;
        } else {
            above_run = 0;
        }
    }

    steps
}

/// Exponential low-pass filter seeded with the first magnitude.
fn low_pass(samples: &[AccelerometerSample], alpha: f64) -> Vec<f64> {
    let mut filtered = Vec::with_capacity(samples.len());
    let mut previous = samples[0].magnitude();
    filtered.push(previous);

    for sample in &samples[1..] {
        // Same as alpha * m + (1 - alpha) * prev, but exact on a flat signal
        previous += alpha * (sample.magnitude() - previous);
        filtered.push(previous);
    }

    filtered
}

/// Mean plus `k` sample standard deviations.
fn adaptive_threshold(values: &[f64], k: f64) -> f64 {
    let n = values.len();
    let mean = values.iter().sum::<f64>() / n as f64;
    if n < 2 {
        return mean;
    }

    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    mean + k * variance.sqrt()
}

/// Strict local maximum over a symmetric window.
fn is_peak(values: &[f64], i: usize) -> bool {
    if i < PEAK_HALF_WINDOW || i + PEAK_HALF_WINDOW >= values.len() {
        return false;
    }

    let center = values[i];
    (1..=PEAK_HALF_WINDOW).all(|d| center > values[i - d] && center > values[i + d])
}
