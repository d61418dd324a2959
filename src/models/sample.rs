// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Raw sensor samples as delivered by the device.
//!
//! Every sample carries the millisecond timestamp at which the producer saw
//! it. Samples are never mutated after they are produced.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A single GPS fix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct LocationSample {
    /// Milliseconds since the Unix epoch
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub timestamp_ms: i64,
    pub latitude: f64,
    pub longitude: f64,
    /// Altitude in meters, if the fix had one
    #[serde(default)]
    pub altitude: Option<f64>,
    /// Horizontal accuracy in meters, if reported
    #[serde(default)]
    pub accuracy: Option<f32>,
}

impl LocationSample {
    pub fn new(timestamp_ms: i64, latitude: f64, longitude: f64) -> Self {
        Self {
            timestamp_ms,
            latitude,
            longitude,
            altitude: None,
            accuracy: None,
        }
    }

    /// Position as a `geo` point (x = longitude, y = latitude).
    pub fn point(&self) -> geo::Point<f64> {
        geo::Point::new(self.longitude, self.latitude)
    }
}

/// Triaxial accelerometer reading in m/s².
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct AccelerometerSample {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub timestamp_ms: i64,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl AccelerometerSample {
    pub fn new(timestamp_ms: i64, x: f32, y: f32, z: f32) -> Self {
        Self {
            timestamp_ms,
            x,
            y,
            z,
        }
    }

    /// Euclidean norm of the reading, computed in double precision.
    pub fn magnitude(&self) -> f64 {
        let (x, y, z) = (f64::from(self.x), f64::from(self.y), f64::from(self.z));
        (x * x + y * y + z * z).sqrt()
    }
}

/// Triaxial gyroscope reading in rad/s.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct GyroscopeSample {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub timestamp_ms: i64,
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

/// One step reported by the hardware step detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct StepEvent {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub timestamp_ms: i64,
}

/// All inertial data of one walk, in arrival order per sensor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InertialBundle {
    #[serde(default)]
    pub accelerometer: Vec<AccelerometerSample>,
    #[serde(default)]
    pub gyroscope: Vec<GyroscopeSample>,
    #[serde(default)]
    pub step_events: Vec<StepEvent>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_magnitude_at_rest() {
        let sample = AccelerometerSample::new(0, 0.0, 0.0, 9.81);
        assert!((sample.magnitude() - 9.81).abs() < 1e-5);
    }

    #[test]
    fn test_magnitude_pythagorean() {
        let sample = AccelerometerSample::new(0, 3.0, 4.0, 12.0);
        assert_eq!(sample.magnitude(), 13.0);
    }

    #[test]
    fn test_location_optional_fields_default() {
        let json = r#"{"timestamp_ms":1000,"latitude":55.0,"longitude":13.0}"#;
        let sample: LocationSample = serde_json::from_str(json).unwrap();
        assert_eq!(sample, LocationSample::new(1000, 55.0, 13.0));
    }

    #[test]
    fn test_point_axis_order() {
        let point = LocationSample::new(0, 55.0, 13.0).point();
        assert_eq!(point.x(), 13.0);
        assert_eq!(point.y(), 55.0);
    }
}
