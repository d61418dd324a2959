// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Device capabilities (permissions) required to record a walk.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A permission the device must grant before recording can start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub enum Capability {
    /// Fine location for GPS fixes
    Location,
    /// Step detector and motion sensors
    ActivityRecognition,
    /// Foreground "recording in progress" indication
    Notifications,
}

impl Capability {
    pub const ALL: [Capability; 3] = [
        Capability::Location,
        Capability::ActivityRecognition,
        Capability::Notifications,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Capability::Location => "location",
            Capability::ActivityRecognition => "activity_recognition",
            Capability::Notifications => "notifications",
        }
    }
}

impl FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "location" => Ok(Capability::Location),
            "activity_recognition" => Ok(Capability::ActivityRecognition),
            "notifications" => Ok(Capability::Notifications),
            other => Err(format!("unknown capability: {}", other)),
        }
    }
}

/// What the permission collaborator knows about each capability.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapabilityReport {
    #[serde(default)]
    pub granted: BTreeSet<Capability>,
    /// Not granted and not yet requested from the user
    #[serde(default)]
    pub missing: BTreeSet<Capability>,
    /// Requested and refused by the user
    #[serde(default)]
    pub denied: BTreeSet<Capability>,
}

impl CapabilityReport {
    /// Report with every capability granted.
    pub fn all_granted() -> Self {
        Self {
            granted: Capability::ALL.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Build a report from the answers to a permission request.
    ///
    /// Any capability answered with `false` is denied.
    pub fn from_permission_results(results: &BTreeMap<Capability, bool>) -> Self {
        let mut report = Self::default();
        for (capability, granted) in results {
            if *granted {
                report.granted.insert(*capability);
            } else {
                report.denied.insert(*capability);
            }
        }
        report
    }

    /// Required capabilities the user explicitly refused.
    pub fn denied_of(&self, required: &BTreeSet<Capability>) -> Vec<Capability> {
        required
            .iter()
            .filter(|c| self.denied.contains(c))
            .copied()
            .collect()
    }

    /// Required capabilities that are neither granted nor refused.
    pub fn missing_of(&self, required: &BTreeSet<Capability>) -> Vec<Capability> {
        required
            .iter()
            .filter(|c| !self.granted.contains(c) && !self.denied.contains(c))
            .copied()
            .collect()
    }
}

/// Source of capability information, queried before each recording.
pub trait CapabilityProvider: Send + Sync {
    fn check_capabilities(&self) -> CapabilityReport;
}

impl CapabilityProvider for CapabilityReport {
    fn check_capabilities(&self) -> CapabilityReport {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn required() -> BTreeSet<Capability> {
        Capability::ALL.into_iter().collect()
    }

    #[test]
    fn test_all_granted_has_nothing_missing() {
        let report = CapabilityReport::all_granted();
        assert!(report.missing_of(&required()).is_empty());
        assert!(report.denied_of(&required()).is_empty());
    }

    #[test]
    fn test_permission_results_split_granted_and_denied() {
        let mut results = BTreeMap::new();
        results.insert(Capability::Location, true);
        results.insert(Capability::ActivityRecognition, false);

        let report = CapabilityReport::from_permission_results(&results);
        assert_eq!(report.denied_of(&required()), vec![Capability::ActivityRecognition]);
        // Notifications was never answered, so it is still missing
        assert_eq!(report.missing_of(&required()), vec![Capability::Notifications]);
    }

    #[test]
    fn test_parse_capability() {
        assert_eq!("location".parse::<Capability>(), Ok(Capability::Location));
        assert_eq!(
            " activity_recognition".parse::<Capability>(),
            Ok(Capability::ActivityRecognition)
        );
        assert!("camera".parse::<Capability>().is_err());
    }
}
