//! Application configuration loaded from environment variables.
//!
//! A `.env` file in the working directory is honored for local runs.

use crate::models::Capability;
use crate::services::steps::StepDetectorConfig;
use crate::services::DEFAULT_DRAIN_GRACE;
use std::collections::BTreeSet;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Directory holding the record index and walk payloads
    pub data_dir: PathBuf,
    /// Step detector tuning
    pub step_detector: StepDetectorConfig,
    /// Time allowed for queued samples to drain on stop
    pub drain_grace: Duration,
    /// Capabilities that must be granted before recording
    pub required_capabilities: BTreeSet<Capability>,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Every variable is optional; a value that is set but does not parse is
    /// an error rather than silently replaced by the default.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let defaults = StepDetectorConfig::default();
        let step_detector = StepDetectorConfig {
            smoothing_alpha: parse_var("STEP_SMOOTHING_ALPHA", defaults.smoothing_alpha)?,
            threshold_k: parse_var("STEP_THRESHOLD_K", defaults.threshold_k)?,
            min_above_threshold: parse_var(
                "STEP_MIN_ABOVE_THRESHOLD",
                defaults.min_above_threshold,
            )?,
            min_step_interval_ms: parse_var(
                "STEP_MIN_INTERVAL_MS",
                defaults.min_step_interval_ms,
            )?,
        };
        if !(step_detector.smoothing_alpha > 0.0 && step_detector.smoothing_alpha <= 1.0) {
            return Err(ConfigError::Invalid {
                var: "STEP_SMOOTHING_ALPHA",
                reason: "must be in (0, 1]".to_string(),
            });
        }

        let drain_grace_ms: u64 =
            parse_var("DRAIN_GRACE_MS", DEFAULT_DRAIN_GRACE.as_millis() as u64)?;

        let required_capabilities = match env::var("REQUIRED_CAPABILITIES") {
            Ok(list) => parse_capabilities(&list)?,
            Err(_) => Capability::ALL.into_iter().collect(),
        };

        Ok(Self {
            port: parse_var("PORT", 8080)?,
            data_dir: env::var("WALK_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("./data")),
            step_detector,
            drain_grace: Duration::from_millis(drain_grace_ms),
            required_capabilities,
        })
    }

    /// Config for tests: defaults everywhere, no environment access.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            data_dir: PathBuf::from("./data"),
            step_detector: StepDetectorConfig::default(),
            drain_grace: DEFAULT_DRAIN_GRACE,
            required_capabilities: Capability::ALL.into_iter().collect(),
        }
    }
}

fn parse_var<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(value) => value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            var,
            reason: e.to_string(),
        }),
        Err(_) => Ok(default),
    }
}

/// Parse a comma-separated capability list. An empty list requires nothing.
fn parse_capabilities(list: &str) -> Result<BTreeSet<Capability>, ConfigError> {
    list.split(',')
        .filter(|s| !s.trim().is_empty())
        .map(|s| {
            s.parse::<Capability>().map_err(|reason| ConfigError::Invalid {
                var: "REQUIRED_CAPABILITIES",
                reason,
            })
        })
        .collect()
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}
