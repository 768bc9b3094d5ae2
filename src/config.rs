//! Estimator configuration loaded from the environment (and `.env`, if present)

use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::str::FromStr;

/// ---------------------------------------------------------------------------
/// Configuration Constants
/// ---------------------------------------------------------------------------

pub const DEFAULT_HR_TOLERANCE_BPM: f64 = 10.0;
pub const DEFAULT_SAMPLE_LIMIT: i64 = 10;
/// Generic recreational-runner pace used when nothing better is known
pub const DEFAULT_FALLBACK_PACE_SEC_PER_KM: f64 = 360.0;

const DATABASE_URL: &str = "DATABASE_URL";
const HR_TOLERANCE_VAR: &str = "ESTIMATOR_HR_TOLERANCE_BPM";
const SAMPLE_LIMIT_VAR: &str = "ESTIMATOR_SAMPLE_LIMIT";
const FALLBACK_PACE_VAR: &str = "ESTIMATOR_FALLBACK_PACE_SEC_PER_KM";

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
  #[error("Missing configuration: {0}")]
  MissingConfig(String),

  #[error("Invalid value for {name}: {value}")]
  Invalid { name: String, value: String },
}

impl Serialize for ConfigError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

/// ---------------------------------------------------------------------------
/// Estimator Configuration
/// ---------------------------------------------------------------------------

/// Tunables for the distance estimator. Defaults match the platform constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EstimatorConfig {
  /// Half-width of the inclusive heart-rate similarity band
  pub hr_tolerance_bpm: f64,
  /// Most recent matching workouts to average
  pub sample_limit: i64,
  pub fallback_pace_sec_per_km: f64,
}

impl Default for EstimatorConfig {
  fn default() -> Self {
    Self {
      hr_tolerance_bpm: DEFAULT_HR_TOLERANCE_BPM,
      sample_limit: DEFAULT_SAMPLE_LIMIT,
      fallback_pace_sec_per_km: DEFAULT_FALLBACK_PACE_SEC_PER_KM,
    }
  }
}

impl EstimatorConfig {
  /// Read overrides from the environment; unset variables keep their defaults
  pub fn from_env() -> Result<Self, ConfigError> {
    let defaults = Self::default();
    Ok(Self {
      hr_tolerance_bpm: positive_f64(HR_TOLERANCE_VAR)?.unwrap_or(defaults.hr_tolerance_bpm),
      sample_limit: positive_i64(SAMPLE_LIMIT_VAR)?.unwrap_or(defaults.sample_limit),
      fallback_pace_sec_per_km: positive_f64(FALLBACK_PACE_VAR)?
        .unwrap_or(defaults.fallback_pace_sec_per_km),
    })
  }
}

/// Positive, finite float from an optional env var
fn positive_f64(name: &str) -> Result<Option<f64>, ConfigError> {
  parse_var(name, |v: &f64| v.is_finite() && *v > 0.0)
}

fn positive_i64(name: &str) -> Result<Option<i64>, ConfigError> {
  parse_var(name, |v: &i64| *v > 0)
}

/// Parse an optional env var, rejecting values that fail `is_valid`
fn parse_var<T, F>(name: &str, is_valid: F) -> Result<Option<T>, ConfigError>
where
  T: FromStr,
  F: Fn(&T) -> bool,
{
  let raw = match env::var(name) {
    Ok(raw) => raw,
    Err(_) => return Ok(None),
  };

  let invalid = || ConfigError::Invalid {
    name: name.to_string(),
    value: raw.clone(),
  };

  let value: T = raw.trim().parse().map_err(|_| invalid())?;
  if is_valid(&value) {
    Ok(Some(value))
  } else {
    Err(invalid())
  }
}

/// ---------------------------------------------------------------------------
/// Service Settings
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Settings {
  pub database_url: String,
  pub estimator: EstimatorConfig,
}

impl Settings {
  /// Load `.env` (if any) and then read settings from the environment
  pub fn load() -> Result<Self, ConfigError> {
    dotenvy::dotenv().ok();
    Self::from_env()
  }

  /// Same as [`Settings::load`] with an explicit env file.
  /// Variables already set in the process take precedence over the file.
  pub fn load_from(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    dotenvy::from_path(path.as_ref()).ok();
    Self::from_env()
  }

  pub fn from_env() -> Result<Self, ConfigError> {
    Ok(Self {
      database_url: env::var(DATABASE_URL)
        .map_err(|_| ConfigError::MissingConfig(DATABASE_URL.into()))?,
      estimator: EstimatorConfig::from_env()?,
    })
  }
}
