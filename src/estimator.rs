//! Block distance estimator
//!
//! Picks the most reliable evidence available for a block and turns it into a
//! distance in meters. Tiers, strongest first:
//! - PaceTarget: explicit pace range plus duration
//! - HeartRateTarget: heart-rate range plus duration, priced with the
//!   athlete's own historical pace at that effort
//! - DurationOnly: duration priced at a generic reference pace
//! - NoEvidence: nothing to estimate from, 0 meters
//!
//! Non-positive durations, heart rates and paces are treated as absent.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::EstimatorConfig;
use crate::models::EstimationParams;
use crate::pace::lookup_historical_pace;
use crate::store::{StoreError, WorkoutHistory};

/// ---------------------------------------------------------------------------
/// Tier Decision
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EstimationTier {
  PaceTarget { duration_seconds: f64, avg_pace: f64 },
  HeartRateTarget { duration_seconds: f64, avg_hr: f64 },
  DurationOnly { duration_seconds: f64 },
  NoEvidence,
}

/// Decide which tier applies, without touching the history store
pub fn classify(params: &EstimationParams) -> EstimationTier {
  let duration = positive(params.duration_seconds.map(|d| d as f64));
  let pace_min = positive(params.pace_min);
  let pace_max = positive(params.pace_max);
  let hr_min = positive(params.hr_min.map(|h| h as f64));
  let hr_max = positive(params.hr_max.map(|h| h as f64));

  if params.duration_seconds.is_some() && duration.is_none() {
    warn!(duration_seconds = ?params.duration_seconds, "Ignoring non-positive duration");
  }
  if params.pace_min.is_some() && pace_min.is_none() {
    warn!(pace_min = ?params.pace_min, "Ignoring non-positive pace target");
  }

  let Some(duration_seconds) = duration else {
    return EstimationTier::NoEvidence;
  };

  // pace_max on its own does not qualify
  if let Some(min) = pace_min {
    let avg_pace = match pace_max {
      Some(max) => (min + max) / 2.0,
      None => min,
    };
    return EstimationTier::PaceTarget {
      duration_seconds,
      avg_pace,
    };
  }

  let avg_hr = match (hr_min, hr_max) {
    (Some(min), Some(max)) => Some((min + max) / 2.0),
    (min, max) => min.or(max),
  };
  if let Some(avg_hr) = avg_hr {
    return EstimationTier::HeartRateTarget {
      duration_seconds,
      avg_hr,
    };
  }

  EstimationTier::DurationOnly { duration_seconds }
}

fn positive(value: Option<f64>) -> Option<f64> {
  value.filter(|v| v.is_finite() && *v > 0.0)
}

/// ---------------------------------------------------------------------------
/// Estimation
/// ---------------------------------------------------------------------------

/// Which evidence produced an estimate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateSource {
  PaceTarget,
  HeartRateHistory,
  DurationFallback,
  NoEvidence,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistanceEstimate {
  pub meters: i64,
  pub source: EstimateSource,
  /// Seconds per kilometer used for the estimate
  pub pace_sec_per_km: Option<f64>,
}

impl DistanceEstimate {
  fn from_pace(duration_seconds: f64, pace: f64, source: EstimateSource) -> Self {
    Self {
      meters: (duration_seconds * 1000.0 / pace).round() as i64,
      source,
      pace_sec_per_km: Some(pace),
    }
  }

  fn none() -> Self {
    Self {
      meters: 0,
      source: EstimateSource::NoEvidence,
      pace_sec_per_km: None,
    }
  }
}

/// Estimated distance in meters. Missing evidence yields 0; only history
/// store failures are errors.
pub async fn estimate_distance<H>(
  history: &H,
  params: &EstimationParams,
  config: &EstimatorConfig,
) -> Result<i64, StoreError>
where
  H: WorkoutHistory + ?Sized,
{
  Ok(estimate_distance_detailed(history, params, config).await?.meters)
}

/// Same as [`estimate_distance`], also reporting the tier that produced it
pub async fn estimate_distance_detailed<H>(
  history: &H,
  params: &EstimationParams,
  config: &EstimatorConfig,
) -> Result<DistanceEstimate, StoreError>
where
  H: WorkoutHistory + ?Sized,
{
  let estimate = match classify(params) {
    EstimationTier::PaceTarget {
      duration_seconds,
      avg_pace,
    } => DistanceEstimate::from_pace(duration_seconds, avg_pace, EstimateSource::PaceTarget),

    EstimationTier::HeartRateTarget {
      duration_seconds,
      avg_hr,
    } => match lookup_historical_pace(history, &params.athlete_id, avg_hr, config).await? {
      Some(pace) => {
        DistanceEstimate::from_pace(duration_seconds, pace, EstimateSource::HeartRateHistory)
      }
      None => {
        debug!(athlete_id = %params.athlete_id, avg_hr, "No pace history at this effort, using fallback pace");
        fallback(duration_seconds, config)
      }
    },

    EstimationTier::DurationOnly { duration_seconds } => fallback(duration_seconds, config),

    EstimationTier::NoEvidence => DistanceEstimate::none(),
  };

  debug!(
    athlete_id = %params.athlete_id,
    meters = estimate.meters,
    source = ?estimate.source,
    "Estimated block distance"
  );

  Ok(estimate)
}

fn fallback(duration_seconds: f64, config: &EstimatorConfig) -> DistanceEstimate {
  DistanceEstimate::from_pace(
    duration_seconds,
    config.fallback_pace_sec_per_km,
    EstimateSource::DurationFallback,
  )
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
