use serde::{Deserialize, Serialize};

/// A planned segment of a workout.
///
/// `distance_meters` is authoritative when set to a positive value; the other
/// hints are only used to estimate a distance when it is missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrainingBlock {
  pub duration_seconds: Option<i64>,
  pub distance_meters: Option<f64>,
  pub hr_min: Option<i64>,
  pub hr_max: Option<i64>,
  /// Seconds per kilometer
  pub pace_min: Option<f64>,
  /// Seconds per kilometer
  pub pace_max: Option<f64>,
  pub repetitions: Option<i64>,
}

impl TrainingBlock {
  /// Number of times the block is performed; absent or non-positive counts as once
  pub fn repetition_count(&self) -> i64 {
    match self.repetitions {
      Some(n) if n >= 1 => n,
      _ => 1,
    }
  }

  /// Explicit distance, if one was set to a usable value
  pub fn explicit_distance(&self) -> Option<f64> {
    self.distance_meters.filter(|d| d.is_finite() && *d > 0.0)
  }

  /// True when the block carries any duration, heart-rate or pace hint
  pub fn has_estimation_hints(&self) -> bool {
    self.duration_seconds.is_some()
      || self.hr_min.is_some()
      || self.hr_max.is_some()
      || self.pace_min.is_some()
      || self.pace_max.is_some()
  }

  /// Build the estimator query for this block
  pub fn estimation_params(&self, athlete_id: &str) -> EstimationParams {
    EstimationParams {
      athlete_id: athlete_id.to_string(),
      duration_seconds: self.duration_seconds,
      hr_min: self.hr_min,
      hr_max: self.hr_max,
      pace_min: self.pace_min,
      pace_max: self.pace_max,
    }
  }
}

/// Query passed into the distance estimator. Constructed per call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimationParams {
  pub athlete_id: String,
  pub duration_seconds: Option<i64>,
  pub hr_min: Option<i64>,
  pub hr_max: Option<i64>,
  pub pace_min: Option<f64>,
  pub pace_max: Option<f64>,
}

impl EstimationParams {
  pub fn new(athlete_id: impl Into<String>) -> Self {
    Self {
      athlete_id: athlete_id.into(),
      ..Default::default()
    }
  }

  pub fn with_duration(mut self, seconds: i64) -> Self {
    self.duration_seconds = Some(seconds);
    self
  }

  pub fn with_heart_rate(mut self, hr_min: Option<i64>, hr_max: Option<i64>) -> Self {
    self.hr_min = hr_min;
    self.hr_max = hr_max;
    self
  }

  pub fn with_pace(mut self, pace_min: Option<f64>, pace_max: Option<f64>) -> Self {
    self.pace_min = pace_min;
    self.pace_max = pace_max;
    self
  }
}
