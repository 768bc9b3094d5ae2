use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A completed workout as returned by the historical store.
///
/// Only rows with a positive distance and duration count as pace evidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CompletedWorkoutRecord {
  pub avg_heart_rate: Option<i64>,
  pub actual_distance: Option<f64>,
  pub actual_duration: Option<i64>,
  pub completed_at: DateTime<Utc>,
}

impl CompletedWorkoutRecord {
  /// Seconds per kilometer, or None when distance/duration are missing or non-positive
  pub fn pace_sec_per_km(&self) -> Option<f64> {
    match (self.actual_distance, self.actual_duration) {
      (Some(dist), Some(dur)) if dist > 0.0 && dur > 0 => Some(dur as f64 / (dist / 1000.0)),
      _ => None,
    }
  }
}

/// For inserting new completed workouts (without id, created_at)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCompletedWorkout {
  pub athlete_id: String,
  pub avg_heart_rate: Option<i64>,
  pub actual_distance: Option<f64>,
  pub actual_duration: Option<i64>,
  pub completed_at: DateTime<Utc>,
}
