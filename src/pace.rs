//! Historical pace lookup
//!
//! Reduces the athlete's most recent workouts at a similar heart rate to a
//! single representative pace in seconds per kilometer. Recency decides which
//! workouts are sampled; every sampled workout then carries equal weight.

use tracing::{debug, warn};

use crate::config::EstimatorConfig;
use crate::models::CompletedWorkoutRecord;
use crate::store::{StoreError, WorkoutHistory};

/// Mean pace of the athlete's recent workouts within the heart-rate band around
/// `target_hr`.
///
/// Returns `Ok(None)` when no workout qualifies. Store failures and rows that
/// break the query contract are returned as errors.
pub async fn lookup_historical_pace<H>(
  history: &H,
  athlete_id: &str,
  target_hr: f64,
  config: &EstimatorConfig,
) -> Result<Option<f64>, StoreError>
where
  H: WorkoutHistory + ?Sized,
{
  if !(target_hr.is_finite() && target_hr > 0.0) {
    // Callers only reach here with a usable heart rate
    warn!(athlete_id, target_hr, "Skipping pace lookup for non-positive heart rate");
    return Ok(None);
  }

  let hr_low = target_hr - config.hr_tolerance_bpm;
  let hr_high = target_hr + config.hr_tolerance_bpm;

  let records = history
    .query_recent_workouts_near_hr(athlete_id, hr_low, hr_high, config.sample_limit)
    .await?;

  let paces = records
    .iter()
    .take(config.sample_limit.max(0) as usize)
    .map(|r| record_pace(r, hr_low, hr_high))
    .collect::<Result<Vec<_>, _>>()?;

  let pace = mean(&paces);
  debug!(athlete_id, target_hr, samples = paces.len(), ?pace, "Historical pace lookup");

  Ok(pace)
}

/// Pace of a single record, rejecting rows the store should never have returned
fn record_pace(record: &CompletedWorkoutRecord, hr_low: f64, hr_high: f64) -> Result<f64, StoreError> {
  let pace = record.pace_sec_per_km().ok_or_else(|| {
    StoreError::MalformedRecord(format!(
      "workout completed at {} has no usable distance/duration",
      record.completed_at
    ))
  })?;

  match record.avg_heart_rate {
    Some(hr) if (hr_low..=hr_high).contains(&(hr as f64)) => Ok(pace),
    other => {
      warn!(?other, hr_low, hr_high, "Store returned workout outside heart-rate band");
      Err(StoreError::MalformedRecord(format!(
        "workout completed at {} has heart rate {:?} outside [{}, {}]",
        record.completed_at, other, hr_low, hr_high
      )))
    }
  }
}

fn mean(values: &[f64]) -> Option<f64> {
  if values.is_empty() {
    None
  } else {
    Some(values.iter().sum::<f64>() / values.len() as f64)
  }
}
