//! Test utilities and helpers for unit testing
//!
//! This module provides common test infrastructure including:
//! - Database setup/teardown
//! - Seeding helpers for workout history
//! - In-memory implementations of the history port
//! - Helper assertions

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use sqlx::SqlitePool;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::models::{CompletedWorkoutRecord, NewCompletedWorkout};
use crate::store::{record_completed_workout, StoreError, WorkoutHistory};

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// Insert one completed workout
pub async fn seed_workout(
  pool: &SqlitePool,
  athlete_id: &str,
  avg_heart_rate: Option<i64>,
  actual_distance: Option<f64>,
  actual_duration: Option<i64>,
  completed_at: DateTime<Utc>,
) -> i64 {
  let workout = NewCompletedWorkout {
    athlete_id: athlete_id.to_string(),
    avg_heart_rate,
    actual_distance,
    actual_duration,
    completed_at,
  };

  record_completed_workout(pool, &workout)
    .await
    .expect("Failed to insert test workout")
}

/// ---------------------------------------------------------------------------
/// Time Helpers
/// ---------------------------------------------------------------------------

/// Fixed timestamp `day` days after the test epoch; larger is more recent
pub fn ts(day: i64) -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2025, 1, 1, 6, 0, 0).unwrap() + Duration::days(day)
}

/// ---------------------------------------------------------------------------
/// In-Memory History
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct FixtureRecord {
  pub athlete_id: String,
  pub record: CompletedWorkoutRecord,
}

/// Build a fixture workout completed on `ts(day)`
pub fn fixture_record(
  athlete_id: &str,
  avg_heart_rate: i64,
  actual_distance: f64,
  actual_duration: i64,
  day: i64,
) -> FixtureRecord {
  FixtureRecord {
    athlete_id: athlete_id.to_string(),
    record: CompletedWorkoutRecord {
      avg_heart_rate: Some(avg_heart_rate),
      actual_distance: Some(actual_distance),
      actual_duration: Some(actual_duration),
      completed_at: ts(day),
    },
  }
}

/// History backed by a vector, answering queries the way the SQL adapter does
pub struct FixtureHistory {
  records: Vec<FixtureRecord>,
  filter_rows: bool,
  queries: AtomicUsize,
}

impl FixtureHistory {
  pub fn new(records: Vec<FixtureRecord>) -> Self {
    Self {
      records,
      filter_rows: true,
      queries: AtomicUsize::new(0),
    }
  }

  /// Returns the athlete's rows without band or positivity filtering,
  /// to simulate a store that breaks its contract
  pub fn unfiltered(records: Vec<FixtureRecord>) -> Self {
    Self {
      filter_rows: false,
      ..Self::new(records)
    }
  }

  pub fn query_count(&self) -> usize {
    self.queries.load(Ordering::SeqCst)
  }
}

#[async_trait]
impl WorkoutHistory for FixtureHistory {
  async fn query_recent_workouts_near_hr(
    &self,
    athlete_id: &str,
    hr_low: f64,
    hr_high: f64,
    limit: i64,
  ) -> Result<Vec<CompletedWorkoutRecord>, StoreError> {
    self.queries.fetch_add(1, Ordering::SeqCst);

    let mut rows: Vec<CompletedWorkoutRecord> = self
      .records
      .iter()
      .filter(|f| f.athlete_id == athlete_id)
      .map(|f| f.record.clone())
      .filter(|r| {
        !self.filter_rows
          || (r.pace_sec_per_km().is_some()
            && r
              .avg_heart_rate
              .is_some_and(|hr| hr as f64 >= hr_low && hr as f64 <= hr_high))
      })
      .collect();

    rows.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
    rows.truncate(limit.max(0) as usize);

    Ok(rows)
  }
}

/// History whose backing store is always down
pub struct FailingHistory;

#[async_trait]
impl WorkoutHistory for FailingHistory {
  async fn query_recent_workouts_near_hr(
    &self,
    _athlete_id: &str,
    _hr_low: f64,
    _hr_high: f64,
    _limit: i64,
  ) -> Result<Vec<CompletedWorkoutRecord>, StoreError> {
    Err(StoreError::Unavailable("connection refused".to_string()))
  }
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM completed_workouts")
      .fetch_one(&pool)
      .await
      .expect("Failed to count workouts");
    assert_eq!(count, 0);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_seed_workout_inserts_row() {
    let pool = setup_test_db().await;

    let first = seed_workout(&pool, "a1", Some(150), Some(5000.0), Some(1500), ts(0)).await;
    let second = seed_workout(&pool, "a1", None, None, None, ts(1)).await;
    assert!(second > first);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM completed_workouts")
      .fetch_one(&pool)
      .await
      .expect("Failed to count workouts");
    assert_eq!(count, 2);

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_fixture_history_counts_queries() {
    let history = FixtureHistory::new(vec![fixture_record("a1", 150, 5000.0, 1500, 0)]);

    let rows = history
      .query_recent_workouts_near_hr("a1", 140.0, 160.0, 10)
      .await
      .unwrap();
    assert_eq!(rows.len(), 1);

    let other = history
      .query_recent_workouts_near_hr("a2", 140.0, 160.0, 10)
      .await
      .unwrap();
    assert!(other.is_empty());

    assert_eq!(history.query_count(), 2);
  }

  #[test]
  fn test_ts_orders_by_day() {
    assert!(ts(2) > ts(1));
    assert_eq!((ts(7) - ts(0)).num_days(), 7);
  }
}
