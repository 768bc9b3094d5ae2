//! Read port onto the athlete's workout history, plus the SQLite adapter

use async_trait::async_trait;
use serde::Serialize;

use crate::db::DbPool;
use crate::models::{CompletedWorkoutRecord, NewCompletedWorkout};

/// ---------------------------------------------------------------------------
/// Error Handling
/// ---------------------------------------------------------------------------

/// Failure to read workout history. Never used for "no matching workouts".
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  #[error("Database error: {0}")]
  Database(#[from] sqlx::Error),

  #[error("Migration failed: {0}")]
  Migration(#[from] sqlx::migrate::MigrateError),

  #[error("Malformed workout record: {0}")]
  MalformedRecord(String),

  #[error("Workout history unavailable: {0}")]
  Unavailable(String),
}

impl Serialize for StoreError {
  fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: serde::Serializer,
  {
    serializer.serialize_str(&self.to_string())
  }
}

/// ---------------------------------------------------------------------------
/// Read Port
/// ---------------------------------------------------------------------------

#[async_trait]
pub trait WorkoutHistory: Send + Sync {
  /// Most recent completed workouts whose average heart rate lies in
  /// `[hr_low, hr_high]`, newest first, at most `limit` rows.
  ///
  /// Implementations only return rows with positive distance and duration.
  async fn query_recent_workouts_near_hr(
    &self,
    athlete_id: &str,
    hr_low: f64,
    hr_high: f64,
    limit: i64,
  ) -> Result<Vec<CompletedWorkoutRecord>, StoreError>;
}

/// ---------------------------------------------------------------------------
/// SQLite Adapter
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SqliteWorkoutHistory {
  pool: DbPool,
}

impl SqliteWorkoutHistory {
  pub fn new(pool: DbPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl WorkoutHistory for SqliteWorkoutHistory {
  async fn query_recent_workouts_near_hr(
    &self,
    athlete_id: &str,
    hr_low: f64,
    hr_high: f64,
    limit: i64,
  ) -> Result<Vec<CompletedWorkoutRecord>, StoreError> {
    let rows = sqlx::query_as::<_, CompletedWorkoutRecord>(
      r#"
      SELECT avg_heart_rate, actual_distance, actual_duration, completed_at
      FROM completed_workouts
      WHERE athlete_id = ?1
        AND actual_distance > 0
        AND actual_duration > 0
        AND avg_heart_rate BETWEEN ?2 AND ?3
      ORDER BY completed_at DESC
      LIMIT ?4
      "#,
    )
    .bind(athlete_id)
    .bind(hr_low)
    .bind(hr_high)
    .bind(limit)
    .fetch_all(&self.pool)
    .await?;

    Ok(rows)
  }
}

/// Insert a completed workout, returning its row id
pub async fn record_completed_workout(
  pool: &DbPool,
  workout: &NewCompletedWorkout,
) -> Result<i64, StoreError> {
  let result = sqlx::query(
    r#"
    INSERT INTO completed_workouts (
      athlete_id, avg_heart_rate, actual_distance, actual_duration, completed_at
    )
    VALUES (?1, ?2, ?3, ?4, ?5)
    "#,
  )
  .bind(&workout.athlete_id)
  .bind(workout.avg_heart_rate)
  .bind(workout.actual_distance)
  .bind(workout.actual_duration)
  .bind(workout.completed_at)
  .execute(pool)
  .await?;

  Ok(result.last_insert_rowid())
}
