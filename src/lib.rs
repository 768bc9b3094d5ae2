//! Adaptive distance estimation for planned training blocks.
//!
//! Estimates how far an athlete will go in a block from, in order of trust:
//! an explicit pace target, their own pace at similar heart rate, or a generic
//! reference pace. Plan totals sum blocks times repetitions.

pub mod config;
pub mod db;
pub mod estimator;
pub mod models;
pub mod pace;
pub mod plan;
pub mod store;

#[cfg(test)]
mod test_utils;

pub use config::{ConfigError, EstimatorConfig, Settings};
pub use estimator::{
  classify, estimate_distance, estimate_distance_detailed, DistanceEstimate, EstimateSource,
  EstimationTier,
};
pub use models::{CompletedWorkoutRecord, EstimationParams, NewCompletedWorkout, TrainingBlock};
pub use pace::lookup_historical_pace;
pub use plan::{calculate_plan_distance, plan_distance_breakdown, BlockDistance, PlanDistance};
pub use store::{SqliteWorkoutHistory, StoreError, WorkoutHistory};

use tracing_subscriber::EnvFilter;

/// Install a fmt subscriber filtered by `RUST_LOG` (default `info`).
/// Does nothing if a global subscriber is already set.
pub fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
