//! Plan distance aggregation
//!
//! Sums block distances (explicit or estimated) times their repetitions into
//! a plan total. Blocks without any usable data contribute nothing; an
//! incomplete plan still gets a best-effort total.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::EstimatorConfig;
use crate::estimator::{estimate_distance_detailed, DistanceEstimate};
use crate::models::TrainingBlock;
use crate::store::{StoreError, WorkoutHistory};

// ---------------------------------------------------------------------------
/// Per-block contribution to the plan total
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockDistance {
  /// Position of the block in the plan
  pub index: usize,
  pub repetitions: i64,
  pub meters_per_repetition: f64,
  pub contribution_meters: f64,
  /// None when the block's explicit distance was used or it had no hints
  pub estimate: Option<DistanceEstimate>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanDistance {
  pub total_meters: i64,
  pub blocks: Vec<BlockDistance>,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Total plan distance in meters
pub async fn calculate_plan_distance<H>(
  history: &H,
  athlete_id: &str,
  blocks: &[TrainingBlock],
  config: &EstimatorConfig,
) -> Result<i64, StoreError>
where
  H: WorkoutHistory + ?Sized,
{
  Ok(plan_distance_breakdown(history, athlete_id, blocks, config)
    .await?
    .total_meters)
}

/// Per-block contributions, in plan order, with the rounded total
pub async fn plan_distance_breakdown<H>(
  history: &H,
  athlete_id: &str,
  blocks: &[TrainingBlock],
  config: &EstimatorConfig,
) -> Result<PlanDistance, StoreError>
where
  H: WorkoutHistory + ?Sized,
{
  let mut contributions = Vec::with_capacity(blocks.len());

  for (index, block) in blocks.iter().enumerate() {
    let repetitions = block.repetition_count();

    // One estimate per block, shared by all repetitions
    let (meters_per_repetition, estimate) = if let Some(explicit) = block.explicit_distance() {
      (explicit, None)
    } else if block.has_estimation_hints() {
      let params = block.estimation_params(athlete_id);
      let estimate = estimate_distance_detailed(history, &params, config).await?;
      (estimate.meters as f64, Some(estimate))
    } else {
      (0.0, None)
    };

    contributions.push(BlockDistance {
      index,
      repetitions,
      meters_per_repetition,
      contribution_meters: meters_per_repetition * repetitions as f64,
      estimate,
    });
  }

  let total: f64 = contributions.iter().map(|b| b.contribution_meters).sum();
  let total_meters = total.round() as i64;

  debug!(athlete_id, blocks = blocks.len(), total_meters, "Calculated plan distance");

  Ok(PlanDistance {
    total_meters,
    blocks: contributions,
  })
}
