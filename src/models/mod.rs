pub mod block;
pub mod workout;

pub use block::{EstimationParams, TrainingBlock};
pub use workout::{CompletedWorkoutRecord, NewCompletedWorkout};
