//! Environment trait: the reset/step contract used by training code.
//!
//! Environments implement `Environment` to define:
//! - How an episode starts
//! - How a raw action advances it
//! - Which actions are currently worth sampling
//!
//! Rollout workers and the Python bindings drive an environment only through
//! this trait, so they never interpret game-specific concepts directly.

use serde::{Deserialize, Serialize};

use crate::core::{DecodeError, ACTION_SPACE};
use crate::nn::ActionMask;

/// Result of a single step.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StepResult<O, I> {
    /// Observation after the step.
    pub observation: O,
    /// Reward for this step.
    pub reward: i64,
    /// The episode reached a terminal (won) state.
    pub done: bool,
    /// The step budget ran out.
    pub truncated: bool,
    /// Diagnostics.
    pub info: I,
}

impl<O, I> StepResult<O, I> {
    /// Either terminal or truncated.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.done || self.truncated
    }
}

/// Environment trait.
///
/// ## Implementation Notes
///
/// - `reset`: with `Some(seed)` the episode must be reproducible from the seed
/// - `step`: malformed input returns `Err` without touching the state;
///   well-formed but illegal moves are ordinary steps with a penalty
/// - `action_mask`: advisory only, `step` never consults it
pub trait Environment {
    type Observation;
    type Info;

    /// Start a new episode.
    fn reset(&mut self, seed: Option<u64>) -> (Self::Observation, Self::Info);

    /// Apply one raw action.
    fn step(
        &mut self,
        action: &[i64],
    ) -> Result<StepResult<Self::Observation, Self::Info>, DecodeError>;

    /// Mask over the flat action space.
    fn action_mask(&self) -> ActionMask;

    /// Current observation without stepping.
    fn observe(&self) -> Self::Observation;

    // === Convenience Methods ===

    /// Size of the flat action space.
    fn action_space_size(&self) -> usize {
        ACTION_SPACE
    }

    /// Flat indices of the actions the mask marks as legal.
    fn legal_indices(&self) -> Vec<usize> {
        self.action_mask().legal_indices()
    }
}
