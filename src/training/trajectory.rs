//! Episode records and the experience buffer.
//!
//! A trajectory records a complete episode, capturing:
//! - The observation before each step
//! - The raw action taken
//! - The reward that step earned
//!
//! plus the episode's seed and how it ended. Trajectories serialize with
//! serde (JSON-friendly `{state, action, reward}` records) and have a
//! compact bincode form for storage.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{GameRng, RawAction};
use crate::nn::Observation;

/// Trajectory (de)serialization failure.
#[derive(Debug, Error)]
pub enum TrajectoryError {
    #[error("failed to encode trajectory: {0}")]
    Encode(#[source] bincode::Error),
    #[error("failed to decode trajectory: {0}")]
    Decode(#[source] bincode::Error),
}

/// One step of an episode.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Observation the action was chosen from.
    pub state: Observation,

    /// Wire form of the action taken.
    pub action: RawAction,

    /// Reward the step earned.
    pub reward: i64,
}

/// A complete episode.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trajectory {
    /// All steps in order.
    pub steps: Vec<Transition>,

    /// Seed the episode was dealt from.
    pub seed: u64,

    /// Sum of step rewards.
    pub total_reward: i64,

    /// All four foundations were completed.
    pub won: bool,

    /// The turn budget ran out.
    pub truncated: bool,
}

impl Trajectory {
    pub fn new(seed: u64) -> Self {
        Self {
            steps: Vec::new(),
            seed,
            total_reward: 0,
            won: false,
            truncated: false,
        }
    }

    /// Append a step and accumulate its reward.
    pub fn push(&mut self, step: Transition) {
        self.total_reward += step.reward;
        self.steps.push(step);
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Actions taken, in order. Replaying these from `seed` reproduces the
    /// episode.
    pub fn actions(&self) -> impl Iterator<Item = &RawAction> {
        self.steps.iter().map(|s| &s.action)
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, TrajectoryError> {
        bincode::serialize(self).map_err(TrajectoryError::Encode)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TrajectoryError> {
        bincode::deserialize(bytes).map_err(TrajectoryError::Decode)
    }
}

/// Buffer for storing trajectories during training.
///
/// Uses a FIFO strategy: when full, oldest trajectories are removed.
#[derive(Clone, Debug)]
pub struct ExperienceBuffer {
    trajectories: VecDeque<Trajectory>,
    max_trajectories: usize,
}

impl ExperienceBuffer {
    pub fn new(max_trajectories: usize) -> Self {
        Self {
            trajectories: VecDeque::with_capacity(max_trajectories),
            max_trajectories,
        }
    }

    /// Add a trajectory, evicting the oldest if the buffer is full.
    pub fn push(&mut self, trajectory: Trajectory) {
        if self.max_trajectories == 0 {
            return;
        }
        if self.trajectories.len() >= self.max_trajectories {
            self.trajectories.pop_front();
        }
        self.trajectories.push_back(trajectory);
    }

    pub fn len(&self) -> usize {
        self.trajectories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.trajectories.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.max_trajectories
    }

    pub fn clear(&mut self) {
        self.trajectories.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &Trajectory> {
        self.trajectories.iter()
    }

    /// Total number of steps across all trajectories.
    pub fn total_steps(&self) -> usize {
        self.trajectories.iter().map(Trajectory::len).sum()
    }

    /// Fraction of stored episodes that were won.
    pub fn win_rate(&self) -> f64 {
        if self.trajectories.is_empty() {
            return 0.0;
        }
        let wins = self.trajectories.iter().filter(|t| t.won).count();
        wins as f64 / self.trajectories.len() as f64
    }

    /// Mean episode reward.
    pub fn mean_reward(&self) -> f64 {
        if self.trajectories.is_empty() {
            return 0.0;
        }
        let total: i64 = self.trajectories.iter().map(|t| t.total_reward).sum();
        total as f64 / self.trajectories.len() as f64
    }

    /// Sample a random batch of transitions without replacement.
    ///
    /// Uses the provided seed for reproducibility.
    pub fn sample_batch(&self, batch_size: usize, seed: u64) -> Vec<Transition> {
        let all: Vec<&Transition> = self.trajectories.iter().flat_map(|t| &t.steps).collect();
        if all.is_empty() || batch_size == 0 {
            return vec![];
        }

        let mut rng = GameRng::new(seed);

        // Partial Fisher-Yates over the first `batch_size` slots
        let mut indices: Vec<usize> = (0..all.len()).collect();
        let n = indices.len();
        let limit = batch_size.min(n);

        for i in 0..limit {
            let j = i + rng.gen_range_usize(0..n - i);
            indices.swap(i, j);
        }

        indices
            .into_iter()
            .take(limit)
            .map(|i| all[i].clone())
            .collect()
    }
}

impl Default for ExperienceBuffer {
    fn default() -> Self {
        Self::new(10000)
    }
}
