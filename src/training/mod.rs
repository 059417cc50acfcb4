//! Rollouts and training data collection.
//!
//! ## Overview
//!
//! - **Trajectory**: Records a complete episode as `{state, action, reward}` steps
//! - **ExperienceBuffer**: FIFO store of recent trajectories with batch sampling
//! - **RolloutWorker**: Plays episodes by sampling a masked policy
//!
//! ## Usage
//!
//! ```rust,ignore
//! use klondike_env::nn::UniformPolicy;
//! use klondike_env::training::{ExperienceBuffer, RolloutConfig, RolloutWorker};
//!
//! let config = RolloutConfig::default().with_seed(1).with_episodes(16);
//! let mut worker = RolloutWorker::new(UniformPolicy::default(), config);
//!
//! let mut buffer = ExperienceBuffer::new(1024);
//! worker.fill_buffer(&mut buffer);
//!
//! let batch = buffer.sample_batch(32, 7);
//! ```

pub mod rollout;
pub mod trajectory;

pub use rollout::{RolloutConfig, RolloutWorker};
pub use trajectory::{ExperienceBuffer, Trajectory, TrajectoryError, Transition};
