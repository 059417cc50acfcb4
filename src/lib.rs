//! # klondike-env
//!
//! A Klondike solitaire simulation environment for reinforcement learning.
//!
//! ## Design Principles
//!
//! 1. **Malformed input is an error, illegal moves are not**: a bad action
//!    shape returns `DecodeError` and leaves the state untouched; a
//!    well-formed but illegal move is an ordinary step with a penalty.
//!
//! 2. **Deterministic**: the only randomness is the deck shuffle, driven by
//!    a seeded `GameRng`. A seed plus an action list replays an episode.
//!
//! 3. **Configuration Over Constants**: budgets and every reward value live
//!    in `EnvConfig`.
//!
//! ## Architecture
//!
//! - **Tagged commands**: the 4-integer wire action decodes into a
//!   `Command` whose variants name each source kind explicitly.
//!
//! - **Persistent Data Structures**: O(1) state cloning via `im-rs` for
//!   snapshots and lookahead.
//!
//! - **Atomic moves**: validation completes before a card moves; a move
//!   is a remove-from-source, insert-into-destination transfer.
//!
//! ## Modules
//!
//! - `core`: Cards, state, actions, RNG, configuration
//! - `rules`: Move execution, auto-flip, rewards, the `Environment` trait
//! - `games`: The `KlondikeEnv` environment
//! - `nn`: Observation encoding, action masks, policy trait
//! - `training`: Rollouts, trajectories and the experience buffer

pub mod core;
pub mod games;
pub mod nn;
pub mod rules;
pub mod training;

#[cfg(feature = "python")]
pub mod python;

// Re-export commonly used types
pub use crate::core::{
    Card, Command, DecodeError, EnvConfig, GameRng, GameState, RawAction, RewardConfig, Source,
    StateError, Suit, ACTION_SPACE,
};

pub use crate::games::klondike::{KlondikeEnv, KlondikeStep, StepInfo};

pub use crate::nn::{ActionMask, EncodedState, KlondikeEncoder, Observation, PolicyNetwork, StateEncoder, UniformPolicy};

pub use crate::rules::{Environment, MoveOutcome, Rejection, RewardPolicy, StepResult, TurnReward};

pub use crate::training::{
    ExperienceBuffer, RolloutConfig, RolloutWorker, Trajectory, TrajectoryError, Transition,
};
