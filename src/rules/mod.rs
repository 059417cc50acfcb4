//! Klondike rules: move legality, auto-flip and reward shaping.
//!
//! - `moves`: validate and apply a `Command`
//! - `flip`: reveal face-down cards left on top of columns
//! - `reward`: map a step's outcome to a reward
//! - `engine`: the `Environment` trait environments implement

pub mod engine;
pub mod flip;
pub mod moves;
pub mod reward;

pub use engine::{Environment, StepResult};
pub use flip::{reveal_exposed, Flipped};
pub use moves::{execute, MoveOutcome, Rejection, Target};
pub use reward::{RewardPolicy, TurnReward};
