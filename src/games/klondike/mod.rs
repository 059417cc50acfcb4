//! Klondike solitaire as a reinforcement-learning environment.
//!
//! Draw-one Klondike with a limited number of stock recycles and a step
//! budget:
//! - 7 tableau columns dealt 1..=7 cards, only the top card face-up
//! - 4 foundation piles built Ace to King by suit
//! - Draw one card at a time from the stock onto the waste
//! - Win by completing all four foundations
//!
//! Rewards are shaped to favor productive moves and revealing hidden cards.

mod env;

pub use env::{KlondikeEnv, KlondikeStep, StepInfo};
