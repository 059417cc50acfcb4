//! Environment configuration: budgets, seed and reward table.

use serde::{Deserialize, Serialize};

/// Reward constants for every outcome a step can produce.
///
/// Defaults reproduce the standard reward shaping: a small per-step
/// penalty, large bonuses for productive moves and for revealing hidden
/// cards, and graded penalties for rejected moves.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardConfig {
    /// Charged on every step regardless of outcome.
    pub step_penalty: i64,

    /// Successful move onto a tableau column, from any source.
    pub tableau_move: i64,

    /// Successful move onto a foundation pile.
    pub foundation_move: i64,

    /// Every draw action.
    pub draw: i64,

    /// Added to `draw` when the stock is exhausted.
    pub stock_exhausted: i64,

    /// Per tableau card revealed by the auto-flip rule.
    pub flip: i64,

    /// Destination column outside the tableau.
    pub invalid_destination: i64,

    /// Waste or foundation card could not be moved to the tableau.
    pub single_card_rejected: i64,

    /// Tableau run addressed a missing or face-down card.
    pub invalid_run_source: i64,

    /// Non-King run onto an empty column.
    pub empty_column_needs_king: i64,

    /// Run does not stack on the destination's top card.
    pub run_not_stackable: i64,

    /// Card is not the next rank for its foundation pile.
    pub foundation_out_of_order: i64,

    /// Source had no card to send to the foundation.
    pub foundation_no_card: i64,
}

impl Default for RewardConfig {
    fn default() -> Self {
        Self {
            step_penalty: -1,
            tableau_move: 500,
            foundation_move: 130,
            draw: -70,
            stock_exhausted: -100,
            flip: 1600,
            invalid_destination: -10,
            single_card_rejected: -50,
            invalid_run_source: -100,
            empty_column_needs_king: -60,
            run_not_stackable: -40,
            foundation_out_of_order: -40,
            foundation_no_card: -60,
        }
    }
}

/// Environment configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvConfig {
    /// Seed for the shuffle stream. Reset with an explicit seed overrides it.
    pub seed: u64,

    /// Steps per episode before truncation.
    pub turn_budget: i64,

    /// Number of times the waste may be recycled into the stock.
    pub cycle_budget: i32,

    /// Reward table.
    pub rewards: RewardConfig,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            turn_budget: 400,
            cycle_budget: 3,
            rewards: RewardConfig::default(),
        }
    }
}

impl EnvConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the shuffle seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the per-episode step budget.
    pub fn with_turn_budget(mut self, turns: i64) -> Self {
        self.turn_budget = turns;
        self
    }

    /// Set the number of allowed stock recycles.
    pub fn with_cycle_budget(mut self, cycles: i32) -> Self {
        self.cycle_budget = cycles;
        self
    }

    /// Replace the reward table.
    pub fn with_rewards(mut self, rewards: RewardConfig) -> Self {
        self.rewards = rewards;
        self
    }
}
