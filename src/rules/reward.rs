//! Reward policy: turns a step's outcome into a scalar reward.
//!
//! Turn reward = step penalty + move reward + flip reward × flipped columns.

use serde::{Deserialize, Serialize};

use crate::core::{RewardConfig, SourceKind};

use super::moves::{MoveOutcome, Rejection, Target};

/// Breakdown of one step's reward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReward {
    /// Flat per-step penalty.
    pub base: i64,
    /// Reward for the command's outcome.
    pub outcome: i64,
    /// Reward for cards revealed by the auto-flip rule.
    pub flips: i64,
}

impl TurnReward {
    #[must_use]
    pub fn total(&self) -> i64 {
        self.base + self.outcome + self.flips
    }
}

/// Maps outcomes to rewards using a `RewardConfig`.
#[derive(Clone, Debug, Default)]
pub struct RewardPolicy {
    config: RewardConfig,
}

impl RewardPolicy {
    pub fn new(config: RewardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RewardConfig {
        &self.config
    }

    /// Reward for a single command outcome, excluding the step penalty.
    #[must_use]
    pub fn outcome_reward(&self, outcome: &MoveOutcome) -> i64 {
        let c = &self.config;
        match *outcome {
            MoveOutcome::MovedToTableau { .. } => c.tableau_move,
            // The bonus flag is bookkeeping only; every foundation move pays.
            MoveOutcome::MovedToFoundation { .. } => c.foundation_move,
            MoveOutcome::Drew | MoveOutcome::Recycled => c.draw,
            MoveOutcome::StockExhausted => c.draw + c.stock_exhausted,
            MoveOutcome::Rejected { target, source, reason } => {
                self.rejection_reward(target, source, reason)
            }
        }
    }

    fn rejection_reward(&self, target: Target, source: SourceKind, reason: Rejection) -> i64 {
        let c = &self.config;
        match (target, source, reason) {
            (_, _, Rejection::DestinationOutOfRange) => c.invalid_destination,
            (Target::Tableau, SourceKind::Waste | SourceKind::Foundation, _) => {
                c.single_card_rejected
            }
            (Target::Tableau, SourceKind::Tableau, Rejection::NeedsKing) => {
                c.empty_column_needs_king
            }
            (Target::Tableau, SourceKind::Tableau, Rejection::NoCard | Rejection::FaceDown) => {
                c.invalid_run_source
            }
            (Target::Tableau, SourceKind::Tableau, _) => c.run_not_stackable,
            (Target::Foundation, _, Rejection::OutOfOrder) => c.foundation_out_of_order,
            (Target::Foundation, _, _) => c.foundation_no_card,
        }
    }

    /// Full breakdown for a step.
    #[must_use]
    pub fn turn_reward(&self, outcome: &MoveOutcome, flipped: usize) -> TurnReward {
        TurnReward {
            base: self.config.step_penalty,
            outcome: self.outcome_reward(outcome),
            flips: self.config.flip * flipped as i64,
        }
    }
}
