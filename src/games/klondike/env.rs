//! The Klondike environment.

use serde::{Deserialize, Serialize};

use crate::core::{Card, Command, DecodeError, EnvConfig, GameRng, GameState, StateError};
use crate::nn::{ActionMask, KlondikeEncoder, Observation, StateEncoder};
use crate::rules::{
    execute, reveal_exposed, Environment, Flipped, MoveOutcome, RewardPolicy, StepResult, TurnReward,
};

/// Diagnostics for one step.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepInfo {
    /// What the command did. `None` for the record returned by `reset`.
    pub outcome: Option<MoveOutcome>,
    /// Columns whose top card was flipped this step.
    pub flipped: Flipped,
    /// The draw found nothing to draw or recycle.
    pub stock_exhausted: bool,
    /// A card reached a foundation for the first time.
    pub first_award: bool,
    /// Reward breakdown.
    pub reward: TurnReward,
    pub turns_left: i64,
    pub cycles_left: i32,
    pub cumulative_reward: i64,
}

/// Result type returned by `KlondikeEnv::step`.
pub type KlondikeStep = StepResult<Observation, StepInfo>;

/// Single-player Klondike environment with reward shaping.
///
/// ```
/// use klondike_env::games::klondike::KlondikeEnv;
/// use klondike_env::rules::Environment;
/// use klondike_env::core::EnvConfig;
///
/// let mut env = KlondikeEnv::new(EnvConfig::default());
/// let (obs, _) = env.reset(Some(7));
/// assert_eq!(obs.foundation, [0; 4]);
///
/// let result = env.step(&[1, 0, 0, 0]).unwrap();
/// assert_eq!(result.reward, -71);
/// assert!(env.step(&[5, 0, 0, 0]).is_err());
/// ```
#[derive(Clone, Debug)]
pub struct KlondikeEnv {
    config: EnvConfig,
    rng: GameRng,
    state: GameState,
    encoder: KlondikeEncoder,
    rewards: RewardPolicy,
    /// Assert invariants after each step. Off for partial scenario states.
    checked: bool,
}

impl KlondikeEnv {
    /// Create an environment and deal the first episode from `config.seed`.
    pub fn new(config: EnvConfig) -> Self {
        let mut rng = GameRng::new(config.seed);
        let state = GameState::new_shuffled(&mut rng, &config);
        Self::assemble(config, rng, state)
    }

    /// Wrap an existing state, e.g. a hand-built scenario.
    pub fn from_state(state: GameState, config: EnvConfig) -> Self {
        let rng = GameRng::new(config.seed);
        Self::assemble(config, rng, state)
    }

    /// Deal from an explicit deck ordering.
    pub fn with_deck(deck: Vec<Card>, config: EnvConfig) -> Result<Self, StateError> {
        let state = GameState::deal(deck, &config)?;
        Ok(Self::from_state(state, config))
    }

    fn assemble(config: EnvConfig, rng: GameRng, state: GameState) -> Self {
        let rewards = RewardPolicy::new(config.rewards.clone());
        let checked = state.check_invariants().is_ok();
        Self {
            config,
            rng,
            state,
            encoder: KlondikeEncoder,
            rewards,
            checked,
        }
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Seed of the current shuffle stream.
    pub fn seed(&self) -> u64 {
        self.rng.seed()
    }

    /// Step with an already-decoded command.
    pub fn step_command(&mut self, command: Command) -> KlondikeStep {
        let was_terminal = self.state.terminal;

        let outcome = execute(&mut self.state, &command);
        if let MoveOutcome::Rejected { reason, .. } = outcome {
            tracing::debug!(?command, ?reason, "move rejected");
        }

        let flipped = reveal_exposed(&mut self.state);
        let reward = self.rewards.turn_reward(&outcome, flipped.len());
        let total = reward.total();

        self.state.cumulative_reward += total;
        self.state.turn_budget -= 1;
        self.state.terminal = self.state.foundations_complete();

        debug_assert!(
            !self.checked || self.state.check_invariants().is_ok(),
            "invariant broken after {command:?}: {:?}",
            self.state.check_invariants()
        );

        tracing::trace!(
            ?command,
            ?outcome,
            reward = total,
            turns_left = self.state.turn_budget,
            "step"
        );
        if self.state.terminal && !was_terminal {
            tracing::info!(
                cumulative_reward = self.state.cumulative_reward,
                turns_left = self.state.turn_budget,
                "episode won"
            );
        }

        let info = StepInfo {
            outcome: Some(outcome),
            flipped,
            stock_exhausted: outcome == MoveOutcome::StockExhausted,
            first_award: matches!(outcome, MoveOutcome::MovedToFoundation { first_award: true, .. }),
            reward,
            turns_left: self.state.turn_budget,
            cycles_left: self.state.cycle_budget,
            cumulative_reward: self.state.cumulative_reward,
        };

        StepResult {
            observation: self.encoder.encode(&self.state),
            reward: total,
            done: self.state.terminal,
            truncated: self.state.turn_budget <= 0,
            info,
        }
    }
}

impl Default for KlondikeEnv {
    fn default() -> Self {
        Self::new(EnvConfig::default())
    }
}

impl Environment for KlondikeEnv {
    type Observation = Observation;
    type Info = StepInfo;

    fn reset(&mut self, seed: Option<u64>) -> (Observation, StepInfo) {
        if let Some(seed) = seed {
            self.rng = GameRng::new(seed);
        }
        self.state = GameState::new_shuffled(&mut self.rng, &self.config);
        self.checked = true;
        tracing::info!(seed = ?seed, stream = self.rng.seed(), "episode reset");

        (self.observe(), StepInfo::default())
    }

    fn step(&mut self, action: &[i64]) -> Result<KlondikeStep, DecodeError> {
        let command = Command::decode(action)?;
        Ok(self.step_command(command))
    }

    fn action_mask(&self) -> ActionMask {
        ActionMask::compute(&self.state)
    }

    fn observe(&self) -> Observation {
        self.encoder.encode(&self.state)
    }

    fn action_space_size(&self) -> usize {
        self.encoder.action_space_size()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{standard_deck, Pile, Suit};

    #[test]
    fn test_reset_is_reproducible() {
        let mut a = KlondikeEnv::default();
        let mut b = KlondikeEnv::default();

        let (obs_a, _) = a.reset(Some(11));
        let (obs_b, _) = b.reset(Some(11));
        assert_eq!(obs_a, obs_b);
        assert_eq!(a.state().stock, b.state().stock);
    }

    #[test]
    fn test_reset_restores_budgets() {
        let mut env = KlondikeEnv::new(EnvConfig::default().with_turn_budget(5));
        for _ in 0..3 {
            env.step(&[1, 0, 0, 0]).unwrap();
        }
        assert_eq!(env.state().turn_budget, 2);

        let (_, info) = env.reset(None);
        assert_eq!(info, StepInfo::default());
        assert_eq!(env.state().turn_budget, 5);
        assert_eq!(env.state().cycle_budget, 3);
        assert_eq!(env.state().cumulative_reward, 0);
        assert!(env.state().waste.is_empty());
    }

    #[test]
    fn test_decode_error_leaves_state() {
        let mut env = KlondikeEnv::default();
        let before = env.state().clone();

        assert_eq!(env.step(&[0, 0, 0]).unwrap_err(), DecodeError::WrongArity(3));
        assert_eq!(env.step(&[0, 0, 0, 9]).unwrap_err(), DecodeError::DestColumn(9));
        assert_eq!(env.state().turn_budget, before.turn_budget);
        assert_eq!(env.state().cumulative_reward, 0);
    }

    #[test]
    fn test_draw_reward_and_info() {
        let mut env = KlondikeEnv::with_deck(standard_deck(), EnvConfig::default()).unwrap();
        let result = env.step_command(Command::DrawCard);

        assert_eq!(result.reward, -71);
        assert_eq!(result.info.outcome, Some(MoveOutcome::Drew));
        assert!(!result.info.stock_exhausted);
        assert_eq!(result.info.turns_left, 399);
        assert_eq!(result.info.cumulative_reward, -71);
        assert_eq!(env.state().waste.len(), 1);
    }

    #[test]
    fn test_flip_reward_after_run_move() {
        let mut state = GameState::empty(&EnvConfig::default());
        state.tableau[0] = Pile::from(vec![Card::new(2, Suit::Hearts), Card::revealed(12, Suit::Diamonds)]);
        state.tableau[1] = Pile::from(vec![Card::revealed(13, Suit::Clubs)]);
        let mut env = KlondikeEnv::from_state(state, EnvConfig::default());

        let result = env.step(&[0, 0, 1, 1]).unwrap();
        assert_eq!(result.reward, -1 + 500 + 1600);
        assert_eq!(result.info.flipped.as_slice(), &[0]);
        assert!(env.state().tableau[0][0].face_up);
    }

    #[test]
    fn test_info_serializes() {
        let mut env = KlondikeEnv::default();
        let result = env.step(&[1, 0, 0, 0]).unwrap();
        let json = serde_json::to_value(&result.info).unwrap();
        assert_eq!(json["turns_left"], 399);
        assert_eq!(json["outcome"], "Drew");
    }
}
