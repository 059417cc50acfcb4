//! Policy-driven rollouts.
//!
//! Plays whole episodes by sampling from a policy's action probabilities,
//! restricted to the action mask, and records each one as a `Trajectory`.

use crate::core::{Command, EnvConfig, GameRng};
use crate::games::klondike::KlondikeEnv;
use crate::nn::PolicyNetwork;
use crate::rules::Environment;

use super::trajectory::{ExperienceBuffer, Trajectory, Transition};

/// Configuration for rollouts.
#[derive(Clone, Debug)]
pub struct RolloutConfig {
    /// Seed for the worker's stream. Each episode forks its own seed.
    pub seed: u64,

    /// Episodes played by `run`.
    pub episodes: usize,

    /// Environment settings for episodes created by `run`.
    pub env: EnvConfig,
}

impl Default for RolloutConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            episodes: 1,
            env: EnvConfig::default(),
        }
    }
}

impl RolloutConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the worker seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the number of episodes per `run`.
    pub fn with_episodes(mut self, episodes: usize) -> Self {
        self.episodes = episodes;
        self
    }

    /// Set the environment config.
    pub fn with_env(mut self, env: EnvConfig) -> Self {
        self.env = env;
        self
    }
}

/// Worker that plays episodes with a policy.
pub struct RolloutWorker<P: PolicyNetwork> {
    policy: P,
    config: RolloutConfig,
    rng: GameRng,
}

impl<P: PolicyNetwork> RolloutWorker<P> {
    pub fn new(policy: P, config: RolloutConfig) -> Self {
        let rng = GameRng::new(config.seed);
        Self { policy, config, rng }
    }

    pub fn config(&self) -> &RolloutConfig {
        &self.config
    }

    /// Play one episode on `env` until it is won or truncated.
    ///
    /// The episode is dealt from a seed forked off the worker's stream, so
    /// `trajectory.seed` plus its actions replay it exactly.
    pub fn play_episode(&mut self, env: &mut KlondikeEnv) -> Trajectory {
        let mut rng = self.rng.fork();
        let seed = rng.seed();
        let (mut observation, _) = env.reset(Some(seed));
        let mut trajectory = Trajectory::new(seed);

        loop {
            let mut probs = self.policy.predict(&observation.to_encoded());
            env.action_mask().apply(&mut probs);

            // Drawing is always addressable, so it backs up a degenerate policy.
            let command = rng
                .choose_weighted(&probs)
                .and_then(|flat| Command::from_flat_index(flat).ok())
                .unwrap_or(Command::DrawCard);

            let result = env.step_command(command);
            trajectory.push(Transition {
                state: observation,
                action: command.encode(),
                reward: result.reward,
            });
            let finished = result.is_finished();
            observation = result.observation;

            if finished {
                trajectory.won = result.done;
                trajectory.truncated = result.truncated;
                break;
            }
        }

        tracing::debug!(
            seed,
            steps = trajectory.len(),
            total_reward = trajectory.total_reward,
            won = trajectory.won,
            "rollout finished"
        );
        trajectory
    }

    /// Play `config.episodes` episodes on a fresh environment.
    pub fn run(&mut self) -> Vec<Trajectory> {
        let mut env = KlondikeEnv::new(self.config.env.clone());
        (0..self.config.episodes)
            .map(|_| self.play_episode(&mut env))
            .collect()
    }

    /// Play `config.episodes` episodes into a buffer.
    pub fn fill_buffer(&mut self, buffer: &mut ExperienceBuffer) {
        for trajectory in self.run() {
            buffer.push(trajectory);
        }
    }
}
