//! Integration tests for rollouts and training data collection.

use klondike_env::core::EnvConfig;
use klondike_env::games::klondike::KlondikeEnv;
use klondike_env::nn::{EncodedState, KlondikeEncoder, PolicyNetwork, StateEncoder, UniformPolicy};
use klondike_env::rules::Environment;
use klondike_env::training::{ExperienceBuffer, RolloutConfig, RolloutWorker, Trajectory};

fn config(episodes: usize) -> RolloutConfig {
    RolloutConfig::new()
        .with_seed(21)
        .with_episodes(episodes)
        .with_env(EnvConfig::default().with_turn_budget(60))
}

// =============================================================================
// Encoder Tests
// =============================================================================

#[test]
fn test_encoder_matches_env_observation() {
    let mut env = KlondikeEnv::default();
    let (obs, _) = env.reset(Some(4));
    assert_eq!(obs, KlondikeEncoder.encode(env.state()));
    assert_eq!(obs.to_encoded().shape, KlondikeEncoder.output_shape());
}

// =============================================================================
// Rollout Tests
// =============================================================================

/// Prefers foundation moves, then anything else.
struct GreedyFoundation;

impl PolicyNetwork for GreedyFoundation {
    fn predict(&self, _encoded: &EncodedState) -> Vec<f32> {
        (0..klondike_env::ACTION_SPACE)
            .map(|flat| if flat >= 2 * 12 * 18 * 7 { 100.0 } else { 1.0 })
            .collect()
    }
}

#[test]
fn test_rollout_with_custom_policy() {
    let mut worker = RolloutWorker::new(GreedyFoundation, config(2));
    let trajectories = worker.run();

    assert_eq!(trajectories.len(), 2);
    for traj in &trajectories {
        assert_eq!(traj.len(), 60);
        assert!(traj.truncated);
        let foundation_moves = traj.actions().filter(|a| a[0] == 2).count();
        assert!(foundation_moves > traj.len() / 2);
    }
}

#[test]
fn test_rollout_trajectory_replays() {
    let mut worker = RolloutWorker::new(UniformPolicy::default(), config(1));
    let traj = worker.run().remove(0);

    let mut env = KlondikeEnv::new(EnvConfig::default().with_turn_budget(60));
    env.reset(Some(traj.seed));
    let total: i64 = traj
        .actions()
        .map(|action| env.step(action).unwrap().reward)
        .sum();

    assert_eq!(total, traj.total_reward);
    assert_eq!(env.state().cumulative_reward, traj.total_reward);
}

// =============================================================================
// Serialization Tests
// =============================================================================

#[test]
fn test_trajectory_bincode_roundtrip() {
    let mut worker = RolloutWorker::new(UniformPolicy::default(), config(1));
    let traj = worker.run().remove(0);

    let bytes = traj.to_bytes().unwrap();
    let restored = Trajectory::from_bytes(&bytes).unwrap();
    assert_eq!(restored, traj);
}

#[test]
fn test_trajectory_json_records() {
    let mut worker = RolloutWorker::new(UniformPolicy::default(), config(1));
    let traj = worker.run().remove(0);

    let json = serde_json::to_value(&traj).unwrap();
    let first = &json["steps"][0];
    assert_eq!(first["action"].as_array().unwrap().len(), 4);
    assert_eq!(first["state"]["tableau"].as_array().unwrap().len(), 7 * 18 * 54);
    assert_eq!(first["state"]["foundation"], serde_json::json!([0, 0, 0, 0]));
    assert_eq!(json["seed"], traj.seed);
}

// =============================================================================
// Buffer Tests
// =============================================================================

#[test]
fn test_buffer_from_rollouts() {
    let mut buffer = ExperienceBuffer::new(3);
    let mut worker = RolloutWorker::new(UniformPolicy::default(), config(5));
    worker.fill_buffer(&mut buffer);

    assert_eq!(buffer.len(), 3);
    assert_eq!(buffer.total_steps(), 180);
    assert_eq!(buffer.win_rate(), 0.0);

    let batch = buffer.sample_batch(16, 0);
    assert_eq!(batch.len(), 16);
    assert!(batch.iter().all(|t| t.state.tableau.len() == 7 * 18 * 54));
}
