//! Rollout and training data bindings for Python.

use numpy::{PyArray1, PyArrayMethods};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyBytes, PyDict};

use crate::core::EnvConfig;
use crate::nn::{EncodedState, KlondikeEncoder, PolicyNetwork, UniformPolicy};
use crate::training::{ExperienceBuffer, RolloutConfig, RolloutWorker, Trajectory};

use super::py_env::observation_dict;

/// Python-implemented policy.
///
/// Wraps a callable taking a flat list of floats (the encoded observation)
/// and returning a list of 4536 action probabilities.
#[pyclass(name = "PolicyNetwork")]
pub struct PyPolicyNetwork {
    callback: PyObject,
}

#[pymethods]
impl PyPolicyNetwork {
    #[new]
    fn new(callback: PyObject) -> Self {
        Self { callback }
    }
}

impl PolicyNetwork for PyPolicyNetwork {
    fn predict(&self, encoded: &EncodedState) -> Vec<f32> {
        Python::with_gil(|py| {
            let result = self
                .callback
                .call1(py, (encoded.tensor.clone(),))
                .and_then(|r| r.extract::<Vec<f32>>(py));
            match result {
                Ok(probs) => probs,
                Err(e) => {
                    // Empty probabilities make the rollout fall back to drawing.
                    tracing::warn!(error = %e, "policy callback failed");
                    Vec::new()
                }
            }
        })
    }
}

// SAFETY: the callback is only touched inside `Python::with_gil`.
unsafe impl Send for PyPolicyNetwork {}
unsafe impl Sync for PyPolicyNetwork {}

/// Python wrapper for Trajectory.
#[pyclass(name = "Trajectory")]
#[derive(Clone)]
pub struct PyTrajectory(pub Trajectory);

#[pymethods]
impl PyTrajectory {
    #[getter]
    fn seed(&self) -> u64 {
        self.0.seed
    }

    #[getter]
    fn total_reward(&self) -> i64 {
        self.0.total_reward
    }

    #[getter]
    fn won(&self) -> bool {
        self.0.won
    }

    #[getter]
    fn truncated(&self) -> bool {
        self.0.truncated
    }

    /// Actions taken, as `[type, column, index, dest]` lists.
    #[getter]
    fn actions(&self) -> Vec<[i64; 4]> {
        self.0.actions().copied().collect()
    }

    #[getter]
    fn rewards(&self) -> Vec<i64> {
        self.0.steps.iter().map(|s| s.reward).collect()
    }

    /// Observation dict at a step.
    fn observation<'py>(&self, py: Python<'py>, index: usize) -> PyResult<Bound<'py, PyDict>> {
        let step = self
            .0
            .steps
            .get(index)
            .ok_or_else(|| PyValueError::new_err(format!("step {index} out of range")))?;
        observation_dict(py, &step.state)
    }

    /// Compact binary form.
    fn to_bytes<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyBytes>> {
        let bytes = self
            .0
            .to_bytes()
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(PyBytes::new_bound(py, &bytes))
    }

    #[staticmethod]
    fn from_bytes(bytes: &[u8]) -> PyResult<Self> {
        Trajectory::from_bytes(bytes)
            .map(Self)
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    fn __len__(&self) -> usize {
        self.0.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "Trajectory(steps={}, seed={}, total_reward={}, won={})",
            self.0.len(),
            self.0.seed,
            self.0.total_reward,
            self.0.won
        )
    }
}

/// Python wrapper for ExperienceBuffer.
#[pyclass(name = "ExperienceBuffer")]
pub struct PyExperienceBuffer(pub ExperienceBuffer);

#[pymethods]
impl PyExperienceBuffer {
    #[new]
    #[pyo3(signature = (max_trajectories = 10000))]
    fn new(max_trajectories: usize) -> Self {
        Self(ExperienceBuffer::new(max_trajectories))
    }

    fn push(&mut self, trajectory: &PyTrajectory) {
        self.0.push(trajectory.0.clone());
    }

    #[getter]
    fn total_steps(&self) -> usize {
        self.0.total_steps()
    }

    #[getter]
    fn win_rate(&self) -> f64 {
        self.0.win_rate()
    }

    #[getter]
    fn mean_reward(&self) -> f64 {
        self.0.mean_reward()
    }

    /// Sample transitions as numpy arrays `(states, actions, rewards)`.
    ///
    /// `states` is `[n, 6862]` float32, `actions` `[n, 4]` int64 and
    /// `rewards` `[n]` int64.
    #[allow(clippy::type_complexity)]
    fn sample_batch<'py>(
        &self,
        py: Python<'py>,
        batch_size: usize,
        seed: u64,
    ) -> PyResult<(
        Bound<'py, PyAny>,
        Bound<'py, PyAny>,
        Bound<'py, PyArray1<i64>>,
    )> {
        let batch = self.0.sample_batch(batch_size, seed);
        let n = batch.len();

        let mut states = Vec::with_capacity(n * KlondikeEncoder::FEATURES);
        let mut actions = Vec::with_capacity(n * 4);
        let mut rewards = Vec::with_capacity(n);
        for transition in &batch {
            states.extend(transition.state.to_encoded().tensor);
            actions.extend(transition.action);
            rewards.push(transition.reward);
        }

        let states = PyArray1::from_vec_bound(py, states).reshape([n, KlondikeEncoder::FEATURES])?;
        let actions = PyArray1::from_vec_bound(py, actions).reshape([n, 4])?;
        Ok((
            states.into_any(),
            actions.into_any(),
            PyArray1::from_vec_bound(py, rewards),
        ))
    }

    fn clear(&mut self) {
        self.0.clear();
    }

    fn __len__(&self) -> usize {
        self.0.len()
    }

    fn __repr__(&self) -> String {
        format!(
            "ExperienceBuffer(trajectories={}, capacity={}, steps={})",
            self.0.len(),
            self.0.capacity(),
            self.0.total_steps()
        )
    }
}

/// Rollout driver.
///
/// Plays episodes with a Python policy, or uniformly at random over the
/// action mask when no policy is given.
#[pyclass(name = "RolloutWorker")]
pub struct PyRolloutWorker {
    config: RolloutConfig,
    policy: Option<Py<PyPolicyNetwork>>,
}

#[pymethods]
impl PyRolloutWorker {
    #[new]
    #[pyo3(signature = (seed = 0, episodes = 1, turn_budget = 400, cycle_budget = 3, policy = None))]
    fn new(
        seed: u64,
        episodes: usize,
        turn_budget: i64,
        cycle_budget: i32,
        policy: Option<Py<PyPolicyNetwork>>,
    ) -> Self {
        let env = EnvConfig::new()
            .with_turn_budget(turn_budget)
            .with_cycle_budget(cycle_budget);
        let config = RolloutConfig::new()
            .with_seed(seed)
            .with_episodes(episodes)
            .with_env(env);
        Self { config, policy }
    }

    /// Play the configured number of episodes.
    fn run(&self, py: Python<'_>) -> Vec<PyTrajectory> {
        let trajectories = match &self.policy {
            Some(policy) => {
                let policy = PyPolicyNetwork {
                    callback: policy.borrow(py).callback.clone_ref(py),
                };
                RolloutWorker::new(policy, self.config.clone()).run()
            }
            None => RolloutWorker::new(UniformPolicy::default(), self.config.clone()).run(),
        };
        trajectories.into_iter().map(PyTrajectory).collect()
    }

    /// Play episodes straight into a buffer.
    fn fill_buffer(&self, py: Python<'_>, buffer: &mut PyExperienceBuffer) {
        for trajectory in self.run(py) {
            buffer.0.push(trajectory.0);
        }
    }
}
