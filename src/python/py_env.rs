//! Environment bindings for Python.

use numpy::{PyArray1, PyArrayMethods};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;

use crate::core::{EnvConfig, SOURCE_INDICES, TABLEAU_COLUMNS};
use crate::games::klondike::{KlondikeEnv, StepInfo};
use crate::nn::{Observation, CARD_ENCODING};
use crate::rules::Environment;

/// Observation as a dict of numpy arrays.
pub(crate) fn observation_dict<'py>(
    py: Python<'py>,
    obs: &Observation,
) -> PyResult<Bound<'py, PyDict>> {
    let tableau = PyArray1::from_slice_bound(py, &obs.tableau)
        .reshape([TABLEAU_COLUMNS, SOURCE_INDICES, CARD_ENCODING])?;
    let dict = PyDict::new_bound(py);
    dict.set_item("tableau", tableau)?;
    dict.set_item("foundation", PyArray1::from_slice_bound(py, &obs.foundation))?;
    dict.set_item("top_card", PyArray1::from_slice_bound(py, &obs.top_card))?;
    Ok(dict)
}

fn info_dict<'py>(py: Python<'py>, info: &StepInfo) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new_bound(py);
    if let Some(outcome) = &info.outcome {
        dict.set_item("outcome", format!("{outcome:?}"))?;
        dict.set_item("flipped", info.flipped.to_vec())?;
        dict.set_item("stock_exhausted", info.stock_exhausted)?;
        dict.set_item("first_award", info.first_award)?;
        dict.set_item("turns_left", info.turns_left)?;
        dict.set_item("cycles_left", info.cycles_left)?;
        dict.set_item("cumulative_reward", info.cumulative_reward)?;
    }
    Ok(dict)
}

/// Python wrapper for the Klondike environment.
///
/// Gym-style API: `reset` returns `(obs, info)`, `step` returns
/// `(obs, reward, done, truncated, info)`.
#[pyclass(name = "KlondikeEnv")]
pub struct PyKlondikeEnv(pub KlondikeEnv);

#[pymethods]
impl PyKlondikeEnv {
    /// Create a new environment.
    ///
    /// # Arguments
    /// - seed: Seed for the shuffle stream (default: 42)
    /// - turn_budget: Steps per episode before truncation (default: 400)
    /// - cycle_budget: Allowed waste recycles (default: 3)
    #[new]
    #[pyo3(signature = (seed = 42, turn_budget = 400, cycle_budget = 3))]
    fn new(seed: u64, turn_budget: i64, cycle_budget: i32) -> Self {
        let config = EnvConfig::new()
            .with_seed(seed)
            .with_turn_budget(turn_budget)
            .with_cycle_budget(cycle_budget);
        Self(KlondikeEnv::new(config))
    }

    /// Start a new episode. Passing a seed reseeds the shuffle stream.
    #[pyo3(signature = (seed = None))]
    fn reset<'py>(
        &mut self,
        py: Python<'py>,
        seed: Option<u64>,
    ) -> PyResult<(Bound<'py, PyDict>, Bound<'py, PyDict>)> {
        let (obs, info) = self.0.reset(seed);
        Ok((observation_dict(py, &obs)?, info_dict(py, &info)?))
    }

    /// Apply `[action_type, source_column, source_index, dest_column]`.
    ///
    /// Raises ValueError on malformed actions; the state is left untouched.
    #[allow(clippy::type_complexity)]
    fn step<'py>(
        &mut self,
        py: Python<'py>,
        action: Vec<i64>,
    ) -> PyResult<(Bound<'py, PyDict>, i64, bool, bool, Bound<'py, PyDict>)> {
        let result = self
            .0
            .step(&action)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok((
            observation_dict(py, &result.observation)?,
            result.reward,
            result.done,
            result.truncated,
            info_dict(py, &result.info)?,
        ))
    }

    /// 0/1 mask over the flat action space.
    fn action_mask<'py>(&self, py: Python<'py>) -> Bound<'py, PyArray1<u8>> {
        PyArray1::from_vec_bound(py, self.0.action_mask().to_u8())
    }

    /// Current observation without stepping.
    fn observe<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        observation_dict(py, &self.0.observe())
    }

    #[getter]
    fn action_space_size(&self) -> usize {
        self.0.action_space_size()
    }

    #[getter]
    fn turns_left(&self) -> i64 {
        self.0.state().turn_budget
    }

    #[getter]
    fn cumulative_reward(&self) -> i64 {
        self.0.state().cumulative_reward
    }

    fn __repr__(&self) -> String {
        let state = self.0.state();
        format!(
            "KlondikeEnv(foundation={:?}, stock={}, waste={}, turns_left={})",
            state.foundation_lengths(),
            state.stock.len(),
            state.waste.len(),
            state.turn_budget
        )
    }
}
