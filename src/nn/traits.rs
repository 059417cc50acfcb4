//! Policy network trait and the uniform baseline.
//!
//! These define the interface between the environment and a policy
//! implementation (typically a network living in Python behind PyO3).

use serde::{Deserialize, Serialize};

use crate::core::ACTION_SPACE;

/// Encoded observation as a flat tensor for network input.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EncodedState {
    /// Flattened tensor data (row-major order).
    pub tensor: Vec<f32>,

    /// Shape of the tensor.
    pub shape: Vec<usize>,
}

impl EncodedState {
    /// Create a new encoded state.
    pub fn new(tensor: Vec<f32>, shape: Vec<usize>) -> Self {
        debug_assert_eq!(
            tensor.len(),
            shape.iter().product::<usize>(),
            "Tensor length must match shape product"
        );
        Self { tensor, shape }
    }

    /// Create a zero-filled encoded state with the given shape.
    pub fn zeros(shape: Vec<usize>) -> Self {
        let size = shape.iter().product();
        Self {
            tensor: vec![0.0; size],
            shape,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tensor.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tensor.is_empty()
    }

    /// Get element at a flat index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<f32> {
        self.tensor.get(index).copied()
    }
}

/// Policy network outputs action probabilities.
///
/// The output vector covers the whole flat action space; callers mask it
/// before sampling.
pub trait PolicyNetwork: Send + Sync {
    /// Predict action probabilities for the given state.
    fn predict(&self, encoded: &EncodedState) -> Vec<f32>;

    /// Batch prediction for multiple states (optional optimization).
    fn predict_batch(&self, encoded: &[EncodedState]) -> Vec<Vec<f32>> {
        encoded.iter().map(|e| self.predict(e)).collect()
    }
}

/// Uniform random policy (baseline for rollouts and tests).
#[derive(Clone, Debug)]
pub struct UniformPolicy {
    action_space_size: usize,
}

impl UniformPolicy {
    pub fn new(action_space_size: usize) -> Self {
        Self { action_space_size }
    }
}

impl Default for UniformPolicy {
    fn default() -> Self {
        Self::new(ACTION_SPACE)
    }
}

impl PolicyNetwork for UniformPolicy {
    fn predict(&self, _encoded: &EncodedState) -> Vec<f32> {
        if self.action_space_size == 0 {
            return vec![];
        }
        let prob = 1.0 / self.action_space_size as f32;
        vec![prob; self.action_space_size]
    }
}
