//! Python bindings for klondike-env.
//!
//! # Quick Start
//!
//! ```python
//! import klondike_env as ke
//!
//! env = ke.KlondikeEnv(seed=42)
//! obs, info = env.reset(seed=7)
//! mask = env.action_mask()
//!
//! obs, reward, done, truncated, info = env.step([1, 0, 0, 0])
//!
//! worker = ke.RolloutWorker(seed=1, episodes=8, turn_budget=200)
//! buffer = ke.ExperienceBuffer(1000)
//! worker.fill_buffer(buffer)
//! states, actions, rewards = buffer.sample_batch(32, seed=0)
//! ```

use pyo3::prelude::*;

mod py_env;
mod py_training;

pub use py_env::*;
pub use py_training::*;

/// klondike_env: Klondike solitaire environment for RL training.
#[pymodule]
fn klondike_env(m: &Bound<'_, PyModule>) -> PyResult<()> {
    // Environment
    m.add_class::<PyKlondikeEnv>()?;

    // Training types
    m.add_class::<PyPolicyNetwork>()?;
    m.add_class::<PyTrajectory>()?;
    m.add_class::<PyExperienceBuffer>()?;
    m.add_class::<PyRolloutWorker>()?;

    m.add("ACTION_SPACE", crate::core::ACTION_SPACE)?;

    Ok(())
}
