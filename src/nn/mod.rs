//! Network-facing views of the game.
//!
//! ## Overview
//!
//! - **Encoding**: `StateEncoder` trait and the `KlondikeEncoder` implementation
//! - **Masking**: `ActionMask` over the 4536-entry flat action space
//! - **Policies**: `PolicyNetwork` trait and the `UniformPolicy` baseline
//!
//! ## Usage
//!
//! ```rust,ignore
//! use klondike_env::nn::{ActionMask, KlondikeEncoder, StateEncoder};
//!
//! let encoded = KlondikeEncoder.encode_tensor(&state);
//! let mut probs = policy.predict(&encoded);
//! ActionMask::compute(&state).apply(&mut probs);
//! ```

pub mod encoder;
pub mod mask;
pub mod traits;

pub use encoder::{KlondikeEncoder, Observation, StateEncoder, CARD_ENCODING, EMPTY_SLOT, FACE_DOWN};
pub use mask::ActionMask;
pub use traits::{EncodedState, PolicyNetwork, UniformPolicy};
