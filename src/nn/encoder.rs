//! Observation encoding.
//!
//! Transforms a `GameState` into a fixed-shape snapshot that hides the
//! identity of face-down cards, and flattens that snapshot into an
//! `EncodedState` tensor for network input.
//!
//! ## Layout
//!
//! Every card slot is a 54-wide one-hot vector:
//! - `0..52`: face-up card, index `(rank - 1) + 13 * suit`
//! - `52`: no card in this slot
//! - `53`: card present but face-down

use serde::{Deserialize, Serialize};

use crate::core::{Card, GameState, ACTION_SPACE, FOUNDATION_PILES, SOURCE_INDICES, TABLEAU_COLUMNS};
use crate::nn::traits::EncodedState;

/// Width of one card slot.
pub const CARD_ENCODING: usize = 54;
/// One-hot position marking an empty slot.
pub const EMPTY_SLOT: usize = 52;
/// One-hot position marking a face-down card.
pub const FACE_DOWN: usize = 53;
/// Encoded slots per tableau column.
pub const TABLEAU_SLOTS: usize = SOURCE_INDICES;

const TABLEAU_LEN: usize = TABLEAU_COLUMNS * TABLEAU_SLOTS * CARD_ENCODING;

/// One-hot position for a card slot.
fn slot_code(card: Option<&Card>) -> usize {
    match card {
        None => EMPTY_SLOT,
        Some(card) if card.face_up => card.index(),
        Some(_) => FACE_DOWN,
    }
}

/// Structured snapshot of the table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Observation {
    /// `[7, 18, 54]`, row-major.
    pub tableau: Vec<u8>,
    /// Length of each foundation pile.
    pub foundation: [u8; FOUNDATION_PILES],
    /// `[54]` one-hot of the waste top.
    pub top_card: Vec<u8>,
}

impl Observation {
    /// One-hot vector for a tableau slot, or `None` outside the 7x18 grid.
    #[must_use]
    pub fn slot(&self, column: usize, index: usize) -> Option<&[u8]> {
        if column >= TABLEAU_COLUMNS || index >= TABLEAU_SLOTS {
            return None;
        }
        let start = (column * TABLEAU_SLOTS + index) * CARD_ENCODING;
        self.tableau.get(start..start + CARD_ENCODING)
    }

    /// Hot position of a tableau slot.
    #[must_use]
    pub fn slot_code(&self, column: usize, index: usize) -> Option<usize> {
        self.slot(column, index).and_then(hot_position)
    }

    /// Hot position of the waste top.
    #[must_use]
    pub fn top_card_code(&self) -> Option<usize> {
        hot_position(&self.top_card)
    }

    /// Flatten into a single tensor: tableau, then foundation, then top card.
    #[must_use]
    pub fn to_encoded(&self) -> EncodedState {
        let mut tensor = Vec::with_capacity(KlondikeEncoder::FEATURES);
        tensor.extend(self.tableau.iter().map(|&v| f32::from(v)));
        tensor.extend(self.foundation.iter().map(|&v| f32::from(v)));
        tensor.extend(self.top_card.iter().map(|&v| f32::from(v)));
        EncodedState::new(tensor, vec![KlondikeEncoder::FEATURES])
    }
}

fn hot_position(one_hot: &[u8]) -> Option<usize> {
    one_hot.iter().position(|&v| v == 1)
}

/// Encodes game state into observations.
///
/// Each encoder defines:
/// - How to convert state into an observation
/// - The shape of the flattened tensor
/// - The size of the action space
pub trait StateEncoder: Send + Sync {
    /// Encode the game state. Face-down identities must not leak.
    fn encode(&self, state: &GameState) -> Observation;

    /// Get the shape of encoded tensors.
    fn output_shape(&self) -> Vec<usize>;

    /// Get the total number of possible actions.
    fn action_space_size(&self) -> usize;

    /// Encode straight to a tensor.
    fn encode_tensor(&self, state: &GameState) -> EncodedState {
        self.encode(state).to_encoded()
    }
}

/// Standard Klondike encoder.
///
/// Columns longer than 18 cards only have their first 18 slots encoded.
#[derive(Clone, Copy, Debug, Default)]
pub struct KlondikeEncoder;

impl KlondikeEncoder {
    /// Flattened tensor length: `7 * 18 * 54 + 4 + 54`.
    pub const FEATURES: usize = TABLEAU_LEN + FOUNDATION_PILES + CARD_ENCODING;

    pub fn new() -> Self {
        Self
    }
}

impl StateEncoder for KlondikeEncoder {
    fn encode(&self, state: &GameState) -> Observation {
        let mut tableau = vec![0u8; TABLEAU_LEN];
        for (column, pile) in state.tableau.iter().enumerate() {
            for index in 0..TABLEAU_SLOTS {
                let base = (column * TABLEAU_SLOTS + index) * CARD_ENCODING;
                tableau[base + slot_code(pile.get(index))] = 1;
            }
        }

        let foundation = std::array::from_fn(|suit| state.foundation[suit].len() as u8);

        let mut top_card = vec![0u8; CARD_ENCODING];
        top_card[slot_code(state.waste_top())] = 1;

        Observation {
            tableau,
            foundation,
            top_card,
        }
    }

    fn output_shape(&self) -> Vec<usize> {
        vec![Self::FEATURES]
    }

    fn action_space_size(&self) -> usize {
        ACTION_SPACE
    }
}
