//! Auto-flip: reveal face-down cards left on top of tableau columns.
//!
//! Runs after every command, applied or not. At most one card per column
//! is flipped per step.

use smallvec::SmallVec;

use crate::core::{GameState, TABLEAU_COLUMNS};

/// Columns flipped in one pass.
pub type Flipped = SmallVec<[usize; TABLEAU_COLUMNS]>;

/// Flip the top card of every column whose top is face-down.
pub fn reveal_exposed(state: &mut GameState) -> Flipped {
    let mut flipped = Flipped::new();
    for (column, pile) in state.tableau.iter_mut().enumerate() {
        if let Some(top) = pile.back_mut() {
            if !top.face_up {
                top.face_up = true;
                flipped.push(column);
            }
        }
    }
    flipped
}
