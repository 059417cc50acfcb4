//! Action mask over the flat action space.
//!
//! A coarse pre-filter: it marks actions that address something real
//! (a face-up card, a non-empty pile) without checking destination
//! legality. The executor always re-derives legality, so a masked-in action
//! may still be rejected.

use serde::{Deserialize, Serialize};

use crate::core::action::{flat_index, FOUNDATION_SOURCE_BASE, WASTE_SOURCE};
use crate::core::{
    GameState, RawAction, ACTION_SPACE, ACTION_TYPES, DEST_COLUMNS, SOURCE_COLUMNS, SOURCE_INDICES,
};

const MOVE_TO_TABLEAU: usize = 0;
const DRAW: usize = 1;
const MOVE_TO_FOUNDATION: usize = 2;

/// Boolean mask indexed by flat action index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionMask {
    bits: Vec<bool>,
}

impl ActionMask {
    /// A mask with every action marked illegal.
    #[must_use]
    pub fn none() -> Self {
        Self {
            bits: vec![false; ACTION_SPACE],
        }
    }

    /// Build the mask for a state.
    #[must_use]
    pub fn compute(state: &GameState) -> Self {
        let mut mask = Self::none();

        for (column, pile) in state.tableau.iter().enumerate() {
            for (index, card) in pile.iter().take(SOURCE_INDICES).enumerate() {
                if card.face_up {
                    mask.mark_all_dests(MOVE_TO_TABLEAU, column, index);
                }
            }
        }
        for (offset, pile) in state.foundation.iter().enumerate() {
            if !pile.is_empty() {
                mask.mark_all_dests(MOVE_TO_TABLEAU, FOUNDATION_SOURCE_BASE + offset, 0);
            }
        }
        if !state.waste.is_empty() {
            mask.mark_all_dests(MOVE_TO_TABLEAU, WASTE_SOURCE, 0);
        }

        mask.bits[flat_index(DRAW, 0, 0, 0)] = true;

        let foundation_sources = state
            .tableau
            .iter()
            .enumerate()
            .filter(|(_, pile)| !pile.is_empty())
            .map(|(column, _)| column)
            .chain((!state.waste.is_empty()).then_some(WASTE_SOURCE));
        for column in foundation_sources {
            for index in 0..SOURCE_INDICES {
                mask.mark_all_dests(MOVE_TO_FOUNDATION, column, index);
            }
        }

        mask
    }

    fn mark_all_dests(&mut self, action_type: usize, column: usize, index: usize) {
        let start = flat_index(action_type, column, index, 0);
        self.bits[start..start + DEST_COLUMNS].fill(true);
    }

    /// Is the flat index marked?
    #[must_use]
    pub fn is_legal(&self, flat: usize) -> bool {
        self.bits.get(flat).copied().unwrap_or(false)
    }

    /// Is a raw action marked? Out-of-range fields are never marked.
    #[must_use]
    pub fn allows(&self, action: &RawAction) -> bool {
        let fields: Option<Vec<usize>> = action.iter().map(|&v| usize::try_from(v).ok()).collect();
        match fields.as_deref() {
            Some(&[t, c, i, d])
                if t < ACTION_TYPES && c < SOURCE_COLUMNS && i < SOURCE_INDICES && d < DEST_COLUMNS =>
            {
                self.is_legal(flat_index(t, c, i, d))
            }
            _ => false,
        }
    }

    /// Flat indices of marked actions, ascending.
    #[must_use]
    pub fn legal_indices(&self) -> Vec<usize> {
        self.bits
            .iter()
            .enumerate()
            .filter_map(|(i, &legal)| legal.then_some(i))
            .collect()
    }

    /// Number of marked actions.
    #[must_use]
    pub fn count(&self) -> usize {
        self.bits.iter().filter(|&&b| b).count()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bits.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bits.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[bool] {
        &self.bits
    }

    /// Mask as 0/1 bytes, for numpy.
    #[must_use]
    pub fn to_u8(&self) -> Vec<u8> {
        self.bits.iter().map(|&b| u8::from(b)).collect()
    }

    /// Zero out probabilities of unmarked actions. Extra entries past the
    /// action space are zeroed too.
    pub fn apply(&self, probs: &mut [f32]) {
        for (i, p) in probs.iter_mut().enumerate() {
            if !self.is_legal(i) {
                *p = 0.0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{standard_deck, Card, EnvConfig, Pile, Suit};

    fn dealt() -> GameState {
        GameState::deal(standard_deck(), &EnvConfig::default()).unwrap()
    }

    #[test]
    fn test_mask_covers_action_space() {
        let mask = ActionMask::compute(&dealt());
        assert_eq!(mask.len(), 4536);
        assert_eq!(mask.to_u8().len(), 4536);
    }

    #[test]
    fn test_initial_deal_mask() {
        let mask = ActionMask::compute(&dealt());

        // Top card of each column, all dests.
        for column in 0..7 {
            for dest in 0..7 {
                assert!(mask.allows(&[0, column, column, dest]));
            }
            if column > 0 {
                assert!(!mask.allows(&[0, column, 0, 0]));
            }
        }
        // Empty foundations and waste.
        for source in 7..=11 {
            assert!(!mask.allows(&[0, source, 0, 0]));
            assert!(!mask.allows(&[2, source, 0, 0]));
        }
        assert!(mask.allows(&[1, 0, 0, 0]));
        assert!(!mask.allows(&[1, 0, 0, 1]));

        let expected = 7 * 7 + 1 + 7 * 18 * 7;
        assert_eq!(mask.count(), expected);
        assert_eq!(mask.legal_indices().len(), expected);
    }

    #[test]
    fn test_single_card_sources() {
        let mut state = GameState::empty(&EnvConfig::default());
        state.waste = Pile::from(vec![Card::revealed(5, Suit::Hearts)]);
        state.foundation[Suit::Clubs.index()] = Pile::from(vec![Card::revealed(1, Suit::Clubs)]);

        let mask = ActionMask::compute(&state);
        for dest in 0..7 {
            assert!(mask.allows(&[0, 11, 0, dest]));
            assert!(mask.allows(&[0, 9, 0, dest]));
            assert!(!mask.allows(&[0, 11, 1, dest]));
        }
        assert!(mask.allows(&[2, 11, 17, 6]));
        assert!(!mask.allows(&[2, 9, 0, 0]));
        assert!(!mask.allows(&[0, 7, 0, 0]));
    }

    #[test]
    fn test_allows_rejects_out_of_range() {
        let mask = ActionMask::compute(&dealt());
        assert!(!mask.allows(&[-1, 0, 0, 0]));
        assert!(!mask.allows(&[0, 0, 0, 7]));
        assert!(!mask.allows(&[3, 0, 0, 0]));
        // Would alias the draw entry if unchecked.
        assert!(!mask.allows(&[0, 12, 0, 0]));
    }

    #[test]
    fn test_apply_zeroes_unmarked() {
        let mask = ActionMask::compute(&GameState::empty(&EnvConfig::default()));
        let mut probs = vec![1.0; ACTION_SPACE];
        mask.apply(&mut probs);

        assert_eq!(probs.iter().sum::<f32>(), 1.0);
        assert_eq!(probs[flat_index(1, 0, 0, 0)], 1.0);
    }
}
