//! Game state: the table layout plus episode budgets.
//!
//! ## Layout
//!
//! - `tableau`: 7 columns, bottom to top
//! - `foundation`: 4 piles indexed by suit, Ace first
//! - `stock`: face-down draw pile, top = end
//! - `waste`: face-up drawn cards, top = end
//!
//! Piles are `im::Vector`s so a whole `GameState` clones in O(1); callers
//! can snapshot a state for lookahead or rendering without copying cards.
//!
//! ## Invariants
//!
//! - Card conservation: the 52 identities appear exactly once across all piles,
//!   and every rank is in `1..=13`.
//! - Foundation order: a pile of length k holds ranks 1..=k of its suit.
//! - Stock cards are face-down, waste cards face-up, and face-down tableau
//!   cards only sit below face-up ones.
//!
//! `check_invariants` verifies all of these.

use im::Vector;
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::card::{shuffled_deck, Card, Suit, ACE, DECK_SIZE, KING};
use super::config::EnvConfig;
use super::rng::GameRng;

/// Number of tableau columns.
pub const TABLEAU_COLUMNS: usize = 7;
/// Number of foundation piles.
pub const FOUNDATION_PILES: usize = 4;

/// An ordered pile of cards, bottom to top.
pub type Pile = Vector<Card>;

/// Broken state invariant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StateError {
    #[error("expected 52 cards, found {0}")]
    CardCount(usize),
    #[error("card {0} has a rank outside 1..=13")]
    InvalidRank(Card),
    #[error("card {0} appears more than once")]
    DuplicateCard(Card),
    #[error("foundation {suit:?} holds {card} at position {position}")]
    FoundationOrder { suit: Suit, position: usize, card: Card },
    #[error("face-up card {0} in stock")]
    VisibleInStock(Card),
    #[error("face-down card {0} in waste")]
    HiddenInWaste(Card),
    #[error("tableau column {column} has a face-down card above a face-up card")]
    HiddenAboveVisible { column: usize },
}

/// Complete game state for one episode.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameState {
    pub tableau: [Pile; TABLEAU_COLUMNS],
    pub foundation: [Pile; FOUNDATION_PILES],
    pub stock: Pile,
    pub waste: Pile,

    /// Remaining waste-to-stock recycles.
    pub cycle_budget: i32,

    /// Remaining steps before truncation.
    pub turn_budget: i64,

    /// Sum of all rewards issued this episode.
    pub cumulative_reward: i64,

    /// All four foundations complete.
    pub terminal: bool,
}

impl GameState {
    /// A table with no cards and fresh budgets. Useful for building
    /// scenarios by hand.
    #[must_use]
    pub fn empty(config: &EnvConfig) -> Self {
        Self {
            tableau: std::array::from_fn(|_| Vector::new()),
            foundation: std::array::from_fn(|_| Vector::new()),
            stock: Vector::new(),
            waste: Vector::new(),
            cycle_budget: config.cycle_budget,
            turn_budget: config.turn_budget,
            cumulative_reward: 0,
            terminal: false,
        }
    }

    /// Deal a shuffled deck.
    #[must_use]
    pub fn new_shuffled(rng: &mut GameRng, config: &EnvConfig) -> Self {
        Self::deal_unchecked(shuffled_deck(rng), config)
    }

    /// Deal from an explicit deck ordering. Cards are taken from the end:
    /// column 0 gets the last card, column 1 the next two, and so on. The
    /// remainder becomes the stock.
    pub fn deal(deck: Vec<Card>, config: &EnvConfig) -> Result<Self, StateError> {
        let state = Self::deal_unchecked(deck, config);
        state.check_invariants()?;
        Ok(state)
    }

    fn deal_unchecked(mut deck: Vec<Card>, config: &EnvConfig) -> Self {
        let mut state = Self::empty(config);

        for (column, pile) in state.tableau.iter_mut().enumerate() {
            for _ in 0..=column {
                if let Some(mut card) = deck.pop() {
                    card.face_up = false;
                    pile.push_back(card);
                }
            }
            if let Some(top) = pile.back_mut() {
                top.face_up = true;
            }
        }

        state.stock = deck
            .into_iter()
            .map(|mut card| {
                card.face_up = false;
                card
            })
            .collect();
        state
    }

    /// Top card of the waste, if any.
    #[must_use]
    pub fn waste_top(&self) -> Option<&Card> {
        self.waste.back()
    }

    /// Length of each foundation pile.
    #[must_use]
    pub fn foundation_lengths(&self) -> [usize; FOUNDATION_PILES] {
        std::array::from_fn(|suit| self.foundation[suit].len())
    }

    /// All four foundation piles hold a King.
    #[must_use]
    pub fn foundations_complete(&self) -> bool {
        self.foundation.iter().all(|pile| pile.len() == KING as usize)
    }

    /// Iterate over every card on the table.
    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.tableau
            .iter()
            .chain(self.foundation.iter())
            .chain([&self.stock, &self.waste])
            .flat_map(|pile| pile.iter())
    }

    /// Verify the structural invariants listed in the module docs.
    pub fn check_invariants(&self) -> Result<(), StateError> {
        let mut seen = FxHashSet::default();
        let mut count = 0;
        for card in self.cards() {
            count += 1;
            if !(ACE..=KING).contains(&card.rank) {
                return Err(StateError::InvalidRank(card.clone()));
            }
            if !seen.insert(card.identity()) {
                return Err(StateError::DuplicateCard(card.clone()));
            }
        }
        if count != DECK_SIZE {
            return Err(StateError::CardCount(count));
        }

        for (suit, pile) in Suit::ALL.iter().zip(&self.foundation) {
            for (position, card) in pile.iter().enumerate() {
                if card.suit != *suit || card.rank as usize != position + 1 {
                    return Err(StateError::FoundationOrder {
                        suit: *suit,
                        position,
                        card: card.clone(),
                    });
                }
            }
        }

        if let Some(card) = self.stock.iter().find(|c| c.face_up) {
            return Err(StateError::VisibleInStock(card.clone()));
        }
        if let Some(card) = self.waste.iter().find(|c| !c.face_up) {
            return Err(StateError::HiddenInWaste(card.clone()));
        }

        for (column, pile) in self.tableau.iter().enumerate() {
            let hidden_after_visible = pile
                .iter()
                .skip_while(|c| !c.face_up)
                .any(|c| !c.face_up);
            if hidden_after_visible {
                return Err(StateError::HiddenAboveVisible { column });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::card::standard_deck;

    #[test]
    fn test_deal_shape() {
        let mut rng = GameRng::new(42);
        let state = GameState::new_shuffled(&mut rng, &EnvConfig::default());

        for (i, column) in state.tableau.iter().enumerate() {
            assert_eq!(column.len(), i + 1);
            let (top, rest) = (column.back().unwrap(), column.iter().take(i));
            assert!(top.face_up);
            for card in rest {
                assert!(!card.face_up);
            }
        }
        assert_eq!(state.stock.len(), 52 - 28);
        assert!(state.waste.is_empty());
        assert_eq!(state.foundation_lengths(), [0; 4]);
        assert!(state.check_invariants().is_ok());
    }

    #[test]
    fn test_deal_takes_from_end() {
        let deck = standard_deck();
        let last = deck[51].clone();
        let state = GameState::deal(deck, &EnvConfig::default()).unwrap();

        assert_eq!(state.tableau[0].back().unwrap().identity(), last.identity());
        // Column 6 is dealt cards 22..28 from the end, so its top is deck[24].
        assert_eq!(
            state.tableau[6].back().unwrap().identity(),
            standard_deck()[24].identity()
        );
    }

    #[test]
    fn test_deal_budgets_from_config() {
        let config = EnvConfig::default().with_turn_budget(9).with_cycle_budget(1);
        let state = GameState::deal(standard_deck(), &config).unwrap();

        assert_eq!(state.turn_budget, 9);
        assert_eq!(state.cycle_budget, 1);
        assert_eq!(state.cumulative_reward, 0);
        assert!(!state.terminal);
    }

    #[test]
    fn test_deal_rejects_short_deck() {
        let mut deck = standard_deck();
        deck.pop();
        assert_eq!(
            GameState::deal(deck, &EnvConfig::default()).unwrap_err(),
            StateError::CardCount(51)
        );
    }

    #[test]
    fn test_deal_rejects_duplicates() {
        let mut deck = standard_deck();
        deck[0] = deck[1].clone();
        assert!(matches!(
            GameState::deal(deck, &EnvConfig::default()),
            Err(StateError::DuplicateCard(_))
        ));
    }

    #[test]
    fn test_deal_rejects_out_of_range_ranks() {
        for rank in [0, 14] {
            let mut deck = standard_deck();
            deck[51] = Card { rank, ..deck[51].clone() };
            assert!(matches!(
                GameState::deal(deck, &EnvConfig::default()),
                Err(StateError::InvalidRank(card)) if card.rank == rank
            ));
        }
    }

    #[test]
    fn test_foundation_order_violation() {
        let mut state = GameState::deal(standard_deck(), &EnvConfig::default()).unwrap();
        let (index, _) = state
            .stock
            .iter()
            .enumerate()
            .find(|(_, c)| c.identity() == (2, Suit::Hearts))
            .unwrap();
        let mut two = state.stock.remove(index);
        two.face_up = true;
        state.foundation[Suit::Hearts.index()].push_back(two);

        assert!(matches!(
            state.check_invariants(),
            Err(StateError::FoundationOrder { suit: Suit::Hearts, position: 0, .. })
        ));
    }

    #[test]
    fn test_clone_is_independent() {
        let mut rng = GameRng::new(3);
        let state = GameState::new_shuffled(&mut rng, &EnvConfig::default());
        let mut snapshot = state.clone();
        snapshot.stock.pop_back();

        assert_eq!(state.stock.len(), 24);
        assert_eq!(snapshot.stock.len(), 23);
    }

    #[test]
    fn test_foundations_complete() {
        let mut state = GameState::empty(&EnvConfig::default());
        for suit in Suit::ALL {
            for rank in 1..=13 {
                state.foundation[suit.index()].push_back(Card::revealed(rank, suit));
            }
        }
        assert!(state.foundations_complete());
        assert!(state.check_invariants().is_ok());
    }
}
