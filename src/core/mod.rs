//! Core types: cards, RNG, configuration, actions and game state.
//!
//! Everything here is rules-agnostic plumbing; legality and rewards live
//! in `rules`.

pub mod card;
pub mod rng;
pub mod config;
pub mod action;
pub mod state;

pub use card::{standard_deck, shuffled_deck, Card, Color, Suit, ACE, DECK_SIZE, KING};
pub use rng::GameRng;
pub use config::{EnvConfig, RewardConfig};
pub use action::{
    Command, DecodeError, RawAction, Source, SourceKind, ACTION_SPACE, ACTION_TYPES, DEST_COLUMNS,
    SOURCE_COLUMNS, SOURCE_INDICES,
};
pub use state::{GameState, Pile, StateError, FOUNDATION_PILES, TABLEAU_COLUMNS};
