//! Cards, suits and the 52-card deck.
//!
//! A card's identity is its `(rank, suit)` pair. Exactly one instance of
//! each identity exists in a game, so `Card` is deliberately not `Copy`:
//! cards move between piles by ownership transfer.

use serde::{Deserialize, Serialize};

use super::rng::GameRng;

/// Rank of an Ace.
pub const ACE: u8 = 1;
/// Rank of a King.
pub const KING: u8 = 13;
/// Cards per suit.
pub const RANKS_PER_SUIT: usize = 13;
/// Cards in a full deck.
pub const DECK_SIZE: usize = 52;

/// Card color, used for the alternating-color stacking rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Black,
}

/// The four suits. Discriminants match the wire/observation encoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Suit {
    Hearts = 0,
    Diamonds = 1,
    Clubs = 2,
    Spades = 3,
}

impl Suit {
    /// All suits in index order.
    pub const ALL: [Suit; 4] = [Suit::Hearts, Suit::Diamonds, Suit::Clubs, Suit::Spades];

    /// Suit for an index in `0..4`.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Index in `0..4`.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Hearts and diamonds are red, clubs and spades black.
    #[must_use]
    pub const fn color(self) -> Color {
        match self {
            Suit::Hearts | Suit::Diamonds => Color::Red,
            Suit::Clubs | Suit::Spades => Color::Black,
        }
    }
}

/// A playing card with its mutable per-game flags.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Card {
    /// 1 = Ace .. 13 = King.
    pub rank: u8,

    pub suit: Suit,

    /// Is this card face-up?
    pub face_up: bool,

    /// Set the first time this card earns a foundation-move reward.
    /// Kept as metadata; it does not gate the reward.
    pub bonus_awarded: bool,
}

impl Card {
    /// Create a face-down card.
    #[must_use]
    pub fn new(rank: u8, suit: Suit) -> Self {
        debug_assert!((ACE..=KING).contains(&rank), "rank out of range: {rank}");
        Self {
            rank,
            suit,
            face_up: false,
            bonus_awarded: false,
        }
    }

    /// Create a face-up card.
    #[must_use]
    pub fn revealed(rank: u8, suit: Suit) -> Self {
        Self {
            face_up: true,
            ..Self::new(rank, suit)
        }
    }

    /// Identity index in `0..52`: `(rank - 1) + 13 * suit`.
    #[must_use]
    pub fn index(&self) -> usize {
        (self.rank - ACE) as usize + RANKS_PER_SUIT * self.suit.index()
    }

    /// The `(rank, suit)` identity.
    #[must_use]
    pub fn identity(&self) -> (u8, Suit) {
        (self.rank, self.suit)
    }

    #[must_use]
    pub fn color(&self) -> Color {
        self.suit.color()
    }

    #[must_use]
    pub fn is_king(&self) -> bool {
        self.rank == KING
    }

    /// Can `self` be placed on top of `below` in a tableau column?
    ///
    /// One rank lower and the opposite color.
    #[must_use]
    pub fn stacks_on(&self, below: &Card) -> bool {
        self.rank + 1 == below.rank && self.color() != below.color()
    }
}

impl std::fmt::Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rank = match self.rank {
            1 => "A".to_string(),
            11 => "J".to_string(),
            12 => "Q".to_string(),
            13 => "K".to_string(),
            r => r.to_string(),
        };
        let suit = match self.suit {
            Suit::Hearts => '♥',
            Suit::Diamonds => '♦',
            Suit::Clubs => '♣',
            Suit::Spades => '♠',
        };
        write!(f, "{rank}{suit}")
    }
}

/// All 52 cards, face-down, ordered by suit then rank.
#[must_use]
pub fn standard_deck() -> Vec<Card> {
    Suit::ALL
        .iter()
        .flat_map(|&suit| (ACE..=KING).map(move |rank| Card::new(rank, suit)))
        .collect()
}

/// A uniformly shuffled deck.
#[must_use]
pub fn shuffled_deck(rng: &mut GameRng) -> Vec<Card> {
    let mut deck = standard_deck();
    rng.shuffle(&mut deck);
    deck
}
