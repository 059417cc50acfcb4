//! Action decoding: the 4-integer wire format and typed commands.
//!
//! On the wire an action is `[action_type, source_column, source_index,
//! dest_column]`:
//!
//! - `action_type`: 0 = move to tableau, 1 = draw, 2 = move to foundation
//! - `source_column`: 0-6 tableau, 7-10 foundation pile of suit `col - 7`,
//!   11 waste
//! - `source_index`: position within a tableau column (ignored otherwise)
//! - `dest_column`: tableau column (only read by action type 0)
//!
//! Internally everything works on [`Command`], a tagged union that makes
//! every source kind an explicit variant.
//!
//! ```
//! use klondike_env::core::{Command, Source};
//!
//! let cmd = Command::decode(&[0, 6, 6, 0]).unwrap();
//! assert_eq!(cmd, Command::MoveToTableau {
//!     source: Source::Tableau { column: 6, index: 6 },
//!     dest: 0,
//! });
//! assert!(Command::decode(&[3, 0, 0, 0]).is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::card::Suit;

/// Number of action types.
pub const ACTION_TYPES: usize = 3;
/// Number of addressable source columns.
pub const SOURCE_COLUMNS: usize = 12;
/// Number of addressable positions within a tableau column.
pub const SOURCE_INDICES: usize = 18;
/// Number of tableau destination columns.
pub const DEST_COLUMNS: usize = 7;
/// Size of the flat action space.
pub const ACTION_SPACE: usize = ACTION_TYPES * SOURCE_COLUMNS * SOURCE_INDICES * DEST_COLUMNS;

/// First source column addressing a foundation pile.
pub const FOUNDATION_SOURCE_BASE: usize = 7;
/// Source column addressing the waste.
pub const WASTE_SOURCE: usize = 11;

/// Raw action fields in wire order.
pub type RawAction = [i64; 4];

/// Malformed action input. The state is never touched when this is returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("action must have exactly 4 fields, got {0}")]
    WrongArity(usize),
    #[error("action type {0} out of range 0..=2")]
    ActionType(i64),
    #[error("source column {0} out of range 0..=11")]
    SourceColumn(i64),
    #[error("source index {0} out of range 0..=17")]
    SourceIndex(i64),
    #[error("destination column {0} out of range 0..=6")]
    DestColumn(i64),
    #[error("flat action index {0} out of range 0..4536")]
    FlatIndex(usize),
}

/// Where a moved card (or run) comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Source {
    /// The run `tableau[column][index..]`.
    Tableau { column: usize, index: usize },
    /// Top card of a foundation pile.
    Foundation { suit: Suit },
    /// Top card of the waste.
    Waste,
}

/// Coarse source classification, used for reward lookup and logging.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    Tableau,
    Foundation,
    Waste,
}

impl Source {
    #[must_use]
    pub fn kind(&self) -> SourceKind {
        match self {
            Source::Tableau { .. } => SourceKind::Tableau,
            Source::Foundation { .. } => SourceKind::Foundation,
            Source::Waste => SourceKind::Waste,
        }
    }

    /// Wire `(source_column, source_index)` for this source.
    #[must_use]
    pub fn to_wire(&self) -> (usize, usize) {
        match *self {
            Source::Tableau { column, index } => (column, index),
            Source::Foundation { suit } => (FOUNDATION_SOURCE_BASE + suit.index(), 0),
            Source::Waste => (WASTE_SOURCE, 0),
        }
    }

    fn from_wire(column: usize, index: usize) -> Self {
        match column {
            0..=6 => Source::Tableau { column, index },
            7..=10 => Source::Foundation {
                suit: Suit::ALL[column - FOUNDATION_SOURCE_BASE],
            },
            _ => Source::Waste,
        }
    }
}

/// A decoded, typed command.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Move a card or run onto tableau column `dest`.
    MoveToTableau { source: Source, dest: usize },
    /// Reveal the next stock card, recycling the waste if needed.
    DrawCard,
    /// Move the top card of `source` onto its suit's foundation pile.
    MoveToFoundation { source: Source },
}

fn check_range(value: i64, len: usize, err: fn(i64) -> DecodeError) -> Result<usize, DecodeError> {
    usize::try_from(value)
        .ok()
        .filter(|&v| v < len)
        .ok_or(err(value))
}

impl Command {
    /// Decode a raw action. Every field is range-checked for every type.
    pub fn decode(raw: &[i64]) -> Result<Self, DecodeError> {
        let &[action_type, source_column, source_index, dest_column] = raw else {
            return Err(DecodeError::WrongArity(raw.len()));
        };

        let action_type = check_range(action_type, ACTION_TYPES, DecodeError::ActionType)?;
        let column = check_range(source_column, SOURCE_COLUMNS, DecodeError::SourceColumn)?;
        let index = check_range(source_index, SOURCE_INDICES, DecodeError::SourceIndex)?;
        let dest = check_range(dest_column, DEST_COLUMNS, DecodeError::DestColumn)?;

        let source = Source::from_wire(column, index);
        Ok(match action_type {
            0 => Command::MoveToTableau { source, dest },
            1 => Command::DrawCard,
            _ => Command::MoveToFoundation { source },
        })
    }

    /// Decode an index into the flat action space.
    pub fn from_flat_index(flat: usize) -> Result<Self, DecodeError> {
        if flat >= ACTION_SPACE {
            return Err(DecodeError::FlatIndex(flat));
        }
        Self::decode(&unflatten(flat))
    }

    /// Canonical wire form. Fields a command does not read are zero.
    #[must_use]
    pub fn encode(&self) -> RawAction {
        match self {
            Command::MoveToTableau { source, dest } => {
                let (column, index) = source.to_wire();
                [0, column as i64, index as i64, *dest as i64]
            }
            Command::DrawCard => [1, 0, 0, 0],
            Command::MoveToFoundation { source } => {
                let (column, index) = source.to_wire();
                [2, column as i64, index as i64, 0]
            }
        }
    }
}

/// Flat index of in-range wire fields.
#[must_use]
pub fn flat_index(action_type: usize, column: usize, index: usize, dest: usize) -> usize {
    ((action_type * SOURCE_COLUMNS + column) * SOURCE_INDICES + index) * DEST_COLUMNS + dest
}

/// Wire fields for a flat index.
#[must_use]
pub fn unflatten(flat: usize) -> RawAction {
    let dest = flat % DEST_COLUMNS;
    let rest = flat / DEST_COLUMNS;
    let index = rest % SOURCE_INDICES;
    let rest = rest / SOURCE_INDICES;
    let column = rest % SOURCE_COLUMNS;
    let action_type = rest / SOURCE_COLUMNS;
    [action_type as i64, column as i64, index as i64, dest as i64]
}
