//! Move validation and execution.
//!
//! `execute` dispatches on the command and, for moves, on the source kind.
//! Every move is validated completely before anything is touched, and then
//! applied as a remove-from-source, insert-into-destination transfer. A
//! rejected move leaves the state exactly as it was.

use serde::{Deserialize, Serialize};

use crate::core::{Card, Command, GameState, Pile, Source, SourceKind, Suit, TABLEAU_COLUMNS};

/// Which kind of pile a move targeted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    Tableau,
    Foundation,
}

/// Why a well-formed move was refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rejection {
    /// Destination column outside the tableau.
    DestinationOutOfRange,
    /// The source has no card at the addressed position.
    NoCard,
    /// The addressed card is face-down.
    FaceDown,
    /// Run moved onto its own column.
    SameColumn,
    /// Only a King may start an empty column.
    NeedsKing,
    /// Foundation cards can only go onto a non-empty column.
    EmptyDestination,
    /// Wrong rank or same color as the destination's top card.
    NotStackable,
    /// Card is not the next rank for its foundation pile.
    OutOfOrder,
}

/// What a command did to the state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MoveOutcome {
    /// A run (or a single card) landed on a tableau column.
    MovedToTableau { source: SourceKind, cards: usize },
    /// A card landed on its foundation pile. `first_award` is true the
    /// first time this card has ever reached a foundation.
    MovedToFoundation { source: SourceKind, first_award: bool },
    /// A stock card was revealed onto the waste.
    Drew,
    /// The waste was turned over into a new stock.
    Recycled,
    /// Nothing left to draw or recycle.
    StockExhausted,
    /// The move was refused; the state is unchanged.
    Rejected {
        target: Target,
        source: SourceKind,
        reason: Rejection,
    },
}

impl MoveOutcome {
    /// Did the command change the state?
    #[must_use]
    pub fn is_applied(&self) -> bool {
        !matches!(self, MoveOutcome::Rejected { .. } | MoveOutcome::StockExhausted)
    }
}

/// Apply a command to the state.
pub fn execute(state: &mut GameState, command: &Command) -> MoveOutcome {
    match *command {
        Command::MoveToTableau { source, dest } => move_to_tableau(state, source, dest),
        Command::DrawCard => draw(state),
        Command::MoveToFoundation { source } => move_to_foundation(state, source),
    }
}

/// Check that `card` may be placed on `dest`.
fn check_placement(card: &Card, dest: &Pile) -> Result<(), Rejection> {
    match dest.back() {
        None if card.is_king() => Ok(()),
        None => Err(Rejection::NeedsKing),
        Some(top) if card.stacks_on(top) => Ok(()),
        Some(_) => Err(Rejection::NotStackable),
    }
}

/// Move the top card of `from` onto `to`.
fn transfer_top(from: &mut Pile, to: &mut Pile) -> bool {
    match from.pop_back() {
        Some(card) => {
            to.push_back(card);
            true
        }
        None => false,
    }
}

fn move_to_tableau(state: &mut GameState, source: Source, dest: usize) -> MoveOutcome {
    let result = if dest >= TABLEAU_COLUMNS {
        Err(Rejection::DestinationOutOfRange)
    } else {
        match source {
            Source::Tableau { column, index } => move_run(state, column, index, dest),
            Source::Waste => move_waste_card(state, dest),
            Source::Foundation { suit } => move_foundation_card(state, suit, dest),
        }
    };

    match result {
        Ok(cards) => MoveOutcome::MovedToTableau {
            source: source.kind(),
            cards,
        },
        Err(reason) => MoveOutcome::Rejected {
            target: Target::Tableau,
            source: source.kind(),
            reason,
        },
    }
}

/// Move the face-up run `tableau[column][index..]` onto `dest`.
fn move_run(
    state: &mut GameState,
    column: usize,
    index: usize,
    dest: usize,
) -> Result<usize, Rejection> {
    let first = state
        .tableau
        .get(column)
        .and_then(|pile| pile.get(index))
        .ok_or(Rejection::NoCard)?;
    if !first.face_up {
        return Err(Rejection::FaceDown);
    }
    if column == dest {
        return Err(Rejection::SameColumn);
    }
    check_placement(first, &state.tableau[dest])?;

    let run = state.tableau[column].split_off(index);
    let cards = run.len();
    state.tableau[dest].append(run);
    Ok(cards)
}

fn move_waste_card(state: &mut GameState, dest: usize) -> Result<usize, Rejection> {
    let card = state.waste.back().ok_or(Rejection::NoCard)?;
    check_placement(card, &state.tableau[dest])?;

    let moved = transfer_top(&mut state.waste, &mut state.tableau[dest]);
    debug_assert!(moved);
    Ok(1)
}

fn move_foundation_card(state: &mut GameState, suit: Suit, dest: usize) -> Result<usize, Rejection> {
    let pile = &state.foundation[suit.index()];
    let card = pile.back().ok_or(Rejection::NoCard)?;
    let top = state.tableau[dest].back().ok_or(Rejection::EmptyDestination)?;
    if !card.stacks_on(top) {
        return Err(Rejection::NotStackable);
    }

    let moved = transfer_top(&mut state.foundation[suit.index()], &mut state.tableau[dest]);
    debug_assert!(moved);
    Ok(1)
}

fn move_to_foundation(state: &mut GameState, source: Source) -> MoveOutcome {
    let kind = source.kind();
    let reject = |reason| MoveOutcome::Rejected {
        target: Target::Foundation,
        source: kind,
        reason,
    };

    let from = match source {
        Source::Tableau { column, .. } => match state.tableau.get_mut(column) {
            Some(pile) => pile,
            None => return reject(Rejection::NoCard),
        },
        Source::Waste => &mut state.waste,
        Source::Foundation { .. } => return reject(Rejection::NoCard),
    };

    let (rank, suit) = match from.back() {
        Some(card) if !card.face_up => return reject(Rejection::FaceDown),
        Some(card) => card.identity(),
        None => return reject(Rejection::NoCard),
    };

    let pile = &mut state.foundation[suit.index()];
    if pile.len() + 1 != rank as usize {
        return reject(Rejection::OutOfOrder);
    }

    let Some(mut card) = from.pop_back() else {
        return reject(Rejection::NoCard);
    };
    let first_award = !card.bonus_awarded;
    card.bonus_awarded = true;
    pile.push_back(card);

    MoveOutcome::MovedToFoundation {
        source: kind,
        first_award,
    }
}

/// Reveal the next stock card, or recycle the waste when the stock is empty.
fn draw(state: &mut GameState) -> MoveOutcome {
    if let Some(mut card) = state.stock.pop_back() {
        card.face_up = true;
        state.waste.push_back(card);
        return MoveOutcome::Drew;
    }

    if state.waste.is_empty() || state.cycle_budget <= 0 {
        tracing::debug!(
            cycle_budget = state.cycle_budget,
            waste = state.waste.len(),
            "stock exhausted"
        );
        return MoveOutcome::StockExhausted;
    }

    // Turning the waste over reverses it: the oldest drawn card is on top.
    while let Some(mut card) = state.waste.pop_back() {
        card.face_up = false;
        state.stock.push_back(card);
    }
    state.cycle_budget -= 1;
    tracing::debug!(
        cycle_budget = state.cycle_budget,
        stock = state.stock.len(),
        "waste recycled into stock"
    );
    MoveOutcome::Recycled
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EnvConfig;

    fn card(rank: u8, suit: Suit) -> Card {
        Card::revealed(rank, suit)
    }

    fn hidden(rank: u8, suit: Suit) -> Card {
        Card::new(rank, suit)
    }

    fn empty_state() -> GameState {
        GameState::empty(&EnvConfig::default())
    }

    fn to_tableau(source: Source, dest: usize) -> Command {
        Command::MoveToTableau { source, dest }
    }

    #[test]
    fn test_run_onto_matching_card() {
        let mut state = empty_state();
        state.tableau[0] = Pile::from(vec![hidden(2, Suit::Clubs), card(9, Suit::Hearts), card(8, Suit::Spades)]);
        state.tableau[1] = Pile::from(vec![card(10, Suit::Clubs)]);

        let outcome = execute(&mut state, &to_tableau(Source::Tableau { column: 0, index: 1 }, 1));

        assert_eq!(
            outcome,
            MoveOutcome::MovedToTableau { source: SourceKind::Tableau, cards: 2 }
        );
        assert_eq!(state.tableau[0].len(), 1);
        let ranks: Vec<_> = state.tableau[1].iter().map(|c| c.rank).collect();
        assert_eq!(ranks, vec![10, 9, 8]);
    }

    #[test]
    fn test_run_rejections_leave_state_unchanged() {
        let mut state = empty_state();
        state.tableau[0] = Pile::from(vec![hidden(2, Suit::Clubs), card(9, Suit::Hearts)]);
        state.tableau[1] = Pile::from(vec![card(10, Suit::Diamonds)]);
        let before = state.clone();

        let cases = [
            (Source::Tableau { column: 0, index: 1 }, 1, Rejection::NotStackable),
            (Source::Tableau { column: 0, index: 1 }, 2, Rejection::NeedsKing),
            (Source::Tableau { column: 0, index: 0 }, 1, Rejection::FaceDown),
            (Source::Tableau { column: 0, index: 5 }, 1, Rejection::NoCard),
            (Source::Tableau { column: 0, index: 1 }, 0, Rejection::SameColumn),
            (Source::Tableau { column: 0, index: 1 }, 7, Rejection::DestinationOutOfRange),
        ];

        for (source, dest, reason) in cases {
            let outcome = execute(&mut state, &to_tableau(source, dest));
            assert_eq!(
                outcome,
                MoveOutcome::Rejected { target: Target::Tableau, source: SourceKind::Tableau, reason }
            );
            assert_eq!(state.tableau, before.tableau);
        }
    }

    #[test]
    fn test_king_to_empty_from_each_source() {
        let mut state = empty_state();
        state.tableau[0] = Pile::from(vec![card(13, Suit::Spades)]);
        state.waste = Pile::from(vec![card(13, Suit::Hearts)]);
        for rank in 1..=13 {
            state.foundation[Suit::Clubs.index()].push_back(card(rank, Suit::Clubs));
        }

        let run = execute(&mut state, &to_tableau(Source::Tableau { column: 0, index: 0 }, 1));
        assert!(matches!(run, MoveOutcome::MovedToTableau { cards: 1, .. }));

        let waste = execute(&mut state, &to_tableau(Source::Waste, 2));
        assert!(matches!(waste, MoveOutcome::MovedToTableau { source: SourceKind::Waste, .. }));
        assert!(state.waste.is_empty());

        // Foundation cards need a non-empty destination.
        let foundation = execute(&mut state, &to_tableau(Source::Foundation { suit: Suit::Clubs }, 3));
        assert_eq!(
            foundation,
            MoveOutcome::Rejected {
                target: Target::Tableau,
                source: SourceKind::Foundation,
                reason: Rejection::EmptyDestination
            }
        );
    }

    #[test]
    fn test_waste_card_to_tableau() {
        let mut state = empty_state();
        state.tableau[3] = Pile::from(vec![card(5, Suit::Spades)]);
        state.waste = Pile::from(vec![card(4, Suit::Clubs), card(4, Suit::Diamonds)]);

        let outcome = execute(&mut state, &to_tableau(Source::Waste, 3));
        assert!(outcome.is_applied());
        assert_eq!(state.tableau[3].back().unwrap().identity(), (4, Suit::Diamonds));
        assert_eq!(state.waste_top().unwrap().identity(), (4, Suit::Clubs));

        let outcome = execute(&mut state, &to_tableau(Source::Waste, 3));
        assert_eq!(
            outcome,
            MoveOutcome::Rejected {
                target: Target::Tableau,
                source: SourceKind::Waste,
                reason: Rejection::NotStackable
            }
        );
    }

    #[test]
    fn test_foundation_card_back_to_tableau() {
        let mut state = empty_state();
        state.foundation[Suit::Hearts.index()] = Pile::from(vec![card(1, Suit::Hearts), card(2, Suit::Hearts)]);
        state.tableau[5] = Pile::from(vec![card(3, Suit::Spades)]);

        let outcome = execute(&mut state, &to_tableau(Source::Foundation { suit: Suit::Hearts }, 5));
        assert!(matches!(outcome, MoveOutcome::MovedToTableau { source: SourceKind::Foundation, .. }));
        assert_eq!(state.foundation[Suit::Hearts.index()].len(), 1);
        assert_eq!(state.tableau[5].len(), 2);
    }

    #[test]
    fn test_move_to_foundation_order() {
        let mut state = empty_state();
        state.tableau[0] = Pile::from(vec![card(2, Suit::Diamonds)]);
        state.tableau[1] = Pile::from(vec![card(1, Suit::Diamonds)]);

        let premature = execute(&mut state, &Command::MoveToFoundation {
            source: Source::Tableau { column: 0, index: 0 },
        });
        assert_eq!(
            premature,
            MoveOutcome::Rejected {
                target: Target::Foundation,
                source: SourceKind::Tableau,
                reason: Rejection::OutOfOrder
            }
        );

        for column in [1, 0] {
            let outcome = execute(&mut state, &Command::MoveToFoundation {
                source: Source::Tableau { column, index: 17 },
            });
            assert_eq!(
                outcome,
                MoveOutcome::MovedToFoundation { source: SourceKind::Tableau, first_award: true }
            );
        }
        assert_eq!(state.foundation_lengths(), [0, 2, 0, 0]);
        assert!(state.foundation[Suit::Diamonds.index()].iter().all(|c| c.bonus_awarded));
    }

    #[test]
    fn test_bonus_flag_only_first_time() {
        let mut state = empty_state();
        state.foundation[Suit::Spades.index()] = Pile::from(vec![card(1, Suit::Spades)]);
        let mut two = card(2, Suit::Spades);
        two.bonus_awarded = true;
        state.waste = Pile::from(vec![two]);

        let outcome = execute(&mut state, &Command::MoveToFoundation { source: Source::Waste });
        assert_eq!(
            outcome,
            MoveOutcome::MovedToFoundation { source: SourceKind::Waste, first_award: false }
        );
    }

    #[test]
    fn test_move_to_foundation_without_card() {
        let mut state = empty_state();
        for source in [
            Source::Waste,
            Source::Tableau { column: 2, index: 0 },
            Source::Foundation { suit: Suit::Hearts },
        ] {
            let outcome = execute(&mut state, &Command::MoveToFoundation { source });
            assert!(matches!(
                outcome,
                MoveOutcome::Rejected { target: Target::Foundation, reason: Rejection::NoCard, .. }
            ));
        }
    }

    #[test]
    fn test_draw_and_recycle() {
        let mut state = empty_state();
        state.cycle_budget = 1;
        state.stock = Pile::from(vec![hidden(1, Suit::Hearts), hidden(2, Suit::Hearts)]);

        assert_eq!(execute(&mut state, &Command::DrawCard), MoveOutcome::Drew);
        assert_eq!(execute(&mut state, &Command::DrawCard), MoveOutcome::Drew);
        assert_eq!(state.waste_top().unwrap().identity(), (1, Suit::Hearts));
        assert!(state.waste.iter().all(|c| c.face_up));

        assert_eq!(execute(&mut state, &Command::DrawCard), MoveOutcome::Recycled);
        assert_eq!(state.cycle_budget, 0);
        assert!(state.waste.is_empty());
        assert!(state.stock.iter().all(|c| !c.face_up));
        // Same draw order as the first pass.
        assert_eq!(state.stock.back().unwrap().identity(), (2, Suit::Hearts));

        execute(&mut state, &Command::DrawCard);
        execute(&mut state, &Command::DrawCard);
        assert_eq!(execute(&mut state, &Command::DrawCard), MoveOutcome::StockExhausted);
        assert_eq!(state.waste.len(), 2);
        assert_eq!(state.cycle_budget, 0);
    }

    #[test]
    fn test_draw_from_empty_table() {
        let mut state = empty_state();
        assert_eq!(execute(&mut state, &Command::DrawCard), MoveOutcome::StockExhausted);
        assert_eq!(state.cycle_budget, 3);
    }
}
