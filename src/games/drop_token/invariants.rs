//! First-class invariants for drop token.
//!
//! Invariants are logical properties that must hold after every operation.
//! They are checked in debug builds and can be tested independently.

use super::action::Action;
use super::game::Game;
use super::types::{Cell, GameStatus};
#[cfg(debug_assertions)]
use tracing::{instrument, warn};

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2> InvariantSet<S> for (I1, I2)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();

        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }

        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

/// Invariant: stored line totals equal the sums recomputed from the grid,
/// and no total exceeds the board size in magnitude.
pub struct LineTotalsInvariant;

impl Invariant<Game> for LineTotalsInvariant {
    fn holds(game: &Game) -> bool {
        let board = game.board();
        let n = board.size();
        let value = |row: usize, column: usize| match board.get(row, column) {
            Some(Cell::Occupied(token)) => token.value(),
            _ => 0,
        };

        let rows: Vec<i32> = (0..n).map(|r| (0..n).map(|c| value(r, c)).sum()).collect();
        let cols: Vec<i32> = (0..n).map(|c| (0..n).map(|r| value(r, c)).sum()).collect();
        let main: i32 = (0..n).map(|i| value(i, i)).sum();
        let anti: i32 = (0..n).map(|i| value(i, n - 1 - i)).sum();

        let bound = n as i32;
        let within = board
            .row_totals()
            .iter()
            .chain(board.col_totals())
            .chain(board.diagonal_totals().iter())
            .all(|t| t.abs() <= bound);

        within
            && rows == board.row_totals()
            && cols == board.col_totals()
            && [main, anti] == board.diagonal_totals()
    }

    fn description() -> &'static str {
        "Line totals match the grid and stay within the board size"
    }
}

/// Invariant: the log alternates movers starting with the first player,
/// has one `MOVE` per filled cell, and a `QUIT` can only be the final,
/// terminating record.
pub struct HistoryConsistentInvariant;

impl Invariant<Game> for HistoryConsistentInvariant {
    fn holds(game: &Game) -> bool {
        let log = game.moves();
        let players = game.players();

        let movers: Vec<&str> = log
            .iter()
            .filter(|a| a.is_move())
            .map(Action::player)
            .collect();
        let alternates = movers
            .iter()
            .enumerate()
            .all(|(i, p)| *p == players[i % 2]);

        let quits = log.iter().filter(|a| !a.is_move()).count();
        let quit_is_last = match log.last() {
            Some(Action::Quit { .. }) => quits == 1 && game.status() == GameStatus::Done,
            _ => quits == 0,
        };

        alternates && quit_is_last && movers.len() == game.board().filled()
    }

    fn description() -> &'static str {
        "Movers alternate and every filled cell has exactly one MOVE record"
    }
}

/// All drop token invariants as a composable set.
pub type DropTokenInvariants = (LineTotalsInvariant, HistoryConsistentInvariant);

/// Asserts that all game invariants hold (panics on violation in debug builds).
#[cfg(debug_assertions)]
#[instrument(skip(game), fields(game_id = %game.id()))]
pub fn assert_invariants(game: &Game) {
    if let Err(violations) = DropTokenInvariants::check_all(game) {
        for v in &violations {
            warn!(violation = %v.description, "Invariant violated");
        }
        debug_assert!(violations.is_empty(), "Invariant violated: {:?}", violations);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn game() -> Game {
        Game::new("g".to_string(), 4, "a".to_string(), "b".to_string()).unwrap()
    }

    #[test]
    fn test_invariants_hold_for_new_game() {
        assert!(DropTokenInvariants::check_all(&game()).is_ok());
    }

    #[test]
    fn test_invariants_hold_after_moves_and_quit() {
        let mut game = game();
        game.attempt_move("a", 1).unwrap();
        game.attempt_move("b", 1).unwrap();
        game.attempt_move("a", 4).unwrap();
        assert!(DropTokenInvariants::check_all(&game).is_ok());

        game.quit("b").unwrap();
        assert!(DropTokenInvariants::check_all(&game).is_ok());
    }

    #[test]
    fn test_history_invariant_detects_forged_record() {
        let mut game = game();
        game.attempt_move("a", 2).unwrap();
        game.log_mut().push(Action::Move {
            player: "b".to_string(),
            column: 3,
        });

        assert!(!HistoryConsistentInvariant::holds(&game));
        assert!(LineTotalsInvariant::holds(&game));

        let violations = DropTokenInvariants::check_all(&game).unwrap_err();
        assert_eq!(violations.len(), 1);
    }
}
