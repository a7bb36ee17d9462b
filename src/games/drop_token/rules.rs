//! Game rules for drop token.
//!
//! Pure functions over the action log and board. Kept apart from the
//! [`Game`](super::Game) struct so they can be tested on their own.

use super::action::Action;
use super::types::{Board, Placement};
use tracing::instrument;

/// Returns the player due to move next.
///
/// The player who did not make the most recent `MOVE` record moves next.
/// With no moves recorded, the first player of the pair moves.
#[instrument(skip(log), fields(log_len = log.len()))]
pub fn next_mover<'a>(log: &[Action], players: &'a [String; 2]) -> &'a str {
    let last_mover = log
        .iter()
        .rev()
        .find(|action| action.is_move())
        .map(Action::player);

    match last_mover {
        Some(player) if player == players[0] => &players[1],
        _ => &players[0],
    }
}

/// Result of evaluating the board after a token lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Play continues.
    Continue,
    /// The mover completed a line.
    Win,
    /// The board is full and no line was completed.
    Draw,
}

/// Evaluates the board after the token at `placement` landed.
///
/// Only lines through the new token can have just reached `±size`; any
/// other full line would already have ended the game.
#[instrument(skip(board))]
pub fn evaluate(board: &Board, placement: Placement) -> Verdict {
    if board.completes_line(placement) {
        Verdict::Win
    } else if board.is_full() {
        Verdict::Draw
    } else {
        Verdict::Continue
    }
}
