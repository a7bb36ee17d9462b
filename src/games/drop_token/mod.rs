//! Drop token: two players take turns dropping tokens into the columns of a
//! square grid. The first player to own a full row, column or diagonal wins.

mod action;
mod game;
mod invariants;
mod rules;
mod types;

pub use action::{Action, GameError, PlayerId};
pub use game::{Game, GameStatusView, MoveOutcome, QuitOutcome};
pub use invariants::{
    DropTokenInvariants, HistoryConsistentInvariant, Invariant, InvariantSet,
    InvariantViolation, LineTotalsInvariant,
};
pub use rules::{Verdict, evaluate, next_mover};
pub use types::{Board, Cell, GameStatus, Placement, Token};
