//! First-class action records for drop token.
//!
//! The action log is the authoritative history of a game. Turn order,
//! replay and the public move list are all derived from it.

use serde::{Deserialize, Serialize};

/// Identifier of a player, as supplied by the caller.
pub type PlayerId = String;

/// One entry of a game's action log.
///
/// Serializes as `{"type": "MOVE", "player": "...", "column": 3}` or
/// `{"type": "QUIT", "player": "..."}`. Columns are 1-indexed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum Action {
    /// A token dropped into a column.
    Move {
        /// The player who moved.
        player: PlayerId,
        /// The column the token was dropped into (1-indexed).
        column: usize,
    },
    /// A voluntary forfeit.
    Quit {
        /// The player who quit.
        player: PlayerId,
    },
}

impl Action {
    /// Returns the player who performed this action.
    pub fn player(&self) -> &str {
        match self {
            Action::Move { player, .. } | Action::Quit { player } => player,
        }
    }

    /// Returns true for a column drop.
    pub fn is_move(&self) -> bool {
        matches!(self, Action::Move { .. })
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Move { player, column } => write!(f, "{} -> column {}", player, column),
            Action::Quit { player } => write!(f, "{} quit", player),
        }
    }
}

/// Error raised by a game operation.
///
/// Every variant is an expected, recoverable outcome. None of them leave the
/// game partially modified.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum GameError {
    /// The game could not be created with the given parameters.
    #[display("Illegal configuration: {}", _0)]
    IllegalConfiguration(String),

    /// The game has already finished.
    #[display("Game is already over")]
    GameOver,

    /// The player is not part of this game.
    #[display("Player {} is not part of this game", _0)]
    UnknownPlayer(PlayerId),

    /// Another player is due to move.
    #[display("Not your turn. Waiting for player {}", expected)]
    NotYourTurn {
        /// The player who must move next.
        expected: PlayerId,
    },

    /// The column is outside `1..=size`.
    #[display("Column {} is out of range (1-{})", column, size)]
    InvalidColumn {
        /// Requested column.
        column: usize,
        /// Board size.
        size: usize,
    },

    /// The column has no empty cell left.
    #[display("Column {} is full", _0)]
    ColumnFull(usize),

    /// Quit was requested on a game that is not in progress.
    #[display("Game is not in a quittable state")]
    GameNotQuittable,

    /// History lookup past the end of the log (positions are 1-indexed).
    #[display("Move {} not found ({} recorded)", index, len)]
    IndexOutOfRange {
        /// Requested 1-indexed position.
        index: usize,
        /// Number of recorded actions.
        len: usize,
    },
}

impl std::error::Error for GameError {}
