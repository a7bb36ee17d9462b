//! The per-game state machine.
//!
//! A [`Game`] owns one match: the board with its line totals, the action
//! log, and the terminal status. Every operation validates fully before it
//! mutates, so a rejected call leaves the game untouched.

use super::action::{Action, GameError, PlayerId};
#[cfg(debug_assertions)]
use super::invariants::assert_invariants;
use super::rules::{Verdict, evaluate, next_mover};
use super::types::{Board, Cell, GameStatus, Placement, Token};
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

/// Result of an accepted move.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct MoveOutcome {
    /// Where the token landed (zero-indexed, row 0 is the top row).
    pub placement: Placement,
    /// Status after the move.
    pub status: GameStatus,
    /// The winner, if this move completed a line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<PlayerId>,
}

/// Result of an accepted quit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct QuitOutcome {
    /// The player who quit.
    pub player: PlayerId,
    /// Status after the quit (always `DONE`).
    pub status: GameStatus,
}

/// Public status projection of a game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, new)]
pub struct GameStatusView {
    /// Both players, first mover first.
    pub players: [PlayerId; 2],
    /// Current status.
    pub state: GameStatus,
    /// Winner, present only when the game ended on a completed line.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winner: Option<PlayerId>,
}

/// One drop token match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "GameRecord", into = "GameRecord")]
pub struct Game {
    id: String,
    players: [PlayerId; 2],
    board: Board,
    log: Vec<Action>,
    status: GameStatus,
    winner: Option<PlayerId>,
}

impl Game {
    /// Creates a new game on an empty `size`×`size` board.
    ///
    /// `player_a` moves first and counts `+1` in the line totals.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::IllegalConfiguration`] if the players are the
    /// same or the size is zero.
    #[instrument]
    pub fn new(
        id: String,
        size: usize,
        player_a: PlayerId,
        player_b: PlayerId,
    ) -> Result<Self, GameError> {
        if player_a == player_b {
            warn!(player = %player_a, "Rejected game with duplicate players");
            return Err(GameError::IllegalConfiguration(
                "players must be distinct".to_string(),
            ));
        }
        if size == 0 {
            warn!("Rejected game with zero size");
            return Err(GameError::IllegalConfiguration(
                "board size must be at least 1".to_string(),
            ));
        }

        info!(game_id = %id, size, "Creating new game");
        Ok(Self {
            id,
            players: [player_a, player_b],
            board: Board::new(size),
            log: Vec::new(),
            status: GameStatus::InProgress,
            winner: None,
        })
    }

    /// Rebuilds a game by re-applying every record of `log` in order.
    ///
    /// # Errors
    ///
    /// Returns the first error any record produces, so a log that could not
    /// have been recorded by play is rejected.
    #[instrument(skip(log), fields(log_len = log.len()))]
    pub fn replay(
        id: String,
        size: usize,
        players: [PlayerId; 2],
        log: &[Action],
    ) -> Result<Self, GameError> {
        let [player_a, player_b] = players;
        let mut game = Self::new(id, size, player_a, player_b)?;

        for action in log {
            match action {
                Action::Move { player, column } => {
                    game.attempt_move(player, *column)?;
                }
                Action::Quit { player } => {
                    game.quit(player)?;
                }
            }
        }

        debug!(game_id = %game.id, status = %game.status, "Replayed game");
        Ok(game)
    }

    /// Drops `player`'s token into `column` (1-indexed).
    ///
    /// # Errors
    ///
    /// Checked in order: [`GameError::GameOver`], [`GameError::UnknownPlayer`],
    /// [`GameError::NotYourTurn`], [`GameError::InvalidColumn`],
    /// [`GameError::ColumnFull`].
    #[instrument(skip(self), fields(game_id = %self.id))]
    pub fn attempt_move(&mut self, player: &str, column: usize) -> Result<MoveOutcome, GameError> {
        if self.status == GameStatus::Done {
            warn!(player, "Move attempted on finished game");
            return Err(GameError::GameOver);
        }

        let token = self.token_of(player).ok_or_else(|| {
            warn!(player, "Unknown player attempted move");
            GameError::UnknownPlayer(player.to_string())
        })?;

        let expected = next_mover(&self.log, &self.players);
        if player != expected {
            warn!(player, expected, "Player tried to move out of turn");
            return Err(GameError::NotYourTurn {
                expected: expected.to_string(),
            });
        }

        let size = self.board.size();
        if column == 0 || column > size {
            warn!(player, column, size, "Column out of range");
            return Err(GameError::InvalidColumn { column, size });
        }

        let placement = self.board.drop_token(column - 1, token).ok_or_else(|| {
            warn!(player, column, "Column is full");
            GameError::ColumnFull(column)
        })?;

        self.log.push(Action::Move {
            player: player.to_string(),
            column,
        });

        match evaluate(&self.board, placement) {
            Verdict::Win => {
                self.status = GameStatus::Done;
                self.winner = Some(player.to_string());
                info!(player, "Game won");
            }
            Verdict::Draw => {
                self.status = GameStatus::Done;
                info!("Game ended in a draw");
            }
            Verdict::Continue => {}
        }

        #[cfg(debug_assertions)]
        assert_invariants(self);

        info!(
            player,
            column,
            row = placement.row,
            status = %self.status,
            "Move accepted"
        );

        Ok(MoveOutcome::new(placement, self.status, self.winner.clone()))
    }

    /// Records a voluntary forfeit by `player`. The game ends with no winner.
    ///
    /// # Errors
    ///
    /// [`GameError::UnknownPlayer`] for a non-participant,
    /// [`GameError::GameNotQuittable`] if the game is already over.
    #[instrument(skip(self), fields(game_id = %self.id))]
    pub fn quit(&mut self, player: &str) -> Result<QuitOutcome, GameError> {
        if self.token_of(player).is_none() {
            warn!(player, "Unknown player attempted quit");
            return Err(GameError::UnknownPlayer(player.to_string()));
        }
        if self.status != GameStatus::InProgress {
            warn!(player, "Quit attempted on finished game");
            return Err(GameError::GameNotQuittable);
        }

        self.log.push(Action::Quit {
            player: player.to_string(),
        });
        self.status = GameStatus::Done;
        self.winner = None;

        #[cfg(debug_assertions)]
        assert_invariants(self);

        info!(player, "Player quit");
        Ok(QuitOutcome::new(player.to_string(), self.status))
    }

    /// Returns the public status projection.
    pub fn status_view(&self) -> GameStatusView {
        GameStatusView::new(self.players.clone(), self.status, self.winner.clone())
    }

    /// Returns the 1-indexed entry of the action log.
    ///
    /// # Errors
    ///
    /// [`GameError::IndexOutOfRange`] if no such entry exists.
    pub fn move_at(&self, index: usize) -> Result<&Action, GameError> {
        index
            .checked_sub(1)
            .and_then(|i| self.log.get(i))
            .ok_or(GameError::IndexOutOfRange {
                index,
                len: self.log.len(),
            })
    }

    /// Returns the player due to move next, if the game is still running.
    pub fn to_move(&self) -> Option<&str> {
        match self.status {
            GameStatus::InProgress => Some(next_mover(&self.log, &self.players)),
            GameStatus::Done => None,
        }
    }

    /// Game identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Board side length.
    pub fn size(&self) -> usize {
        self.board.size()
    }

    /// Both players, first mover first.
    pub fn players(&self) -> &[PlayerId; 2] {
        &self.players
    }

    /// Current status.
    pub fn status(&self) -> GameStatus {
        self.status
    }

    /// Winner, if the game ended on a completed line.
    pub fn winner(&self) -> Option<&str> {
        self.winner.as_deref()
    }

    /// Full action log.
    pub fn moves(&self) -> &[Action] {
        &self.log
    }

    /// Read-only view of the board.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Copy of the grid, top row first.
    pub fn grid(&self) -> Vec<Vec<Cell>> {
        self.board.rows()
    }

    fn token_of(&self, player: &str) -> Option<Token> {
        if player == self.players[0] {
            Some(Token::First)
        } else if player == self.players[1] {
            Some(Token::Second)
        } else {
            None
        }
    }

    #[cfg(test)]
    pub(crate) fn log_mut(&mut self) -> &mut Vec<Action> {
        &mut self.log
    }
}

/// Persisted form of a [`Game`].
///
/// The grid and line totals are not stored; they are rebuilt by replaying
/// the log, and the stored status and winner must agree with the replay.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct GameRecord {
    id: String,
    size: usize,
    players: [PlayerId; 2],
    moves: Vec<Action>,
    status: GameStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    winner: Option<PlayerId>,
}

impl From<Game> for GameRecord {
    fn from(game: Game) -> Self {
        Self {
            size: game.board.size(),
            id: game.id,
            players: game.players,
            moves: game.log,
            status: game.status,
            winner: game.winner,
        }
    }
}

impl TryFrom<GameRecord> for Game {
    type Error = GameError;

    fn try_from(record: GameRecord) -> Result<Self, Self::Error> {
        let game = Game::replay(record.id, record.size, record.players, &record.moves)?;
        if game.status != record.status || game.winner != record.winner {
            return Err(GameError::IllegalConfiguration(format!(
                "stored state {} does not match replayed state {}",
                record.status, game.status
            )));
        }
        Ok(game)
    }
}
