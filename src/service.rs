//! Game service: the glue between callers, games and the store.
//!
//! Every mutating call holds the game's own lock for the whole
//! load → mutate → save sequence, so two moves on one game never interleave.
//! Reads get an owned snapshot from the store.

use crate::config::BoardPolicy;
use crate::games::drop_token::{
    Action, Game, GameError, GameStatusView, MoveOutcome, PlayerId, QuitOutcome,
};
use crate::store::{GameStore, StoreError, StoreErrorKind};
use derive_more::{Display, From};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, instrument, warn};

const MAX_ID_ATTEMPTS: usize = 5;

/// Error returned by [`GameService`] operations.
#[derive(Debug, Display, From)]
pub enum ServiceError {
    /// No game with this identifier exists.
    #[display("Game {} not found", _0)]
    NotFound(String),

    /// The request was malformed before reaching any game.
    #[display("Invalid request: {}", _0)]
    InvalidRequest(String),

    /// The game rejected the operation.
    #[from]
    #[display("{}", _0)]
    Game(GameError),

    /// The store failed. For a mutation this means the change was applied
    /// in memory but may not be durable.
    #[from]
    #[display("{}", _0)]
    Store(StoreError),
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServiceError::Game(e) => Some(e),
            ServiceError::Store(e) => Some(e),
            ServiceError::NotFound(_) | ServiceError::InvalidRequest(_) => None,
        }
    }
}

/// Creates games and applies moves against a [`GameStore`].
#[derive(Debug, Clone)]
pub struct GameService {
    store: Arc<dyn GameStore>,
    policy: BoardPolicy,
    locks: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl GameService {
    /// Creates a service over `store`, admitting board sizes allowed by `policy`.
    #[instrument(skip(store))]
    pub fn new(store: Arc<dyn GameStore>, policy: BoardPolicy) -> Self {
        info!("Creating game service");
        Self {
            store,
            policy,
            locks: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Lists all game identifiers.
    #[instrument(skip(self))]
    pub fn list_games(&self) -> Result<Vec<String>, ServiceError> {
        let ids = self.store.list()?;
        info!(count = ids.len(), "Listed games");
        Ok(ids)
    }

    /// Creates a game and returns its new identifier.
    ///
    /// # Errors
    ///
    /// [`GameError::IllegalConfiguration`] for a size outside the policy or
    /// duplicate players, [`ServiceError::Store`] if the store fails.
    #[instrument(skip(self))]
    pub fn create_game(
        &self,
        size: usize,
        player_a: PlayerId,
        player_b: PlayerId,
    ) -> Result<String, ServiceError> {
        if !self.policy.allows(size) {
            warn!(size, "Board size rejected by policy");
            return Err(GameError::IllegalConfiguration(format!(
                "board size must be between {} and {}",
                self.policy.min_size(),
                self.policy.max_size()
            ))
            .into());
        }

        for attempt in 1..=MAX_ID_ATTEMPTS {
            let id = new_game_id();
            let game = Game::new(id.clone(), size, player_a.clone(), player_b.clone())?;
            match self.store.create(&id, game) {
                Ok(()) => {
                    info!(game_id = %id, size, "Game created");
                    return Ok(id);
                }
                Err(e) if e.kind == StoreErrorKind::AlreadyExists => {
                    debug!(game_id = %id, attempt, "Generated id collided, retrying");
                }
                Err(e) => return Err(e.into()),
            }
        }

        warn!("Could not allocate a unique game id");
        Err(StoreError::new(
            StoreErrorKind::AlreadyExists,
            "could not allocate a unique game id",
        )
        .into())
    }

    /// Returns a snapshot of a game.
    #[instrument(skip(self))]
    pub fn game(&self, id: &str) -> Result<Game, ServiceError> {
        self.store.get(id).map_err(|e| lookup_error(id, e))
    }

    /// Returns the status projection of a game.
    #[instrument(skip(self))]
    pub fn status(&self, id: &str) -> Result<GameStatusView, ServiceError> {
        Ok(self.game(id)?.status_view())
    }

    /// Returns the full action log of a game.
    #[instrument(skip(self))]
    pub fn moves(&self, id: &str) -> Result<Vec<Action>, ServiceError> {
        Ok(self.game(id)?.moves().to_vec())
    }

    /// Returns one 1-indexed entry of a game's action log.
    #[instrument(skip(self))]
    pub fn move_at(&self, id: &str, index: usize) -> Result<Action, ServiceError> {
        let game = self.game(id)?;
        Ok(game.move_at(index)?.clone())
    }

    /// Drops `player`'s token into `column` (1-indexed) and persists the game.
    #[instrument(skip(self))]
    pub fn submit_move(
        &self,
        id: &str,
        player: &str,
        column: usize,
    ) -> Result<MoveOutcome, ServiceError> {
        self.mutate(id, |game| game.attempt_move(player, column))
    }

    /// Records `player` quitting and persists the game.
    #[instrument(skip(self))]
    pub fn quit(&self, id: &str, player: &str) -> Result<QuitOutcome, ServiceError> {
        self.mutate(id, |game| game.quit(player))
    }

    /// Runs `op` on a fresh copy of the game while holding the game's lock,
    /// and saves the copy if `op` succeeded.
    fn mutate<T>(
        &self,
        id: &str,
        op: impl FnOnce(&mut Game) -> Result<T, GameError>,
    ) -> Result<T, ServiceError> {
        // Reject unknown ids before a lock entry is made for them.
        self.game(id)?;

        let lock = self.lock_for(id)?;
        let _guard = lock.lock().map_err(|_| StoreError::poisoned())?;

        let mut game = self.game(id)?;
        let outcome = op(&mut game)?;

        self.store.save(id, &game).map_err(|e| {
            warn!(game_id = id, error = %e, "Save failed after applying change");
            ServiceError::from(e)
        })?;
        debug!(game_id = id, "Game persisted");
        Ok(outcome)
    }

    fn lock_for(&self, id: &str) -> Result<Arc<Mutex<()>>, ServiceError> {
        let mut locks = self.locks.lock().map_err(|_| StoreError::poisoned())?;
        Ok(locks.entry(id.to_string()).or_default().clone())
    }
}

fn lookup_error(id: &str, err: StoreError) -> ServiceError {
    if err.is_not_found() {
        debug!(game_id = id, "Game not found");
        ServiceError::NotFound(id.to_string())
    } else {
        ServiceError::Store(err)
    }
}

fn new_game_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(7);
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn service() -> GameService {
        GameService::new(Arc::new(MemoryStore::new()), BoardPolicy::default())
    }

    #[test]
    fn test_created_game_is_listed() {
        let service = service();
        let id = service
            .create_game(4, "alice".to_string(), "bob".to_string())
            .unwrap();
        assert_eq!(id.len(), 7);
        assert_eq!(service.list_games().unwrap(), vec![id]);
    }

    #[test]
    fn test_size_outside_policy_rejected() {
        let service = service();
        let err = service
            .create_game(5, "alice".to_string(), "bob".to_string())
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Game(GameError::IllegalConfiguration(_))
        ));
        assert!(service.list_games().unwrap().is_empty());
    }

    #[test]
    fn test_unknown_game_is_not_found() {
        let service = service();
        assert!(matches!(
            service.submit_move("missing", "a", 1),
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(
            service.quit("missing", "a"),
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(service.status("missing"), Err(ServiceError::NotFound(_))));
    }

    #[test]
    fn test_rejected_move_is_not_persisted() {
        let service = service();
        let id = service.create_game(4, "a".to_string(), "b".to_string()).unwrap();
        assert!(service.submit_move(&id, "b", 1).is_err());
        assert!(service.moves(&id).unwrap().is_empty());
    }

    #[test]
    fn test_move_at_out_of_range() {
        let service = service();
        let id = service.create_game(4, "a".to_string(), "b".to_string()).unwrap();
        service.submit_move(&id, "a", 1).unwrap();
        assert!(service.move_at(&id, 1).is_ok());
        assert!(matches!(
            service.move_at(&id, 2),
            Err(ServiceError::Game(GameError::IndexOutOfRange { index: 2, len: 1 }))
        ));
    }
}
