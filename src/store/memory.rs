//! In-process game store.

use super::{GameStore, StoreError, StoreErrorKind};
use crate::games::drop_token::Game;
use std::collections::BTreeMap;
use std::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// Game store backed by a map in memory. Games are lost on exit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    games: Mutex<BTreeMap<String, Game>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[instrument]
    pub fn new() -> Self {
        info!("Creating in-memory game store");
        Self::default()
    }
}

impl GameStore for MemoryStore {
    #[instrument(skip(self))]
    fn list(&self) -> Result<Vec<String>, StoreError> {
        let games = self.games.lock().map_err(|_| StoreError::poisoned())?;
        let ids: Vec<_> = games.keys().cloned().collect();
        debug!(count = ids.len(), "Listed games");
        Ok(ids)
    }

    #[instrument(skip(self))]
    fn get(&self, id: &str) -> Result<Game, StoreError> {
        let games = self.games.lock().map_err(|_| StoreError::poisoned())?;
        games.get(id).cloned().ok_or_else(|| {
            debug!(game_id = id, "Game not found");
            StoreError::not_found(id)
        })
    }

    #[instrument(skip(self, game))]
    fn create(&self, id: &str, game: Game) -> Result<(), StoreError> {
        let mut games = self.games.lock().map_err(|_| StoreError::poisoned())?;
        if games.contains_key(id) {
            warn!(game_id = id, "Game already exists");
            return Err(StoreError::new(
                StoreErrorKind::AlreadyExists,
                format!("game '{}' already exists", id),
            ));
        }
        games.insert(id.to_string(), game);
        debug!(game_id = id, "Game stored");
        Ok(())
    }

    #[instrument(skip(self, game))]
    fn save(&self, id: &str, game: &Game) -> Result<(), StoreError> {
        let mut games = self.games.lock().map_err(|_| StoreError::poisoned())?;
        let slot = games.get_mut(id).ok_or_else(|| StoreError::not_found(id))?;
        *slot = game.clone();
        debug!(game_id = id, "Game saved");
        Ok(())
    }
}
