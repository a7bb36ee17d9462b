//! Game store mirrored to a JSON file.

use super::{GameStore, StoreError, StoreErrorKind};
use crate::games::drop_token::Game;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info, instrument, warn};

/// Game store that keeps every game in memory and rewrites one JSON file
/// after each create or save.
///
/// Each game is persisted as its identifier, size, players, status, winner
/// and action log. Loading replays the log, so a file whose log could not
/// have been produced by play is rejected.
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    games: Mutex<BTreeMap<String, Game>>,
}

impl JsonFileStore {
    /// Opens the store at `path`, loading existing games. A missing file
    /// starts an empty store; the file is created on the first write.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the file exists but cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();
        let games = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str::<BTreeMap<String, Game>>(&content)?
            }
        } else {
            debug!("Store file not found, starting empty");
            BTreeMap::new()
        };

        info!(count = games.len(), "Opened JSON file store");
        Ok(Self {
            path,
            games: Mutex::new(games),
        })
    }

    /// Writes the whole map to a sibling temp file, then renames it over the
    /// store file. The temp file is removed if either step fails.
    #[instrument(skip(self, games), fields(path = %self.path.display()))]
    fn flush(&self, games: &BTreeMap<String, Game>) -> Result<(), StoreError> {
        let json = serde_json::to_string_pretty(games)?;
        let tmp = self.path.with_extension("json.tmp");
        let written = std::fs::write(&tmp, json).and_then(|()| std::fs::rename(&tmp, &self.path));
        if let Err(e) = written {
            warn!(error = %e, "Failed to write store file");
            // Best effort: the temp file may not exist at all.
            let _ = std::fs::remove_file(&tmp);
            return Err(StoreError::from(e));
        }
        debug!(count = games.len(), "Store file written");
        Ok(())
    }
}

impl GameStore for JsonFileStore {
    #[instrument(skip(self))]
    fn list(&self) -> Result<Vec<String>, StoreError> {
        let games = self.games.lock().map_err(|_| StoreError::poisoned())?;
        Ok(games.keys().cloned().collect())
    }

    #[instrument(skip(self))]
    fn get(&self, id: &str) -> Result<Game, StoreError> {
        let games = self.games.lock().map_err(|_| StoreError::poisoned())?;
        games
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(id))
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
        if let Err(e) = self.flush(&games) {
            games.remove(id);
            return Err(e);
        }
        Ok(())
    }

    #[instrument(skip(self, game))]
    fn save(&self, id: &str, game: &Game) -> Result<(), StoreError> {
        let mut games = self.games.lock().map_err(|_| StoreError::poisoned())?;
        let slot = games.get_mut(id).ok_or_else(|| StoreError::not_found(id))?;
        let previous = std::mem::replace(slot, game.clone());
        if let Err(e) = self.flush(&games) {
            games.insert(id.to_string(), previous);
            return Err(e);
        }
        Ok(())
    }
}
