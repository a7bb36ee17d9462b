//! Game persistence.
//!
//! The [`GameStore`] trait is the only contract the rest of the crate relies
//! on. Stores hand out owned copies of games; callers mutate their copy and
//! hand it back through [`GameStore::save`].

mod error;
mod file;
mod memory;

pub use error::{StoreError, StoreErrorKind};
pub use file::JsonFileStore;
pub use memory::MemoryStore;

use crate::games::drop_token::Game;

/// Maps game identifiers to games.
pub trait GameStore: Send + Sync + std::fmt::Debug {
    /// Lists every stored game identifier.
    fn list(&self) -> Result<Vec<String>, StoreError>;

    /// Returns a copy of the game stored under `id`.
    ///
    /// Fails with [`StoreErrorKind::NotFound`] if there is none.
    fn get(&self, id: &str) -> Result<Game, StoreError>;

    /// Stores a new game.
    ///
    /// Fails with [`StoreErrorKind::AlreadyExists`] if `id` is taken.
    fn create(&self, id: &str, game: Game) -> Result<(), StoreError>;

    /// Replaces the stored copy of an existing game.
    ///
    /// Fails with [`StoreErrorKind::NotFound`] if `id` was never created.
    fn save(&self, id: &str, game: &Game) -> Result<(), StoreError>;
}
