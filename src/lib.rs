//! Drop token game server library.
//!
//! Two players take turns dropping tokens into the columns of a square grid;
//! the first to own a whole row, column or diagonal wins.
//!
//! # Architecture
//!
//! - **Games**: the per-game state machine ([`Game`]): turn order, legality,
//!   incremental win/draw detection and the authoritative action log
//! - **Store**: the [`GameStore`] trait with in-memory and JSON file backends
//! - **Service**: [`GameService`] serializes mutations per game and persists
//!   every accepted change
//! - **Server**: thin axum routes over the service
//!
//! # Example
//!
//! ```
//! use drop_token::{BoardPolicy, GameService, GameStatus, MemoryStore};
//! use std::sync::Arc;
//!
//! # fn example() -> Result<(), drop_token::ServiceError> {
//! let service = GameService::new(Arc::new(MemoryStore::new()), BoardPolicy::default());
//! let id = service.create_game(4, "alice".to_string(), "bob".to_string())?;
//! service.submit_move(&id, "alice", 1)?;
//! assert_eq!(service.status(&id)?.state, GameStatus::InProgress);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod games;
mod server;
mod service;
mod store;

// Crate-level exports - Configuration
pub use config::{AppConfig, BoardPolicy, ConfigError, ServerConfig, StoreConfig, StoreKind};

// Crate-level exports - Game types
pub use games::drop_token::{
    Action, Board, Cell, DropTokenInvariants, Game, GameError, GameStatus, GameStatusView,
    HistoryConsistentInvariant, Invariant, InvariantSet, InvariantViolation,
    LineTotalsInvariant, MoveOutcome, PlayerId, Placement, QuitOutcome, Token, Verdict,
    evaluate, next_mover,
};

// Crate-level exports - Persistence
pub use store::{GameStore, JsonFileStore, MemoryStore, StoreError, StoreErrorKind};

// Crate-level exports - Service and HTTP
pub use server::{
    CreateGameRequest, CreateGameResponse, GameListResponse, MoveListResponse, MoveRequest,
    router,
};
pub use service::{GameService, ServiceError};
