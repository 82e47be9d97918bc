//! Sliding-grid merge puzzle engine (the 2048-style core).
//!
//! - `engine` owns the grid, tiles, score and lifecycle flags, and exposes
//!   `new_game` / `make_move` / `continue_game`. Mutating operations return
//!   explicit state snapshots plus the full tile list; there is no callback
//!   registration.
//! - `config` is the construction-time configuration (board size, winning
//!   tile) with its validation.
//! - `ports` are the collaborator seams: best-score persistence and the
//!   clock. Randomness is injected as a `rand::Rng` owned by the engine, so
//!   seeded runs replay exactly.

pub mod config;
pub mod engine;
pub mod ports;

pub use config::{ConfigError, EngineConfig};
pub use engine::{
    format_board, Direction, GameEngine, GameSnapshot, GameUpdate, MoveOutcome, Position, Tile,
};
pub use ports::{Clock, JsonFileStore, MemoryStore, ScoreStore, StoreError, SystemClock};
