//! Engine module: the sliding-grid merge game core.
//!
//! - `state` holds the value types handed to hosting layers (`Tile`,
//!   `GameSnapshot`, move results) plus board rendering.
//! - `grid` is the owned cell matrix; callers only ever see copies.
//! - `GameEngine` drives the move algorithm: directional traversal,
//!   farthest-cell walk, exactly-once merges, spawn, win/loss detection.

mod grid;
pub mod state;

use std::time::{Duration, SystemTime};

use rand::Rng;
use tracing::{debug, warn};

use crate::config::{ConfigError, EngineConfig};
use crate::ports::{Clock, MemoryStore, ScoreStore, SystemClock};
use grid::Grid;

pub use state::{format_board, Direction, GameSnapshot, GameUpdate, MoveOutcome, Position, Tile};

/// The sliding-grid merge engine.
///
/// Owns the grid, score and lifecycle flags. Single-threaded and
/// synchronous; every public operation runs to completion. The random
/// source, best-score store and clock are injected so behavior is
/// reproducible under test.
pub struct GameEngine<R, S, C> {
    config: EngineConfig,
    grid: Grid,
    score: u64,
    best_score: u64,
    game_over: bool,
    won: bool,
    keep_playing: bool,
    move_count: u64,
    started_at: SystemTime,
    next_tile_id: u64,
    rng: R,
    store: S,
    clock: C,
}

impl GameEngine<rand::rngs::StdRng, MemoryStore, SystemClock> {
    /// Engine with an entropy-seeded RNG, in-memory best score and the
    /// system clock.
    pub fn with_defaults(config: EngineConfig) -> Result<Self, ConfigError> {
        use rand::SeedableRng;
        Self::new(
            config,
            rand::rngs::StdRng::from_entropy(),
            MemoryStore::default(),
            SystemClock,
        )
    }
}

impl<R: Rng, S: ScoreStore, C: Clock> GameEngine<R, S, C> {
    /// Build an engine from a validated configuration and its collaborator
    /// ports. The stored best score is loaded here; a failing store
    /// degrades to 0 and never blocks construction.
    pub fn new(config: EngineConfig, rng: R, store: S, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;
        let best_score = match store.load() {
            Ok(best) => best,
            Err(err) => {
                warn!("failed to load best score, defaulting to 0: {err}");
                0
            }
        };
        let started_at = clock.now();
        Ok(Self {
            grid: Grid::new(config.size),
            score: 0,
            best_score,
            game_over: false,
            won: false,
            keep_playing: false,
            move_count: 0,
            started_at,
            next_tile_id: 0,
            config,
            rng,
            store,
            clock,
        })
    }

    /// Reset score, flags and the grid, then place the two starting tiles.
    /// The best score carries over between games.
    pub fn new_game(&mut self) -> GameUpdate {
        self.grid.clear();
        self.score = 0;
        self.game_over = false;
        self.won = false;
        self.keep_playing = false;
        self.move_count = 0;
        self.started_at = self.clock.now();
        self.spawn_tile();
        self.spawn_tile();
        debug!(
            size = self.config.size,
            winning_tile = self.config.winning_tile,
            "new game"
        );
        GameUpdate {
            state: self.snapshot(),
            tiles: self.grid.tiles(),
        }
    }

    /// Slide and merge tiles toward `direction`.
    ///
    /// A move that cannot change the grid (or arrives after the game has
    /// ended) reports `moved: false` and spawns nothing. A successful move
    /// spawns one tile, updates and persists the best score, and runs
    /// game-over detection.
    pub fn make_move(&mut self, direction: Direction) -> MoveOutcome {
        if self.is_terminated() {
            return MoveOutcome {
                moved: false,
                state: self.snapshot(),
                tiles: self.grid.tiles(),
            };
        }

        self.prepare_tiles();
        let moved = self.sweep(direction);

        if moved {
            self.move_count += 1;
            self.spawn_tile();
            if self.score > self.best_score {
                self.best_score = self.score;
                if let Err(err) = self.store.save(self.best_score) {
                    warn!("failed to persist best score: {err}");
                }
            }
            if !self.moves_available() {
                self.game_over = true;
                debug!(score = self.score, moves = self.move_count, "no moves left");
            }
        }

        MoveOutcome {
            moved,
            state: self.snapshot(),
            tiles: self.grid.tiles(),
        }
    }

    /// Keep playing past the winning tile; the win state will not trigger
    /// again this game.
    pub fn continue_game(&mut self) -> GameSnapshot {
        self.keep_playing = true;
        self.snapshot()
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            size: self.config.size,
            score: self.score,
            best_score: self.best_score,
            highest_tile: self.grid.highest_value(),
            game_over: self.game_over,
            won: self.won,
            keep_playing: self.keep_playing,
            move_count: self.move_count,
            elapsed: self.elapsed(),
        }
    }

    /// Copy of the current tile list, row-major.
    pub fn tiles(&self) -> Vec<Tile> {
        self.grid.tiles()
    }

    /// Play time since `new_game`, per the injected clock.
    pub fn elapsed(&self) -> Duration {
        self.clock
            .now()
            .duration_since(self.started_at)
            .unwrap_or_default()
    }

    /// Moves are rejected once the game is over, and between winning and
    /// the caller electing to continue.
    fn is_terminated(&self) -> bool {
        self.game_over || (self.won && !self.keep_playing)
    }

    fn alloc_id(&mut self) -> u64 {
        let id = self.next_tile_id;
        self.next_tile_id += 1;
        id
    }

    /// Place one tile on a uniformly random empty cell: 2 with probability
    /// 0.9, 4 with probability 0.1. No-op on a full grid.
    fn spawn_tile(&mut self) {
        let Some(position) = self.grid.random_available_cell(&mut self.rng) else {
            return;
        };
        let value = if self.rng.gen_range(0..10) < 9 { 2 } else { 4 };
        let id = self.alloc_id();
        self.grid.insert(Tile::spawned(id, value, position));
    }

    /// Clear per-move markers and record where each tile starts the move.
    fn prepare_tiles(&mut self) {
        for tile in self.grid.tiles_mut() {
            tile.merged_from = None;
            tile.is_new = false;
            tile.previous_position = Some(tile.position);
        }
    }

    /// Row/column visitation order for a move. The axis facing the motion
    /// is reversed so tiles nearest the destination edge settle first; a
    /// single sweep then resolves every chain of slides and merges.
    fn traversals(&self, (dr, dc): (i32, i32)) -> (Vec<usize>, Vec<usize>) {
        let mut rows: Vec<usize> = (0..self.config.size).collect();
        let mut cols: Vec<usize> = (0..self.config.size).collect();
        if dr == 1 {
            rows.reverse();
        }
        if dc == 1 {
            cols.reverse();
        }
        (rows, cols)
    }

    /// Walk from `start` along `vector` while the next cell is in bounds
    /// and empty. Returns the farthest empty cell reached and the occupied
    /// cell that stopped the walk, if any.
    fn find_farthest(&self, start: Position, vector: (i32, i32)) -> (Position, Option<Position>) {
        let mut cell = start;
        loop {
            let next = match cell.step(vector) {
                Some(pos) if self.grid.within_bounds(pos) => pos,
                _ => return (cell, None),
            };
            if self.grid.get(next).is_some() {
                return (cell, Some(next));
            }
            cell = next;
        }
    }

    /// One pass over the grid in traversal order, sliding and merging
    /// toward `direction`. Returns whether anything moved. Grid mutations
    /// happen immediately, so which pairs merge on lines of three or more
    /// equal tiles follows the traversal order exactly.
    fn sweep(&mut self, direction: Direction) -> bool {
        let vector = direction.vector();
        let (rows, cols) = self.traversals(vector);
        let mut moved = false;

        for &row in &rows {
            for &col in &cols {
                let cell = Position { row, col };
                let Some(tile) = self.grid.get(cell).cloned() else {
                    continue;
                };
                let (farthest, next) = self.find_farthest(cell, vector);
                // A tile that already absorbed a merge this move cannot
                // merge again.
                let merge_into = next.filter(|&pos| {
                    self.grid
                        .get(pos)
                        .is_some_and(|other| other.value == tile.value && other.merged_from.is_none())
                });

                if let Some(target) = merge_into {
                    let (Some(mut moving), Some(resting)) =
                        (self.grid.remove(cell), self.grid.remove(target))
                    else {
                        continue;
                    };
                    let value = moving.value * 2;
                    moving.position = target;
                    let id = self.alloc_id();
                    self.grid
                        .insert(Tile::merged(id, value, target, [moving, resting]));
                    self.score += u64::from(value);
                    if value == self.config.winning_tile && !self.keep_playing {
                        self.won = true;
                        debug!(score = self.score, "winning tile reached");
                    }
                    moved = true;
                } else if farthest != cell {
                    if let Some(mut tile) = self.grid.remove(cell) {
                        tile.position = farthest;
                        self.grid.insert(tile);
                        moved = true;
                    }
                }
            }
        }

        moved
    }

    fn moves_available(&self) -> bool {
        self.grid.has_available() || self.matches_available()
    }

    /// Checking only the right and bottom neighbor of every tile covers
    /// each adjacent pair exactly once.
    fn matches_available(&self) -> bool {
        let size = self.config.size;
        for row in 0..size {
            for col in 0..size {
                let Some(tile) = self.grid.get(Position { row, col }) else {
                    continue;
                };
                let right = Position { row, col: col + 1 };
                if self
                    .grid
                    .get(right)
                    .is_some_and(|other| other.value == tile.value)
                {
                    return true;
                }
                let below = Position { row: row + 1, col };
                if self
                    .grid
                    .get(below)
                    .is_some_and(|other| other.value == tile.value)
                {
                    return true;
                }
            }
        }
        false
    }
}
