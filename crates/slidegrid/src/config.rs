use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Construction-time engine configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Board side length; the grid is `size` x `size`.
    #[serde(default = "defaults::size")]
    pub size: usize,
    /// First merge value that triggers the win state.
    #[serde(default = "defaults::winning_tile")]
    pub winning_tile: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            size: defaults::size(),
            winning_tile: defaults::winning_tile(),
        }
    }
}

impl EngineConfig {
    /// Check the configuration before an engine is built from it.
    ///
    /// The winning tile must be reachable by merging, so it has to be a
    /// power of two no smaller than 4.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.size < 2 {
            return Err(ConfigError::SizeTooSmall(self.size));
        }
        if !self.winning_tile.is_power_of_two() || self.winning_tile < 4 {
            return Err(ConfigError::InvalidWinningTile(self.winning_tile));
        }
        Ok(())
    }

    /// Stable persistence key; boards of different size or target keep
    /// separate best scores.
    pub fn store_key(&self) -> String {
        format!("best.{0}x{0}.{1}", self.size, self.winning_tile)
    }
}

mod defaults {
    pub fn size() -> usize {
        4
    }
    pub fn winning_tile() -> u32 {
        2048
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid size must be at least 2, got {0}")]
    SizeTooSmall(usize),
    #[error("winning tile must be a power of two no smaller than 4, got {0}")]
    InvalidWinningTile(u32),
}
