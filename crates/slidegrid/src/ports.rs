//! Collaborator seams the engine talks to: best-score persistence and the
//! clock. Both are plain traits so tests can substitute deterministic
//! implementations.

use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::SystemTime;

use thiserror::Error;

/// Best-score persistence.
///
/// Failures never reach gameplay: the engine reads with a default-to-0
/// policy and logs (rather than propagates) save errors.
pub trait ScoreStore {
    fn load(&self) -> Result<u64, StoreError>;
    fn save(&mut self, best: u64) -> Result<(), StoreError>;
}

impl<T: ScoreStore + ?Sized> ScoreStore for Box<T> {
    fn load(&self) -> Result<u64, StoreError> {
        (**self).load()
    }
    fn save(&mut self, best: u64) -> Result<(), StoreError> {
        (**self).save(best)
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("best-score storage io: {0}")]
    Io(#[from] std::io::Error),
    #[error("best-score storage corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// In-memory store. Clones share the same slot, so a test can hand one
/// clone to the engine and observe saves through the other.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore(Arc<Mutex<u64>>);

impl MemoryStore {
    pub fn best(&self) -> u64 {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ScoreStore for MemoryStore {
    fn load(&self) -> Result<u64, StoreError> {
        Ok(self.best())
    }

    fn save(&mut self, best: u64) -> Result<(), StoreError> {
        *self.0.lock().unwrap_or_else(PoisonError::into_inner) = best;
        Ok(())
    }
}

/// Best scores kept in a small JSON file, one entry per store key.
///
/// A missing file means no best score yet and loads as 0; an unreadable or
/// corrupt file surfaces as an error for the engine to swallow.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    key: String,
}

impl JsonFileStore {
    pub fn new<P: Into<PathBuf>, K: Into<String>>(path: P, key: K) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }
}

impl ScoreStore for JsonFileStore {
    fn load(&self) -> Result<u64, StoreError> {
        if !self.path.exists() {
            return Ok(0);
        }
        let contents = fs::read_to_string(&self.path)?;
        let entries: HashMap<String, u64> = serde_json::from_str(&contents)?;
        Ok(entries.get(&self.key).copied().unwrap_or(0))
    }

    fn save(&mut self, best: u64) -> Result<(), StoreError> {
        let mut entries: HashMap<String, u64> = if self.path.exists() {
            // A corrupt file is rewritten rather than kept broken.
            serde_json::from_str(&fs::read_to_string(&self.path)?).unwrap_or_default()
        } else {
            HashMap::new()
        };
        entries.insert(self.key.clone(), best);
        fs::write(&self.path, serde_json::to_string_pretty(&entries)?)?;
        Ok(())
    }
}

/// Time source used for the game start timestamp and elapsed play time.
pub trait Clock {
    fn now(&self) -> SystemTime;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}
