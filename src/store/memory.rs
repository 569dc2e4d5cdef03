//! In-memory tick store
//!
//! Backs the `once` dry-run command and the integration tests.

use super::TickStore;
use crate::error::CollectorError;
use crate::tick::Tick;
use async_trait::async_trait;
use parking_lot::Mutex;

/// Append-only store holding ticks in process memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    ticks: Mutex<Vec<Tick>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all stored ticks, in insertion order
    pub fn ticks(&self) -> Vec<Tick> {
        self.ticks.lock().clone()
    }

    /// Number of stored ticks
    pub fn len(&self) -> usize {
        self.ticks.lock().len()
    }

    /// True when nothing has been stored
    pub fn is_empty(&self) -> bool {
        self.ticks.lock().is_empty()
    }
}

#[async_trait]
impl TickStore for MemoryStore {
    async fn insert(&self, tick: &Tick) -> Result<(), CollectorError> {
        self.ticks.lock().push(tick.clone());
        Ok(())
    }
}
