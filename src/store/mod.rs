//! Tick storage module
//!
//! Append-only persistence for collected ticks

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::PostgresStore;

use crate::error::CollectorError;
use crate::tick::Tick;
use async_trait::async_trait;

/// Trait for tick store implementations
#[async_trait]
pub trait TickStore: Send + Sync {
    /// Append one tick. Rows are never updated or deleted.
    async fn insert(&self, tick: &Tick) -> Result<(), CollectorError>;
}
