//! Task store backends for nudge.
//!
//! Two implementations of the scheduler's `TaskStore` seam:
//! - [`SqliteTaskStore`]: durable, one row per pending reminder
//! - [`MemoryTaskStore`]: non-persistent, for tests and ephemeral runs

mod memory;
mod sqlite;

pub use memory::MemoryTaskStore;
pub use sqlite::SqliteTaskStore;
