//! Round-robin scheduler over bounded queues
//!
//! Owns the ordered lanes, per-lane sequence counters and skip flags, the
//! persistent round-robin cursor, and the simulated clock that advances only
//! when real work happens.

mod core;
mod snapshot;
mod task;

pub use self::core::Scheduler;
pub use snapshot::{MenuEntry, QueueView, Snapshot, TaskView};
pub use task::Task;
