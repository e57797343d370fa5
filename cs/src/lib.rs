//! CafeSched - deterministic multi-queue round-robin scheduler simulation
//!
//! Clients enqueue named orders into capacity-bounded queues; the scheduler
//! grants each queue a bounded time slice (quantum) on its head-of-line
//! order, cycling through queues in creation order. A simulated clock
//! advances only by the work actually performed, so identical command
//! sequences always produce identical event streams.
//!
//! # Core Concepts
//!
//! - **Driven, never driving**: no component initiates work on its own;
//!   every operation is a discrete synchronous call that returns the events
//!   it produced
//! - **Persistent cursor**: the round-robin position survives across `RUN`
//!   invocations instead of resetting per call
//! - **One-shot skips**: a skip flag burns exactly one turn, even on a
//!   non-empty queue
//! - **Single event channel**: human-readable notices are derived from the
//!   structured events, not emitted as independent side effects
//!
//! # Modules
//!
//! - [`scheduler`] - the round-robin core: lanes, cursor, clock, turns
//! - [`events`] - the structured event vocabulary and renderings
//! - [`catalog`] - the static item -> cost menu
//! - [`protocol`] - the line-oriented command front end
//! - [`config`] - configuration types and loading
//! - [`cli`] - command-line interface

pub mod catalog;
pub mod cli;
pub mod config;
pub mod events;
pub mod protocol;
pub mod scheduler;

// Re-export commonly used types
pub use catalog::{Catalog, CatalogError};
pub use cli::{Cli, OutputFormat};
pub use config::Config;
pub use events::{ErrorReason, Event, Record, RejectReason};
pub use protocol::{ParseError, Session};
pub use scheduler::{MenuEntry, QueueView, Scheduler, Snapshot, Task, TaskView};
