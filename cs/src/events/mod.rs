//! Structured events describing scheduler activity
//!
//! Every scheduler operation returns the ordered sequence of [`Record`]s it
//! produced. The records are the single source of truth for observable
//! behavior: the text protocol renders them as `key=value` lines, the JSON
//! output serializes them, and the human-readable notices are derived from
//! them rather than emitted as independent side effects.

mod types;

pub use types::{ErrorReason, Event, Record, RejectReason};
