//! Task type for queued orders

/// One queued order: a stable identifier and its outstanding work units.
///
/// Tasks are owned exclusively by the queue holding them and are destroyed
/// when their remaining work reaches exactly zero during a turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Task {
    /// `<queue-id>-<seq>` with the sequence zero-padded to 3 digits
    pub id: String,
    /// Outstanding work units; 0 only transiently, during the finishing turn
    pub remaining: u64,
}

impl Task {
    /// Build a task for `queue_id` from its per-queue sequence number and
    /// the catalog cost of the ordered item.
    pub fn new(queue_id: &str, seq: u32, remaining: u64) -> Self {
        Self {
            id: format!("{queue_id}-{seq:03}"),
            remaining,
        }
    }
}
