//! Read-only display snapshot of the scheduler

use std::fmt;

use serde::{Deserialize, Serialize};

/// Point-in-time view of the whole scheduler, produced by
/// [`Scheduler::snapshot`](super::Scheduler::snapshot).
///
/// The `Display` impl renders the `display ...` lines the text protocol
/// appends after every `RUN`; JSON output serializes the same structure.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Simulated clock at capture time
    pub time: u64,
    /// Queue the round-robin cursor points at; `None` when no queues exist
    pub next: Option<String>,
    /// Catalog entries sorted by item name
    pub menu: Vec<MenuEntry>,
    /// Queues in creation order
    pub queues: Vec<QueueView>,
}

/// One catalog entry in the snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntry {
    pub item: String,
    pub cost: u64,
}

/// One queue in the snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueView {
    pub id: String,
    pub len: usize,
    pub capacity: usize,
    pub skip: bool,
    /// Queued tasks front to back
    pub tasks: Vec<TaskView>,
}

/// One queued task in the snapshot.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskView {
    pub task: String,
    pub remaining: u64,
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let next = self.next.as_deref().unwrap_or("None");
        writeln!(f, "display time={} next={next}", self.time)?;

        let menu = self
            .menu
            .iter()
            .map(|entry| format!("{}:{}", entry.item, entry.cost))
            .collect::<Vec<_>>()
            .join(",");
        write!(f, "display menu=[{menu}]")?;

        for queue in &self.queues {
            let skip_tag = if queue.skip { " skip" } else { "" };
            let tasks = queue
                .tasks
                .iter()
                .map(|t| format!("{}:{}", t.task, t.remaining))
                .collect::<Vec<_>>()
                .join(",");
            write!(
                f,
                "\ndisplay {} [{}/{}]{skip_tag} -> [{tasks}]",
                queue.id, queue.len, queue.capacity
            )?;
        }
        Ok(())
    }
}
