//! Scheduler implementation

use std::collections::HashMap;

use ringqueue::BoundedQueue;
use tracing::debug;

use crate::catalog::Catalog;
use crate::events::{ErrorReason, Event, Record, RejectReason};

use super::snapshot::{MenuEntry, QueueView, Snapshot, TaskView};
use super::task::Task;

/// One queue record in the arena.
///
/// Lanes live in a `Vec` in creation order; that order *is* the round-robin
/// order and is append-only. Name lookup goes through the scheduler's
/// side index, keeping both O(1) access and stable iteration.
struct Lane {
    id: String,
    queue: BoundedQueue<Task>,
    /// Next task sequence number; starts at 1
    next_seq: u32,
    /// One-shot marker: the lane's next turn performs no work
    skip: bool,
}

/// The Scheduler owns the ordered lanes, the persistent round-robin cursor,
/// and the simulated clock, and services one discrete operation at a time.
///
/// Every operation returns the ordered [`Record`]s it emitted. The clock
/// only advances inside [`run`](Scheduler::run), by exactly the work
/// performed on a head task, so identical command sequences always produce
/// identical output.
pub struct Scheduler {
    /// Simulated clock; non-decreasing, starts at 0
    clock: u64,
    /// Lanes in creation order (the round-robin order)
    lanes: Vec<Lane>,
    /// Queue id -> arena slot
    index: HashMap<String, usize>,
    /// Round-robin cursor; always `< lanes.len()` when any lane exists
    cursor: usize,
    catalog: Catalog,
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new(Catalog::default())
    }
}

impl Scheduler {
    /// Create a scheduler over the given catalog.
    pub fn new(catalog: Catalog) -> Self {
        debug!(items = catalog.len(), "Scheduler::new: called");
        Self {
            clock: 0,
            lanes: Vec::new(),
            index: HashMap::new(),
            cursor: 0,
            catalog,
        }
    }

    /// Current simulated clock value.
    pub fn clock(&self) -> u64 {
        self.clock
    }

    /// Number of registered queues.
    pub fn queue_count(&self) -> usize {
        self.lanes.len()
    }

    /// Queue id the cursor currently points at, or `None` with no queues.
    pub fn next_queue(&self) -> Option<&str> {
        self.lanes.get(self.cursor).map(|lane| lane.id.as_str())
    }

    /// Create a queue with the given capacity.
    ///
    /// A second create with an existing id changes no state and emits no
    /// event. Capacity must be positive; the protocol boundary rejects
    /// non-positive capacities before they reach the core.
    pub fn create_queue(&mut self, queue_id: &str, capacity: usize) -> Vec<Record> {
        debug!(%queue_id, capacity, "Scheduler::create_queue: called");
        debug_assert!(capacity > 0, "caller must reject non-positive capacity");

        if self.index.contains_key(queue_id) {
            debug!(%queue_id, "Scheduler::create_queue: id exists, no-op");
            return Vec::new();
        }

        let slot = self.lanes.len();
        self.lanes.push(Lane {
            id: queue_id.to_string(),
            queue: BoundedQueue::new(capacity),
            next_seq: 1,
            skip: false,
        });
        self.index.insert(queue_id.to_string(), slot);

        vec![Record::at(
            self.clock,
            Event::Create {
                queue: queue_id.to_string(),
            },
        )]
    }

    /// Submit an order for `item` to `queue_id`.
    ///
    /// The item is resolved against the catalog before the queue is looked
    /// up, so an unknown item on an unknown queue reports `unknown_item`.
    pub fn enqueue(&mut self, queue_id: &str, item: &str) -> Vec<Record> {
        debug!(%queue_id, %item, "Scheduler::enqueue: called");

        let Some(cost) = self.catalog.cost(item) else {
            debug!(%item, "Scheduler::enqueue: unknown item, rejecting");
            return vec![Record::at(
                self.clock,
                Event::Reject {
                    queue: queue_id.to_string(),
                    reason: RejectReason::UnknownItem,
                },
            )];
        };

        let Some(&slot) = self.index.get(queue_id) else {
            debug!(%queue_id, "Scheduler::enqueue: unknown queue, rejecting");
            return vec![Record::at(
                self.clock,
                Event::Reject {
                    queue: queue_id.to_string(),
                    reason: RejectReason::UnknownQueue,
                },
            )];
        };

        let lane = &mut self.lanes[slot];
        // The sequence number is consumed even when the queue turns out to
        // be full, so a refused order leaves a gap in the id sequence.
        let seq = lane.next_seq;
        lane.next_seq += 1;

        let task = Task::new(queue_id, seq, cost);
        let task_id = task.id.clone();

        match lane.queue.push_back(task) {
            Ok(()) => {
                debug!(%queue_id, %task_id, remaining = cost, "Scheduler::enqueue: accepted");
                vec![Record::at(
                    self.clock,
                    Event::Enqueue {
                        queue: queue_id.to_string(),
                        task: task_id,
                        remaining: cost,
                    },
                )]
            }
            Err(_) => {
                debug!(%queue_id, "Scheduler::enqueue: queue full, rejecting");
                vec![Record::at(
                    self.clock,
                    Event::Reject {
                        queue: queue_id.to_string(),
                        reason: RejectReason::Full,
                    },
                )]
            }
        }
    }

    /// Mark `queue_id` to sit out its next turn.
    ///
    /// Idempotent; repeated calls before the next turn have the effect of
    /// one. An unknown queue changes no state and emits no event.
    pub fn mark_skip(&mut self, queue_id: &str) -> Vec<Record> {
        debug!(%queue_id, "Scheduler::mark_skip: called");

        let Some(&slot) = self.index.get(queue_id) else {
            debug!(%queue_id, "Scheduler::mark_skip: unknown queue, silent");
            return Vec::new();
        };

        self.lanes[slot].skip = true;
        vec![Record::at(
            self.clock,
            Event::Skip {
                queue: queue_id.to_string(),
            },
        )]
    }

    /// Execute round-robin turns.
    ///
    /// `quantum` is the most work units one turn may spend on a head task;
    /// it must be positive (the protocol boundary rejects the rest).
    /// `steps` defaults to one full rotation and must otherwise lie in
    /// `[1, queue_count]`; anything else yields a single `invalid_steps`
    /// error event and no work. With no queues the call emits nothing.
    ///
    /// The cursor advances every turn, including the last one of the call,
    /// so rotation resumes where it left off on the next invocation.
    pub fn run(&mut self, quantum: u64, steps: Option<i64>) -> Vec<Record> {
        debug!(quantum, ?steps, "Scheduler::run: called");
        debug_assert!(quantum > 0, "caller must reject non-positive quantum");

        let n = self.lanes.len();
        if n == 0 {
            debug!("Scheduler::run: no queues, nothing to do");
            return Vec::new();
        }

        if let Some(s) = steps {
            if s < 1 || s > n as i64 {
                debug!(steps = s, queues = n, "Scheduler::run: invalid steps");
                return vec![Record::at(
                    self.clock,
                    Event::Error {
                        reason: ErrorReason::InvalidSteps,
                    },
                )];
            }
        }

        let turns = steps.map(|s| s as usize).unwrap_or(n);
        let mut records = Vec::new();

        for _ in 0..turns {
            let lane = &mut self.lanes[self.cursor];
            records.push(Record::at(
                self.clock,
                Event::Run { queue: lane.id.clone() },
            ));

            if lane.skip {
                // Skip wins over work even when the lane has tasks; the
                // flag is consumed by this one observation.
                debug!(queue = %lane.id, "Scheduler::run: skipping turn");
                lane.skip = false;
            } else if let Some(task) = lane.queue.front_mut() {
                let work = task.remaining.min(quantum);
                task.remaining -= work;
                let task_id = task.id.clone();
                let rem = task.remaining;

                self.clock += work;
                records.push(Record::at(
                    self.clock,
                    Event::Work {
                        queue: lane.id.clone(),
                        task: task_id.clone(),
                        ran: work,
                        rem,
                    },
                ));

                if rem == 0 {
                    debug!(queue = %lane.id, task = %task_id, "Scheduler::run: task finished");
                    lane.queue.pop_front();
                    records.push(Record::at(
                        self.clock,
                        Event::Finish {
                            queue: lane.id.clone(),
                            task: task_id,
                        },
                    ));
                }
            }
            // Empty and not skipped: the run event already said whose turn
            // it was; the clock stays put.

            self.cursor = (self.cursor + 1) % n;
        }

        records
    }

    /// Read-only snapshot for display; mutates nothing.
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            time: self.clock,
            next: self.next_queue().map(str::to_string),
            menu: self
                .catalog
                .iter()
                .map(|(item, cost)| MenuEntry {
                    item: item.to_string(),
                    cost,
                })
                .collect(),
            queues: self
                .lanes
                .iter()
                .map(|lane| QueueView {
                    id: lane.id.clone(),
                    len: lane.queue.len(),
                    capacity: lane.queue.capacity(),
                    skip: lane.skip,
                    tasks: lane
                        .queue
                        .iter()
                        .map(|task| TaskView {
                            task: task.id.clone(),
                            remaining: task.remaining,
                        })
                        .collect(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sched() -> Scheduler {
        Scheduler::new(Catalog::default())
    }

    fn record(time: u64, event: Event) -> Record {
        Record::at(time, event)
    }

    #[test]
    fn test_create_emits_event() {
        let mut s = sched();
        let records = s.create_queue("A", 2);
        assert_eq!(records, vec![record(0, Event::Create { queue: "A".into() })]);
        assert_eq!(s.queue_count(), 1);
        assert_eq!(s.next_queue(), Some("A"));
    }

    #[test]
    fn test_create_is_silently_idempotent() {
        let mut s = sched();
        s.create_queue("A", 2);
        s.enqueue("A", "tea");

        let records = s.create_queue("A", 9);
        assert!(records.is_empty());

        // Nothing changed: still one queue, original capacity, task intact
        let snapshot = s.snapshot();
        assert_eq!(snapshot.queues.len(), 1);
        assert_eq!(snapshot.queues[0].capacity, 2);
        assert_eq!(snapshot.queues[0].len, 1);
    }

    #[test]
    fn test_enqueue_accepts_and_formats_task_id() {
        let mut s = sched();
        s.create_queue("A", 2);
        let records = s.enqueue("A", "tea");
        assert_eq!(
            records,
            vec![record(
                0,
                Event::Enqueue {
                    queue: "A".into(),
                    task: "A-001".into(),
                    remaining: 1,
                }
            )]
        );
    }

    #[test]
    fn test_enqueue_unknown_item() {
        let mut s = sched();
        s.create_queue("A", 2);
        let records = s.enqueue("A", "ristretto");
        assert_eq!(
            records,
            vec![record(
                0,
                Event::Reject {
                    queue: "A".into(),
                    reason: RejectReason::UnknownItem,
                }
            )]
        );
    }

    #[test]
    fn test_unknown_item_checked_before_unknown_queue() {
        let mut s = sched();
        let records = s.enqueue("ghost", "ristretto");
        assert_eq!(
            records,
            vec![record(
                0,
                Event::Reject {
                    queue: "ghost".into(),
                    reason: RejectReason::UnknownItem,
                }
            )]
        );
    }

    #[test]
    fn test_enqueue_unknown_queue() {
        let mut s = sched();
        let records = s.enqueue("ghost", "tea");
        assert_eq!(
            records,
            vec![record(
                0,
                Event::Reject {
                    queue: "ghost".into(),
                    reason: RejectReason::UnknownQueue,
                }
            )]
        );
    }

    #[test]
    fn test_enqueue_full_rejects_without_mutation() {
        let mut s = sched();
        s.create_queue("A", 1);
        s.enqueue("A", "tea");

        let records = s.enqueue("A", "mocha");
        assert_eq!(
            records,
            vec![record(
                0,
                Event::Reject {
                    queue: "A".into(),
                    reason: RejectReason::Full,
                }
            )]
        );

        let snapshot = s.snapshot();
        assert_eq!(snapshot.queues[0].len, 1);
        assert_eq!(snapshot.queues[0].tasks[0].task, "A-001");
        assert_eq!(snapshot.queues[0].tasks[0].remaining, 1);
    }

    #[test]
    fn test_full_rejection_burns_a_sequence_number() {
        let mut s = sched();
        s.create_queue("A", 1);
        s.enqueue("A", "tea"); // A-001
        s.enqueue("A", "tea"); // full, burns 2
        s.run(1, None); // finishes A-001

        let records = s.enqueue("A", "tea");
        assert_eq!(
            records,
            vec![record(
                1,
                Event::Enqueue {
                    queue: "A".into(),
                    task: "A-003".into(),
                    remaining: 1,
                }
            )]
        );
    }

    #[test]
    fn test_run_finishes_task_work_then_finish() {
        // CREATE A 2; ENQ A tea; RUN 1
        let mut s = sched();
        s.create_queue("A", 2);
        s.enqueue("A", "tea");

        let records = s.run(1, None);
        assert_eq!(
            records,
            vec![
                record(0, Event::Run { queue: "A".into() }),
                record(
                    1,
                    Event::Work {
                        queue: "A".into(),
                        task: "A-001".into(),
                        ran: 1,
                        rem: 0,
                    }
                ),
                record(
                    1,
                    Event::Finish {
                        queue: "A".into(),
                        task: "A-001".into(),
                    }
                ),
            ]
        );
        assert_eq!(s.clock(), 1);
        assert_eq!(s.snapshot().queues[0].len, 0);
    }

    #[test]
    fn test_run_partial_progress_no_finish() {
        let mut s = sched();
        s.create_queue("A", 2);
        s.enqueue("A", "americano"); // cost 2

        let records = s.run(1, Some(1));
        assert_eq!(
            records,
            vec![
                record(0, Event::Run { queue: "A".into() }),
                record(
                    1,
                    Event::Work {
                        queue: "A".into(),
                        task: "A-001".into(),
                        ran: 1,
                        rem: 1,
                    }
                ),
            ]
        );
        assert_eq!(s.clock(), 1);
        assert_eq!(s.snapshot().queues[0].tasks[0].remaining, 1);
    }

    #[test]
    fn test_quantum_caps_each_turn() {
        let mut s = sched();
        s.create_queue("A", 1);
        s.enqueue("A", "mocha"); // cost 4

        let first = s.run(3, Some(1));
        assert_eq!(
            first[1],
            record(
                3,
                Event::Work {
                    queue: "A".into(),
                    task: "A-001".into(),
                    ran: 3,
                    rem: 1,
                }
            )
        );

        let second = s.run(3, Some(1));
        assert_eq!(
            second[1],
            record(
                4,
                Event::Work {
                    queue: "A".into(),
                    task: "A-001".into(),
                    ran: 1,
                    rem: 0,
                }
            )
        );
        assert_eq!(
            second[2],
            record(
                4,
                Event::Finish {
                    queue: "A".into(),
                    task: "A-001".into(),
                }
            )
        );
        assert_eq!(s.clock(), 4);
    }

    #[test]
    fn test_round_robin_full_rotation_restores_cursor() {
        let mut s = sched();
        s.create_queue("A", 1);
        s.create_queue("B", 1);
        s.create_queue("C", 1);

        let records = s.run(1, None);
        let turn_order: Vec<_> = records
            .iter()
            .filter_map(|r| match &r.event {
                Event::Run { queue } => Some(queue.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(turn_order, vec!["A", "B", "C"]);
        assert_eq!(s.next_queue(), Some("A"));
    }

    #[test]
    fn test_cursor_persists_across_run_calls() {
        let mut s = sched();
        s.create_queue("A", 1);
        s.create_queue("B", 1);

        assert_eq!(s.run(1, Some(1))[0], record(0, Event::Run { queue: "A".into() }));
        assert_eq!(s.next_queue(), Some("B"));
        assert_eq!(s.run(1, Some(1))[0], record(0, Event::Run { queue: "B".into() }));
        assert_eq!(s.next_queue(), Some("A"));
    }

    #[test]
    fn test_empty_turn_emits_run_only_and_clock_holds() {
        let mut s = sched();
        s.create_queue("A", 1);
        s.create_queue("B", 1);
        s.enqueue("B", "tea");

        let records = s.run(2, None);
        assert_eq!(
            records,
            vec![
                record(0, Event::Run { queue: "A".into() }),
                record(0, Event::Run { queue: "B".into() }),
                record(
                    1,
                    Event::Work {
                        queue: "B".into(),
                        task: "B-001".into(),
                        ran: 1,
                        rem: 0,
                    }
                ),
                record(
                    1,
                    Event::Finish {
                        queue: "B".into(),
                        task: "B-001".into(),
                    }
                ),
            ]
        );
        assert_eq!(s.clock(), 1);
    }

    #[test]
    fn test_skip_overrides_work_and_is_consumed_once() {
        let mut s = sched();
        s.create_queue("A", 1);
        s.enqueue("A", "tea");
        s.mark_skip("A");

        // Skipped turn: run event only, no work, no clock movement
        let skipped = s.run(5, None);
        assert_eq!(skipped, vec![record(0, Event::Run { queue: "A".into() })]);
        assert_eq!(s.clock(), 0);
        assert!(!s.snapshot().queues[0].skip);

        // Flag was consumed: the next turn does the work
        let worked = s.run(5, None);
        assert_eq!(worked.len(), 3);
        assert_eq!(s.clock(), 1);
    }

    #[test]
    fn test_mark_skip_is_idempotent() {
        let mut s = sched();
        s.create_queue("A", 1);

        let first = s.mark_skip("A");
        let second = s.mark_skip("A");
        assert_eq!(first, vec![record(0, Event::Skip { queue: "A".into() })]);
        assert_eq!(second, vec![record(0, Event::Skip { queue: "A".into() })]);

        // Two marks still burn exactly one turn
        s.enqueue("A", "tea");
        assert_eq!(s.run(1, None).len(), 1);
        assert_eq!(s.run(1, None).len(), 3);
    }

    #[test]
    fn test_mark_skip_unknown_queue_is_silent() {
        let mut s = sched();
        s.create_queue("A", 1);
        let records = s.mark_skip("B");
        assert!(records.is_empty());
        assert!(!s.snapshot().queues[0].skip);
    }

    #[test]
    fn test_run_with_no_queues_emits_nothing() {
        let mut s = sched();
        assert!(s.run(1, None).is_empty());
        // Zero queues wins over steps validation, as the original does
        assert!(s.run(1, Some(0)).is_empty());
        assert_eq!(s.clock(), 0);
    }

    #[test]
    fn test_invalid_steps() {
        let mut s = sched();
        s.create_queue("A", 1);
        s.create_queue("B", 1);
        s.enqueue("A", "tea");

        for steps in [0, 3, -1] {
            let records = s.run(3, Some(steps));
            assert_eq!(
                records,
                vec![record(
                    0,
                    Event::Error {
                        reason: ErrorReason::InvalidSteps,
                    }
                )]
            );
        }

        // No work happened and the cursor never moved
        assert_eq!(s.clock(), 0);
        assert_eq!(s.next_queue(), Some("A"));
        assert_eq!(s.snapshot().queues[0].len, 1);
    }

    #[test]
    fn test_fifo_within_a_queue() {
        let mut s = sched();
        s.create_queue("A", 3);
        s.enqueue("A", "tea"); // A-001, cost 1
        s.enqueue("A", "macchiato"); // A-002, cost 2

        // First turn finishes A-001; A-002 is untouched until A-001 is gone
        let first = s.run(9, Some(1));
        assert!(matches!(
            &first[2].event,
            Event::Finish { task, .. } if task == "A-001"
        ));
        assert_eq!(s.snapshot().queues[0].tasks[0].task, "A-002");

        let second = s.run(9, Some(1));
        assert!(matches!(
            &second[2].event,
            Event::Finish { task, .. } if task == "A-002"
        ));
    }

    #[test]
    fn test_clock_is_monotone_across_mixed_turns() {
        let mut s = sched();
        s.create_queue("A", 2);
        s.create_queue("B", 2);
        s.enqueue("A", "latte"); // cost 3
        s.mark_skip("B");

        let mut last = 0;
        for _ in 0..4 {
            let records = s.run(2, None);
            for rec in records {
                let t = rec.time.unwrap();
                assert!(t >= last, "clock went backwards");
                last = t;
            }
        }
        assert_eq!(s.clock(), 3);
    }

    #[test]
    fn test_snapshot_reports_everything() {
        let mut s = sched();
        s.create_queue("A", 2);
        s.create_queue("B", 3);
        s.enqueue("A", "americano");
        s.mark_skip("B");
        s.run(1, Some(1));

        let snapshot = s.snapshot();
        assert_eq!(snapshot.time, 1);
        assert_eq!(snapshot.next, Some("B".into()));
        assert_eq!(snapshot.menu.len(), 7);
        assert_eq!(snapshot.menu[0].item, "americano");

        assert_eq!(snapshot.queues[0].id, "A");
        assert_eq!(snapshot.queues[0].len, 1);
        assert_eq!(snapshot.queues[0].capacity, 2);
        assert!(!snapshot.queues[0].skip);
        assert_eq!(snapshot.queues[0].tasks[0].task, "A-001");
        assert_eq!(snapshot.queues[0].tasks[0].remaining, 1);

        assert_eq!(snapshot.queues[1].id, "B");
        assert!(snapshot.queues[1].skip);
        assert!(snapshot.queues[1].tasks.is_empty());
    }

    #[test]
    fn test_snapshot_with_no_queues() {
        let s = sched();
        let snapshot = s.snapshot();
        assert_eq!(snapshot.next, None);
        assert!(snapshot.queues.is_empty());
    }
}
