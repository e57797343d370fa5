//! Event vocabulary for the scheduler simulation

use std::fmt;

use serde::{Deserialize, Serialize};

/// Why an enqueue attempt was rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectReason {
    /// Item name not present in the catalog
    UnknownItem,
    /// Queue identifier never created
    UnknownQueue,
    /// Queue already at capacity
    Full,
}

impl RejectReason {
    /// Wire form used in the `key=value` rendering.
    pub fn as_str(self) -> &'static str {
        match self {
            RejectReason::UnknownItem => "unknown_item",
            RejectReason::UnknownQueue => "unknown_queue",
            RejectReason::Full => "full",
        }
    }
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a command produced an error event instead of work.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorReason {
    /// Malformed argument count or non-integer numeric argument
    BadArgs,
    /// Unrecognized command keyword
    UnknownCommand,
    /// RUN steps argument outside `[1, queue_count]`
    InvalidSteps,
}

impl ErrorReason {
    /// Wire form used in the `key=value` rendering.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorReason::BadArgs => "bad_args",
            ErrorReason::UnknownCommand => "unknown_command",
            ErrorReason::InvalidSteps => "invalid_steps",
        }
    }
}

impl fmt::Display for ErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Core event enum - the vocabulary of scheduler activity
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    /// A queue was created
    Create { queue: String },
    /// A task was accepted into a queue
    Enqueue { queue: String, task: String, remaining: u64 },
    /// An enqueue attempt was refused
    Reject { queue: String, reason: RejectReason },
    /// A queue was marked to sit out its next turn
    Skip { queue: String },
    /// A turn was granted to a queue (emitted for every turn, even idle ones)
    Run { queue: String },
    /// The head task was serviced for `ran` work units
    Work { queue: String, task: String, ran: u64, rem: u64 },
    /// A task completed and left its queue
    Finish { queue: String, task: String },
    /// A command-level error; no state changed
    Error { reason: ErrorReason },
}

impl Event {
    /// Human-readable notice derived from this event, if it has one.
    ///
    /// The notice is a secondary rendering of the same rejection, shown on
    /// stderr for a human watching the session. It is never an independent
    /// side effect of the core.
    pub fn notice(&self) -> Option<&'static str> {
        match self {
            Event::Reject {
                reason: RejectReason::UnknownItem,
                ..
            } => Some("Sorry, we don't serve that."),
            Event::Reject {
                reason: RejectReason::Full,
                ..
            } => Some("Sorry, we're at capacity."),
            _ => None,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Event::Create { queue } => write!(f, "event=create queue={queue}"),
            Event::Enqueue { queue, task, remaining } => {
                write!(f, "event=enqueue queue={queue} task={task} remaining={remaining}")
            }
            Event::Reject { queue, reason } => {
                write!(f, "event=reject queue={queue} reason={reason}")
            }
            Event::Skip { queue } => write!(f, "event=skip queue={queue}"),
            Event::Run { queue } => write!(f, "event=run queue={queue}"),
            Event::Work { queue, task, ran, rem } => {
                write!(f, "event=work queue={queue} task={task} ran={ran} rem={rem}")
            }
            Event::Finish { queue, task } => {
                write!(f, "event=finish queue={queue} task={task}")
            }
            Event::Error { reason } => write!(f, "event=error reason={reason}"),
        }
    }
}

/// One emitted event plus the simulated clock value it was stamped with.
///
/// Scheduler-produced records always carry the clock; command-level errors
/// happen outside any clock-advancing operation and carry no time, rendering
/// with the `time=?` placeholder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub time: Option<u64>,
    #[serde(flatten)]
    pub event: Event,
}

impl Record {
    /// Record stamped with a simulated clock value.
    pub fn at(time: u64, event: Event) -> Self {
        Self { time: Some(time), event }
    }

    /// Record produced outside any clock-advancing operation.
    pub fn untimed(event: Event) -> Self {
        Self { time: None, event }
    }
}

impl fmt::Display for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.time {
            Some(t) => write!(f, "time={t} {}", self.event),
            None => write!(f, "time=? {}", self.event),
        }
    }
}
