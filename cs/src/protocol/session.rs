//! Command session over a line stream
//!
//! Reads commands line by line, drives the scheduler, and writes one event
//! record per output line. The exactly-empty line ends the session; a line
//! of spaces is merely skipped. Rejection notices derived from the events
//! go to stderr so stdout stays a pure structured stream.

use std::io::{BufRead, Write};

use colored::Colorize;
use eyre::{Context, Result};
use tracing::debug;

use crate::cli::OutputFormat;
use crate::events::{Event, Record};
use crate::protocol::parser::{self, Command};
use crate::scheduler::Scheduler;

/// Farewell printed when the empty terminator line arrives.
const FAREWELL: &str = "Break time!";

/// One command-processing session bound to an input and an output stream.
pub struct Session<R, W> {
    scheduler: Scheduler,
    input: R,
    output: W,
    format: OutputFormat,
}

impl<R: BufRead, W: Write> Session<R, W> {
    /// Create a session driving `scheduler` from `input` to `output`.
    pub fn new(scheduler: Scheduler, input: R, output: W, format: OutputFormat) -> Self {
        Self {
            scheduler,
            input,
            output,
            format,
        }
    }

    /// Process commands until the empty terminator line or end of input.
    ///
    /// Every protocol error is reported as an event and processing
    /// continues; nothing in the stream is fatal.
    pub fn run(mut self) -> Result<()> {
        let mut line = String::new();
        loop {
            line.clear();
            let read = self.input.read_line(&mut line).context("Failed to read command line")?;
            if read == 0 {
                debug!("Session::run: end of input");
                break;
            }

            let stripped = line.strip_suffix('\n').unwrap_or(&line);
            let stripped = stripped.strip_suffix('\r').unwrap_or(stripped);

            if stripped.is_empty() {
                debug!("Session::run: empty line, ending session");
                writeln!(self.output, "{FAREWELL}")?;
                break;
            }

            match parser::parse(stripped) {
                None => continue,
                Some(Err(err)) => {
                    debug!(?err, line = %stripped, "Session::run: parse error");
                    self.emit(&[Record::untimed(Event::Error { reason: err.into() })])?;
                }
                Some(Ok(command)) => self.dispatch(command)?,
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, command: Command) -> Result<()> {
        debug!(?command, "Session::dispatch: called");
        match command {
            Command::Create { queue, capacity } => {
                let records = self.scheduler.create_queue(&queue, capacity);
                self.emit(&records)
            }
            Command::Enq { queue, item } => {
                let records = self.scheduler.enqueue(&queue, &item);
                self.emit(&records)
            }
            Command::Skip { queue } => {
                let records = self.scheduler.mark_skip(&queue);
                self.emit(&records)
            }
            Command::Run { quantum, steps } => {
                let records = self.scheduler.run(quantum, steps);
                self.emit(&records)?;

                // Every RUN is followed by a display snapshot
                let snapshot = self.scheduler.snapshot();
                match self.format {
                    OutputFormat::Text => writeln!(self.output, "{snapshot}")?,
                    OutputFormat::Json => {
                        let json = serde_json::to_string(&snapshot).context("Failed to serialize snapshot")?;
                        writeln!(self.output, "{json}")?;
                    }
                }
                Ok(())
            }
        }
    }

    fn emit(&mut self, records: &[Record]) -> Result<()> {
        for record in records {
            // The notice is a derived rendering of the same event for a
            // human observer, never an independent side effect.
            if let Some(notice) = record.event.notice() {
                eprintln!("{}", notice.yellow());
            }
            match self.format {
                OutputFormat::Text => writeln!(self.output, "{record}")?,
                OutputFormat::Json => {
                    let json = serde_json::to_string(record).context("Failed to serialize record")?;
                    writeln!(self.output, "{json}")?;
                }
            }
        }
        Ok(())
    }
}
