//! Line parser for the command protocol
//!
//! One command per line: a case-insensitive keyword followed by
//! whitespace-delimited arguments. Comment lines (`#`) and whitespace-only
//! lines parse to nothing. The parser also enforces the positive-value
//! contract the scheduler core assumes: non-positive capacities and quanta
//! are rejected here as `bad_args`. The RUN steps argument is deliberately
//! passed through signed so that out-of-range values reach the scheduler
//! and report `invalid_steps` instead.

use thiserror::Error;

use crate::events::ErrorReason;

/// Errors from parsing one command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("malformed argument count or non-integer numeric argument")]
    BadArgs,

    #[error("unrecognized command keyword")]
    UnknownCommand,
}

impl From<ParseError> for ErrorReason {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::BadArgs => ErrorReason::BadArgs,
            ParseError::UnknownCommand => ErrorReason::UnknownCommand,
        }
    }
}

/// A parsed scheduler command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Create { queue: String, capacity: usize },
    Enq { queue: String, item: String },
    Skip { queue: String },
    Run { quantum: u64, steps: Option<i64> },
}

fn parse_int(arg: &str) -> Result<i64, ParseError> {
    arg.parse().map_err(|_| ParseError::BadArgs)
}

fn parse_positive(arg: &str) -> Result<i64, ParseError> {
    let value = parse_int(arg)?;
    if value < 1 {
        return Err(ParseError::BadArgs);
    }
    Ok(value)
}

/// Parse one input line.
///
/// Returns `None` for comment and whitespace-only lines. The caller handles
/// the exactly-empty terminator line before calling.
pub fn parse(line: &str) -> Option<Result<Command, ParseError>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }

    let mut parts = trimmed.split_whitespace();
    let keyword = parts.next()?.to_uppercase();
    let args: Vec<&str> = parts.collect();

    let command = match keyword.as_str() {
        "CREATE" => {
            if args.len() != 2 {
                return Some(Err(ParseError::BadArgs));
            }
            match parse_positive(args[1]) {
                Ok(capacity) => Command::Create {
                    queue: args[0].to_string(),
                    capacity: capacity as usize,
                },
                Err(err) => return Some(Err(err)),
            }
        }
        "ENQ" => {
            if args.len() != 2 {
                return Some(Err(ParseError::BadArgs));
            }
            Command::Enq {
                queue: args[0].to_string(),
                item: args[1].to_string(),
            }
        }
        "SKIP" => {
            if args.len() != 1 {
                return Some(Err(ParseError::BadArgs));
            }
            Command::Skip {
                queue: args[0].to_string(),
            }
        }
        "RUN" => {
            if args.is_empty() || args.len() > 2 {
                return Some(Err(ParseError::BadArgs));
            }
            let quantum = match parse_positive(args[0]) {
                Ok(q) => q as u64,
                Err(err) => return Some(Err(err)),
            };
            let steps = match args.get(1) {
                Some(arg) => match parse_int(arg) {
                    Ok(s) => Some(s),
                    Err(err) => return Some(Err(err)),
                },
                None => None,
            };
            Command::Run { quantum, steps }
        }
        _ => return Some(Err(ParseError::UnknownCommand)),
    };

    Some(Ok(command))
}
