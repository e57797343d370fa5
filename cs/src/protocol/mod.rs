//! Text protocol front end
//!
//! The thin line-oriented surface over the scheduler core: a parser for the
//! `CREATE` / `ENQ` / `SKIP` / `RUN` command vocabulary and a session loop
//! that turns parsed commands into scheduler calls and rendered events.

pub mod parser;
mod session;

pub use parser::{Command, ParseError};
pub use session::Session;
