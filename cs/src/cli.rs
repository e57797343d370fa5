//! CLI command definitions and subcommands

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CafeSched - deterministic round-robin order scheduler
#[derive(Parser)]
#[command(
    name = "cs",
    about = "Multi-queue round-robin order scheduler simulation",
    version,
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Path to a menu YAML file (item name -> cost) replacing the built-in menu
    #[arg(short, long, global = true)]
    pub menu: Option<PathBuf>,

    /// Output format for the event stream
    #[arg(short, long, default_value = "text")]
    pub output: OutputFormat,

    /// Subcommand to execute; without one, commands are read from stdin
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the menu and exit
    Menu,
}

/// Output format for events and snapshots
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Space-separated key=value lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}
