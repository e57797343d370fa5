//! CafeSched - deterministic round-robin order scheduler
//!
//! CLI entry point: reads line commands from stdin and writes the
//! structured event stream to stdout.

use std::io;

use clap::Parser;
use eyre::{Context, Result};
use tracing::debug;

use cafesched::catalog::Catalog;
use cafesched::cli::{Cli, Command, OutputFormat};
use cafesched::config::Config;
use cafesched::protocol::Session;
use cafesched::scheduler::Scheduler;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Priority: CLI --log-level > config file > default (WARN). Logs go to
    // stderr with ANSI off so stdout stays a pure event stream.
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to WARN", s);
                tracing::Level::WARN
            }
        },
        None => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    debug!(?level, "Logging initialized");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    // Setup logging with priority: CLI > config > WARN default
    setup_logging(cli.log_level.as_deref(), config.log_level.as_deref()).context("Failed to setup logging")?;

    // Build the catalog: --menu flag > config menu path > built-in menu
    let menu_path = cli.menu.as_ref().or(config.menu.as_ref());
    let catalog = match menu_path {
        Some(path) => Catalog::load(path).wrap_err_with(|| format!("Failed to load menu: {}", path.display()))?,
        None => Catalog::default(),
    };
    debug!(items = catalog.len(), "main: catalog ready");

    // Dispatch command
    match cli.command {
        Some(Command::Menu) => cmd_menu(&catalog),
        None => cmd_serve(catalog, cli.output),
    }
}

/// Print the catalog, one `item cost` pair per line.
fn cmd_menu(catalog: &Catalog) -> Result<()> {
    debug!("cmd_menu: called");
    for (item, cost) in catalog.iter() {
        println!("{item} {cost}");
    }
    Ok(())
}

/// Run a command session over stdin/stdout.
fn cmd_serve(catalog: Catalog, format: OutputFormat) -> Result<()> {
    debug!(?format, "cmd_serve: called");
    let scheduler = Scheduler::new(catalog);
    let stdin = io::stdin();
    let stdout = io::stdout();
    let session = Session::new(scheduler, stdin.lock(), stdout.lock(), format);
    session.run()
}
