//! ticklet - tickets as directories of notes
//!
//! Entry point of the command-line tool: parses arguments, sets up logging,
//! loads the configuration and dispatches to the handlers.

use clap::{CommandFactory, Parser};
use std::process;
use ticklet::cli::handlers::{TicketActions, handle_list, handle_tickets};
use ticklet::cli::{Cli, EXIT_SUCCESS, EXIT_TICKET_FAILED, EXIT_USAGE, OutputFormatter};
use ticklet::config::Config;
use ticklet::core::LifecycleController;
use ticklet::error::{Result, TickletError};
use ticklet::interactive::{AssumeYes, DeletePrompt, InteractiveMode};
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the log filter
const LOG_ENV: &str = "TICKLET_LOG";

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let formatter = OutputFormatter::new(cli.no_color);

    match run(cli, &formatter) {
        Ok(code) => process::exit(code),
        Err(e) => {
            handle_error(&e, &formatter);
            process::exit(EXIT_USAGE);
        },
    }
}

/// Log to stderr so listings on stdout stay clean
fn init_logging(verbose: bool) {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Run the parsed command line, returning the process exit code
///
/// Errors returned from here concern the invocation as a whole. Failures of
/// individual tickets are reported by the handlers and turned into the exit
/// code.
fn run(cli: Cli, formatter: &OutputFormatter) -> Result<i32> {
    if !cli.has_action() && cli.tickets.is_empty() {
        Cli::command().print_help()?;
        return Ok(EXIT_SUCCESS);
    }

    if let Some(conflicting) = cli.conflicts() {
        return Err(TickletError::ConflictingOptions(conflicting));
    }

    let config = Config::load(cli.config.as_deref(), cli.profile.as_deref())?;
    let storage = config.storage();
    storage.ensure_directories()?;

    if cli.is_listing() {
        handle_list(&storage, cli.list_all, formatter)?;
        return Ok(EXIT_SUCCESS);
    }

    if cli.tickets.is_empty() {
        return Err(TickletError::NoTicketsSpecified);
    }

    let pipeline = config.pipeline();
    let controller = LifecycleController::new(&storage, &pipeline);
    let prompt: Box<dyn DeletePrompt> = if cli.yes {
        Box::new(AssumeYes)
    } else {
        Box::new(InteractiveMode::new())
    };

    let failed = handle_tickets(
        &cli.tickets,
        &TicketActions::from(&cli),
        &controller,
        prompt.as_ref(),
        formatter,
    );
    if failed > 0 {
        tracing::debug!("{failed} ticket(s) failed");
        return Ok(EXIT_TICKET_FAILED);
    }
    Ok(EXIT_SUCCESS)
}

/// Print an error with any hints on how to fix it
fn handle_error(error: &TickletError, formatter: &OutputFormatter) {
    formatter.error(&error.user_message());
    for suggestion in error.suggestions() {
        formatter.hint(&suggestion);
    }
}
