//! Command-line interface
//!
//! ticklet has no subcommands. Flags select actions and the positional
//! arguments name the tickets they apply to; with no action flag every named
//! ticket is created if needed and opened.

pub mod handlers;
pub mod output;

pub use output::OutputFormatter;

use clap::Parser;
use std::path::PathBuf;

/// Everything went fine
pub const EXIT_SUCCESS: i32 = 0;
/// Bad invocation or configuration
pub const EXIT_USAGE: i32 = 1;
/// At least one ticket could not be found or processed
pub const EXIT_TICKET_FAILED: i32 = 2;

#[derive(Parser, Debug, Default)]
#[command(name = "ticklet", version, about = "Keep track of tickets as directories of notes")]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    /// List tickets
    #[arg(short, long)]
    pub list: bool,

    /// List tickets, including the archive
    #[arg(short = 'k', long)]
    pub list_all: bool,

    /// Move tickets to the archive
    #[arg(short, long)]
    pub archive: bool,

    /// Move tickets out of the archive
    #[arg(short, long)]
    pub unarchive: bool,

    /// Open existing tickets only
    #[arg(short, long)]
    pub open: bool,

    /// Delete tickets
    #[arg(short, long)]
    pub delete: bool,

    /// Set the status
    #[arg(short, long, value_name = "STATUS")]
    pub status: Option<String>,

    /// Set the summary
    #[arg(short = 'm', long, value_name = "SUMMARY")]
    pub summary: Option<String>,

    /// Use an alternative configuration profile
    #[arg(short, long, value_name = "NAME")]
    pub profile: Option<String>,

    /// Delete without asking for confirmation
    #[arg(short, long)]
    pub yes: bool,

    /// Configuration file to use instead of the default one
    #[arg(long, env = "TICKLET_CONFIG", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// The ticket ID(s) to open or change
    #[arg(value_name = "TICKET")]
    pub tickets: Vec<String>,
}

impl Cli {
    /// Whether any flag selecting an action was given
    #[must_use]
    pub fn has_action(&self) -> bool {
        self.list
            || self.list_all
            || self.archive
            || self.unarchive
            || self.open
            || self.delete
            || self.status.is_some()
            || self.summary.is_some()
    }

    #[must_use]
    pub fn is_listing(&self) -> bool {
        self.list || self.list_all
    }

    /// Names of mutually exclusive flags given together, first clash only
    #[must_use]
    pub fn conflicts(&self) -> Option<Vec<String>> {
        let groups = [
            [("-a/--archive", self.archive), ("-u/--unarchive", self.unarchive)],
            [("-d/--delete", self.delete), ("-o/--open", self.open)],
        ];
        groups.iter().find_map(|group| {
            let given: Vec<String> = group
                .iter()
                .filter(|(_, set)| *set)
                .map(|(name, _)| (*name).to_string())
                .collect();
            (given.len() > 1).then_some(given)
        })
    }
}
