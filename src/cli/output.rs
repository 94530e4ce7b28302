//! Terminal output
//!
//! Listings go to stdout uncolored so they can be piped. Status messages are
//! colored unless disabled; warnings and errors go to stderr.

use colored::Colorize;

/// Width of the id column in listings
const ID_WIDTH: usize = 10;
/// Summaries longer than this are cut in listings
const SUMMARY_WIDTH: usize = 25;

pub struct OutputFormatter;

impl OutputFormatter {
    /// Coloring is process wide, `no_color` turns it off for good
    pub fn new(no_color: bool) -> Self {
        if no_color {
            colored::control::set_override(false);
        }
        Self
    }

    pub fn success(&self, message: &str) {
        println!("{}", message.green());
    }

    pub fn info(&self, message: &str) {
        println!("{message}");
    }

    pub fn warning(&self, message: &str) {
        eprintln!("{} {}", "Warning:".yellow().bold(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "Error:".red().bold(), message);
    }

    /// Hint printed below an error
    pub fn hint(&self, message: &str) {
        eprintln!("  {} {}", "→".cyan(), message);
    }

    /// Print one listing line per ticket
    pub fn print_tickets<'a>(&self, rows: impl IntoIterator<Item = (&'a str, &'a str, &'a str)>) {
        for (id, summary, status) in rows {
            println!("{}", ticket_line(id, summary, status));
        }
    }
}

/// A ticket as shown by `--list`: id, summary cut to width, status
#[must_use]
pub fn ticket_line(id: &str, summary: &str, status: &str) -> String {
    format!("{id:<ID_WIDTH$}  {summary:<SUMMARY_WIDTH$.SUMMARY_WIDTH$}  {status}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ticket_line_pads_columns() {
        assert_eq!(
            ticket_line("T1", "Fix login", "New"),
            "T1          Fix login                  New"
        );
    }

    #[test]
    fn test_ticket_line_truncates_summary() {
        let line = ticket_line("LONG-ID-12345", "A summary that is much longer than the column", "Done");
        assert_eq!(line, "LONG-ID-12345  A summary that is much lo  Done");
    }

    #[test]
    fn test_ticket_line_without_notes() {
        assert_eq!(ticket_line("T2", "", ""), format!("T2{}", " ".repeat(8 + 2 + 25 + 2)));
    }
}
