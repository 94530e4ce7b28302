use crate::cli::Cli;
use crate::cli::output::OutputFormatter;
use crate::core::{LifecycleController, Ticket, TicketId};
use crate::error::{Result, TickletError};
use crate::interactive::DeletePrompt;
use crate::plugins::LaunchReport;
use crate::storage::TicketRepository;

/// What to do with each ticket named on the command line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct TicketActions {
    /// Create tickets that do not exist yet
    pub create: bool,
    pub status: Option<String>,
    pub summary: Option<String>,
    pub archive: bool,
    pub unarchive: bool,
    pub open: bool,
    pub delete: bool,
}

impl From<&Cli> for TicketActions {
    /// Without any action flag tickets are created and opened
    fn from(cli: &Cli) -> Self {
        let default_action = !cli.has_action();
        Self {
            create: default_action,
            status: cli.status.clone(),
            summary: cli.summary.clone(),
            archive: cli.archive,
            unarchive: cli.unarchive,
            open: cli.open || default_action,
            delete: cli.delete,
        }
    }
}

/// Apply `actions` to every ticket in `ids`
///
/// Every id is attempted. Returns the number of tickets that could not be
/// found or processed.
pub fn handle_tickets<R: TicketRepository>(
    ids: &[String],
    actions: &TicketActions,
    controller: &LifecycleController<'_, R>,
    prompt: &dyn DeletePrompt,
    formatter: &OutputFormatter,
) -> usize {
    let mut failed = 0;
    for id in ids {
        if let Err(e) = process_ticket(id, actions, controller, prompt, formatter) {
            tracing::debug!("Processing {id} failed: {e:?}");
            formatter.error(&e.user_message());
            failed += 1;
        }
    }
    failed
}

fn process_ticket<R: TicketRepository>(
    id: &str,
    actions: &TicketActions,
    controller: &LifecycleController<'_, R>,
    prompt: &dyn DeletePrompt,
    formatter: &OutputFormatter,
) -> Result<()> {
    let id = TicketId::parse(id)?;
    let mut ticket = resolve(&id, actions.create, controller, formatter)?;

    if let Some(status) = &actions.status {
        controller.set_status(&ticket, status)?;
    }
    if let Some(summary) = &actions.summary {
        controller.set_summary(&ticket, summary)?;
    }

    if actions.archive {
        ticket = controller.archive(&ticket)?;
        formatter.success(&format!("Archived {id}"));
    } else if actions.unarchive {
        ticket = controller.unarchive(&ticket)?;
        formatter.success(&format!("Unarchived {id}"));
    }

    if actions.open {
        let report = controller.open(&ticket)?;
        report_launch(&id, &report, formatter);
    } else if actions.delete {
        delete(ticket, controller, prompt, formatter)?;
    }
    Ok(())
}

fn resolve<R: TicketRepository>(
    id: &TicketId,
    create: bool,
    controller: &LifecycleController<'_, R>,
    formatter: &OutputFormatter,
) -> Result<Ticket> {
    match controller.find_optional(id)? {
        Some(ticket) => Ok(ticket),
        None if create => {
            let ticket = controller.create(id)?;
            formatter.success(&format!("Created ticket {id}"));
            Ok(ticket)
        },
        None => Err(TickletError::TicketNotFound { id: id.to_string() }),
    }
}

fn delete<R: TicketRepository>(
    ticket: Ticket,
    controller: &LifecycleController<'_, R>,
    prompt: &dyn DeletePrompt,
    formatter: &OutputFormatter,
) -> Result<()> {
    if !prompt.confirm_delete(&ticket.id)? {
        formatter.info(&format!("Kept {}", ticket.id));
        return Ok(());
    }
    let id = ticket.id.clone();
    controller.delete(ticket)?;
    formatter.success(&format!("Deleted {id}"));
    Ok(())
}

/// Plugin problems are warnings, they never fail the ticket
fn report_launch(id: &TicketId, report: &LaunchReport, formatter: &OutputFormatter) {
    if report.no_openers {
        formatter.warning(&format!(
            "Nothing opened {id}: no openers configured, enable some under 'plugins.files.open' in your configuration file"
        ));
        return;
    }
    for failure in &report.failures {
        formatter.warning(&format!("Opening {id}: {}", failure.user_message()));
    }
    if !report.opened.is_empty() {
        tracing::info!("Opened {id} with {}", report.opened.join(", "));
    }
}
