//! Notes template rendering
//!
//! A template is the initial content of a ticket's notes document. The only
//! placeholder is `{id}`; `{{` and `}}` produce literal braces.

use crate::core::TicketId;
use serde::{Deserialize, Serialize};

/// Built-in template for new notes documents
///
/// The summary line and the empty bullet carry a trailing space so that a
/// fresh document is already in canonical form.
pub const DEFAULT_TEMPLATE: &str = concat!(
    "# Ticket {id}\n",
    "\n",
    "_Summary_: \n",
    "_Status_ : New\n",
    "\n",
    "\n",
    "## Files\n",
    "\n",
    "- \n",
    "\n",
    "\n",
    "## Notes\n",
    "\n",
);

/// Template used to create new notes documents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotesTemplate {
    source: String,
}

impl NotesTemplate {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Render the template for a ticket
    ///
    /// Unknown placeholders are kept verbatim.
    #[must_use]
    pub fn render(&self, id: &TicketId) -> String {
        let mut out = String::with_capacity(self.source.len() + id.as_str().len());
        let mut rest = self.source.as_str();

        while let Some(pos) = rest.find(['{', '}']) {
            out.push_str(&rest[..pos]);
            rest = &rest[pos..];

            if rest.starts_with("{{") {
                out.push('{');
                rest = &rest[2..];
            } else if rest.starts_with("}}") {
                out.push('}');
                rest = &rest[2..];
            } else if rest.starts_with("{id}") {
                out.push_str(id.as_str());
                rest = &rest[4..];
            } else {
                out.push_str(&rest[..1]);
                rest = &rest[1..];
            }
        }

        out.push_str(rest);
        out
    }
}

impl Default for NotesTemplate {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}
