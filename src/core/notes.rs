//! Parser and in-place rewriter for a ticket's `notes.md`
//!
//! The notes document is free-form Markdown with a handful of recognized
//! lines:
//!
//! ```text
//! # Ticket <id>
//!
//! _Summary_: <text>
//! _Status_ : <text>
//!
//!
//! ## Files
//!
//! - <path>
//!
//!
//! ## Notes
//!
//! <anything>
//! ```
//!
//! Only the summary line, the status line and the bullet list under
//! `## Files` are ever touched. Every other byte survives a read-modify-write
//! cycle unchanged.

use crate::error::Result;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

pub const SUMMARY_MARKER: &str = "_Summary_";
pub const STATUS_MARKER: &str = "_Status_";
pub const FILES_HEADER: &str = "## Files";
pub const HEADING_PREFIX: &str = "## ";
pub const BULLET_PREFIX: &str = "- ";

/// In-memory snapshot of a notes document
///
/// Changes are made by building a modified copy with the `with_*` methods
/// and calling [`Notes::write`], which rewrites all three mutable fields from
/// the snapshot. Always start from a fresh [`Notes::read`] so that no field
/// is written back stale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Notes {
    pub path: PathBuf,
    pub summary: String,
    pub status: String,
    pub files: Vec<String>,
}

impl Notes {
    /// Parse the recognized fields out of `content`
    ///
    /// Scanning stops at the first heading that follows the files section;
    /// the rest of the document is never interpreted. Missing fields are left
    /// empty.
    pub fn parse(path: impl Into<PathBuf>, content: &str) -> Self {
        let mut notes = Self {
            path: path.into(),
            ..Self::default()
        };
        let mut in_files_section = false;

        for line in content.lines() {
            if line.starts_with(SUMMARY_MARKER) {
                notes.summary = field_value(line);
            } else if line.starts_with(STATUS_MARKER) {
                notes.status = field_value(line);
            } else if line.starts_with(FILES_HEADER) {
                in_files_section = true;
            } else if in_files_section {
                if let Some(entry) = line.strip_prefix(BULLET_PREFIX) {
                    notes.files.push(entry.trim().to_string());
                } else if line.starts_with(HEADING_PREFIX) {
                    break;
                }
            }
        }

        notes
    }

    /// Read the notes document at `path`
    ///
    /// Returns `Ok(None)` when the file does not exist.
    pub fn read(path: &Path) -> Result<Option<Self>> {
        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(Self::parse(path, &content))),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Write a new notes document from already rendered template content
    pub fn create(path: impl Into<PathBuf>, content: &str) -> Result<Self> {
        let path = path.into();
        fs::write(&path, content)?;
        tracing::debug!("Created notes document {}", path.display());
        Ok(Self::parse(path, content))
    }

    #[must_use]
    pub fn with_summary(self, summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            ..self
        }
    }

    #[must_use]
    pub fn with_status(self, status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            ..self
        }
    }

    #[must_use]
    pub fn with_files(self, files: Vec<String>) -> Self {
        Self { files, ..self }
    }

    /// Canonical summary line, without a line terminator
    #[must_use]
    pub fn summary_line(&self) -> String {
        format!("{SUMMARY_MARKER}: {}", self.summary)
    }

    /// Canonical status line, without a line terminator
    #[must_use]
    pub fn status_line(&self) -> String {
        format!("{STATUS_MARKER} : {}", self.status)
    }

    /// Bullet lines for the files list, each ended by `eol`
    ///
    /// An empty `eol` means the block ends the document: entries are then
    /// separated by `\n` and the last one is left unterminated.
    fn files_block(&self, eol: &str) -> String {
        let separator = if eol.is_empty() { "\n" } else { eol };
        let mut block = self
            .files
            .iter()
            .map(|file| format!("{BULLET_PREFIX}{file}"))
            .collect::<Vec<_>>()
            .join(separator);
        if !self.files.is_empty() {
            block.push_str(eol);
        }
        block
    }

    /// Append the files block at an insertion point, starting a new line first
    fn insert_files(&self, out: &mut String, eol: &str) {
        if !out.is_empty() && !out.ends_with('\n') {
            out.push_str(eol);
        }
        out.push_str(&self.files_block(eol));
    }

    /// Produce `content` with the summary, status and files list replaced by
    /// this snapshot's values
    ///
    /// The whole original bullet list is replaced by the current list at the
    /// position of its first bullet. A files section without any bullet gets
    /// the list after its leading blank line. Without a `## Files` header the
    /// list has nowhere to go and is dropped. Everything after the heading
    /// that closes the files section is copied unchanged. Replaced lines keep
    /// their original line terminator.
    #[must_use]
    pub fn rewrite(&self, content: &str) -> String {
        let original = Self::parse(&self.path, content);
        let insert_into_empty_section = !self.files.is_empty() && original.files.is_empty();

        let mut out = String::with_capacity(content.len());
        let mut in_files_section = false;
        let mut files_emitted = false;
        // line terminator of the files header while an insertion is pending
        let mut pending_insert: Option<&str> = None;
        let mut consumed = 0;

        for line in content.split_inclusive('\n') {
            consumed += line.len();
            let eol = line_ending(line);

            if let Some(insert_eol) = pending_insert.take() {
                files_emitted = true;
                if line.trim().is_empty() {
                    out.push_str(line);
                    self.insert_files(&mut out, insert_eol);
                    continue;
                }
                self.insert_files(&mut out, insert_eol);
            }

            if line.starts_with(STATUS_MARKER) {
                out.push_str(&self.status_line());
                out.push_str(eol);
            } else if line.starts_with(SUMMARY_MARKER) {
                out.push_str(&self.summary_line());
                out.push_str(eol);
            } else if line.starts_with(FILES_HEADER) {
                in_files_section = true;
                if insert_into_empty_section && !files_emitted {
                    pending_insert = Some(if eol.is_empty() { "\n" } else { eol });
                }
                out.push_str(line);
            } else if in_files_section && line.starts_with(BULLET_PREFIX) {
                if !files_emitted {
                    out.push_str(&self.files_block(eol));
                    files_emitted = true;
                }
            } else if in_files_section && line.starts_with(HEADING_PREFIX) {
                out.push_str(line);
                out.push_str(&content[consumed..]);
                return out;
            } else {
                out.push_str(line);
            }
        }

        if let Some(insert_eol) = pending_insert {
            self.insert_files(&mut out, insert_eol);
        }

        out
    }

    /// Rewrite the backing file in place with this snapshot's fields
    ///
    /// The new content is written to a temporary file next to the original
    /// and then renamed over it.
    pub fn write(&self) -> Result<()> {
        let content = fs::read_to_string(&self.path)?;
        if !self.files.is_empty() && !content.lines().any(|l| l.starts_with(FILES_HEADER)) {
            tracing::warn!(
                "{} has no '{FILES_HEADER}' section, file list not written",
                self.path.display()
            );
        }
        let updated = self.rewrite(&content);

        let dir = self.path.parent().unwrap_or_else(|| Path::new("."));
        let permissions = fs::metadata(&self.path)?.permissions();
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(updated.as_bytes())?;
        tmp.as_file().set_permissions(permissions)?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        tracing::debug!("Rewrote notes document {}", self.path.display());
        Ok(())
    }
}

/// Terminator of a line produced by `split_inclusive('\n')`
fn line_ending(line: &str) -> &str {
    if line.ends_with("\r\n") {
        "\r\n"
    } else if line.ends_with('\n') {
        "\n"
    } else {
        ""
    }
}

/// Everything after the first colon, trimmed
fn field_value(line: &str) -> String {
    line.split_once(':')
        .map(|(_, value)| value.trim().to_string())
        .unwrap_or_default()
}
