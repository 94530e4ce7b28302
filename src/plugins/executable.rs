//! Plugins provided as executables in the user's plugin directory
//!
//! ```text
//! <plugin dir>/filters/<name>
//! <plugin dir>/openers/<name>
//! ```
//!
//! A filter reads the request as JSON on stdin and prints the new request as
//! JSON on stdout. An opener is started detached with the files and then the
//! directories as arguments, and the JSON request in `TICKLET_REQUEST`.

use super::spawn::Invocation;
use super::{Filter, OpenRequest, Opener};
use crate::error::{Result, TickletError};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

/// Environment variable carrying the JSON request for executable openers
pub const REQUEST_ENV: &str = "TICKLET_REQUEST";

/// An executable plugin found on disk
#[derive(Debug, Clone)]
pub struct ExecutablePlugin {
    name: String,
    path: PathBuf,
}

impl ExecutablePlugin {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    fn program(&self) -> String {
        self.path.to_string_lossy().into_owned()
    }
}

impl Filter for ExecutablePlugin {
    fn filter(&self, request: OpenRequest) -> Result<OpenRequest> {
        let input = serde_json::to_vec(&request)
            .map_err(|e| TickletError::plugin_failed(&self.name, e))?;

        let mut child = Command::new(&self.path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| TickletError::plugin_failed(&self.name, format!("failed to start: {e}")))?;

        // stdin is fed from its own thread so a filter that prints before it
        // has read everything cannot block on a full stdout pipe
        let writer = child
            .stdin
            .take()
            .map(|mut stdin| thread::spawn(move || stdin.write_all(&input)));
        let output = child.wait_with_output()?;
        if let Some(writer) = writer {
            match writer.join() {
                Ok(Ok(())) => {},
                Ok(Err(e)) if e.kind() == io::ErrorKind::BrokenPipe => {
                    tracing::debug!("Filter {} exited without reading its input", self.name);
                },
                Ok(Err(e)) => return Err(e.into()),
                Err(_) => {
                    return Err(TickletError::plugin_failed(
                        &self.name,
                        "writing the request panicked",
                    ));
                },
            }
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TickletError::plugin_failed(
                &self.name,
                format!("exited with {}: {}", output.status, stderr.trim()),
            ));
        }

        serde_json::from_slice(&output.stdout)
            .map_err(|e| TickletError::plugin_failed(&self.name, format!("invalid output: {e}")))
    }
}

impl Opener for ExecutablePlugin {
    fn open(&self, request: &OpenRequest) -> Result<()> {
        let json = serde_json::to_string(request)
            .map_err(|e| TickletError::plugin_failed(&self.name, e))?;
        Invocation::new(self.program())
            .args(request.files.iter().map(|f| f.as_os_str().to_owned()))
            .args(request.directories.iter().map(|d| d.as_os_str().to_owned()))
            .env(REQUEST_ENV, json)
            .spawn_detached()
    }
}

/// List the executables directly inside `dir`
///
/// A missing directory yields no plugins.
pub fn discover(dir: &Path) -> Result<Vec<ExecutablePlugin>> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut plugins = Vec::new();
    for entry in entries {
        let entry = entry?;
        let path = entry.path();
        if !is_executable(&path) {
            continue;
        }
        if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
            tracing::debug!("Discovered plugin {} at {}", name, path.display());
            plugins.push(ExecutablePlugin::new(name, &path));
        }
    }
    plugins.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(plugins)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    fs::metadata(path).is_ok_and(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
