//! Fire-and-forget process launching for openers

use crate::error::{Result, TickletError};
use std::ffi::OsString;
use std::process::{Command, Stdio};

/// A program and its arguments, ready to be launched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<OsString>,
    pub env: Vec<(String, String)>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    #[must_use]
    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Start the program detached from ticklet
    ///
    /// Standard streams are closed and the child is never waited on. Only a
    /// failure to start is reported.
    pub fn spawn_detached(&self) -> Result<()> {
        let child = Command::new(&self.program)
            .args(&self.args)
            .envs(self.env.iter().map(|(k, v)| (k, v)))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| {
                TickletError::plugin_failed(&self.program, format!("failed to start: {e}"))
            })?;

        tracing::debug!("Started {} (pid {})", self.program, child.id());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_builder() {
        let inv = Invocation::new("subl")
            .arg("-n")
            .args(["a", "b"])
            .env("KEY", "value");
        assert_eq!(inv.program, "subl");
        assert_eq!(inv.args, vec!["-n", "a", "b"]);
        assert_eq!(inv.env, vec![("KEY".to_string(), "value".to_string())]);
    }

    #[test]
    fn test_spawn_missing_program_fails() {
        let err = Invocation::new("ticklet-no-such-program-42")
            .spawn_detached()
            .unwrap_err();
        assert!(matches!(err, TickletError::PluginFailed { .. }));
    }
}
