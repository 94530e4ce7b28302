//! Filters and openers for the `--open` action
//!
//! Opening a ticket builds an [`OpenRequest`] of files and directories,
//! passes it through the configured filters in order and hands the result to
//! every configured opener. Built-in plugins are always available; executable
//! plugins are discovered in the user's plugin directory.

pub mod builtin;
pub mod executable;
pub mod spawn;

use crate::error::{Result, TickletError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Files and directories to show the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenRequest {
    pub files: Vec<PathBuf>,
    pub directories: Vec<PathBuf>,
}

impl OpenRequest {
    /// Add a directory unless it is already present, keeping first-seen order
    pub fn push_directory(&mut self, directory: PathBuf) {
        if !self.directories.contains(&directory) {
            self.directories.push(directory);
        }
    }
}

/// Rewrites an open request before it reaches the openers
pub trait Filter: Send + Sync {
    fn filter(&self, request: OpenRequest) -> Result<OpenRequest>;
}

/// Shows an open request to the user, typically by starting programs
pub trait Opener: Send + Sync {
    fn open(&self, request: &OpenRequest) -> Result<()>;
}

/// Outcome of launching a request
#[derive(Debug, Default)]
pub struct LaunchReport {
    /// Openers that started successfully
    pub opened: Vec<String>,
    /// Plugins that were missing or failed
    pub failures: Vec<TickletError>,
    /// No opener was configured at all
    pub no_openers: bool,
}

/// Entry point used by the lifecycle controller to open a ticket
#[cfg_attr(test, mockall::automock)]
pub trait Launcher {
    fn launch(&self, request: OpenRequest) -> LaunchReport;
}

/// All filters and openers known by name
#[derive(Default)]
pub struct PluginRegistry {
    filters: BTreeMap<String, Box<dyn Filter>>,
    openers: BTreeMap<String, Box<dyn Opener>>,
}

impl PluginRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the plugins shipped with ticklet
    #[must_use]
    pub fn with_builtins() -> Self {
        use builtin::CommandOpener;

        let mut registry = Self::new();
        registry.register_filter("git", builtin::GitFilter);
        registry.register_opener("vim", CommandOpener::new(builtin::vim));
        registry.register_opener("gnome-terminal", CommandOpener::new(builtin::gnome_terminal));
        registry.register_opener("xfce4-terminal", CommandOpener::new(builtin::xfce4_terminal));
        registry.register_opener("sublime", CommandOpener::new(builtin::sublime));
        registry.register_opener("nemo", CommandOpener::new(builtin::nemo));
        registry
    }

    pub fn register_filter(&mut self, name: impl Into<String>, filter: impl Filter + 'static) {
        self.filters.insert(name.into(), Box::new(filter));
    }

    pub fn register_opener(&mut self, name: impl Into<String>, opener: impl Opener + 'static) {
        self.openers.insert(name.into(), Box::new(opener));
    }

    /// Register executables from `<dir>/filters` and `<dir>/openers`
    ///
    /// Already registered names are kept.
    pub fn discover(&mut self, dir: &Path) -> Result<()> {
        for plugin in executable::discover(&dir.join("filters"))? {
            if self.filters.contains_key(plugin.name()) {
                tracing::debug!("Filter {} is built in, ignoring executable", plugin.name());
                continue;
            }
            self.filters.insert(plugin.name().to_string(), Box::new(plugin));
        }
        for plugin in executable::discover(&dir.join("openers"))? {
            if self.openers.contains_key(plugin.name()) {
                tracing::debug!("Opener {} is built in, ignoring executable", plugin.name());
                continue;
            }
            self.openers.insert(plugin.name().to_string(), Box::new(plugin));
        }
        Ok(())
    }

    pub fn filter_names(&self) -> impl Iterator<Item = &str> {
        self.filters.keys().map(String::as_str)
    }

    pub fn opener_names(&self) -> impl Iterator<Item = &str> {
        self.openers.keys().map(String::as_str)
    }
}

/// Configured sequence of filters followed by openers
pub struct Pipeline {
    registry: PluginRegistry,
    filters: Vec<String>,
    openers: Vec<String>,
}

impl Pipeline {
    pub fn new(registry: PluginRegistry, filters: Vec<String>, openers: Vec<String>) -> Self {
        Self {
            registry,
            filters,
            openers,
        }
    }

    fn apply_filters(&self, mut request: OpenRequest, report: &mut LaunchReport) -> OpenRequest {
        for name in &self.filters {
            let Some(filter) = self.registry.filters.get(name) else {
                tracing::debug!("Unknown filter plugin '{name}', skipping");
                report.failures.push(TickletError::PluginNotFound(name.clone()));
                continue;
            };
            match filter.filter(request.clone()) {
                Ok(filtered) => request = filtered,
                Err(e) => {
                    tracing::debug!("Filter '{name}' failed: {e}");
                    report.failures.push(e);
                },
            }
        }
        request
    }
}

impl Launcher for Pipeline {
    fn launch(&self, request: OpenRequest) -> LaunchReport {
        let mut report = LaunchReport::default();
        if self.openers.is_empty() {
            tracing::debug!("No openers configured, nothing to open");
            report.no_openers = true;
            return report;
        }

        let request = self.apply_filters(request, &mut report);
        for name in &self.openers {
            let Some(opener) = self.registry.openers.get(name) else {
                tracing::debug!("Unknown opener plugin '{name}', skipping");
                report.failures.push(TickletError::PluginNotFound(name.clone()));
                continue;
            };
            match opener.open(&request) {
                Ok(()) => report.opened.push(name.clone()),
                Err(e) => {
                    tracing::debug!("Opener '{name}' failed: {e}");
                    report.failures.push(e);
                },
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    struct AddDirectory(&'static str);

    impl Filter for AddDirectory {
        fn filter(&self, mut request: OpenRequest) -> Result<OpenRequest> {
            request.push_directory(PathBuf::from(self.0));
            Ok(request)
        }
    }

    struct FailingFilter;

    impl Filter for FailingFilter {
        fn filter(&self, _request: OpenRequest) -> Result<OpenRequest> {
            Err(TickletError::plugin_failed("failing", "boom"))
        }
    }

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<OpenRequest>>>);

    impl Opener for Recorder {
        fn open(&self, request: &OpenRequest) -> Result<()> {
            self.0.lock().unwrap().push(request.clone());
            Ok(())
        }
    }

    fn request() -> OpenRequest {
        OpenRequest {
            files: vec![PathBuf::from("/t/notes.md")],
            directories: vec![PathBuf::from("/t")],
        }
    }

    #[test]
    fn test_push_directory_dedups() {
        let mut req = request();
        req.push_directory(PathBuf::from("/t"));
        req.push_directory(PathBuf::from("/repo"));
        req.push_directory(PathBuf::from("/repo"));
        assert_eq!(req.directories, vec![PathBuf::from("/t"), PathBuf::from("/repo")]);
    }

    #[test]
    fn test_builtin_names() {
        let registry = PluginRegistry::with_builtins();
        assert_eq!(registry.filter_names().collect::<Vec<_>>(), vec!["git"]);
        assert_eq!(
            registry.opener_names().collect::<Vec<_>>(),
            vec!["gnome-terminal", "nemo", "sublime", "vim", "xfce4-terminal"]
        );
    }

    #[test]
    fn test_pipeline_filters_in_order() {
        let recorder = Recorder::default();
        let mut registry = PluginRegistry::new();
        registry.register_filter("repo", AddDirectory("/repo"));
        registry.register_filter("fail", FailingFilter);
        registry.register_filter("home", AddDirectory("/home"));
        registry.register_opener("record", recorder.clone());

        let pipeline = Pipeline::new(
            registry,
            vec!["repo".into(), "fail".into(), "missing".into(), "home".into()],
            vec!["record".into()],
        );
        let report = pipeline.launch(request());

        assert_eq!(report.opened, vec!["record"]);
        assert_eq!(report.failures.len(), 2);
        assert!(matches!(report.failures[1], TickletError::PluginNotFound(ref n) if n == "missing"));

        let seen = recorder.0.lock().unwrap();
        assert_eq!(
            seen[0].directories,
            vec![PathBuf::from("/t"), PathBuf::from("/repo"), PathBuf::from("/home")]
        );
    }

    #[test]
    fn test_pipeline_without_openers() {
        let pipeline = Pipeline::new(PluginRegistry::with_builtins(), vec!["git".into()], Vec::new());
        let report = pipeline.launch(request());
        assert!(report.no_openers);
        assert!(report.opened.is_empty());
    }

    #[test]
    fn test_pipeline_unknown_opener_does_not_stop_others() {
        let recorder = Recorder::default();
        let mut registry = PluginRegistry::new();
        registry.register_opener("record", recorder.clone());

        let pipeline = Pipeline::new(registry, Vec::new(), vec!["emacs".into(), "record".into()]);
        let report = pipeline.launch(request());

        assert_eq!(report.opened, vec!["record"]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(recorder.0.lock().unwrap().len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_discover_keeps_builtins() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::TempDir::new().unwrap();
        let openers = dir.path().join("openers");
        std::fs::create_dir_all(&openers).unwrap();
        for name in ["vim", "my-editor"] {
            let path = openers.join(name);
            std::fs::write(&path, "#!/bin/sh\n").unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        }

        let mut registry = PluginRegistry::with_builtins();
        registry.discover(dir.path()).unwrap();

        let names: Vec<_> = registry.opener_names().collect();
        assert!(names.contains(&"my-editor"));
        assert_eq!(names.iter().filter(|n| **n == "vim").count(), 1);
    }
}
