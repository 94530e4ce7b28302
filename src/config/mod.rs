//! Configuration loading
//!
//! Settings are built in layers: the built-in defaults, then the user's YAML
//! file, then an optional named profile from that file. Each layer is deep
//! merged over the previous one, so a file only needs the keys it changes.
//!
//! ```yaml
//! directory:
//!   active: ~/work/tickets
//! plugins:
//!   files:
//!     filter: [git]
//!     open: [vim, gnome-terminal]
//! profiles:
//!   home:
//!     directory:
//!       active: ~/tickets/home
//! ```

use crate::error::{Result, TickletError};
use crate::plugins::{Pipeline, PluginRegistry};
use crate::storage::FileStorage;
use crate::templates::NotesTemplate;
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the application directory and config file
pub const APP_NAME: &str = "ticklet";

/// Complete ticklet configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub directory: DirectoryConfig,
    pub template: NotesTemplate,
    pub plugins: PluginConfig,
    pub profiles: Mapping,
}

/// Roots of the two ticket states
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryConfig {
    pub active: PathBuf,
    pub archive: PathBuf,
}

impl Default for DirectoryConfig {
    fn default() -> Self {
        Self {
            active: PathBuf::from("~/tickets/active"),
            archive: PathBuf::from("~/tickets/archive"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PluginConfig {
    /// Where executable plugins are discovered, defaults to the data directory
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directory: Option<PathBuf>,
    pub files: FilePluginConfig,
}

/// Plugins run when a ticket is opened, in order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilePluginConfig {
    pub filter: Vec<String>,
    pub open: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            directory: DirectoryConfig::default(),
            template: NotesTemplate::default(),
            plugins: PluginConfig::default(),
            profiles: Mapping::new(),
        }
    }
}

impl Config {
    /// Load the configuration
    ///
    /// `file` must exist when given. Otherwise the default user config file
    /// is used if present. `profile` names an entry of `profiles` to apply
    /// last.
    pub fn load(file: Option<&Path>, profile: Option<&str>) -> Result<Self> {
        let mut merged = serde_yaml::to_value(Self::default())?;

        let path = match file {
            Some(path) => Some(path.to_path_buf()),
            None => default_config_file(),
        };
        if let Some(path) = path {
            tracing::debug!("Loading configuration from {}", path.display());
            merge_values(&mut merged, read_yaml(&path)?);
        }

        if let Some(name) = profile {
            let overlay = merged
                .get("profiles")
                .and_then(|profiles| profiles.get(name))
                .cloned()
                .ok_or_else(|| TickletError::ProfileNotFound(name.to_string()))?;
            tracing::debug!("Applying profile {name}");
            merge_values(&mut merged, overlay);
        }

        let mut config: Self = serde_yaml::from_value(merged)
            .map_err(|e| TickletError::ConfigError(format!("Invalid configuration: {e}")))?;
        config.directory.active = expand_home(&config.directory.active);
        config.directory.archive = expand_home(&config.directory.archive);
        config.plugins.directory = config.plugins.directory.as_deref().map(expand_home);
        Ok(config)
    }

    /// Ticket store over the configured directories and template
    #[must_use]
    pub fn storage(&self) -> FileStorage {
        FileStorage::new(&self.directory.active, &self.directory.archive)
            .with_template(self.template.clone())
    }

    #[must_use]
    pub fn plugin_dir(&self) -> Option<PathBuf> {
        self.plugins.directory.clone().or_else(default_plugin_dir)
    }

    /// Filter and opener pipeline for `--open`
    ///
    /// Discovery problems are logged and leave only the built-in plugins.
    #[must_use]
    pub fn pipeline(&self) -> Pipeline {
        let mut registry = PluginRegistry::with_builtins();
        if let Some(dir) = self.plugin_dir() {
            if let Err(e) = registry.discover(&dir) {
                tracing::warn!("Failed to discover plugins in {}: {e}", dir.display());
            }
        }
        Pipeline::new(
            registry,
            self.plugins.files.filter.clone(),
            self.plugins.files.open.clone(),
        )
    }
}

fn read_yaml(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        TickletError::ConfigError(format!("Failed to read config file {}: {e}", path.display()))
    })?;
    serde_yaml::from_str(&content).map_err(|e| {
        TickletError::ConfigError(format!("Failed to parse config file {}: {e}", path.display()))
    })
}

/// Merge `overlay` into `base`
///
/// Mappings merge key by key, recursively. Any other overlay value replaces
/// the base value, except null which leaves it untouched.
pub fn merge_values(base: &mut Value, overlay: Value) {
    match (base, overlay) {
        (_, Value::Null) => {},
        (Value::Mapping(base), Value::Mapping(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key, value);
                    },
                }
            }
        },
        (base, overlay) => *base = overlay,
    }
}

/// The user's config file, `ticklet` or `ticklet.yaml` in the config directory
#[must_use]
pub fn default_config_file() -> Option<PathBuf> {
    let dirs = BaseDirs::new()?;
    [APP_NAME.to_string(), format!("{APP_NAME}.yaml")]
        .into_iter()
        .map(|name| dirs.config_dir().join(name))
        .find(|path| path.is_file())
}

#[must_use]
pub fn default_plugin_dir() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.data_dir().join(APP_NAME).join("plugins"))
}

/// Replace a leading `~` with the home directory
#[must_use]
pub fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match BaseDirs::new() {
        Some(dirs) => dirs.home_dir().join(rest),
        None => path.to_path_buf(),
    }
}
