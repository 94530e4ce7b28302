//! Error types for ticklet
//!
//! All fallible operations in the crate return [`Result`], whose error type
//! carries enough context to print a helpful message and pick an exit code.

use thiserror::Error;

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, TickletError>;

/// Errors produced by ticklet
#[derive(Error, Debug)]
pub enum TickletError {
    /// No ticket directory with this id exists in either state
    #[error("Ticket not found: {id}")]
    TicketNotFound { id: String },

    /// A ticket directory with this id already exists
    #[error("Ticket already exists: {id}")]
    TicketExists { id: String },

    /// The id cannot be used as a directory name
    #[error("Invalid ticket id: {0:?}")]
    InvalidTicketId(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Profile not found: {0}")]
    ProfileNotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_yaml::Error),

    #[error("Plugin not found: {0}")]
    PluginNotFound(String),

    #[error("Plugin '{plugin}' failed: {reason}")]
    PluginFailed { plugin: String, reason: String },

    #[error("Prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("Conflicting options: {}", .0.join(", "))]
    ConflictingOptions(Vec<String>),

    #[error("No tickets specified for action")]
    NoTicketsSpecified,

    /// A notes field value that would not fit on its line
    #[error("Invalid {field} {value:?}: must be a single line")]
    InvalidFieldValue { field: String, value: String },
}

impl TickletError {
    /// Create a plugin failure for the named plugin
    pub fn plugin_failed(plugin: impl Into<String>, reason: impl ToString) -> Self {
        Self::PluginFailed {
            plugin: plugin.into(),
            reason: reason.to_string(),
        }
    }

    /// Message shown to the user on the terminal
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Io(e) => match e.kind() {
                std::io::ErrorKind::PermissionDenied => format!("Permission denied: {e}"),
                std::io::ErrorKind::AlreadyExists => format!("Already exists: {e}"),
                _ => self.to_string(),
            },
            _ => self.to_string(),
        }
    }

    /// Hints for fixing the error, if any apply
    #[must_use]
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Self::TicketNotFound { .. } => vec![
                "Run 'ticklet --list-all' to see existing tickets".to_string(),
                "Run 'ticklet <id>' without options to create the ticket".to_string(),
            ],
            Self::TicketExists { id } => vec![format!(
                "Use 'ticklet --unarchive {id}' if the ticket is archived"
            )],
            Self::ProfileNotFound(_) => {
                vec!["Define the profile under 'profiles' in your configuration file".to_string()]
            },
            Self::ConfigError(_) | Self::SerializationError(_) => {
                vec!["Check the syntax of your configuration file".to_string()]
            },
            Self::PluginNotFound(_) => vec![
                "Check 'plugins.files.filter' and 'plugins.files.open' in your configuration"
                    .to_string(),
            ],
            _ => vec![],
        }
    }

    /// Whether the error comes from loading configuration
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigError(_) | Self::ProfileNotFound(_) | Self::SerializationError(_)
        )
    }
}
