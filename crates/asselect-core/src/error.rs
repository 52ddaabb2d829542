use std::path::PathBuf;

/// Result type alias using `anyhow::Error`
pub type Result<T> = anyhow::Result<T>;

/// Invalid auto-sync settings
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// Periodic interval outside the accepted range
    #[error("periodic sync interval must be between {min} and {max} minutes, got {value}")]
    IntervalOutOfRange {
        /// Rejected value
        value: u32,
        /// Smallest accepted value
        min: u32,
        /// Largest accepted value
        max: u32,
    },

    /// Backup retention count outside the accepted range
    #[error("max backups must be between 0 and {max}, got {value}")]
    MaxBackupsOutOfRange {
        /// Rejected value
        value: u32,
        /// Largest accepted value
        max: u32,
    },
}

/// Reasons a session cannot be started
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No project root has been configured yet
    #[error("project root is not set")]
    ProjectRootNotSet,
}

/// Failures of the one-shot project setup sequence
#[derive(Debug, thiserror::Error)]
pub enum ProjectError {
    /// A directory the project layout requires is missing
    #[error("{kind} directory not found: {}", path.display())]
    MissingDirectory {
        /// Human-readable name of the directory
        kind: &'static str,
        /// Expected location
        path: PathBuf,
    },

    /// A version-specific file or directory to copy from is missing
    #[error("source not found: {}", .0.display())]
    MissingSource(PathBuf),

    /// The studio executable does not exist
    #[error("Automation Studio executable not found: {}", .0.display())]
    MissingExecutable(PathBuf),

    /// An I/O operation failed
    #[error("{context}: {source}")]
    Io {
        /// What was being attempted
        context: String,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl ProjectError {
    pub(crate) fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}
