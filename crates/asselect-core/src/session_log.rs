//! Human-readable session audit log
//!
//! Records what happened to the user's files during a run. Sinks must never
//! fail the operation they are recording, so every method is infallible.

use std::fmt;
use std::path::Path;

use crate::studio::AutomationStudio;

/// Tracing target for session records. The CLI routes it to the session file.
pub const SESSION_TARGET: &str = "session";

/// Sink for session operation records
pub trait SessionLog: Send + Sync {
    /// A single file was copied, deleted or otherwise touched
    fn file_operation(&self, label: &str, source: &Path, target: Option<&Path>);

    /// A project-level step completed
    fn project_operation(&self, label: &str, detail: Option<&str>);

    /// Something went wrong
    fn error(&self, message: &str, cause: Option<&dyn fmt::Display>);

    /// The user picked a studio to work with
    fn studio_selected(&self, studio: &AutomationStudio) {
        self.project_operation(
            "Studio selected",
            Some(&format!("{} (version {})", studio.name, studio.version)),
        );
    }
}

/// Session log that emits records as `tracing` events on [`SESSION_TARGET`]
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSessionLog;

impl TracingSessionLog {
    /// Write the banner that opens a session file
    pub fn session_started(&self) {
        tracing::info!(target: SESSION_TARGET, "{}", "=".repeat(50));
        tracing::info!(target: SESSION_TARGET, "NEW AUTOMATION SELECTOR SESSION STARTED");
        tracing::info!(target: SESSION_TARGET, "{}", "=".repeat(50));
    }

    /// Write the banner that closes a session file
    pub fn session_ended(&self) {
        tracing::info!(target: SESSION_TARGET, "{}", "=".repeat(50));
        tracing::info!(target: SESSION_TARGET, "AUTOMATION SELECTOR SESSION ENDED");
        tracing::info!(target: SESSION_TARGET, "{}", "=".repeat(50));
    }
}

impl SessionLog for TracingSessionLog {
    fn file_operation(&self, label: &str, source: &Path, target: Option<&Path>) {
        match target {
            Some(target) => tracing::info!(
                target: SESSION_TARGET,
                "File operation: {label} - Source: {} - Target: {}",
                source.display(),
                target.display()
            ),
            None => tracing::info!(
                target: SESSION_TARGET,
                "File operation: {label} - Source: {}",
                source.display()
            ),
        }
    }

    fn project_operation(&self, label: &str, detail: Option<&str>) {
        match detail {
            Some(detail) => {
                tracing::info!(target: SESSION_TARGET, "Project operation: {label} - {detail}");
            }
            None => tracing::info!(target: SESSION_TARGET, "Project operation: {label}"),
        }
    }

    fn error(&self, message: &str, cause: Option<&dyn fmt::Display>) {
        tracing::error!(target: SESSION_TARGET, "ERROR: {message}");
        if let Some(cause) = cause {
            tracing::error!(target: SESSION_TARGET, "Exception details: {cause}");
        }
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;

    use super::*;

    /// Session log that keeps every record in memory
    #[derive(Debug, Default)]
    pub(crate) struct RecordingSessionLog {
        entries: Mutex<Vec<String>>,
    }

    impl RecordingSessionLog {
        pub(crate) fn entries(&self) -> Vec<String> {
            self.entries.lock().unwrap().clone()
        }

        pub(crate) fn count_containing(&self, needle: &str) -> usize {
            self.entries().iter().filter(|e| e.contains(needle)).count()
        }

        fn push(&self, entry: String) {
            self.entries.lock().unwrap().push(entry);
        }
    }

    impl SessionLog for RecordingSessionLog {
        fn file_operation(&self, label: &str, source: &Path, target: Option<&Path>) {
            let target = target.map(|t| format!(" -> {}", t.display())).unwrap_or_default();
            self.push(format!("file: {label}: {}{target}", source.display()));
        }

        fn project_operation(&self, label: &str, detail: Option<&str>) {
            self.push(format!("project: {label}: {}", detail.unwrap_or_default()));
        }

        fn error(&self, message: &str, cause: Option<&dyn fmt::Display>) {
            let cause = cause.map(|c| format!(" ({c})")).unwrap_or_default();
            self.push(format!("error: {message}{cause}"));
        }
    }
}
