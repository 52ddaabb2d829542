//! Watched executables and the processes running them

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use super::table::{ProcessTable, SystemProcessTable};
use super::TrackedProcess;

/// Tracks processes of a set of executables
pub struct ProcessWatcher {
    table: Box<dyn ProcessTable>,
    watched: Vec<PathBuf>,
    tracked: BTreeMap<u32, TrackedProcess>,
}

impl ProcessWatcher {
    /// Watcher backed by the host process table
    #[must_use]
    pub fn new() -> Self {
        Self::with_table(Box::new(SystemProcessTable::new()))
    }

    /// Watcher backed by a custom process table
    #[must_use]
    pub fn with_table(table: Box<dyn ProcessTable>) -> Self {
        Self {
            table,
            watched: Vec::new(),
            tracked: BTreeMap::new(),
        }
    }

    /// Start watching an executable. Returns false if it was already watched.
    pub fn add_executable(&mut self, path: &Path) -> bool {
        let identity = identity(path);
        if self.watched.contains(&identity) {
            return false;
        }

        tracing::debug!(executable = %identity.display(), "Watching executable");
        self.watched.push(identity);
        true
    }

    /// Stop watching an executable and forget its tracked processes.
    /// Returns false if it was not watched.
    pub fn remove_executable(&mut self, path: &Path) -> bool {
        let identity = identity(path);
        let Some(index) = self.watched.iter().position(|w| *w == identity) else {
            return false;
        };

        self.watched.remove(index);
        self.tracked.retain(|_, process| process.executable != identity);
        true
    }

    /// Executables being watched, by resolved path
    #[must_use]
    pub fn watched(&self) -> &[PathBuf] {
        &self.watched
    }

    /// Start tracking watched processes that appeared since the last scan
    pub fn scan_for_new(&mut self) -> Vec<TrackedProcess> {
        if self.watched.is_empty() {
            return Vec::new();
        }

        let mut started = Vec::new();

        for entry in self.table.list_processes() {
            if self.tracked.contains_key(&entry.pid) {
                continue;
            }

            let executable = identity(&entry.executable);
            if !self.watched.contains(&executable) {
                continue;
            }

            let process = TrackedProcess {
                pid: entry.pid,
                executable,
                start_time: entry.start_time,
            };
            tracing::info!(
                pid = process.pid,
                executable = %process.executable.display(),
                "Studio process started"
            );
            self.tracked.insert(process.pid, process.clone());
            started.push(process);
        }

        started
    }

    /// Stop tracking processes that exited since the last scan
    pub fn scan_for_closed(&mut self) -> Vec<TrackedProcess> {
        let exited: Vec<u32> = self
            .tracked
            .keys()
            .copied()
            .filter(|pid| !self.table.is_alive(*pid))
            .collect();

        exited
            .into_iter()
            .filter_map(|pid| self.tracked.remove(&pid))
            .inspect(|process| {
                tracing::info!(
                    pid = process.pid,
                    executable = %process.executable.display(),
                    "Studio process exited"
                );
            })
            .collect()
    }

    /// Whether any tracked process is still running. Prunes exited ones first.
    pub fn is_any_running(&mut self) -> bool {
        self.scan_for_closed();
        !self.tracked.is_empty()
    }

    /// Tracked processes, ordered by pid
    pub fn running(&self) -> impl Iterator<Item = &TrackedProcess> {
        self.tracked.values()
    }

    /// Tracked processes of one executable
    #[must_use]
    pub fn find_by_executable(&self, path: &Path) -> Vec<&TrackedProcess> {
        let identity = identity(path);
        self.tracked
            .values()
            .filter(|process| process.executable == identity)
            .collect()
    }

    /// How long a tracked process has been running
    #[must_use]
    pub fn uptime(&self, pid: u32) -> Option<Duration> {
        let process = self.tracked.get(&pid)?;
        Some(
            SystemTime::now()
                .duration_since(process.start_time)
                .unwrap_or_default(),
        )
    }

    /// Forget every watched executable and tracked process
    pub fn stop(&mut self) {
        self.watched.clear();
        self.tracked.clear();
    }
}

impl Default for ProcessWatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Filesystem identity of a path. Falls back to the path itself when it
/// cannot be resolved, e.g. for an executable deleted while running.
fn identity(path: &Path) -> PathBuf {
    dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
