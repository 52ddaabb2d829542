//! Studio process lifecycle monitoring
//!
//! The watcher keeps a set of executables to look for and a table of the
//! matching processes it has seen start. Each poll is two independent scans:
//! one for processes that appeared, one for tracked processes that exited.

mod table;
mod watcher;

use std::path::PathBuf;
use std::time::SystemTime;

pub use table::{ProcessTable, SystemProcessTable};
pub use watcher::ProcessWatcher;

#[cfg(test)]
pub(crate) use watcher::testing;

/// One live process as reported by a [`ProcessTable`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessEntry {
    /// Process id
    pub pid: u32,
    /// Executable path as reported by the OS
    pub executable: PathBuf,
    /// When the process started
    pub start_time: SystemTime,
}

/// A running process of a watched executable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedProcess {
    /// Process id
    pub pid: u32,
    /// Resolved executable path
    pub executable: PathBuf,
    /// When the process started
    pub start_time: SystemTime,
}
