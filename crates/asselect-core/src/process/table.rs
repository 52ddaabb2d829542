//! Host process table access

use std::time::{Duration, SystemTime};

use sysinfo::{Pid, ProcessRefreshKind, ProcessStatus, ProcessesToUpdate, System, UpdateKind};

use super::ProcessEntry;

/// Read access to the host's processes
pub trait ProcessTable: Send {
    /// Every live process whose executable path is known
    fn list_processes(&mut self) -> Vec<ProcessEntry>;

    /// Whether a process is still running. Inaccessible means not running.
    fn is_alive(&mut self, pid: u32) -> bool;
}

/// [`ProcessTable`] backed by `sysinfo`. Zombies count as exited.
pub struct SystemProcessTable {
    system: System,
}

impl SystemProcessTable {
    /// Create an empty table; nothing is read until the first call
    #[must_use]
    pub fn new() -> Self {
        Self {
            system: System::new(),
        }
    }
}

impl Default for SystemProcessTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ProcessTable for SystemProcessTable {
    fn list_processes(&mut self) -> Vec<ProcessEntry> {
        self.system.refresh_processes_specifics(
            ProcessesToUpdate::All,
            ProcessRefreshKind::new().with_exe(UpdateKind::OnlyIfNotSet),
        );

        self.system
            .processes()
            .iter()
            .filter(|(_, process)| process.status() != ProcessStatus::Zombie)
            .filter_map(|(pid, process)| {
                Some(ProcessEntry {
                    pid: pid.as_u32(),
                    executable: process.exe()?.to_path_buf(),
                    start_time: SystemTime::UNIX_EPOCH + Duration::from_secs(process.start_time()),
                })
            })
            .collect()
    }

    fn is_alive(&mut self, pid: u32) -> bool {
        // A fresh table cannot hold stale entries for exited processes
        let mut system = System::new();
        let pid = Pid::from_u32(pid);
        system.refresh_processes_specifics(ProcessesToUpdate::Some(&[pid]), ProcessRefreshKind::new());

        system
            .process(pid)
            .is_some_and(|process| process.status() != ProcessStatus::Zombie)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_current_process_is_listed_and_alive() {
        let mut table = SystemProcessTable::new();
        let own = std::process::id();

        assert!(table.is_alive(own));

        let processes = table.list_processes();
        if let Some(entry) = processes.iter().find(|p| p.pid == own) {
            assert!(entry.start_time <= SystemTime::now());
        }
    }

    #[test]
    fn test_unknown_pid_is_not_alive() {
        let mut table = SystemProcessTable::new();

        // Above the default Linux pid_max and unlikely elsewhere
        assert!(!table.is_alive(u32::MAX - 1));
    }
}
