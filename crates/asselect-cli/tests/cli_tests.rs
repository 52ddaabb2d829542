use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Isolated config directory plus a project with both studio versions
struct Env {
    _tmp: TempDir,
    config: PathBuf,
    root: PathBuf,
    exe: PathBuf,
}

impl Env {
    fn new() -> Self {
        let tmp = TempDir::new().unwrap();
        let config = tmp.path().join("config");
        let root = tmp.path().join("OCB");
        let files = [
            ("Logical/Libraries/stale.st", "stale"),
            ("Logical/Libraries_6/Lib6/main.st", "six"),
            ("Logical/Libraries_45/Lib45/main.st", "four-five"),
            ("Physical/Physical.pkg", "active"),
            ("Physical/Physical_6.pkg", "pkg6"),
            ("Physical/Physical_45.pkg", "pkg45"),
            ("OCB.apj", "active"),
            ("OCB_as6.apj", "apj6"),
            ("OCB_as45.apj", "apj45"),
        ];
        for (rel, content) in files {
            write(&root.join(rel), content);
        }

        let exe = tmp.path().join("bin/pg.exe");
        write(&exe, "");

        Self {
            _tmp: tmp,
            config,
            root,
            exe,
        }
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("asselect").unwrap();
        cmd.arg("--config-dir").arg(&self.config).env_remove("ASSELECT_LOG");
        cmd
    }

    /// Project root set and AS 6 registered
    fn configured() -> Self {
        let env = Self::new();
        env.cmd().arg("setup").arg(&env.root).assert().success();
        env.cmd()
            .args(["studio", "add", "6"])
            .arg(&env.exe)
            .assert()
            .success();
        env
    }

    /// Configured and switched to AS 6
    fn switched() -> Self {
        let env = Self::configured();
        env.cmd().args(["switch", "6"]).assert().success();
        env
    }
}

fn write(path: &Path, content: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

#[test]
fn test_help_output() {
    let mut cmd = Command::cargo_bin("asselect").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Automation Studio"))
        .stdout(predicate::str::contains("setup"))
        .stdout(predicate::str::contains("studio"))
        .stdout(predicate::str::contains("switch"))
        .stdout(predicate::str::contains("sync"))
        .stdout(predicate::str::contains("status"))
        .stdout(predicate::str::contains("watch"))
        .stdout(predicate::str::contains("settings"));
}

#[test]
fn test_version_output() {
    let mut cmd = Command::cargo_bin("asselect").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_invalid_version_rejected() {
    let env = Env::new();
    env.cmd().args(["switch", "7"]).assert().failure();
}

#[test]
fn test_status_without_project_root() {
    let env = Env::new();
    env.cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Project root: (not set)"));
}

#[test]
fn test_setup_rejects_incomplete_project() {
    let env = Env::new();
    fs::remove_dir_all(env.root.join("Physical")).unwrap();

    env.cmd()
        .arg("setup")
        .arg(&env.root)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Physical directory not found"));
}

#[test]
fn test_setup_lists_library_sources() {
    let env = Env::new();
    env.cmd()
        .arg("setup")
        .arg(&env.root)
        .assert()
        .success()
        .stdout(predicate::str::contains("Project root set to"))
        .stdout(predicate::str::contains("Libraries_45, Libraries_6"));

    env.cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains(env.root.display().to_string()));
}

#[test]
fn test_studio_add_list_remove() {
    let env = Env::new();
    env.cmd()
        .args(["studio", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No studios registered"));

    env.cmd()
        .args(["studio", "add", "4.5"])
        .arg(&env.exe)
        .assert()
        .success()
        .stdout(predicate::str::contains("Registered Automation Studio 4.5"));

    env.cmd()
        .args(["studio", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("AS 4.5"));

    env.cmd().args(["studio", "remove", "4.5"]).assert().success();
    env.cmd()
        .args(["studio", "remove", "4.5"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not registered"));
}

#[test]
fn test_studio_add_requires_existing_executable() {
    let env = Env::new();
    env.cmd()
        .args(["studio", "add", "6", "/nonexistent/pg.exe"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Executable not found"));
}

#[test]
fn test_switch_requires_registered_studio() {
    let env = Env::new();
    env.cmd().arg("setup").arg(&env.root).assert().success();

    env.cmd()
        .args(["switch", "6"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not registered"));
}

#[test]
fn test_switch_rewires_project() {
    let env = Env::switched();

    let libraries = env.root.join("Logical/Libraries");
    assert!(!libraries.join("stale.st").exists());
    assert_eq!(fs::read_to_string(libraries.join("Lib6/main.st")).unwrap(), "six");
    assert_eq!(fs::read_to_string(env.root.join("Physical/Physical.pkg")).unwrap(), "pkg6");
    assert_eq!(fs::read_to_string(env.root.join("OCB.apj")).unwrap(), "apj6");

    env.cmd()
        .args(["studio", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* AS 6"));
}

#[test]
fn test_switch_writes_session_log() {
    let env = Env::switched();

    let logs: Vec<_> = fs::read_dir(env.config.join("logs"))
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(logs.len(), 1);

    let content = fs::read_to_string(&logs[0]).unwrap();
    assert!(content.contains("NEW AUTOMATION SELECTOR SESSION STARTED"));
    assert!(content.contains("Studio selected"));
    assert!(content.contains("Project setup completed successfully"));
}

#[test]
fn test_sync_without_project_root() {
    let env = Env::new();
    env.cmd()
        .args(["studio", "add", "6"])
        .arg(&env.exe)
        .assert()
        .success();

    env.cmd()
        .args(["sync", "6"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No project root configured"));
}

#[test]
fn test_sync_mirrors_working_copy() {
    let env = Env::switched();
    write(&env.root.join("Logical/Libraries/Lib6/new.st"), "fresh");
    fs::remove_file(env.root.join("Logical/Libraries/Lib6/main.st")).unwrap();

    env.cmd()
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created:  1"))
        .stdout(predicate::str::contains("Deleted:  1"))
        .stdout(predicate::str::contains("Files synced: 2"));

    let source = env.root.join("Logical/Libraries_6/Lib6");
    assert_eq!(fs::read_to_string(source.join("new.st")).unwrap(), "fresh");
    assert!(!source.join("main.st").exists());
    assert!(env.root.join("Logical/Libraries_6_backup").is_dir());

    env.cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("In sync"))
        .stdout(predicate::str::contains("Backups: 1"));
}

#[test]
fn test_sync_refuses_studio_not_switched_in() {
    let env = Env::configured();
    env.cmd()
        .args(["studio", "add", "4.5"])
        .arg(&env.exe)
        .assert()
        .success();
    env.cmd().args(["switch", "6"]).assert().success();

    let mismatched: [&[&str]; 3] = [&["sync", "4.5"], &["sync", "4.5", "--dry-run"], &["watch", "4.5"]];
    for args in mismatched {
        env.cmd()
            .args(args)
            .assert()
            .failure()
            .stderr(predicate::str::contains("switched to Automation Studio 6, not 4.5"));
    }

    let source45 = env.root.join("Logical/Libraries_45");
    assert_eq!(fs::read_to_string(source45.join("Lib45/main.st")).unwrap(), "four-five");
    assert!(!source45.join("Lib6").exists());
    assert!(!env.root.join("Logical/Libraries_45_backup").exists());
}

#[test]
fn test_sync_requires_a_switch_first() {
    let env = Env::configured();

    env.cmd()
        .args(["sync", "6"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No studio selected"));

    assert!(env.root.join("Logical/Libraries/stale.st").exists());
    assert!(!env.root.join("Logical/Libraries_6/stale.st").exists());
}

#[test]
fn test_sync_dry_run_changes_nothing() {
    let env = Env::switched();
    write(&env.root.join("Logical/Libraries/Lib6/new.st"), "fresh");

    env.cmd()
        .args(["sync", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 pending change(s)"))
        .stdout(predicate::str::contains("new"));

    assert!(!env.root.join("Logical/Libraries_6/Lib6/new.st").exists());

    env.cmd()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Pending: 0 modified, 1 new, 0 deleted"));
}

#[test]
fn test_sync_respects_disabled_backup() {
    let env = Env::switched();
    env.cmd()
        .args(["settings", "set", "--backup", "false"])
        .assert()
        .success();
    write(&env.root.join("Logical/Libraries/Lib6/new.st"), "fresh");

    env.cmd()
        .arg("sync")
        .assert()
        .success()
        .stdout(predicate::str::contains("Backup:").not());

    assert!(!env.root.join("Logical/Libraries_6_backup").exists());
}

#[test]
fn test_watch_requires_selected_studio() {
    let env = Env::new();
    env.cmd().arg("setup").arg(&env.root).assert().success();

    env.cmd()
        .arg("watch")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No studio selected"));
}

#[test]
fn test_settings_show_defaults() {
    let env = Env::new();
    env.cmd()
        .arg("settings")
        .assert()
        .success()
        .stdout(predicate::str::contains("periodic_interval_minutes = 5"))
        .stdout(predicate::str::contains("max_backups               = 3"));

    assert!(env.config.join("auto_sync.toml").exists());
}

#[test]
fn test_settings_set_and_reset() {
    let env = Env::new();
    env.cmd()
        .args(["settings", "set", "--interval", "10", "--periodic", "false"])
        .assert()
        .success()
        .stdout(predicate::str::contains("periodic_interval_minutes = 10"))
        .stdout(predicate::str::contains("periodic_enabled          = false"));

    env.cmd()
        .args(["settings", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("periodic_interval_minutes = 10"));

    env.cmd()
        .args(["settings", "reset"])
        .assert()
        .success()
        .stdout(predicate::str::contains("periodic_interval_minutes = 5"));
}

#[test]
fn test_settings_rejects_out_of_range() {
    let env = Env::new();
    env.cmd()
        .args(["settings", "set", "--interval", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("between 1 and 60"));

    env.cmd()
        .args(["settings", "set", "--max-backups", "11"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("max backups"));

    env.cmd()
        .arg("settings")
        .assert()
        .success()
        .stdout(predicate::str::contains("periodic_interval_minutes = 5"));
}
