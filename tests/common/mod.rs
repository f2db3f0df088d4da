#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Temporary working area with both checkpoint logs, a registry path and a config file.
pub struct Workspace {
    pub dir: TempDir,
    pub entry_log: PathBuf,
    pub exit_log: PathBuf,
    pub registry: PathBuf,
    pub config: PathBuf,
}

impl Workspace {
    pub fn new(entry: &str, exit: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let entry_log = dir.path().join("box_a.txt");
        let exit_log = dir.path().join("box_b.txt");
        let registry = dir.path().join("vehicle_registry.json");
        let config = dir.path().join("config.json");

        fs::write(&entry_log, entry).unwrap();
        fs::write(&exit_log, exit).unwrap();
        write_config(&config, &entry_log, &exit_log, &registry);

        Self {
            dir,
            entry_log,
            exit_log,
            registry,
            config,
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// The CLI pointed at this workspace, isolated from the caller's environment.
    pub fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("speedtrap").unwrap();
        cmd.arg("--config")
            .arg(&self.config)
            .env_remove("SPEEDTRAP_SPEED_LIMIT")
            .env_remove("SPEEDTRAP_DISTANCE")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1")
            .current_dir(self.dir.path());
        cmd
    }
}

pub fn write_config(path: &Path, entry_log: &Path, exit_log: &Path, registry: &Path) {
    let config = serde_json::json!({
        "speed_limit": 60,
        "distance": 5,
        "entry_log": entry_log,
        "exit_log": exit_log,
        "registry_path": registry,
    });
    fs::write(path, serde_json::to_string_pretty(&config).unwrap()).unwrap();
}

/// Writes a checkpoint log in `dir` and returns its path.
pub fn write_log(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path
}

/// Common assertion helper for error messages
pub fn assert_error_contains(error_string: &str, expected_messages: &[&str]) {
    for msg in expected_messages {
        assert!(
            error_string.contains(msg),
            "Expected error to contain '{msg}', but got: {error_string}"
        );
    }
}
