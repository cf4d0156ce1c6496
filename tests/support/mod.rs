//! Test support utilities for dotseal integration tests.
//!
//! Provides an isolated project directory with a fake cipher backend.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

/// Test environment with an isolated project directory.
///
/// No process-global state is mutated. Child processes use `.current_dir()`
/// and explicit environment variables so tests can run in parallel.
pub struct Test {
    /// Temporary project directory
    pub dir: TempDir,
}

impl Test {
    /// Create an empty project with no backend configured.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        Self { dir }
    }

    /// Create a project whose `.dotseal.toml` points at the fake backend.
    #[cfg(unix)]
    pub fn with_backend() -> Self {
        let t = Self::new();
        t.install_backend(FAKE_BACKEND);
        t
    }

    /// Write `script` as the backend program and point the config at it.
    #[cfg(unix)]
    pub fn install_backend(&self, script: &str) {
        use std::os::unix::fs::PermissionsExt;

        let bin = self.dir.path().join("bin");
        fs::create_dir_all(&bin).expect("failed to create bin dir");

        let program = bin.join("fake-cipher");
        fs::write(&program, script).expect("failed to write backend");
        fs::set_permissions(&program, fs::Permissions::from_mode(0o755))
            .expect("failed to chmod backend");

        self.config(&format!(
            "[backend]\nprogram = \"{}\"\nargs = [\"{{direction}}\", \"{{file}}\"]\n",
            program.display()
        ));
    }

    /// Write `.dotseal.toml`.
    pub fn config(&self, contents: &str) {
        self.write(".dotseal.toml", contents);
    }

    /// Absolute path of a project file.
    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// Write a project file.
    pub fn write(&self, name: &str, contents: &str) {
        fs::write(self.path(name), contents).expect("failed to write file");
    }

    /// Read a project file.
    pub fn read(&self, name: &str) -> String {
        fs::read_to_string(self.path(name)).expect("failed to read file")
    }

    /// Whether a project file exists.
    pub fn exists(&self, name: &str) -> bool {
        self.path(name).exists()
    }

    /// Names of files in the project root, sorted.
    pub fn files(&self) -> Vec<String> {
        list(self.dir.path())
    }

    /// Backup files taken of `target`.
    pub fn backups(&self, target: &str) -> Vec<String> {
        let prefix = format!("{}.backup.", target);
        self.files()
            .into_iter()
            .filter(|f| f.starts_with(&prefix))
            .collect()
    }
}

fn list(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("failed to list dir")
        .filter_map(|e| e.ok())
        .filter(|e| e.path().is_file())
        .map(|e| e.file_name().to_string_lossy().to_string())
        .collect();
    names.sort();
    names
}
