//! Error types.
//!
//! Each stage of a reconciliation run has its own error enum; the top-level
//! [`Error`] wraps them so callers can decide what is fatal.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error returned by every fallible operation.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("source file not found: {}", .0.display())]
    SourceMissing(PathBuf),

    #[error(transparent)]
    Backend(#[from] BackendError),

    #[error(transparent)]
    Backup(#[from] BackupError),

    #[error(transparent)]
    Merge(#[from] MergeError),

    #[error(transparent)]
    Selection(#[from] SelectionError),

    #[error("interactive input required but stdin is not a terminal")]
    NonInteractive,

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration and credential errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no private key found (checked {sources})")]
    MissingCredential { sources: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to read key file {}: {source}", .path.display())]
    ReadKeyFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Failures of the external encryption backend.
#[derive(Error, Debug)]
pub enum BackendError {
    #[error("backend program not found: {0}")]
    NotFound(String),

    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{direction} failed ({status}): {stderr}")]
    Failed {
        direction: &'static str,
        status: String,
        stderr: String,
    },

    #[error("backend output is not valid UTF-8")]
    NonUtf8,

    #[error("malformed backend output: {0}")]
    MalformedOutput(String),

    #[error("scratch storage failed: {0}")]
    Scratch(#[source] std::io::Error),
}

/// Failure to snapshot the target before writing.
#[derive(Error, Debug)]
pub enum BackupError {
    #[error("failed to back up {} to {}: {source}", .path.display(), .backup.display())]
    Copy {
        path: PathBuf,
        backup: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Failure to write the merged target.
#[derive(Error, Debug)]
pub enum MergeError {
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Operator selections that do not match the computed diff.
#[derive(Error, Debug)]
pub enum SelectionError {
    #[error("selected key is not a pending change: {0}")]
    UnknownKey(String),
}

pub type Result<T> = std::result::Result<T, Error>;
