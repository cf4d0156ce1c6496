//! Backup manager.
//!
//! Copies the target aside before it is rewritten. Best-effort by default;
//! the reconciler decides whether a failure is fatal.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use tracing::debug;

use crate::error::{BackupError, Result};

/// A completed backup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupRecord {
    /// The file that was copied.
    pub original: PathBuf,
    /// Where the copy lives.
    pub location: PathBuf,
    /// When the copy was taken.
    pub timestamp: DateTime<Utc>,
}

/// Backup location for `target` at `timestamp`.
///
/// `<target>.backup.<ISO-8601>` with `:` and `.` in the timestamp replaced
/// by `-`, e.g. `.env.vault.backup.2024-05-01T12-30-00-123Z`.
pub fn backup_path(target: &Path, timestamp: &DateTime<Utc>) -> PathBuf {
    let stamp = timestamp
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace(|c: char| c == ':' || c == '.', "-");

    let mut name = target.as_os_str().to_os_string();
    name.push(".backup.");
    name.push(stamp);
    PathBuf::from(name)
}

/// Copy `target` byte-for-byte to its backup location.
///
/// Returns `None` when there is nothing to back up.
///
/// # Errors
///
/// Returns `BackupError::Copy` if the copy fails.
pub fn create(target: &Path) -> Result<Option<BackupRecord>> {
    if !target.exists() {
        debug!(path = %target.display(), "no target to back up");
        return Ok(None);
    }

    let timestamp = Utc::now();
    let location = backup_path(target, &timestamp);

    std::fs::copy(target, &location).map_err(|source| BackupError::Copy {
        path: target.to_path_buf(),
        backup: location.clone(),
        source,
    })?;

    debug!(path = %target.display(), backup = %location.display(), "backup created");

    Ok(Some(BackupRecord {
        original: target.to_path_buf(),
        location,
        timestamp,
    }))
}
