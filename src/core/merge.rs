//! Line-preserving merge.
//!
//! Rewrites a target file by touching only the lines of keys that change.
//! Comments, blanks, unparseable lines and untouched entries come through
//! byte-identical and in their original order; brand-new keys are appended.
//!
//! The whole result is computed in memory and written with a single atomic
//! rename, so a failed write never leaves a half-merged file behind.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::core::diff::Diff;
use crate::core::snapshot::{LineKind, Snapshot};
use crate::error::{MergeError, Result};

/// Concrete instructions for one merge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergePlan {
    updates: Vec<(String, String)>,
    deletions: BTreeSet<String>,
}

impl MergePlan {
    /// Create a plan.
    ///
    /// A key listed both as an update and a deletion is updated.
    pub fn new(updates: Vec<(String, String)>, deletions: impl IntoIterator<Item = String>) -> Self {
        let updated: HashSet<&str> = updates.iter().map(|(k, _)| k.as_str()).collect();
        let deletions = deletions
            .into_iter()
            .filter(|k| !updated.contains(k.as_str()))
            .collect();

        Self { updates, deletions }
    }

    /// Final values for keys that change, in append order.
    pub fn updates(&self) -> &[(String, String)] {
        &self.updates
    }

    /// Keys whose lines are removed.
    pub fn deletions(&self) -> &BTreeSet<String> {
        &self.deletions
    }

    /// Whether the plan changes nothing.
    pub fn is_empty(&self) -> bool {
        self.updates.is_empty() && self.deletions.is_empty()
    }
}

/// Added and modified keys of `diff` with their new values, in the order
/// they appear in `new`.
pub fn pending_updates(diff: &Diff, new: &Snapshot) -> Vec<(String, String)> {
    new.entries()
        .filter(|(key, _)| diff.added().contains_key(*key) || diff.modified().contains_key(*key))
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

/// Apply a plan to raw lines.
///
/// Only the first line of an updated key is rewritten; every line of a
/// deleted key is dropped. Keys never encountered are appended in plan
/// order. `crlf` selects the terminator kept on appended lines.
pub fn merge_lines(lines: &[String], plan: &MergePlan, crlf: bool) -> Vec<String> {
    let updates: HashMap<&str, &str> = plan
        .updates
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    let mut handled: HashSet<&str> = HashSet::new();
    let mut out = Vec::with_capacity(lines.len() + plan.updates.len());

    for line in lines {
        match LineKind::parse(line).key() {
            Some(key) if plan.deletions.contains(key) => {}
            Some(key) if !handled.contains(key) && updates.contains_key(key) => {
                let value = updates[key];
                let cr = if line.ends_with('\r') { "\r" } else { "" };
                out.push(format!("{}={}{}", key, value, cr));
                handled.insert(key);
            }
            _ => out.push(line.clone()),
        }
    }

    let cr = if crlf { "\r" } else { "" };
    for (key, value) in &plan.updates {
        if !handled.contains(key.as_str()) {
            out.push(format!("{}={}{}", key, value, cr));
        }
    }

    out
}

/// Apply a plan to a parsed target and render the final text.
///
/// The output ends with a newline when the target did, or when the target
/// had no lines at all.
pub fn merge(target: &Snapshot, plan: &MergePlan) -> String {
    let lines = merge_lines(target.lines(), plan, target.is_crlf());

    debug!(
        before = target.lines().len(),
        after = lines.len(),
        updates = plan.updates.len(),
        deletions = plan.deletions.len(),
        "merged"
    );

    if lines.is_empty() {
        return String::new();
    }

    let mut out = lines.join("\n");
    if target.has_trailing_newline() || target.lines().is_empty() {
        out.push('\n');
    }
    out
}

/// Write merged content to `path` atomically with owner-only permissions.
///
/// # Errors
///
/// Returns `MergeError::Write` if any step fails; the previous file, if any,
/// is left in place.
pub fn write_target(path: &Path, contents: &str) -> Result<()> {
    let wrap = |source: std::io::Error| MergeError::Write {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut temp = tempfile::Builder::new()
        .prefix(".dotseal-write-")
        .tempfile_in(dir)
        .map_err(wrap)?;
    temp.write_all(contents.as_bytes()).map_err(wrap)?;
    temp.flush().map_err(wrap)?;
    temp.as_file().sync_all().map_err(wrap)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        temp.as_file()
            .set_permissions(std::fs::Permissions::from_mode(0o600))
            .map_err(wrap)?;
    }

    temp.persist(path).map_err(|e| wrap(e.error))?;
    debug!(path = %path.display(), bytes = contents.len(), "target written");

    Ok(())
}
