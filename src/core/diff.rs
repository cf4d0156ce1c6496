//! Diff engine.
//!
//! Classifies every key of two snapshots into added, modified, removed or
//! unchanged. The four partitions are disjoint and together cover the union
//! of both key sets.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::core::snapshot::Snapshot;

/// Old and new value of a modified key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Modification {
    pub old: String,
    pub new: String,
}

/// The class of a pending change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
}

impl ChangeKind {
    /// Short label used in listings.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::Modified => "modified",
            Self::Removed => "removed",
        }
    }

    /// One-character marker used in listings.
    pub fn marker(&self) -> char {
        match self {
            Self::Added => '+',
            Self::Modified => '~',
            Self::Removed => '-',
        }
    }
}

/// A single pending change, as presented to the operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Change {
    pub key: String,
    pub kind: ChangeKind,
}

/// Key-level comparison of two snapshots.
///
/// Never mutated after construction; selection produces a new `Diff`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Diff {
    pub(crate) added: BTreeMap<String, String>,
    pub(crate) modified: BTreeMap<String, Modification>,
    pub(crate) removed: BTreeMap<String, String>,
    pub(crate) unchanged: BTreeMap<String, String>,
}

impl Diff {
    /// Compare `old` against `new`.
    ///
    /// Equality is exact string equality on the parsed values.
    pub fn compute(old: &Snapshot, new: &Snapshot) -> Self {
        let mut diff = Self::default();

        for (key, new_value) in new.entries() {
            match old.get(key) {
                None => {
                    diff.added.insert(key.to_string(), new_value.to_string());
                }
                Some(old_value) if old_value != new_value => {
                    diff.modified.insert(
                        key.to_string(),
                        Modification {
                            old: old_value.to_string(),
                            new: new_value.to_string(),
                        },
                    );
                }
                Some(_) => {
                    diff.unchanged
                        .insert(key.to_string(), new_value.to_string());
                }
            }
        }

        for (key, old_value) in old.entries() {
            if !new.contains_key(key) {
                diff.removed.insert(key.to_string(), old_value.to_string());
            }
        }

        diff
    }

    /// Keys that exist only in the new snapshot.
    pub fn added(&self) -> &BTreeMap<String, String> {
        &self.added
    }

    /// Keys whose value differs.
    pub fn modified(&self) -> &BTreeMap<String, Modification> {
        &self.modified
    }

    /// Keys that exist only in the old snapshot.
    pub fn removed(&self) -> &BTreeMap<String, String> {
        &self.removed
    }

    /// Keys with equal values in both.
    pub fn unchanged(&self) -> &BTreeMap<String, String> {
        &self.unchanged
    }

    /// Pending changes, grouped by class and sorted by key within a class.
    pub fn changes(&self) -> Vec<Change> {
        let groups = [
            (ChangeKind::Added, self.added.keys().collect::<Vec<_>>()),
            (ChangeKind::Modified, self.modified.keys().collect()),
            (ChangeKind::Removed, self.removed.keys().collect()),
        ];

        groups
            .into_iter()
            .flat_map(|(kind, keys)| {
                keys.into_iter().map(move |key| Change {
                    key: key.clone(),
                    kind,
                })
            })
            .collect()
    }

    /// The class of a pending change, if `key` is one.
    pub fn kind_of(&self, key: &str) -> Option<ChangeKind> {
        if self.added.contains_key(key) {
            Some(ChangeKind::Added)
        } else if self.modified.contains_key(key) {
            Some(ChangeKind::Modified)
        } else if self.removed.contains_key(key) {
            Some(ChangeKind::Removed)
        } else {
            None
        }
    }

    /// Number of pending changes.
    pub fn change_count(&self) -> usize {
        self.added.len() + self.modified.len() + self.removed.len()
    }

    /// Whether there is nothing to apply.
    pub fn has_changes(&self) -> bool {
        self.change_count() > 0
    }
}
