//! Selection filter.
//!
//! Narrows a diff to the changes the operator approved. Rejected changes fold
//! back into `unchanged` with their pre-change value, except rejected
//! additions, which simply disappear.

use std::collections::BTreeSet;

use crate::core::diff::Diff;
use crate::error::{Result, SelectionError};

/// The operator's choice of changes to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Every pending change (forced mode).
    All,
    /// Only these keys.
    Keys(BTreeSet<String>),
}

impl Selection {
    /// Select the given keys.
    pub fn keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Keys(keys.into_iter().map(Into::into).collect())
    }

    /// Select nothing.
    pub fn none() -> Self {
        Self::Keys(BTreeSet::new())
    }

    /// Whether `key` is selected.
    pub fn contains(&self, key: &str) -> bool {
        match self {
            Self::All => true,
            Self::Keys(keys) => keys.contains(key),
        }
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Keys(keys) if keys.is_empty())
    }
}

/// Apply a selection to a diff.
///
/// # Errors
///
/// Returns `SelectionError::UnknownKey` if the selection names a key that is
/// not a pending change of `diff`.
pub fn filter(diff: &Diff, selection: &Selection) -> Result<Diff> {
    if let Selection::Keys(keys) = selection {
        if let Some(unknown) = keys.iter().find(|k| diff.kind_of(k.as_str()).is_none()) {
            return Err(SelectionError::UnknownKey(unknown.clone()).into());
        }
    }

    let mut filtered = Diff {
        unchanged: diff.unchanged.clone(),
        ..Diff::default()
    };

    for (key, value) in &diff.added {
        if selection.contains(key) {
            filtered.added.insert(key.clone(), value.clone());
        }
    }

    for (key, change) in &diff.modified {
        if selection.contains(key) {
            filtered.modified.insert(key.clone(), change.clone());
        } else {
            filtered.unchanged.insert(key.clone(), change.old.clone());
        }
    }

    for (key, value) in &diff.removed {
        if selection.contains(key) {
            filtered.removed.insert(key.clone(), value.clone());
        } else {
            filtered.unchanged.insert(key.clone(), value.clone());
        }
    }

    Ok(filtered)
}
