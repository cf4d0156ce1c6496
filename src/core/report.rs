//! Run events.
//!
//! The reconciler never prints. It describes what happens as [`Event`]s and
//! hands them to a [`Reporter`] chosen by the caller.

use std::path::Path;

use crate::core::backup::BackupRecord;
use crate::core::diff::{Change, Diff};
use crate::core::reconcile::{AbortReason, Stage, Stats};
use crate::error::Error;

/// Something worth telling the operator.
#[derive(Debug)]
pub enum Event<'a> {
    /// The run moved to a new stage.
    Stage(Stage),
    /// Source and target were resolved.
    Files { source: &'a Path, target: &'a Path },
    /// A file repeats keys; only the first occurrence counts.
    DuplicateKeys { path: &'a Path, keys: Vec<&'a str> },
    /// Both snapshots were compared.
    Analyzed { diff: &'a Diff },
    /// Nothing differs.
    NoChanges,
    /// Forced mode applies every change without asking.
    Forced,
    /// The operator picked `selected` of `total` changes.
    Selected { selected: usize, total: usize },
    /// The target was copied aside.
    BackupCreated(&'a BackupRecord),
    /// Backups are disabled.
    BackupSkipped,
    /// The copy failed and the run continues without it.
    BackupFailed(&'a Error),
    /// The target was rewritten.
    Written { path: &'a Path, changes: &'a [Change] },
    /// The run stopped without writing.
    Aborted(AbortReason),
    /// The run finished.
    Completed(&'a Stats),
}

impl Event<'_> {
    /// Whether the event reports an outcome rather than progress.
    ///
    /// Quiet reporters show only these.
    pub fn is_outcome(&self) -> bool {
        matches!(
            self,
            Self::NoChanges
                | Self::BackupFailed(_)
                | Self::Written { .. }
                | Self::Aborted(_)
                | Self::Completed(_)
        )
    }
}

/// Receives run events.
pub trait Reporter {
    fn report(&self, event: &Event<'_>);
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct Silent;

impl Reporter for Silent {
    fn report(&self, _event: &Event<'_>) {}
}
