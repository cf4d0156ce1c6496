//! Console rendering of run events.

use crate::cli::output;
use crate::core::diff::{ChangeKind, Diff};
use crate::core::reconcile::Stats;
use crate::core::report::{Event, Reporter};

/// Prints events to the terminal.
///
/// In quiet mode only outcomes are printed.
#[derive(Debug, Default, Clone, Copy)]
pub struct Console {
    quiet: bool,
}

impl Console {
    pub fn new(quiet: bool) -> Self {
        Self { quiet }
    }
}

impl Reporter for Console {
    fn report(&self, event: &Event<'_>) {
        if self.quiet && !event.is_outcome() {
            return;
        }

        match event {
            Event::Stage(_) => {}
            Event::Files { source, target } => {
                println!(
                    "{} → {}",
                    output::path(source.display()),
                    output::path(target.display())
                );
            }
            Event::DuplicateKeys { path, keys } => output::warn(&format!(
                "{} repeats {}; the first occurrence wins",
                path.display(),
                keys.join(", ")
            )),
            Event::Analyzed { diff } => {
                if diff.has_changes() {
                    println!();
                    summary(diff);
                }
            }
            Event::NoChanges => output::success("no changes detected"),
            Event::Forced => output::dimmed("applying all changes (--force)"),
            Event::Selected { selected, total } => {
                println!();
                output::kv("selected", format!("{} of {}", selected, total));
            }
            Event::BackupCreated(record) => output::success(&format!(
                "backup saved to {}",
                output::path(record.location.display())
            )),
            Event::BackupSkipped => output::dimmed("backup skipped"),
            Event::BackupFailed(e) => output::warn(&format!("backup failed, continuing: {}", e)),
            Event::Written { path, changes } => output::success(&format!(
                "wrote {} ({} {})",
                output::path(path.display()),
                changes.len(),
                if changes.len() == 1 { "change" } else { "changes" }
            )),
            Event::Aborted(reason) => output::warn(&format!("aborted: {}", reason)),
            Event::Completed(stats) => self.completed(stats),
        }
    }
}

impl Console {
    fn completed(&self, stats: &Stats) {
        output::kv(
            "processed",
            format!("{} of {} changes", stats.processed.len(), stats.total),
        );
        if stats.skipped() > 0 {
            output::kv("skipped", stats.skipped());
        }
        if self.quiet {
            return;
        }
        for change in &stats.processed {
            println!(
                "    {} {}",
                output::marker(change.kind),
                output::key(&change.key)
            );
        }
    }
}

/// Print counts per class and one line per changed key.
pub fn summary(diff: &Diff) {
    output::header("Changes");
    println!(
        "  {} added  {} modified  {} removed  {} unchanged",
        diff.added().len(),
        diff.modified().len(),
        diff.removed().len(),
        diff.unchanged().len()
    );

    for change in diff.changes() {
        let detail = match change.kind {
            ChangeKind::Added => diff
                .added()
                .get(&change.key)
                .map(|v| format!(" = {}", output::preview(v))),
            ChangeKind::Modified => diff.modified().get(&change.key).map(|m| {
                format!(
                    ": {} → {}",
                    output::preview(&m.old),
                    output::preview(&m.new)
                )
            }),
            ChangeKind::Removed => None,
        };

        println!(
            "  {} {}{}",
            output::marker(change.kind),
            output::key(&change.key),
            detail.unwrap_or_default()
        );
    }
}
