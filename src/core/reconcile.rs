//! Reconciler.
//!
//! Sequences one run: resolve the credential, analyze both files, let the
//! operator pick changes, back up the target, transform the picked values and
//! merge them into the target. Each run is a single linear pass:
//!
//! ```text
//! Idle → Analyzing → AwaitingSelection → Confirming → BackingUp
//!      → Transforming → Merging → Done
//! ```
//!
//! with `Aborted` reachable on an empty selection, a declined confirmation
//! or any error. Nothing is written before `Merging`, and `Merging` writes
//! the target with a single atomic rename.

use std::cell::Cell;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, warn};

use crate::core::backup::{self, BackupRecord};
use crate::core::cipher::{self, Cipher, Direction};
use crate::core::credential::{Credential, CredentialResolver, Resolution};
use crate::core::diff::{Change, ChangeKind, Diff};
use crate::core::merge::{self, MergePlan};
use crate::core::report::{Event, Reporter};
use crate::core::selection::{self, Selection};
use crate::core::snapshot::Snapshot;
use crate::error::{ConfigError, Error, Result};

/// Where a run currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    Analyzing,
    AwaitingSelection,
    Confirming,
    BackingUp,
    Transforming,
    Merging,
    Done,
    Aborted,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Analyzing => "analyzing",
            Self::AwaitingSelection => "awaiting-selection",
            Self::Confirming => "confirming",
            Self::BackingUp => "backing-up",
            Self::Transforming => "transforming",
            Self::Merging => "merging",
            Self::Done => "done",
            Self::Aborted => "aborted",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a run stopped without writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// The operator selected nothing.
    EmptySelection,
    /// The operator declined to apply the selection.
    Declined,
}

impl fmt::Display for AbortReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySelection => f.write_str("no changes selected"),
            Self::Declined => f.write_str("cancelled"),
        }
    }
}

/// What to do about backups.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupPolicy {
    /// Never copy the target.
    Disabled,
    /// Copy the target; warn and continue if that fails.
    BestEffort,
    /// Copy the target; abort if that fails.
    Required,
}

impl BackupPolicy {
    pub fn from_flags(enabled: bool, required: bool) -> Self {
        match (enabled, required) {
            (false, _) => Self::Disabled,
            (true, false) => Self::BestEffort,
            (true, true) => Self::Required,
        }
    }
}

/// Run options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Apply every change without prompting.
    pub force: bool,
    pub backup: BackupPolicy,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            force: false,
            backup: BackupPolicy::BestEffort,
        }
    }
}

/// Source and target of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilePair {
    pub direction: Direction,
    pub source: PathBuf,
    pub target: PathBuf,
}

impl FilePair {
    /// Derive the pair for a plaintext file name.
    ///
    /// Encrypting reads `<plain>` and writes `<plain><suffix>`; decrypting
    /// reads `<plain><suffix>` and writes `<plain>`.
    pub fn new(direction: Direction, plain: impl AsRef<Path>, vault_suffix: &str) -> Self {
        let plain = plain.as_ref().to_path_buf();
        let mut vault = plain.as_os_str().to_os_string();
        vault.push(vault_suffix);
        let vault = PathBuf::from(vault);

        match direction {
            Direction::Encrypt => Self {
                direction,
                source: plain,
                target: vault,
            },
            Direction::Decrypt => Self {
                direction,
                source: vault,
                target: plain,
            },
        }
    }

    /// Directory for transient files, next to the target.
    pub fn scratch_dir(&self) -> PathBuf {
        match self.target.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        }
    }
}

/// One entry of the selection prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub key: String,
    pub kind: ChangeKind,
    pub label: String,
}

impl From<&Change> for Choice {
    fn from(change: &Change) -> Self {
        Self {
            key: change.key.clone(),
            kind: change.kind,
            label: format!("{} {} ({})", change.kind.marker(), change.key, change.kind.label()),
        }
    }
}

/// The person driving the run.
pub trait Operator {
    /// Pick the keys to apply. An empty result aborts the run.
    fn select(&self, choices: &[Choice]) -> Result<Vec<String>>;

    /// Yes/no confirmation.
    fn confirm(&self, prompt: &str) -> Result<bool>;
}

/// Operator for runs that must not prompt.
#[derive(Debug, Default, Clone, Copy)]
pub struct Unattended;

impl Operator for Unattended {
    fn select(&self, _choices: &[Choice]) -> Result<Vec<String>> {
        Err(Error::NonInteractive)
    }

    fn confirm(&self, _prompt: &str) -> Result<bool> {
        Err(Error::NonInteractive)
    }
}

/// Both sides of a run, parsed and compared.
#[derive(Debug, Clone)]
pub struct Analysis {
    /// Raw source file.
    pub source: Snapshot,
    /// Raw target file (empty if missing).
    pub target: Snapshot,
    /// Whether the target file exists.
    pub target_exists: bool,
    /// Plaintext view of the target.
    pub old: Snapshot,
    /// Plaintext view of the source.
    pub new: Snapshot,
    /// `old` → `new`.
    pub diff: Diff,
}

/// Result of a completed run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stats {
    /// Changes written to the target.
    pub processed: Vec<Change>,
    /// Changes detected.
    pub total: usize,
    /// Backup taken before writing.
    pub backup: Option<PathBuf>,
}

impl Stats {
    /// Detected changes that were not applied.
    pub fn skipped(&self) -> usize {
        self.total - self.processed.len()
    }

    /// Applied changes of one class.
    pub fn count(&self, kind: ChangeKind) -> usize {
        self.processed.iter().filter(|c| c.kind == kind).count()
    }
}

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done(Stats),
    NoChanges,
    Aborted(AbortReason),
}

/// Runs reconciliations.
pub struct Reconciler<'a> {
    cipher: &'a dyn Cipher,
    credentials: &'a dyn CredentialResolver,
    operator: &'a dyn Operator,
    reporter: &'a dyn Reporter,
    options: Options,
    stage: Cell<Stage>,
}

impl<'a> Reconciler<'a> {
    pub fn new(
        cipher: &'a dyn Cipher,
        credentials: &'a dyn CredentialResolver,
        operator: &'a dyn Operator,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            cipher,
            credentials,
            operator,
            reporter,
            options: Options::default(),
            stage: Cell::new(Stage::Idle),
        }
    }

    pub fn with_options(mut self, options: Options) -> Self {
        self.options = options;
        self
    }

    /// The stage the last run reached.
    pub fn stage(&self) -> Stage {
        self.stage.get()
    }

    fn enter(&self, stage: Stage) {
        debug!(from = %self.stage.get(), to = %stage, "stage");
        self.stage.set(stage);
        self.reporter.report(&Event::Stage(stage));
    }

    fn abort(&self, reason: AbortReason) -> Outcome {
        debug!(%reason, "run aborted");
        self.reporter.report(&Event::Aborted(reason));
        Outcome::Aborted(reason)
    }

    /// Resolve the backend credential.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingCredential` when no source has one.
    pub fn credential(&self) -> Result<Credential> {
        match self.credentials.resolve()? {
            Resolution::Found(credential) => Ok(credential),
            Resolution::Missing { sources } => {
                Err(ConfigError::MissingCredential { sources }.into())
            }
        }
    }

    /// Decrypt every entry of `snapshot` into a plaintext snapshot.
    fn reveal(&self, snapshot: &Snapshot, credential: &Credential) -> Result<Snapshot> {
        let entries = comparable_entries(snapshot, self.cipher.managed_keys());
        let plain = cipher::transform(self.cipher, Direction::Decrypt, credential, &entries)?;
        Ok(Snapshot::from_pairs(plain))
    }

    /// Parse both files and compute the diff.
    ///
    /// # Errors
    ///
    /// Returns `Error::SourceMissing` if the source does not exist, or a
    /// backend error if the encrypted side cannot be decrypted.
    pub fn analyze(&self, files: &FilePair, credential: &Credential) -> Result<Analysis> {
        if !files.source.exists() {
            return Err(Error::SourceMissing(files.source.clone()));
        }

        let source = Snapshot::load(&files.source)?;
        let target_exists = files.target.exists();
        let target = Snapshot::load(&files.target)?;

        let (old, new) = match files.direction {
            Direction::Encrypt => (self.reveal(&target, credential)?, source.clone()),
            Direction::Decrypt => (target.clone(), self.reveal(&source, credential)?),
        };

        let managed = self.cipher.managed_keys();
        let diff = Diff::compute(
            &Snapshot::from_pairs(comparable_entries(&old, managed)),
            &Snapshot::from_pairs(comparable_entries(&new, managed)),
        );

        debug!(
            added = diff.added().len(),
            modified = diff.modified().len(),
            removed = diff.removed().len(),
            unchanged = diff.unchanged().len(),
            "analysis complete"
        );

        Ok(Analysis {
            source,
            target,
            target_exists,
            old,
            new,
            diff,
        })
    }

    /// Resolve the credential and analyze, without prompting or writing.
    ///
    /// # Errors
    ///
    /// See [`Reconciler::credential`] and [`Reconciler::analyze`].
    pub fn preview(&self, files: &FilePair) -> Result<Analysis> {
        let credential = self.credential()?;
        self.analyze(files, &credential)
    }

    /// Run a full reconciliation.
    ///
    /// # Errors
    ///
    /// Configuration, source, backend and merge failures are fatal. A backup
    /// failure is fatal only under [`BackupPolicy::Required`]. The target is
    /// untouched unless the run reaches `Merging`.
    pub fn run(&self, files: &FilePair) -> Result<Outcome> {
        self.stage.set(Stage::Idle);
        let result = self.run_stages(files);

        match &result {
            Ok(Outcome::Aborted(_)) => self.enter(Stage::Aborted),
            Ok(_) => self.enter(Stage::Done),
            Err(e) => {
                debug!(stage = %self.stage.get(), error = %e, "run failed");
                self.enter(Stage::Aborted);
            }
        }

        result
    }

    fn run_stages(&self, files: &FilePair) -> Result<Outcome> {
        self.reporter.report(&Event::Files {
            source: &files.source,
            target: &files.target,
        });

        let credential = self.credential()?;

        self.enter(Stage::Analyzing);
        let analysis = self.analyze(files, &credential)?;
        self.warn_duplicates(&files.source, &analysis.source);
        self.warn_duplicates(&files.target, &analysis.target);

        let diff = &analysis.diff;
        self.reporter.report(&Event::Analyzed { diff });

        if !diff.has_changes() {
            self.reporter.report(&Event::NoChanges);
            return Ok(Outcome::NoChanges);
        }

        let total = diff.change_count();

        self.enter(Stage::AwaitingSelection);
        let selection = if self.options.force {
            self.reporter.report(&Event::Forced);
            Selection::All
        } else {
            let choices: Vec<Choice> = diff.changes().iter().map(Choice::from).collect();
            let keys = self.operator.select(&choices)?;
            if keys.is_empty() {
                return Ok(self.abort(AbortReason::EmptySelection));
            }
            Selection::keys(keys)
        };

        let filtered = selection::filter(diff, &selection)?;

        if !self.options.force {
            self.enter(Stage::Confirming);
            let selected = filtered.change_count();
            self.reporter.report(&Event::Selected { selected, total });

            let prompt = format!(
                "Apply {} of {} changes to {}?",
                selected,
                total,
                files.target.display()
            );
            if !self.operator.confirm(&prompt)? {
                return Ok(self.abort(AbortReason::Declined));
            }
        }

        self.enter(Stage::BackingUp);
        let backup = self.backup(&files.target)?;

        self.enter(Stage::Transforming);
        let pending = merge::pending_updates(&filtered, &analysis.source);
        let processed = cipher::transform(self.cipher, files.direction, &credential, &pending)?;

        self.enter(Stage::Merging);
        let deletions: Vec<String> = filtered.removed().keys().cloned().collect();

        // A new vault takes the source layout, keeping only lines that are
        // about to be overwritten with ciphertext.
        let seed;
        let base = match (analysis.target_exists, files.direction) {
            (true, _) => &analysis.target,
            (false, Direction::Encrypt) => {
                seed = analysis
                    .source
                    .outline(|k| processed.iter().any(|(p, _)| p == k));
                &seed
            }
            (false, Direction::Decrypt) => {
                seed = Snapshot::empty();
                &seed
            }
        };

        let plan = MergePlan::new(processed, deletions);
        let content = merge::merge(base, &plan);
        merge::write_target(&files.target, &content)?;

        let changes = filtered.changes();
        self.reporter.report(&Event::Written {
            path: &files.target,
            changes: &changes,
        });

        let stats = Stats {
            processed: changes,
            total,
            backup: backup.map(|b| b.location),
        };
        self.reporter.report(&Event::Completed(&stats));

        Ok(Outcome::Done(stats))
    }

    fn backup(&self, target: &Path) -> Result<Option<BackupRecord>> {
        let policy = self.options.backup;
        if policy == BackupPolicy::Disabled {
            self.reporter.report(&Event::BackupSkipped);
            return Ok(None);
        }

        match backup::create(target) {
            Ok(Some(record)) => {
                self.reporter.report(&Event::BackupCreated(&record));
                Ok(Some(record))
            }
            Ok(None) => Ok(None),
            Err(e) if policy == BackupPolicy::BestEffort => {
                warn!(error = %e, "backup failed, continuing");
                self.reporter.report(&Event::BackupFailed(&e));
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn warn_duplicates(&self, path: &Path, snapshot: &Snapshot) {
        if snapshot.duplicates().is_empty() {
            return;
        }

        let keys: Vec<&str> = snapshot.duplicates().iter().map(String::as_str).collect();
        warn!(path = %path.display(), keys = ?keys, "duplicate keys, first occurrence wins");
        self.reporter.report(&Event::DuplicateKeys { path, keys });
    }
}

/// Entries of `snapshot` minus backend-managed keys.
fn comparable_entries(snapshot: &Snapshot, managed: &[String]) -> Vec<(String, String)> {
    snapshot
        .entries()
        .filter(|(key, _)| !managed.iter().any(|m| m == key))
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}
