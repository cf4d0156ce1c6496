//! Diff command - show pending changes without writing.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::cli::{output, reporter};
use crate::core::cipher::{Direction, Process};
use crate::core::config::Config;
use crate::core::credential::EnvResolver;
use crate::core::diff::Change;
use crate::core::reconcile::{FilePair, Reconciler, Unattended};
use crate::core::report::Silent;
use crate::error::Result;

/// Machine-readable diff. Keys and change classes only, never values.
#[derive(Debug, Serialize)]
struct DiffReport {
    direction: &'static str,
    source: PathBuf,
    target: PathBuf,
    changes: Vec<Change>,
    unchanged: usize,
}

/// Compare the file pair derived from `file` in `direction`.
pub fn execute(direction: Direction, file: &Path, json: bool) -> Result<()> {
    let config = Config::load()?;
    let files = FilePair::new(direction, file, &config.files.vault_suffix);

    let cipher = Process::from_config(&config, files.scratch_dir());
    let credentials = EnvResolver::new(
        config.credential.env.clone(),
        config.credential.file.clone(),
    );

    let analysis = Reconciler::new(&cipher, &credentials, &Unattended, &Silent).preview(&files)?;
    let diff = &analysis.diff;

    if json {
        let report = DiffReport {
            direction: direction.as_str(),
            source: files.source.clone(),
            target: files.target.clone(),
            changes: diff.changes(),
            unchanged: diff.unchanged().len(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} → {}",
        output::path(files.source.display()),
        output::path(files.target.display())
    );

    if !diff.has_changes() {
        output::success("no changes detected");
        return Ok(());
    }

    println!();
    reporter::summary(diff);
    Ok(())
}
