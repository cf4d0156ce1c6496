//! Encrypt and decrypt commands.

use crate::cli::prompt::Prompt;
use crate::cli::reporter::Console;
use crate::cli::RunArgs;
use crate::core::cipher::{Direction, Process};
use crate::core::config::{BackupConfig, Config};
use crate::core::credential::EnvResolver;
use crate::core::reconcile::{BackupPolicy, FilePair, Options, Reconciler};
use crate::error::Result;

/// Reconcile the file pair derived from `args.file` in `direction`.
pub fn execute(direction: Direction, args: &RunArgs) -> Result<()> {
    let config = Config::load()?;
    let files = FilePair::new(direction, &args.file, &config.files.vault_suffix);

    let cipher = Process::from_config(&config, files.scratch_dir());
    let credentials = EnvResolver::new(
        config.credential.env.clone(),
        config.credential.file.clone(),
    );
    let reporter = Console::new(args.quiet);
    let options = Options {
        force: args.force,
        backup: backup_policy(&config.backup, args),
    };

    Reconciler::new(&cipher, &credentials, &Prompt, &reporter)
        .with_options(options)
        .run(&files)?;

    Ok(())
}

/// Combine the `[backup]` section with command-line flags; flags win.
fn backup_policy(config: &BackupConfig, args: &RunArgs) -> BackupPolicy {
    let enabled = !args.no_backup && (config.enabled || args.require_backup);
    let required = config.required || args.require_backup;
    BackupPolicy::from_flags(enabled, required)
}
