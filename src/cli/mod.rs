//! Command-line interface.

pub mod completions;
pub mod diff;
pub mod output;
pub mod prompt;
pub mod reconcile;
pub mod reporter;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::core::cipher::Direction;
use crate::core::constants;

/// Dotseal - incremental encryption for .env files.
#[derive(Parser)]
#[command(
    name = "dotseal",
    about = "Encrypt and decrypt .env files one key at a time",
    version
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by `encrypt` and `decrypt`.
#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Plaintext file; the encrypted file name is derived from it
    #[arg(default_value = constants::ENV_FILE)]
    pub file: PathBuf,

    /// Apply every change without prompting
    #[arg(short, long)]
    pub force: bool,

    /// Do not back up the target before writing
    #[arg(long, conflicts_with = "require_backup")]
    pub no_backup: bool,

    /// Abort if the backup cannot be written
    #[arg(long)]
    pub require_backup: bool,

    /// Only print the outcome
    #[arg(short, long)]
    pub quiet: bool,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Encrypt changed keys of a .env file into its vault
    Encrypt(RunArgs),

    /// Decrypt changed keys of a vault into its .env file
    Decrypt(RunArgs),

    /// Show pending changes without writing anything
    Diff {
        /// Plaintext file; the encrypted file name is derived from it
        #[arg(default_value = constants::ENV_FILE)]
        file: PathBuf,

        /// Compare in the decrypt direction (vault → .env)
        #[arg(long)]
        decrypt: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Execute a command.
pub fn execute(command: Command) -> crate::error::Result<()> {
    use Command::*;

    match command {
        Encrypt(args) => reconcile::execute(Direction::Encrypt, &args),
        Decrypt(args) => reconcile::execute(Direction::Decrypt, &args),
        Diff {
            file,
            decrypt,
            json,
        } => {
            let direction = if decrypt {
                Direction::Decrypt
            } else {
                Direction::Encrypt
            };
            diff::execute(direction, &file, json)
        }
        Completions { shell } => completions::execute(shell),
    }
}
