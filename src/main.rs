//! Dotseal - incremental encryption for .env files.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dotseal::cli::output;
use dotseal::cli::{execute, Cli};
use dotseal::core::constants::LOG_ENV;
use dotseal::error::{BackendError, ConfigError, Error};

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("dotseal=debug")
        } else {
            EnvFilter::new("dotseal=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();

    output::init();

    if let Err(e) = execute(cli.command) {
        output::error(&e.to_string());
        if let Some(hint) = hint(&e) {
            output::hint(&hint);
        }
        std::process::exit(1);
    }
}

fn hint(e: &Error) -> Option<String> {
    let hint = match e {
        Error::Config(ConfigError::MissingCredential { sources }) => {
            return Some(format!("provide the private key through {}", sources));
        }
        Error::NonInteractive => "re-run with --force",
        Error::Backend(BackendError::NotFound(_)) => {
            "install the backend or set [backend] program in .dotseal.toml"
        }
        Error::Merge(_) => "the backup next to the target holds its previous contents",
        _ => return None,
    };
    Some(hint.to_string())
}
