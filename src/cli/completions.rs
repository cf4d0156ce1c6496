//! Completions command.

use std::io::Write;

use clap::CommandFactory;
use clap_complete::{generate, Shell as CompletionShell};

use crate::cli::{Cli, Shell};
use crate::error::Result;

impl From<Shell> for CompletionShell {
    fn from(shell: Shell) -> Self {
        match shell {
            Shell::Bash => Self::Bash,
            Shell::Zsh => Self::Zsh,
            Shell::Fish => Self::Fish,
            Shell::PowerShell => Self::PowerShell,
        }
    }
}

/// Write the completion script for `shell` to `out`.
pub fn render(shell: Shell, out: &mut dyn Write) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(CompletionShell::from(shell), &mut cmd, name, out);
}

/// Print shell completions to stdout.
pub fn execute(shell: Shell) -> Result<()> {
    render(shell, &mut std::io::stdout());
    Ok(())
}
