//! External process cipher backend.
//!
//! Runs a configured program (dotenvx by default) on a scratch file and
//! reads the transformed document from its stdout.
//!
//! ## Requirements
//!
//! - The program must be on `PATH`
//! - It must accept the scratch file path and print the full transformed
//!   `KEY=VALUE` text on stdout
//!
//! ## Usage
//!
//! ```toml
//! [backend]
//! program = "npx"
//! args = ["@dotenvx/dotenvx", "{direction}", "-f", "{file}", "--stdout"]
//! ```

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

use tracing::{debug, trace};

use super::{Cipher, Direction};
use crate::core::config::Config;
use crate::core::credential::Credential;
use crate::error::{BackendError, Result};

/// Placeholder replaced with `encrypt` or `decrypt` in argument templates.
pub const DIRECTION_PLACEHOLDER: &str = "{direction}";

/// Placeholder replaced with the scratch file path in argument templates.
pub const FILE_PLACEHOLDER: &str = "{file}";

/// Backend that shells out to an external program.
#[derive(Debug, Clone)]
pub struct Process {
    program: String,
    args: Vec<String>,
    credential_var: String,
    scratch_dir: PathBuf,
    managed_keys: Vec<String>,
}

impl Process {
    /// Create a process backend.
    ///
    /// # Arguments
    ///
    /// * `program` - Program name or path, resolved through `PATH`
    /// * `args` - Argument templates (see placeholders)
    /// * `credential_var` - Environment variable the credential is passed in
    /// * `scratch_dir` - Directory for the transient input file
    pub fn new(
        program: impl Into<String>,
        args: Vec<String>,
        credential_var: impl Into<String>,
        scratch_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            program: program.into(),
            args,
            credential_var: credential_var.into(),
            scratch_dir: scratch_dir.into(),
            managed_keys: Vec::new(),
        }
    }

    /// Declare keys the program maintains on its own.
    pub fn with_managed_keys(mut self, keys: Vec<String>) -> Self {
        self.managed_keys = keys;
        self
    }

    /// Create a process backend from configuration.
    pub fn from_config(config: &Config, scratch_dir: impl Into<PathBuf>) -> Self {
        Self::new(
            config.backend.program.clone(),
            config.backend.args.clone(),
            config.credential.env.clone(),
            scratch_dir,
        )
        .with_managed_keys(config.backend.managed_keys.clone())
    }

    /// Expand argument templates for one invocation.
    fn expand_args(&self, direction: Direction, file: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| {
                arg.replace(DIRECTION_PLACEHOLDER, direction.as_str())
                    .replace(FILE_PLACEHOLDER, file)
            })
            .collect()
    }

    fn run(&self, direction: Direction, document: &str, credential: &Credential) -> Result<String> {
        let program = which::which(&self.program)
            .map_err(|_| BackendError::NotFound(self.program.clone()))?;

        // Removed on drop, on every exit path.
        let mut scratch = tempfile::Builder::new()
            .prefix(".dotseal-")
            .suffix(".env")
            .tempfile_in(&self.scratch_dir)
            .map_err(BackendError::Scratch)?;
        scratch
            .write_all(document.as_bytes())
            .and_then(|_| scratch.flush())
            .map_err(BackendError::Scratch)?;

        let file = scratch.path().to_string_lossy().to_string();
        let args = self.expand_args(direction, &file);

        debug!(program = %program.display(), %direction, "spawning backend");
        trace!(args = ?args, "backend arguments");

        let output = Command::new(&program)
            .args(&args)
            .env(&self.credential_var, credential.expose())
            .current_dir(&self.scratch_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| BackendError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            return Err(BackendError::Failed {
                direction: direction.as_str(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }

        trace!(stdout_len = output.stdout.len(), "backend finished");
        String::from_utf8(output.stdout).map_err(|_| BackendError::NonUtf8.into())
    }
}

impl Cipher for Process {
    fn encrypt(&self, document: &str, credential: &Credential) -> Result<String> {
        self.run(Direction::Encrypt, document, credential)
    }

    fn decrypt(&self, document: &str, credential: &Credential) -> Result<String> {
        self.run(Direction::Decrypt, document, credential)
    }

    fn name(&self) -> &'static str {
        "process"
    }

    fn managed_keys(&self) -> &[String] {
        &self.managed_keys
    }
}
