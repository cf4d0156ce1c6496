//! Credential resolution.
//!
//! The backend needs a private key. Where it comes from is decided by a
//! [`CredentialResolver`] handed to the reconciler, never by reading the
//! process environment from inside the engine.

use std::path::PathBuf;

use tracing::debug;
use zeroize::Zeroizing;

use crate::core::snapshot::Snapshot;
use crate::error::{ConfigError, Result};

/// A private key string, wiped from memory on drop.
#[derive(Clone)]
pub struct Credential(Zeroizing<String>);

impl Credential {
    /// Wrap a key string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(Zeroizing::new(value.into()))
    }

    /// The key string.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}

/// Outcome of a credential lookup.
#[derive(Debug)]
pub enum Resolution {
    Found(Credential),
    /// Nothing found; `sources` describes where we looked.
    Missing { sources: String },
}

/// Supplies the backend credential.
pub trait CredentialResolver {
    /// Look up the credential.
    ///
    /// # Errors
    ///
    /// Returns an error only when a source exists but cannot be read;
    /// absence is reported as [`Resolution::Missing`].
    fn resolve(&self) -> Result<Resolution>;
}

/// A fixed credential resolves to itself.
impl CredentialResolver for Credential {
    fn resolve(&self) -> Result<Resolution> {
        Ok(Resolution::Found(self.clone()))
    }
}

/// Resolves from an environment variable, then from a key file holding a
/// `NAME=value` line.
#[derive(Debug, Clone)]
pub struct EnvResolver {
    var: String,
    file: PathBuf,
    env_value: Option<String>,
}

impl EnvResolver {
    /// Resolver reading the current process environment.
    pub fn new(var: impl Into<String>, file: impl Into<PathBuf>) -> Self {
        let var = var.into();
        let env_value = std::env::var(&var).ok();
        Self {
            var,
            file: file.into(),
            env_value,
        }
    }

    /// Resolver with an explicit environment value instead of the process
    /// environment.
    pub fn with_env_value(mut self, value: Option<String>) -> Self {
        self.env_value = value;
        self
    }

    fn from_file(&self) -> Result<Option<Credential>> {
        let contents = match std::fs::read_to_string(&self.file) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::ReadKeyFile {
                    path: self.file.clone(),
                    source,
                }
                .into())
            }
        };

        let keys = Zeroizing::new(contents);
        Ok(Snapshot::parse(&keys)
            .get(&self.var)
            .filter(|v| !v.is_empty())
            .map(Credential::new))
    }
}

impl CredentialResolver for EnvResolver {
    fn resolve(&self) -> Result<Resolution> {
        if let Some(value) = self.env_value.as_deref().filter(|v| !v.trim().is_empty()) {
            debug!(var = %self.var, "credential from environment");
            return Ok(Resolution::Found(Credential::new(value.trim())));
        }

        if let Some(credential) = self.from_file()? {
            debug!(file = %self.file.display(), "credential from key file");
            return Ok(Resolution::Found(credential));
        }

        Ok(Resolution::Missing {
            sources: format!("${} or {}", self.var, self.file.display()),
        })
    }
}
