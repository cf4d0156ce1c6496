//! Configuration file management.
//!
//! Handles reading and validating the optional `.dotseal.toml`. Every field
//! has a default, so a missing file behaves like an empty one.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::core::cipher::FILE_PLACEHOLDER;
use crate::core::constants;
use crate::error::{ConfigError, Result};

/// Project configuration stored in `.dotseal.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// External cipher program
    pub backend: BackendConfig,
    /// Where the private key comes from
    pub credential: CredentialConfig,
    /// File naming
    pub files: FilesConfig,
    /// Backup behaviour
    pub backup: BackupConfig,
}

/// `[backend]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Program name or path.
    pub program: String,
    /// Argument templates; `{direction}` and `{file}` are substituted.
    pub args: Vec<String>,
    /// Keys the program writes on its own and that never count as changes.
    pub managed_keys: Vec<String>,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            program: constants::BACKEND_PROGRAM.to_string(),
            args: constants::BACKEND_ARGS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            managed_keys: constants::MANAGED_KEYS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// `[credential]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialConfig {
    /// Environment variable checked first, and passed to the backend.
    pub env: String,
    /// Key file checked second.
    pub file: PathBuf,
}

impl Default for CredentialConfig {
    fn default() -> Self {
        Self {
            env: constants::CREDENTIAL_VAR.to_string(),
            file: PathBuf::from(constants::KEYS_FILE),
        }
    }
}

/// `[files]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    /// Suffix of the encrypted counterpart (`.env` → `.env.vault`).
    pub vault_suffix: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            vault_suffix: constants::VAULT_SUFFIX.to_string(),
        }
    }
}

/// `[backup]` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackupConfig {
    /// Copy the target aside before writing.
    pub enabled: bool,
    /// Abort when the copy fails instead of warning.
    pub required: bool,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            required: false,
        }
    }
}

impl Config {
    /// Path to the configuration file in the current directory
    pub fn config_path() -> PathBuf {
        PathBuf::from(constants::CONFIG_FILE)
    }

    /// Load `.dotseal.toml` from the current directory.
    ///
    /// # Errors
    ///
    /// See [`Config::load_from`].
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_path())
    }

    /// Load configuration from `path`, falling back to defaults if it does
    /// not exist.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadFile` if the file exists but cannot be read,
    /// `ConfigError::Parse` if the TOML is malformed, or a validation error.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading config");

        let contents = match std::fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("no config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::ReadFile(e).into()),
        };

        let config: Self = toml::from_str(&contents).map_err(ConfigError::Parse)?;
        config.validate()?;

        debug!(program = %config.backend.program, "config loaded");
        Ok(config)
    }

    /// Validate the configuration values
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` on the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.backend.program.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "backend.program",
                reason: "must not be empty".to_string(),
            }
            .into());
        }

        if !self.backend.args.iter().any(|a| a.contains(FILE_PLACEHOLDER)) {
            return Err(ConfigError::InvalidValue {
                field: "backend.args",
                reason: format!("must contain the {} placeholder", FILE_PLACEHOLDER),
            }
            .into());
        }

        if self.credential.env.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "credential.env",
                reason: "must not be empty".to_string(),
            }
            .into());
        }

        if self.files.vault_suffix.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "files.vault_suffix",
                reason: "must not be empty".to_string(),
            }
            .into());
        }

        Ok(())
    }
}
