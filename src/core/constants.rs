//! Constants used throughout dotseal.
//!
//! Centralizes magic strings and default configuration values.

/// Configuration file name (.dotseal.toml).
pub const CONFIG_FILE: &str = ".dotseal.toml";

/// Default plaintext file name (.env).
pub const ENV_FILE: &str = ".env";

/// Suffix appended to the plaintext name to form the encrypted file name.
pub const VAULT_SUFFIX: &str = ".vault";

/// Default file holding the private key as a `NAME=value` line.
pub const KEYS_FILE: &str = ".env.keys";

/// Default environment variable holding the private key.
pub const CREDENTIAL_VAR: &str = "DOTENV_PRIVATE_KEY";

/// Environment variable controlling log filtering.
pub const LOG_ENV: &str = "DOTSEAL_LOG";

/// Default backend program.
pub const BACKEND_PROGRAM: &str = "npx";

/// Default backend argument templates.
pub const BACKEND_ARGS: &[&str] = &[
    "@dotenvx/dotenvx",
    "{direction}",
    "-f",
    "{file}",
    "--stdout",
];

/// Keys dotenvx adds to encrypted files by itself.
pub const MANAGED_KEYS: &[&str] = &["DOTENV_PUBLIC_KEY"];
