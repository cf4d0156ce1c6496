//! Cipher backends.
//!
//! The actual encrypt/decrypt transform is external and opaque: a backend
//! takes a `KEY=VALUE` document and returns the transformed document. This
//! module owns the contract and the adapter that feeds a backend only the
//! keys that need transforming.
//!
//! ## Backends
//!
//! - **process**: Runs an external program (dotenvx by default) on a scratch
//!   file and reads the transformed text from its stdout.
//! - **memory**: Pure in-memory transform, used by tests and benchmarks.
//!
//! ## Adding a New Backend
//!
//! 1. Implement the `Cipher` trait
//! 2. Add the implementation in a new file
//! 3. Re-export from this module

mod memory;
mod process;

pub use memory::Memory;
pub use process::{Process, DIRECTION_PLACEHOLDER, FILE_PLACEHOLDER};

use std::collections::BTreeSet;
use std::fmt;

use tracing::{debug, trace};

use crate::core::credential::Credential;
use crate::core::snapshot::Snapshot;
use crate::error::{BackendError, Result};

/// Which way a run transforms values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Plaintext source, encrypted target.
    Encrypt,
    /// Encrypted source, plaintext target.
    Decrypt,
}

impl Direction {
    /// The flag passed to the backend.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Encrypt => "encrypt",
            Self::Decrypt => "decrypt",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// External encryption backend.
///
/// Implementations receive a `KEY=VALUE` document and must return the
/// transformed document on success. They must not reorder, add or drop keys,
/// and must be deterministic per key for a given credential.
pub trait Cipher {
    /// Encrypt every value of `document`.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the transform fails.
    fn encrypt(&self, document: &str, credential: &Credential) -> Result<String>;

    /// Decrypt every value of `document`.
    ///
    /// # Errors
    ///
    /// Returns `BackendError` if the transform fails.
    fn decrypt(&self, document: &str, credential: &Credential) -> Result<String>;

    /// Backend name for display.
    fn name(&self) -> &'static str;

    /// Keys the backend adds or maintains itself (e.g. a public key header).
    ///
    /// They are ignored when validating output and when comparing files.
    fn managed_keys(&self) -> &[String] {
        &[]
    }

    /// Dispatch on direction.
    fn apply(&self, direction: Direction, document: &str, credential: &Credential) -> Result<String> {
        match direction {
            Direction::Encrypt => self.encrypt(document, credential),
            Direction::Decrypt => self.decrypt(document, credential),
        }
    }
}

/// Transform exactly `entries` through `cipher`.
///
/// Builds a minimal document holding only these keys, hands it to the
/// backend and reads the values back in input order. Backend output that
/// does not parse to exactly the input key set is rejected; nothing is
/// interpreted beyond that.
///
/// An empty input returns immediately without invoking the backend.
///
/// # Errors
///
/// Returns `BackendError::MalformedOutput` if keys are missing or
/// unexpected, or any error the backend itself raises.
pub fn transform(
    cipher: &dyn Cipher,
    direction: Direction,
    credential: &Credential,
    entries: &[(String, String)],
) -> Result<Vec<(String, String)>> {
    if entries.is_empty() {
        return Ok(Vec::new());
    }

    let document: String = entries
        .iter()
        .map(|(key, value)| format!("{}={}\n", key, value))
        .collect();

    debug!(
        backend = cipher.name(),
        %direction,
        keys = entries.len(),
        "invoking backend"
    );
    trace!(input_len = document.len(), "backend input prepared");

    let output = cipher.apply(direction, &document, credential)?;
    trace!(output_len = output.len(), "backend output received");

    let parsed = Snapshot::parse(&output);

    let expected: BTreeSet<&str> = entries.iter().map(|(k, _)| k.as_str()).collect();
    let managed = cipher.managed_keys();
    let actual: BTreeSet<&str> = parsed
        .keys()
        .filter(|k| !managed.iter().any(|m| m.as_str() == *k))
        .collect();

    if let Some(missing) = expected.difference(&actual).next() {
        return Err(BackendError::MalformedOutput(format!("missing key {}", missing)).into());
    }
    if let Some(extra) = actual.difference(&expected).next() {
        return Err(BackendError::MalformedOutput(format!("unexpected key {}", extra)).into());
    }

    Ok(entries
        .iter()
        .filter_map(|(key, _)| parsed.get(key).map(|v| (key.clone(), v.to_string())))
        .collect())
}
