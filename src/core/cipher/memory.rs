//! In-memory cipher backend.
//!
//! Deterministic and dependency-free, so reconciliation can be exercised
//! end to end without an external program. Not encryption.

use tracing::trace;

use super::Cipher;
use crate::core::credential::Credential;
use crate::core::snapshot::{LineKind, Snapshot};
use crate::error::{BackendError, Result};

const TAG: &str = "encrypted:";

/// In-memory backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Memory {
    /// Returns the document unchanged in both directions.
    Identity,
    /// Encrypt hex-encodes each value behind an `encrypted:` tag; decrypt
    /// reverses it and passes untagged values through.
    Tagged,
}

impl Memory {
    fn map_values(document: &str, f: impl Fn(&str) -> Result<String>) -> Result<String> {
        let mut out = String::with_capacity(document.len() * 2);
        for line in Snapshot::parse(document).lines() {
            if let LineKind::Entry { key, value } = LineKind::parse(line) {
                out.push_str(&format!("{}={}\n", key, f(value)?));
            }
        }
        Ok(out)
    }
}

fn seal(value: &str) -> Result<String> {
    let hex: String = value.bytes().map(|b| format!("{:02x}", b)).collect();
    Ok(format!("{}{}", TAG, hex))
}

fn open(value: &str) -> Result<String> {
    let Some(hex) = value.strip_prefix(TAG) else {
        return Ok(value.to_string());
    };

    if !hex.is_ascii() {
        return Err(BackendError::MalformedOutput(format!("non-hex ciphertext: {}", value)).into());
    }
    if hex.len() % 2 != 0 {
        return Err(BackendError::MalformedOutput(format!("odd-length ciphertext: {}", value)).into());
    }

    let bytes = (0..hex.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&hex[i..i + 2], 16))
        .collect::<std::result::Result<Vec<u8>, _>>()
        .map_err(|e| BackendError::MalformedOutput(e.to_string()))?;

    String::from_utf8(bytes).map_err(|_| BackendError::NonUtf8.into())
}

impl Cipher for Memory {
    fn encrypt(&self, document: &str, _credential: &Credential) -> Result<String> {
        trace!(backend = "memory", len = document.len(), "encrypting");
        match self {
            Self::Identity => Ok(document.to_string()),
            Self::Tagged => Self::map_values(document, seal),
        }
    }

    fn decrypt(&self, document: &str, _credential: &Credential) -> Result<String> {
        trace!(backend = "memory", len = document.len(), "decrypting");
        match self {
            Self::Identity => Ok(document.to_string()),
            Self::Tagged => Self::map_values(document, open),
        }
    }

    fn name(&self) -> &'static str {
        "memory"
    }
}
