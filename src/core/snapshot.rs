//! Snapshot parser.
//!
//! A [`Snapshot`] is the parsed view of a `KEY=VALUE` text file: an ordered
//! key map used for lookups, plus the raw lines kept verbatim so the merge
//! stage can rewrite a file without disturbing anything it does not own.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use tracing::debug;

use crate::error::Result;

/// Classification of a single raw line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Empty or whitespace-only.
    Blank,
    /// Starts with `#` after trimming.
    Comment,
    /// `KEY=VALUE`, split on the first `=`, both sides trimmed.
    Entry { key: &'a str, value: &'a str },
    /// Anything else (no `=`, or nothing before it). Kept verbatim.
    Other,
}

impl<'a> LineKind<'a> {
    /// Classify a raw line.
    pub fn parse(line: &'a str) -> Self {
        let trimmed = line.trim();

        if trimmed.is_empty() {
            return Self::Blank;
        }
        if trimmed.starts_with('#') {
            return Self::Comment;
        }

        match trimmed.find('=') {
            Some(idx) if idx > 0 => Self::Entry {
                key: trimmed[..idx].trim(),
                value: trimmed[idx + 1..].trim(),
            },
            _ => Self::Other,
        }
    }

    /// The key of an entry line.
    pub fn key(&self) -> Option<&'a str> {
        match self {
            Self::Entry { key, .. } => Some(key),
            _ => None,
        }
    }
}

/// Parsed `KEY=VALUE` file.
///
/// Immutable once built. The first occurrence of a key wins for lookups;
/// later occurrences are recorded in [`Snapshot::duplicates`] and otherwise
/// only live on in the raw lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    order: Vec<String>,
    values: BTreeMap<String, String>,
    duplicates: BTreeSet<String>,
    lines: Vec<String>,
    trailing_newline: bool,
}

impl Snapshot {
    /// An empty snapshot, as produced for a file that does not exist.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Parse raw text.
    pub fn parse(raw: &str) -> Self {
        let mut lines: Vec<String> = raw.split('\n').map(str::to_string).collect();

        // "a\nb\n" splits into ["a", "b", ""]; the final empty piece is the
        // terminator, not a line.
        let trailing_newline = raw.ends_with('\n');
        if trailing_newline || raw.is_empty() {
            lines.pop();
        }

        let mut snapshot = Self {
            lines,
            trailing_newline,
            ..Self::default()
        };

        for line in &snapshot.lines {
            if let LineKind::Entry { key, value } = LineKind::parse(line) {
                if snapshot.values.contains_key(key) {
                    snapshot.duplicates.insert(key.to_string());
                } else {
                    snapshot.order.push(key.to_string());
                    snapshot.values.insert(key.to_string(), value.to_string());
                }
            }
        }

        snapshot
    }

    /// Load and parse a file.
    ///
    /// A missing file yields an empty snapshot so a first-run target can be
    /// synthesized purely from additions.
    ///
    /// # Errors
    ///
    /// Returns an IO error for any failure other than the file not existing.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        match std::fs::read_to_string(path) {
            Ok(contents) => {
                let snapshot = Self::parse(&contents);
                debug!(
                    path = %path.display(),
                    keys = snapshot.len(),
                    lines = snapshot.lines.len(),
                    "snapshot loaded"
                );
                Ok(snapshot)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "snapshot source missing, using empty");
                Ok(Self::empty())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Build a snapshot from key-value pairs, in order.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut raw = String::new();
        for (key, value) in pairs {
            raw.push_str(&format!("{}={}\n", key.into(), value.into()));
        }
        Self::parse(&raw)
    }

    /// Value for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Whether a key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Keys in file order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Key-value pairs in file order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.order
            .iter()
            .map(|k| (k.as_str(), self.values[k].as_str()))
    }

    /// The key map.
    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    /// Keys that appear on more than one line.
    pub fn duplicates(&self) -> &BTreeSet<String> {
        &self.duplicates
    }

    /// Raw lines without terminators (a `\r` from CRLF files is kept).
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Whether the source text ended with a newline.
    pub fn has_trailing_newline(&self) -> bool {
        self.trailing_newline
    }

    /// Whether the raw text uses CRLF terminators.
    pub fn is_crlf(&self) -> bool {
        self.lines.iter().any(|l| l.ends_with('\r'))
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether there are no keys.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Keep comments, blanks and the first line of each key `keep` accepts.
    ///
    /// Later duplicate lines and unparseable lines are dropped, so the result
    /// carries no value other than the kept first occurrences.
    pub fn outline(&self, keep: impl Fn(&str) -> bool) -> Self {
        let mut seen = BTreeSet::new();
        let lines = self
            .lines
            .iter()
            .filter(|line| match LineKind::parse(line) {
                LineKind::Blank | LineKind::Comment => true,
                LineKind::Entry { key, .. } => keep(key) && seen.insert(key.to_string()),
                LineKind::Other => false,
            })
            .cloned()
            .collect();

        let order: Vec<String> = self.order.iter().filter(|k| keep(k)).cloned().collect();
        let values = order
            .iter()
            .filter_map(|k| self.values.get(k).map(|v| (k.clone(), v.clone())))
            .collect();

        Self {
            order,
            values,
            duplicates: BTreeSet::new(),
            lines,
            trailing_newline: self.trailing_newline,
        }
    }

    /// Reassemble the raw text exactly as parsed.
    pub fn raw(&self) -> String {
        let mut out = self.lines.join("\n");
        if self.trailing_newline {
            out.push('\n');
        }
        out
    }
}

/// Serializes the key map only, one `KEY=VALUE` line per key in file order.
impl std::fmt::Display for Snapshot {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (key, value) in self.entries() {
            writeln!(f, "{}={}", key, value)?;
        }
        Ok(())
    }
}
