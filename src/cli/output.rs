//! Shared CLI output helpers.
//!
//! Color scheme (respects NO_COLOR):
//! - Green: success, additions
//! - Red: errors, removals
//! - Yellow: warnings, modifications
//! - Cyan: paths, keys, hints
//! - Bold: headers, counts
//! - Dim: secondary info

use std::fmt::Display;

use console::{style, StyledObject};

use crate::core::diff::ChangeKind;

/// Longest value shown in change listings.
const PREVIEW_WIDTH: usize = 24;

/// Apply NO_COLOR. Call once at startup.
pub fn init() {
    if std::env::var_os("NO_COLOR").is_some() {
        console::set_colors_enabled(false);
        console::set_colors_enabled_stderr(false);
    }
}

/// `✓ msg` on stdout.
pub fn success(msg: &str) {
    println!("{} {}", style("✓").green(), msg);
}

/// `✗ msg` on stderr.
pub fn error(msg: &str) {
    eprintln!("{} {}", style("✗").red().for_stderr(), msg);
}

/// `⚠ msg` on stderr.
pub fn warn(msg: &str) {
    eprintln!("{} {}", style("⚠").yellow().for_stderr(), msg);
}

/// `→ msg` on stderr.
pub fn hint(msg: &str) {
    eprintln!(
        "{} {}",
        style("→").cyan().for_stderr(),
        style(msg).cyan().for_stderr()
    );
}

/// Bold header line.
pub fn header(title: &str) {
    println!("{}", style(title).bold());
}

/// Indented `label  value` pair.
pub fn kv(label: &str, value: impl Display) {
    println!("  {}  {}", style(label).dim(), style(value).bold());
}

/// Dimmed line.
pub fn dimmed(msg: &str) {
    println!("{}", style(msg).dim());
}

/// A path, in cyan.
pub fn path(p: impl Display) -> String {
    style(p).cyan().to_string()
}

/// A key name, in cyan.
pub fn key(k: &str) -> String {
    style(k).cyan().to_string()
}

/// Colored `+`/`~`/`-` marker for a change class.
pub fn marker(kind: ChangeKind) -> StyledObject<char> {
    let m = style(kind.marker());
    match kind {
        ChangeKind::Added => m.green(),
        ChangeKind::Modified => m.yellow(),
        ChangeKind::Removed => m.red(),
    }
}

/// Shorten a value for display.
pub fn preview(value: &str) -> String {
    if value.chars().count() <= PREVIEW_WIDTH {
        return value.to_string();
    }
    let head: String = value.chars().take(PREVIEW_WIDTH).collect();
    format!("{}…", head)
}
