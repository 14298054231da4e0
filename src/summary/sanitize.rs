//! Cleanup applied to raw model-runner output before it reaches callers.

use regex::Regex;
use std::sync::LazyLock;

/// ESC followed by a single Fe byte, or a CSI sequence with parameter, intermediate and final bytes.
static ANSI_ESCAPE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\x1B(?:[@-Z\\-_]|\[[0-?]*[ -/]*[@-~])").expect("ANSI pattern compiles")
});

/// Strip terminal escape sequences, then line breaks, then asterisks.
///
/// Escapes go first: the runner's spinner output interleaves them with the other characters.
pub fn sanitize(raw: &str) -> String {
    ANSI_ESCAPE
        .replace_all(raw, "")
        .chars()
        .filter(|c| !matches!(c, '\n' | '\r' | '*'))
        .collect()
}
