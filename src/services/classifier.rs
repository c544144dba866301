//! AI-fixability classifier.
//!
//! Pure rule-based heuristic over an issue's labels and body. No I/O, no
//! side effects; malformed or absent label data is treated as an empty set.

use regex::Regex;
use std::sync::OnceLock;

/// Labels that flag an issue as fixable outright (case-sensitive).
const FIXABLE_LABELS: &[&str] = &["bug", "ai-fixable"];

/// Body substrings checked case-insensitively.
const BODY_MARKERS: &[&str] = &["error:", "exception:", "traceback", "steps to reproduce"];

/// Matches "fail", "failed", "failure", "failing" in a lowercased body.
fn failure_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"fail(ed|ure|ing)?").expect("pattern is valid"))
}

/// Decide whether an issue is a candidate for automated fixing.
///
/// Labels win: `bug` or `ai-fixable` (exact match) is a verdict regardless of
/// body content. Otherwise the body is scanned case-insensitively for error
/// markers, failure words, and reproduction instructions.
pub fn classify(labels: &[String], body: Option<&str>) -> bool {
    if labels
        .iter()
        .any(|label| FIXABLE_LABELS.contains(&label.as_str()))
    {
        return true;
    }

    let Some(body) = body else {
        return false;
    };
    let lowered = body.to_lowercase();

    BODY_MARKERS.iter().any(|marker| lowered.contains(marker))
        || failure_pattern().is_match(&lowered)
}
