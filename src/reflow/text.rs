/*!
 * Small text helpers shared by the reflow stages.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// The ellipsis used to mark a sentence continuing across cues
pub const ELLIPSIS: &str = "...";

static ELLIPSIS_TRAILING_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.\.\.[ \t]+").unwrap());
static ELLIPSIS_LEADING_SPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+\.\.\.").unwrap());

/// Collapse all whitespace runs, line breaks included, to single spaces
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove horizontal whitespace on either side of every ellipsis.
///
/// Line breaks are left alone so a laid-out cue keeps its lines.
pub fn fix_ellipsis_spacing(text: &str) -> String {
    let text = ELLIPSIS_TRAILING_SPACE.replace_all(text, ELLIPSIS);
    ELLIPSIS_LEADING_SPACE.replace_all(&text, ELLIPSIS).into_owned()
}

/// Character count of words joined by single spaces
pub fn joined_len(words: &[&str]) -> usize {
    if words.is_empty() {
        return 0;
    }
    words.iter().map(|w| w.chars().count()).sum::<usize>() + words.len() - 1
}

/// Characters of a text excluding spaces and line breaks
pub fn visible_chars(text: &str) -> usize {
    text.chars().filter(|c| *c != ' ' && *c != '\n').count()
}
