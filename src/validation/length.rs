/*!
 * Line layout validation for caption cues.
 *
 * This module checks the visual shape of a cue:
 * - Per-line character limit
 * - Maximum number of lines
 * - Balance between the two lines of a two-line cue
 */

use crate::subtitle_processor::Cue;

use super::service::{Rule, Violation};

/// Default per-line character limit
const DEFAULT_MAX_CHARS_PER_LINE: usize = 42;

/// Default maximum number of lines per cue
const DEFAULT_MAX_LINES: usize = 2;

/// Shorter line should be at least this share of the longer one
const DEFAULT_MIN_BALANCE_RATIO: f64 = 0.25;

/// Configuration for layout validation
#[derive(Debug, Clone)]
pub struct LayoutValidatorConfig {
    pub max_chars_per_line: usize,
    pub max_lines: usize,
    pub min_balance_ratio: f64,
}

impl Default for LayoutValidatorConfig {
    fn default() -> Self {
        Self {
            max_chars_per_line: DEFAULT_MAX_CHARS_PER_LINE,
            max_lines: DEFAULT_MAX_LINES,
            min_balance_ratio: DEFAULT_MIN_BALANCE_RATIO,
        }
    }
}

/// Layout validator for caption cues
#[derive(Debug, Clone, Default)]
pub struct LayoutValidator {
    config: LayoutValidatorConfig,
}

impl LayoutValidator {
    /// Create a new validator with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new validator with custom configuration
    pub fn with_config(config: LayoutValidatorConfig) -> Self {
        Self { config }
    }

    /// One violation per line over the character limit
    pub fn check_line_length(&self, cue: &Cue) -> Vec<Violation> {
        let max = self.config.max_chars_per_line;

        cue.lines()
            .iter()
            .enumerate()
            .filter_map(|(i, line)| {
                let line_len = line.chars().count();
                if line_len <= max {
                    return None;
                }

                let words: Vec<&str> = line.split_whitespace().collect();
                let (fix, auto_fixable) = if words.len() > 1 {
                    let (first, second) = halves(&words);
                    (format!("Split: \"{}\" / \"{}\"", first, second), true)
                } else {
                    ("Single word too long - manual review needed".to_string(), false)
                };

                Some(
                    Violation::error(
                        Rule::LineLength,
                        cue.index,
                        format!("Line {} has {} chars (max {})", i + 1, line_len, max),
                    )
                    .with_fix(fix, auto_fixable)
                    .with_values(line_len.to_string(), max.to_string()),
                )
            })
            .collect()
    }

    /// Violation when a cue has too many lines
    pub fn check_line_count(&self, cue: &Cue) -> Option<Violation> {
        let count = cue.line_count();
        let max = self.config.max_lines;
        if count <= max {
            return None;
        }

        Some(
            Violation::error(
                Rule::LineCount,
                cue.index,
                format!("Cue has {} lines (max {})", count, max),
            )
            .with_fix("Split into multiple cues with adjusted timestamps", false)
            .with_values(count.to_string(), max.to_string()),
        )
    }

    /// Violation when the two lines of a cue differ too much in length
    pub fn check_line_balance(&self, cue: &Cue) -> Option<Violation> {
        let lines = cue.lines();
        if lines.len() != 2 {
            return None;
        }

        let len1 = lines[0].chars().count();
        let len2 = lines[1].chars().count();
        if len1 == 0 || len2 == 0 {
            return None;
        }

        let ratio = len1.min(len2) as f64 / len1.max(len2) as f64;
        if ratio >= self.config.min_balance_ratio {
            return None;
        }

        let words: Vec<&str> = lines.iter().flat_map(|l| l.split_whitespace()).collect();
        let (fix, auto_fixable) = if words.len() >= 2 {
            let (first, second) = halves(&words);
            (format!("Rebalance: \"{}\" / \"{}\"", first, second), true)
        } else {
            ("Cannot rebalance single word".to_string(), false)
        };

        Some(
            Violation::warning(
                Rule::LineBalance,
                cue.index,
                format!("Unbalanced lines: {} chars vs {} chars (ratio {:.2})", len1, len2, ratio),
            )
            .with_fix(fix, auto_fixable)
            .with_values(
                format!("{}/{} chars", len1, len2),
                format!("ratio >= {}", self.config.min_balance_ratio),
            ),
        )
    }
}

/// Words split into two halves by word count
fn halves(words: &[&str]) -> (String, String) {
    let mid = words.len() / 2;
    (words[..mid].join(" "), words[mid..].join(" "))
}
