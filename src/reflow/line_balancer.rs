/*!
 * Line balancing for a single cue.
 *
 * The balancer wraps a cue's text into display lines that each fit the
 * per-line cap. A single scored scan over the word gaps picks the break;
 * gaps whose two sides both fit the cap are preferred over any gap that
 * would need repair. When no two-line layout fits, the overflow is wrapped
 * onto extra lines and the layout is flagged for a further block split.
 * Words are never dropped.
 */

use log::{debug, warn};
use serde::Serialize;

use crate::app_config::ReflowConfig;
use super::heuristics::HeuristicTables;
use super::text::{joined_len, normalize_whitespace};

/// How a layout was produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LayoutKind {
    /// Text fits on one line; only whitespace was normalized
    Unchanged,
    /// Split at the best-scoring boundary, both lines fit
    Balanced,
    /// The first line had to be bisected to fit
    Repaired,
    /// More than two lines were needed; the cue should be split further
    Overflow,
    /// A single word longer than the cap was hyphenated
    HardBreak,
    /// A word longer than the cap forced a plain half-and-half split
    OversizedWord,
}

impl LayoutKind {
    /// Whether every line is guaranteed to fit the cap
    pub fn fits_cap(self) -> bool {
        !matches!(self, LayoutKind::OversizedWord)
    }

    /// Whether the layout is a last-resort result rather than a linguistic split
    pub fn is_last_resort(self) -> bool {
        matches!(self, LayoutKind::HardBreak | LayoutKind::OversizedWord)
    }
}

/// Lines for one cue and how they were obtained
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Layout {
    pub lines: Vec<String>,
    pub kind: LayoutKind,
}

impl Layout {
    fn new(lines: Vec<String>, kind: LayoutKind) -> Self {
        Self { lines, kind }
    }

    /// Lines joined with line breaks
    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    /// More than two lines were needed
    pub fn needs_block_split(&self) -> bool {
        self.kind == LayoutKind::Overflow
    }

    /// Longest line in characters
    pub fn longest_line(&self) -> usize {
        self.lines.iter().map(|l| l.chars().count()).max().unwrap_or(0)
    }
}

/// Preferred share of characters on the first line, by total length
pub fn target_ratio(total_chars: usize) -> f64 {
    match total_chars {
        0..=24 => 0.50,
        25..=34 => 0.45,
        35..=49 => 0.42,
        _ => 0.40,
    }
}

/// Scored line-break search and repair
#[derive(Debug, Clone)]
pub struct LineBalancer {
    max_chars_per_line: usize,
    min_chars_per_line: usize,
    min_char_ratio: f64,
    min_words_per_line: usize,
    tables: HeuristicTables,
}

impl LineBalancer {
    pub fn new(config: &ReflowConfig, tables: &HeuristicTables) -> Self {
        Self {
            max_chars_per_line: config.max_chars_per_line,
            min_chars_per_line: config.min_chars_per_line,
            min_char_ratio: config.min_char_ratio,
            min_words_per_line: config.min_words_per_line,
            tables: tables.clone(),
        }
    }

    /// Lay out a cue's text so every line fits the cap where possible
    pub fn balance(&self, text: &str) -> Layout {
        let normalized = normalize_whitespace(text);
        let cap = self.max_chars_per_line;

        if normalized.chars().count() <= cap {
            return Layout::new(vec![normalized], LayoutKind::Unchanged);
        }

        let words: Vec<&str> = normalized.split(' ').collect();

        if words.len() < 2 {
            debug!("Hard-breaking oversized word of {} chars", normalized.chars().count());
            return Layout::new(self.hard_break(&normalized), LayoutKind::HardBreak);
        }

        let ratio = target_ratio(normalized.chars().count());
        let split = self.find_best_split_point(&words, ratio);

        let line1 = &words[..split];
        let line2 = &words[split..];
        if joined_len(line1) <= cap && joined_len(line2) <= cap {
            return Layout::new(vec![line1.join(" "), line2.join(" ")], LayoutKind::Balanced);
        }

        self.repair(&words, split)
    }

    /// Index of the word that starts the second line.
    ///
    /// Scans every gap once; a lower score wins and ties keep the earliest
    /// gap. Gaps leaving both sides within the cap take precedence.
    pub fn find_best_split_point(&self, words: &[&str], ratio: f64) -> usize {
        let n = words.len();
        if n <= 1 {
            return n;
        }

        let total = joined_len(words);
        let target = (total as f64 * ratio) as i64;

        let mut best_fitting: Option<(usize, i64)> = None;
        let mut best_any: Option<(usize, i64)> = None;

        for i in 1..n {
            let score = self.boundary_score(words, i, total, target);
            let fits = joined_len(&words[..i]) <= self.max_chars_per_line
                && joined_len(&words[i..]) <= self.max_chars_per_line;

            if best_any.is_none_or(|(_, best)| score < best) {
                best_any = Some((i, score));
            }
            if fits && best_fitting.is_none_or(|(_, best)| score < best) {
                best_fitting = Some((i, score));
            }
        }

        best_fitting
            .or(best_any)
            .map_or(n / 2, |(index, _)| index)
    }

    /// Score of breaking before `words[i]`; lower is better
    fn boundary_score(&self, words: &[&str], i: usize, total: usize, target: i64) -> i64 {
        let weights = &self.tables.boundary;
        let chars_first = joined_len(&words[..i]);
        let chars_second = joined_len(&words[i..]);

        let mut score = (chars_first as i64 - target).abs();

        let prev = words[i - 1];
        if self.tables.is_sentence_end(prev) {
            score -= weights.sentence_end_bonus;
        } else if self.tables.ends_with_split_punctuation(prev) {
            score -= weights.punctuation_bonus;
        }

        if let Some(kind) = self.tables.clause_kind(words[i]) {
            score -= weights.clause_bonus(kind);
        }

        let shorter = chars_first.min(chars_second);
        let longer = chars_first.max(chars_second);
        if longer > 0 && (shorter as f64 / longer as f64) < self.min_char_ratio {
            score += weights.char_ratio_penalty;
        }

        if total > self.min_chars_per_line * 2 {
            if chars_first < self.min_chars_per_line {
                score += weights.short_line_penalty;
            }
            if chars_second < self.min_chars_per_line {
                score += weights.short_line_penalty;
            }
        }

        if words.len() >= self.min_words_per_line * 2 {
            for side in [&words[..i], &words[i..]] {
                if side.len() < self.min_words_per_line
                    && !self.tables.is_standalone_interjection(&side.join(" "))
                {
                    score += weights.few_words_penalty;
                }
            }
        }

        score
    }

    /// Fix a split whose lines do not both fit
    fn repair(&self, words: &[&str], split: usize) -> Layout {
        let cap = self.max_chars_per_line;
        let mut first: Vec<&str> = words[..split].to_vec();
        let mut rest: Vec<&str> = words[split..].to_vec();

        while joined_len(&first) > cap && first.len() >= 2 {
            let tail = first.split_off(first.len() / 2);
            rest.splice(0..0, tail);
        }

        let mut lines = vec![first.join(" ")];
        lines.extend(wrap_greedy(&rest, cap));

        if lines.iter().any(|l| l.chars().count() > cap) {
            let half = words.len() / 2;
            warn!("Line still exceeds {} chars after repair, splitting words evenly", cap);
            return Layout::new(
                vec![words[..half].join(" "), words[half..].join(" ")],
                LayoutKind::OversizedWord,
            );
        }

        if lines.len() > 2 {
            debug!("Layout needs {} lines, flagging for block split", lines.len());
            Layout::new(lines, LayoutKind::Overflow)
        } else {
            Layout::new(lines, LayoutKind::Repaired)
        }
    }

    /// Hyphenate a single word into chunks that fit the cap
    fn hard_break(&self, word: &str) -> Vec<String> {
        let chunk = self.max_chars_per_line.saturating_sub(1).max(1);
        let mut chars: Vec<char> = word.chars().collect();
        let mut lines = Vec::new();

        while chars.len() > self.max_chars_per_line {
            let rest = chars.split_off(chunk);
            let mut line: String = chars.into_iter().collect();
            line.push('-');
            lines.push(line);
            chars = rest;
        }
        lines.push(chars.into_iter().collect());

        lines
    }
}

/// Fill lines word by word without exceeding the cap; a word longer than
/// the cap gets a line of its own.
fn wrap_greedy(words: &[&str], cap: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in words {
        if current.is_empty() {
            current.push_str(word);
        } else if current.chars().count() + 1 + word.chars().count() <= cap {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current.push_str(word);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    lines
}
