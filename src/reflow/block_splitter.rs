/*!
 * Splitting of oversized cues into sequential shorter cues.
 *
 * A cue over the character or duration cap is cut into blocks at clause-like
 * word boundaries. The original display time is redistributed by estimated
 * spoken length (syllables, characters and pauses) and laid out back to back
 * so the last block still ends at the original end time.
 */

use log::debug;

use crate::app_config::ReflowConfig;
use crate::subtitle_processor::Cue;
use super::heuristics::{ClauseKind, HeuristicTables};
use super::prosody::ProsodyEstimator;
use super::text::{fix_ellipsis_spacing, joined_len, normalize_whitespace, visible_chars, ELLIPSIS};

/// Share of a block's duration driven by syllables; characters get the rest
const SYLLABLE_WEIGHT: f64 = 0.7;

/// Share of the total duration available for pause redistribution
const PAUSE_BUDGET: f64 = 0.2;

/// Fraction of a block's pause share actually added to it
const PAUSE_DAMPING: f64 = 0.5;

/// Slack over the per-block target before a block may be closed
const TARGET_SLACK: f64 = 1.1;

// @struct: Oversized-cue splitter
#[derive(Debug, Clone)]
pub struct BlockSplitter {
    max_chars_per_block: usize,
    max_duration_ms: u64,
    min_duration_ms: u64,
    min_words_per_block: usize,
    tables: HeuristicTables,
    prosody: ProsodyEstimator,
}

impl BlockSplitter {
    pub fn new(config: &ReflowConfig, tables: &HeuristicTables, prosody: ProsodyEstimator) -> Self {
        Self {
            max_chars_per_block: config.max_chars_per_block,
            max_duration_ms: config.max_duration_ms(),
            min_duration_ms: config.min_duration_ms(),
            min_words_per_block: config.min_words_per_line,
            tables: tables.clone(),
            prosody,
        }
    }

    /// Whether a cue exceeds the character or duration cap
    pub fn needs_split(&self, cue: &Cue) -> bool {
        cue.char_count() > self.max_chars_per_block || cue.duration_ms() > self.max_duration_ms
    }

    /// Number of blocks a cue should become, at least 1
    pub fn blocks_needed(&self, cue: &Cue) -> usize {
        let char_blocks = cue.char_count().div_ceil(self.max_chars_per_block.max(1)).max(1);

        let max_ms = self.max_duration_ms.max(1);
        let duration = cue.duration_ms();
        let rounding = usize::from(duration % max_ms > 500);
        let duration_blocks = (duration / max_ms) as usize + rounding;

        char_blocks.max(duration_blocks.max(1))
    }

    /// Divide text into at most `num_blocks` word runs.
    ///
    /// A block is closed once the next word would push it past the slack
    /// target and a preferred boundary holds; the target is then recomputed
    /// over the remaining words and blocks.
    pub fn partition(&self, text: &str, num_blocks: usize) -> Vec<String> {
        let normalized = normalize_whitespace(text);
        let words: Vec<&str> = normalized.split_whitespace().collect();

        if num_blocks <= 1 || words.len() <= 1 {
            return vec![normalized];
        }

        let mut target = normalized.chars().count() as f64 / num_blocks as f64;
        let mut blocks = Vec::with_capacity(num_blocks);
        let mut current: Vec<&str> = Vec::new();
        let mut current_chars = 0usize;
        let mut blocks_remaining = num_blocks;

        for (i, word) in words.iter().enumerate() {
            let word_len = word.chars().count();
            let word_chars = word_len + usize::from(!current.is_empty());
            let words_remaining = words.len() - i;

            if (current_chars + word_chars) as f64 > target * TARGET_SLACK
                && blocks_remaining > 1
                && current.len() >= self.min_words_per_block
                && words_remaining >= self.min_words_per_block
                && self.is_preferred_boundary(&current, word, current_chars, target)
            {
                blocks.push(current.join(" "));
                current.clear();
                blocks_remaining -= 1;
                target = joined_len(&words[i..]) as f64 / blocks_remaining as f64;
                current_chars = 0;
                current.push(word);
                current_chars += word_len;
                continue;
            }

            current.push(word);
            current_chars += word_chars;
        }

        if !current.is_empty() {
            blocks.push(current.join(" "));
        }

        blocks
    }

    fn is_preferred_boundary(&self, current: &[&str], next: &str, current_chars: usize, target: f64) -> bool {
        let after_punctuation = current
            .last()
            .is_some_and(|prev| self.tables.ends_with_split_punctuation(prev));
        let before_clause = matches!(
            self.tables.clause_kind(next),
            Some(ClauseKind::Adversative | ClauseKind::Coordinating)
        );

        after_punctuation || before_clause || current_chars as f64 > target
    }

    /// Share `total_ms` across blocks by estimated spoken length.
    ///
    /// The result is rescaled to sum to `total_ms` up to truncation and is
    /// not yet floored to the minimum duration.
    pub fn allocate_durations(&self, blocks: &[String], total_ms: u64) -> Vec<u64> {
        let total = total_ms as f64;

        let syllables: Vec<usize> = blocks.iter().map(|b| self.prosody.text_syllables(b)).collect();
        let chars: Vec<usize> = blocks.iter().map(|b| visible_chars(b)).collect();
        let pauses: Vec<f64> = blocks.iter().map(|b| self.prosody.pause_weight(b)).collect();

        let total_syllables = syllables.iter().sum::<usize>().max(1) as f64;
        let total_chars = chars.iter().sum::<usize>().max(1) as f64;
        let total_pause: f64 = pauses.iter().sum();

        let adjusted: Vec<u64> = (0..blocks.len())
            .map(|i| {
                let ratio = SYLLABLE_WEIGHT * (syllables[i] as f64 / total_syllables)
                    + (1.0 - SYLLABLE_WEIGHT) * (chars[i] as f64 / total_chars);
                let raw = (total * ratio) as u64;

                if total_pause > 0.0 {
                    let pause_ms = (total * PAUSE_BUDGET * (pauses[i] / total_pause)) as u64;
                    raw + (pause_ms as f64 * PAUSE_DAMPING) as u64
                } else {
                    raw
                }
            })
            .collect();

        let sum: u64 = adjusted.iter().sum();
        if sum == 0 {
            return adjusted;
        }

        let scale = total / sum as f64;
        adjusted.into_iter().map(|d| (d as f64 * scale) as u64).collect()
    }

    /// Split a cue if it is oversized; otherwise return it as the only element
    pub fn split(&self, cue: Cue) -> Vec<Cue> {
        if !self.needs_split(&cue) {
            return vec![cue];
        }

        let num_blocks = self.blocks_needed(&cue);
        let blocks = self.partition(&cue.text, num_blocks);
        if blocks.len() < 2 {
            debug!("Cue {} exceeds caps but cannot be split, keeping it whole", cue.index);
            return vec![cue];
        }

        let total_ms = cue.duration_ms();
        if total_ms < blocks.len() as u64 {
            debug!("Cue {} is too short to hold {} blocks, keeping it whole", cue.index, blocks.len());
            return vec![cue];
        }

        let durations = self.allocate_durations(&blocks, total_ms);
        let last = blocks.len() - 1;
        let mut start = cue.start_ms;
        let mut result = Vec::with_capacity(blocks.len());

        for (i, duration) in durations.into_iter().enumerate() {
            let end = if i == last {
                cue.end_ms
            } else {
                // leave at least one millisecond for every following block
                let latest_end = cue.end_ms - (last - i) as u64;
                (start + duration.max(self.min_duration_ms)).min(latest_end)
            };

            let text = self.mark_continuity(&blocks, i);
            result.push(Cue::new(0, start, end, text));
            start = end;
        }

        debug!(
            "Split cue {} ({} chars, {} ms) into {} blocks",
            cue.index,
            cue.char_count(),
            total_ms,
            result.len()
        );

        result
    }

    /// Add the ellipses marking a sentence that runs across blocks
    fn mark_continuity(&self, blocks: &[String], i: usize) -> String {
        let mut text = blocks[i].clone();

        if i + 1 < blocks.len() && !self.tables.is_sentence_end(&blocks[i]) {
            text = format!("{}{}", text.trim_end(), ELLIPSIS);
        }
        if i > 0 && !self.tables.is_sentence_end(&blocks[i - 1]) {
            text = format!("{}{}", ELLIPSIS, text.trim_start());
        }

        fix_ellipsis_spacing(&text)
    }
}
