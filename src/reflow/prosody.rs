/*!
 * Spoken-duration estimates for caption text.
 *
 * Syllable counts and punctuation/hesitation pause weights feed the block
 * splitter's duration redistribution. Nothing here fails: empty input
 * simply estimates to zero.
 */

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::file_utils::FileManager;
use super::heuristics::HeuristicTables;

static LETTER_RUN_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-zA-Z]+").unwrap());

const VOWELS: &[char] = &['a', 'e', 'i', 'o', 'u', 'y'];

/// Hyphenation dictionary mapping a word to its syllable count.
///
/// Loaded from a JSON object such as `{ "caption": "cap-tion" }`.
#[derive(Debug, Clone, Default)]
pub struct SyllableDictionary {
    entries: HashMap<String, usize>,
}

impl SyllableDictionary {
    /// Build from `(word, hyphenated)` pairs
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let entries = entries
            .into_iter()
            .map(|(word, hyphenated)| {
                let syllables = hyphenated.as_ref().matches('-').count() + 1;
                (word.as_ref().to_lowercase(), syllables)
            })
            .collect();
        Self { entries }
    }

    /// Parse a JSON object of `word -> hy-phen-ated` entries
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: HashMap<String, String> =
            serde_json::from_str(json).context("Syllable dictionary must be a JSON object of strings")?;
        Ok(Self::from_entries(raw))
    }

    /// Load a dictionary file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = FileManager::read_to_string(&path)?;
        let dictionary = Self::from_json_str(&content)
            .with_context(|| format!("Invalid syllable dictionary: {:?}", path.as_ref()))?;
        debug!("Loaded {} syllable dictionary entries from {:?}", dictionary.len(), path.as_ref());
        Ok(dictionary)
    }

    /// Syllables of an already-cleaned lowercase word, if listed
    pub fn syllables(&self, word: &str) -> Option<usize> {
        self.entries.get(word).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Syllable and pause estimator
#[derive(Debug, Clone)]
pub struct ProsodyEstimator {
    // @field: Optional syllabification resource
    dictionary: Option<SyllableDictionary>,

    pause_marks: Vec<(String, f64)>,

    // @field: Whole-word, case-insensitive hesitation matcher
    hesitation_regex: Option<Regex>,

    hesitation_pause: f64,
}

impl Default for ProsodyEstimator {
    fn default() -> Self {
        Self::new(&HeuristicTables::default(), None)
    }
}

impl ProsodyEstimator {
    /// Create an estimator from heuristic tables and an optional dictionary
    pub fn new(tables: &HeuristicTables, dictionary: Option<SyllableDictionary>) -> Self {
        // Multi-character marks must be counted and removed before their
        // single-character components.
        let mut pause_marks: Vec<(String, f64)> = tables
            .pause_marks
            .iter()
            .filter(|m| !m.mark.is_empty())
            .map(|m| (m.mark.clone(), m.weight))
            .collect();
        pause_marks.sort_by_key(|(mark, _)| std::cmp::Reverse(mark.chars().count()));

        let alternatives: Vec<String> = tables
            .hesitation_markers
            .iter()
            .filter(|m| !m.is_empty())
            .map(|m| regex::escape(&m.to_lowercase()))
            .collect();
        let hesitation_regex = if alternatives.is_empty() {
            None
        } else {
            Regex::new(&format!(r"(?i)\b(?:{})\b", alternatives.join("|"))).ok()
        };

        Self {
            dictionary,
            pause_marks,
            hesitation_regex,
            hesitation_pause: tables.hesitation_pause,
        }
    }

    /// Whether a syllable dictionary is in use
    pub fn has_dictionary(&self) -> bool {
        self.dictionary.is_some()
    }

    /// Syllables in a single word
    pub fn syllable_count(&self, word: &str) -> usize {
        let cleaned: String = word
            .chars()
            .filter(|c| c.is_ascii_alphabetic())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        if cleaned.is_empty() {
            return 0;
        }

        if let Some(count) = self.dictionary.as_ref().and_then(|d| d.syllables(&cleaned)) {
            return count;
        }

        vowel_group_syllables(&cleaned)
    }

    /// Syllables summed over every letter run in a text
    pub fn text_syllables(&self, text: &str) -> usize {
        LETTER_RUN_REGEX
            .find_iter(text)
            .map(|m| self.syllable_count(m.as_str()))
            .sum()
    }

    /// Pause in seconds implied by punctuation alone
    pub fn punctuation_pause(&self, text: &str) -> f64 {
        let mut remaining = text.to_string();
        let mut total = 0.0;

        for (mark, weight) in &self.pause_marks {
            let occurrences = remaining.matches(mark.as_str()).count();
            total += occurrences as f64 * weight;
            if mark.chars().count() > 1 && occurrences > 0 {
                remaining = remaining.replace(mark.as_str(), "");
            }
        }

        total
    }

    /// Number of whole-word hesitation markers
    pub fn hesitation_count(&self, text: &str) -> usize {
        self.hesitation_regex
            .as_ref()
            .map_or(0, |re| re.find_iter(text).count())
    }

    /// Total pause estimate: punctuation plus hesitations
    pub fn pause_weight(&self, text: &str) -> f64 {
        self.punctuation_pause(text) + self.hesitation_count(text) as f64 * self.hesitation_pause
    }
}

/// Vowel-group syllable heuristic for a cleaned lowercase word
fn vowel_group_syllables(word: &str) -> usize {
    let mut count = 0;
    let mut prev_vowel = false;

    for c in word.chars() {
        let is_vowel = VOWELS.contains(&c);
        if is_vowel && !prev_vowel {
            count += 1;
        }
        prev_vowel = is_vowel;
    }

    // silent e
    if word.ends_with('e') && count > 1 {
        count -= 1;
    }

    count.max(1)
}
