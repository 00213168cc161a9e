/*!
 * Tunable word lists and weights used by the reflow engine.
 *
 * Everything here is plain data: the prosody estimator, line balancer and
 * block splitter receive a `HeuristicTables` value instead of reading
 * module-level constants, so a config file can retune or localize them.
 */

use serde::{Deserialize, Serialize};

/// Weight of one punctuation mark in the pause estimate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PauseMark {
    /// The mark itself; multi-character marks are counted first and removed
    pub mark: String,
    /// Estimated pause in seconds per occurrence
    pub weight: f64,
}

impl PauseMark {
    pub fn new(mark: &str, weight: f64) -> Self {
        Self {
            mark: mark.to_string(),
            weight,
        }
    }
}

/// Kind of clause a word can introduce
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseKind {
    /// "but", "however", ...
    Adversative,
    /// "and", "because", ...
    Coordinating,
    /// "which", "that", ...
    Relative,
}

/// Score adjustments for a candidate line break.
///
/// Bonuses are subtracted from the score, penalties added; lower wins.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundaryWeights {
    #[serde(default = "default_sentence_end_bonus")]
    pub sentence_end_bonus: i64,
    #[serde(default = "default_punctuation_bonus")]
    pub punctuation_bonus: i64,
    #[serde(default = "default_adversative_bonus")]
    pub adversative_bonus: i64,
    #[serde(default = "default_coordinating_bonus")]
    pub coordinating_bonus: i64,
    #[serde(default = "default_relative_bonus")]
    pub relative_bonus: i64,
    /// Shorter/longer side ratio below the configured minimum
    #[serde(default = "default_char_ratio_penalty")]
    pub char_ratio_penalty: i64,
    /// A side shorter than the configured minimum characters
    #[serde(default = "default_short_line_penalty")]
    pub short_line_penalty: i64,
    /// A side with too few words that is not an interjection
    #[serde(default = "default_few_words_penalty")]
    pub few_words_penalty: i64,
}

impl BoundaryWeights {
    /// Bonus for breaking before a word of the given clause kind
    pub fn clause_bonus(&self, kind: ClauseKind) -> i64 {
        match kind {
            ClauseKind::Adversative => self.adversative_bonus,
            ClauseKind::Coordinating => self.coordinating_bonus,
            ClauseKind::Relative => self.relative_bonus,
        }
    }
}

impl Default for BoundaryWeights {
    fn default() -> Self {
        Self {
            sentence_end_bonus: default_sentence_end_bonus(),
            punctuation_bonus: default_punctuation_bonus(),
            adversative_bonus: default_adversative_bonus(),
            coordinating_bonus: default_coordinating_bonus(),
            relative_bonus: default_relative_bonus(),
            char_ratio_penalty: default_char_ratio_penalty(),
            short_line_penalty: default_short_line_penalty(),
            few_words_penalty: default_few_words_penalty(),
        }
    }
}

/// Word lists and weights shared by the reflow components
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeuristicTables {
    /// Pause weight per punctuation mark
    #[serde(default = "default_pause_marks")]
    pub pause_marks: Vec<PauseMark>,

    /// Filler words that imply a spoken pause
    #[serde(default = "default_hesitation_markers")]
    pub hesitation_markers: Vec<String>,

    /// Pause in seconds per hesitation marker
    #[serde(default = "default_hesitation_pause")]
    pub hesitation_pause: f64,

    /// One-word utterances allowed to stand alone on a line
    #[serde(default = "default_standalone_interjections")]
    pub standalone_interjections: Vec<String>,

    /// Marks after which a break is preferred
    #[serde(default = "default_split_after_punctuation")]
    pub split_after_punctuation: Vec<char>,

    /// Marks that end a sentence
    #[serde(default = "default_sentence_enders")]
    pub sentence_enders: Vec<char>,

    #[serde(default = "default_adversative_words")]
    pub adversative_words: Vec<String>,

    #[serde(default = "default_coordinating_words")]
    pub coordinating_words: Vec<String>,

    #[serde(default = "default_relative_words")]
    pub relative_words: Vec<String>,

    /// Line-break scoring weights
    #[serde(default)]
    pub boundary: BoundaryWeights,
}

/// Characters stripped from a word before clause-list lookup
const CLAUSE_STRIP: &[char] = &['.', ',', '!', '?', ';', ':'];

/// Characters stripped from the end of an interjection candidate
const INTERJECTION_STRIP: &[char] = &['.', ',', '!', '?'];

impl HeuristicTables {
    /// Whether the trimmed text ends with a sentence-ending mark
    pub fn is_sentence_end(&self, text: &str) -> bool {
        text.trim()
            .chars()
            .last()
            .is_some_and(|c| self.sentence_enders.contains(&c))
    }

    /// Whether a word ends with a mark that invites a break after it
    pub fn ends_with_split_punctuation(&self, word: &str) -> bool {
        word.chars()
            .last()
            .is_some_and(|c| self.split_after_punctuation.contains(&c))
    }

    /// Clause kind introduced by a word, if any
    pub fn clause_kind(&self, word: &str) -> Option<ClauseKind> {
        let bare = word.trim_matches(CLAUSE_STRIP).to_lowercase();
        let contains = |list: &[String]| list.iter().any(|w| *w == bare);

        if contains(&self.adversative_words) {
            Some(ClauseKind::Adversative)
        } else if contains(&self.coordinating_words) {
            Some(ClauseKind::Coordinating)
        } else if contains(&self.relative_words) {
            Some(ClauseKind::Relative)
        } else {
            None
        }
    }

    /// Whether text is exactly one word from the interjection list
    pub fn is_standalone_interjection(&self, text: &str) -> bool {
        let lowered = text.trim().to_lowercase();
        let stripped = lowered.trim_end_matches(INTERJECTION_STRIP);
        let mut words = stripped.split_whitespace();

        match (words.next(), words.next()) {
            (Some(word), None) => self.standalone_interjections.iter().any(|w| w == word),
            _ => false,
        }
    }
}

impl Default for HeuristicTables {
    fn default() -> Self {
        Self {
            pause_marks: default_pause_marks(),
            hesitation_markers: default_hesitation_markers(),
            hesitation_pause: default_hesitation_pause(),
            standalone_interjections: default_standalone_interjections(),
            split_after_punctuation: default_split_after_punctuation(),
            sentence_enders: default_sentence_enders(),
            adversative_words: default_adversative_words(),
            coordinating_words: default_coordinating_words(),
            relative_words: default_relative_words(),
            boundary: BoundaryWeights::default(),
        }
    }
}

fn to_strings(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

fn default_pause_marks() -> Vec<PauseMark> {
    vec![
        PauseMark::new("...", 0.80),
        PauseMark::new(",", 0.25),
        PauseMark::new(";", 0.35),
        PauseMark::new(":", 0.30),
        PauseMark::new(".", 0.60),
        PauseMark::new("?", 0.60),
        PauseMark::new("!", 0.60),
        PauseMark::new("—", 0.40),
        PauseMark::new("-", 0.15),
    ]
}

fn default_hesitation_markers() -> Vec<String> {
    to_strings(&["uh", "um", "er", "ah", "eh", "mm", "hmm"])
}

fn default_hesitation_pause() -> f64 {
    0.20
}

fn default_standalone_interjections() -> Vec<String> {
    to_strings(&[
        "yeah", "yes", "no", "okay", "ok", "right", "sure", "exactly",
        "totally", "absolutely", "definitely", "wow", "nice", "great",
        "mm-hmm", "uh-huh", "nope", "yep", "huh", "oh", "well",
    ])
}

fn default_split_after_punctuation() -> Vec<char> {
    vec!['.', '?', '!', ':', ';', ',', '—']
}

fn default_sentence_enders() -> Vec<char> {
    vec!['.', '?', '!']
}

fn default_adversative_words() -> Vec<String> {
    to_strings(&["but", "however", "although", "though", "yet", "still"])
}

fn default_coordinating_words() -> Vec<String> {
    to_strings(&["and", "or", "so", "because", "since", "while", "as"])
}

fn default_relative_words() -> Vec<String> {
    to_strings(&["which", "that", "where", "when", "who", "whom", "whose", "if"])
}

fn default_sentence_end_bonus() -> i64 {
    200
}

fn default_punctuation_bonus() -> i64 {
    100
}

fn default_adversative_bonus() -> i64 {
    80
}

fn default_coordinating_bonus() -> i64 {
    50
}

fn default_relative_bonus() -> i64 {
    30
}

fn default_char_ratio_penalty() -> i64 {
    400
}

fn default_short_line_penalty() -> i64 {
    300
}

fn default_few_words_penalty() -> i64 {
    500
}
