use anyhow::{Context, Result};
use log::{debug, warn, LevelFilter};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::path::{Path, PathBuf};

use crate::errors::ConfigError;
use crate::file_utils::FileManager;
use crate::reflow::heuristics::HeuristicTables;
use crate::reflow::prosody::SyllableDictionary;

/// Application configuration module
/// This module handles loading and validating the `conf.json` settings:
/// reflow caps, heuristic tables, validator thresholds and log level.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Caps and minimums used by the reflow engine
    #[serde(default)]
    pub reflow: ReflowConfig,

    /// Word lists and weights used by the reflow engine
    #[serde(default)]
    pub heuristics: HeuristicTables,

    /// Thresholds used only by the style validator
    #[serde(default)]
    pub validation: ValidationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Optional JSON hyphenation dictionary for syllable counting
    #[serde(default)]
    pub syllable_dictionary: Option<PathBuf>,
}

/// Reflow engine settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ReflowConfig {
    // @field: Per-line character cap
    #[serde(default = "default_max_chars_per_line")]
    pub max_chars_per_line: usize,

    // @field: Per-cue character cap, line breaks excluded
    #[serde(default = "default_max_chars_per_block")]
    pub max_chars_per_block: usize,

    // @field: Longest a cue may stay on screen
    #[serde(default = "default_max_duration_sec")]
    pub max_duration_sec: f64,

    // @field: Shortest a cue may stay on screen
    #[serde(default = "default_min_duration_sec")]
    pub min_duration_sec: f64,

    // @field: Gap kept before the next cue when extending
    #[serde(default = "default_min_gap_sec")]
    pub min_gap_sec: f64,

    // @field: Line length below which a break is penalized
    #[serde(default = "default_min_chars_per_line")]
    pub min_chars_per_line: usize,

    // @field: Shorter/longer line ratio below which a break is penalized
    #[serde(default = "default_min_char_ratio")]
    pub min_char_ratio: f64,

    // @field: Word count below which a line is penalized
    #[serde(default = "default_min_words_per_line")]
    pub min_words_per_line: usize,
}

impl ReflowConfig {
    pub fn max_duration_ms(&self) -> u64 {
        secs_to_ms(self.max_duration_sec)
    }

    pub fn min_duration_ms(&self) -> u64 {
        secs_to_ms(self.min_duration_sec)
    }

    pub fn min_gap_ms(&self) -> u64 {
        secs_to_ms(self.min_gap_sec)
    }

    /// Check the settings for values the engine cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_chars_per_line == 0 {
            return Err(ConfigError::NotPositive("max_chars_per_line"));
        }
        if self.max_chars_per_block == 0 {
            return Err(ConfigError::NotPositive("max_chars_per_block"));
        }
        if self.max_duration_sec <= 0.0 {
            return Err(ConfigError::NotPositive("max_duration_sec"));
        }
        if self.min_duration_sec <= 0.0 {
            return Err(ConfigError::NotPositive("min_duration_sec"));
        }
        if self.min_words_per_line == 0 {
            return Err(ConfigError::NotPositive("min_words_per_line"));
        }
        if self.min_gap_sec < 0.0 {
            return Err(ConfigError::Inconsistent("min_gap_sec must not be negative".to_string()));
        }
        if !(self.min_char_ratio > 0.0 && self.min_char_ratio <= 1.0) {
            return Err(ConfigError::RatioOutOfRange {
                name: "min_char_ratio",
                value: self.min_char_ratio,
            });
        }
        if self.max_chars_per_block < self.max_chars_per_line {
            return Err(ConfigError::Inconsistent(format!(
                "max_chars_per_block ({}) is smaller than max_chars_per_line ({})",
                self.max_chars_per_block, self.max_chars_per_line
            )));
        }
        if self.min_duration_sec >= self.max_duration_sec {
            return Err(ConfigError::Inconsistent(format!(
                "min_duration_sec ({}) must be below max_duration_sec ({})",
                self.min_duration_sec, self.max_duration_sec
            )));
        }
        Ok(())
    }
}

impl Default for ReflowConfig {
    fn default() -> Self {
        Self {
            max_chars_per_line: default_max_chars_per_line(),
            max_chars_per_block: default_max_chars_per_block(),
            max_duration_sec: default_max_duration_sec(),
            min_duration_sec: default_min_duration_sec(),
            min_gap_sec: default_min_gap_sec(),
            min_chars_per_line: default_min_chars_per_line(),
            min_char_ratio: default_min_char_ratio(),
            min_words_per_line: default_min_words_per_line(),
        }
    }
}

/// Style validator thresholds
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ValidationConfig {
    /// Duration above which a cue is reported as too long
    #[serde(default = "default_validation_max_duration_sec")]
    pub max_duration_sec: f64,

    /// Reading speed limit for adult content
    #[serde(default = "default_adult_max_cps")]
    pub adult_max_cps: f64,

    /// Reading speed limit for children's content
    #[serde(default = "default_children_max_cps")]
    pub children_max_cps: f64,

    /// Shorter/longer ratio below which two lines are reported unbalanced
    #[serde(default = "default_min_line_balance_ratio")]
    pub min_line_balance_ratio: f64,

    /// Apply the children's reading speed limit
    #[serde(default)]
    pub children: bool,
}

impl ValidationConfig {
    // @returns: Reading speed limit for the configured audience
    pub fn max_cps(&self) -> f64 {
        if self.children {
            self.children_max_cps
        } else {
            self.adult_max_cps
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_duration_sec <= 0.0 {
            return Err(ConfigError::NotPositive("validation.max_duration_sec"));
        }
        if self.adult_max_cps <= 0.0 {
            return Err(ConfigError::NotPositive("adult_max_cps"));
        }
        if self.children_max_cps <= 0.0 {
            return Err(ConfigError::NotPositive("children_max_cps"));
        }
        if !(self.min_line_balance_ratio > 0.0 && self.min_line_balance_ratio <= 1.0) {
            return Err(ConfigError::RatioOutOfRange {
                name: "min_line_balance_ratio",
                value: self.min_line_balance_ratio,
            });
        }
        Ok(())
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_duration_sec: default_validation_max_duration_sec(),
            adult_max_cps: default_adult_max_cps(),
            children_max_cps: default_children_max_cps(),
            min_line_balance_ratio: default_min_line_balance_ratio(),
            children: false,
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl From<&LogLevel> for LevelFilter {
    fn from(level: &LogLevel) -> Self {
        match level {
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

fn secs_to_ms(secs: f64) -> u64 {
    (secs * 1000.0).round().max(0.0) as u64
}

fn default_max_chars_per_line() -> usize {
    42
}

fn default_max_chars_per_block() -> usize {
    84
}

fn default_max_duration_sec() -> f64 {
    8.0
}

fn default_min_duration_sec() -> f64 {
    5.0 / 6.0
}

fn default_min_gap_sec() -> f64 {
    0.05
}

fn default_min_chars_per_line() -> usize {
    15
}

fn default_min_char_ratio() -> f64 {
    0.30
}

fn default_min_words_per_line() -> usize {
    2
}

fn default_validation_max_duration_sec() -> f64 {
    7.0
}

fn default_adult_max_cps() -> f64 {
    17.0
}

fn default_children_max_cps() -> f64 {
    15.0
}

fn default_min_line_balance_ratio() -> f64 {
    0.25
}

impl Config {
    /// Parse a configuration from JSON; absent sections take their defaults
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse configuration JSON")
    }

    /// Load the config file, or fall back to defaults when it does not exist
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !FileManager::file_exists(path) {
            warn!("Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = FileManager::read_to_string(path)?;
        let config = Self::from_json_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))?;
        debug!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.reflow.validate()?;
        self.validation.validate()?;

        if self.heuristics.pause_marks.iter().any(|m| m.weight < 0.0) || self.heuristics.hesitation_pause < 0.0 {
            return Err(ConfigError::Inconsistent("pause weights must not be negative".to_string()));
        }

        Ok(())
    }

    /// Load the configured syllable dictionary, if any
    pub fn load_syllable_dictionary(&self) -> Result<Option<SyllableDictionary>> {
        match &self.syllable_dictionary {
            Some(path) => Ok(Some(SyllableDictionary::from_file(path)?)),
            None => Ok(None),
        }
    }
}
