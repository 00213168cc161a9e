/*!
 * Validation service that orchestrates all style validators.
 *
 * This module holds the shared violation types and runs the layout,
 * timing and formatting checks over every cue of a track.
 */

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::app_config::Config;
use crate::subtitle_processor::{Cue, CueTrack};

use super::formatting::FormatValidator;
use super::length::{LayoutValidator, LayoutValidatorConfig};
use super::timecodes::{TimingValidator, TimingValidatorConfig};

/// Style rule a violation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rule {
    LineLength,
    LineCount,
    MinDuration,
    MaxDuration,
    ReadingSpeed,
    LineBalance,
    DoubleSpace,
    DualSpeakerFormat,
}

impl Rule {
    /// Every rule, in report order
    pub const ALL: [Rule; 8] = [
        Rule::LineLength,
        Rule::LineCount,
        Rule::MinDuration,
        Rule::MaxDuration,
        Rule::ReadingSpeed,
        Rule::LineBalance,
        Rule::DoubleSpace,
        Rule::DualSpeakerFormat,
    ];

    /// Identifier used in reports
    pub fn code(self) -> &'static str {
        match self {
            Rule::LineLength => "LINE_LENGTH",
            Rule::LineCount => "LINE_COUNT",
            Rule::MinDuration => "MIN_DURATION",
            Rule::MaxDuration => "MAX_DURATION",
            Rule::ReadingSpeed => "READING_SPEED",
            Rule::LineBalance => "LINE_BALANCE",
            Rule::DoubleSpace => "DOUBLE_SPACE",
            Rule::DualSpeakerFormat => "DUAL_SPEAKER_FORMAT",
        }
    }

    // @returns: One-line description of what the rule catches
    pub fn description(self) -> &'static str {
        match self {
            Rule::LineLength => "Lines exceed the per-line character limit",
            Rule::LineCount => "Cue has more than two lines",
            Rule::MinDuration => "Cue is shown for less than the minimum duration",
            Rule::MaxDuration => "Cue is shown for longer than the maximum duration",
            Rule::ReadingSpeed => "Characters per second exceed the reading speed limit",
            Rule::LineBalance => "Two-line cue has severely unbalanced lines",
            Rule::DoubleSpace => "Text contains double spaces",
            Rule::DualSpeakerFormat => "Dual speaker cue has formatting issues",
        }
    }

    // @returns: How the rule is usually fixed
    pub fn fix_strategy(self) -> &'static str {
        match self {
            Rule::LineLength => "**Auto-fixable:** split the line at a word boundary",
            Rule::LineCount => "**Manual:** split into several cues with new timestamps",
            Rule::MinDuration => "**Manual:** extend the duration or merge with a neighbour",
            Rule::MaxDuration => "**Manual:** split into several cues with adjusted timestamps",
            Rule::ReadingSpeed => "**Manual:** condense the text or extend the duration",
            Rule::LineBalance => "**Auto-fixable:** redistribute words for a bottom-heavy layout",
            Rule::DoubleSpace => "**Auto-fixable:** replace with a single space",
            Rule::DualSpeakerFormat => "**Partial auto-fix:** remove the space after the hyphen",
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Severity of a violation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// A single rule violation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub rule: Rule,
    /// Index of the offending cue as written in the file
    pub cue_index: usize,
    /// File line where the offending cue starts, for cues read from a file
    #[serde(default)]
    pub line_number: Option<usize>,
    pub message: String,
    pub severity: Severity,
    pub auto_fixable: bool,
    pub fix_suggestion: Option<String>,
    pub current_value: Option<String>,
    pub limit_value: Option<String>,
}

impl Violation {
    /// Create an error violation
    pub fn error(rule: Rule, cue_index: usize, message: String) -> Self {
        Self::new(rule, cue_index, message, Severity::Error)
    }

    /// Create a warning violation
    pub fn warning(rule: Rule, cue_index: usize, message: String) -> Self {
        Self::new(rule, cue_index, message, Severity::Warning)
    }

    fn new(rule: Rule, cue_index: usize, message: String, severity: Severity) -> Self {
        Self {
            rule,
            cue_index,
            line_number: None,
            message,
            severity,
            auto_fixable: false,
            fix_suggestion: None,
            current_value: None,
            limit_value: None,
        }
    }

    /// Attach a fix suggestion
    pub fn with_fix(mut self, suggestion: impl Into<String>, auto_fixable: bool) -> Self {
        self.fix_suggestion = Some(suggestion.into());
        self.auto_fixable = auto_fixable;
        self
    }

    /// Attach the source line of the offending cue
    pub fn at_line(mut self, line_number: Option<usize>) -> Self {
        self.line_number = line_number;
        self
    }

    /// Attach the measured value and the limit it broke
    pub fn with_values(mut self, current: impl Into<String>, limit: impl Into<String>) -> Self {
        self.current_value = Some(current.into());
        self.limit_value = Some(limit.into());
        self
    }
}

/// Violations found in one file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileReport {
    pub path: PathBuf,
    pub total_cues: usize,
    pub violations: Vec<Violation>,
}

impl FileReport {
    pub fn violation_count(&self) -> usize {
        self.violations.len()
    }

    pub fn error_count(&self) -> usize {
        self.violations.iter().filter(|v| v.severity == Severity::Error).count()
    }

    pub fn warning_count(&self) -> usize {
        self.violations.iter().filter(|v| v.severity == Severity::Warning).count()
    }

    pub fn auto_fixable_count(&self) -> usize {
        self.violations.iter().filter(|v| v.auto_fixable).count()
    }

    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    /// File name for display, falling back to the full path
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

/// Runs all style validators
#[derive(Debug, Clone, Default)]
pub struct ValidationService {
    layout: LayoutValidator,
    timing: TimingValidator,
    format: FormatValidator,
}

impl ValidationService {
    /// Create a service with default thresholds
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a service using the caps and thresholds of the app config
    pub fn with_config(config: &Config) -> Self {
        let layout = LayoutValidator::with_config(LayoutValidatorConfig {
            max_chars_per_line: config.reflow.max_chars_per_line,
            min_balance_ratio: config.validation.min_line_balance_ratio,
            ..Default::default()
        });
        let timing = TimingValidator::with_config(TimingValidatorConfig {
            min_duration_ms: config.reflow.min_duration_ms(),
            max_duration_sec: config.validation.max_duration_sec,
            max_cps: config.validation.max_cps(),
        });

        Self {
            layout,
            timing,
            format: FormatValidator::new(),
        }
    }

    /// Every violation of a single cue, in rule order
    pub fn validate_cue(&self, cue: &Cue) -> Vec<Violation> {
        let mut violations = Vec::new();
        violations.extend(self.layout.check_line_length(cue));
        violations.extend(self.layout.check_line_count(cue));
        violations.extend(self.timing.check_duration(cue));
        violations.extend(self.timing.check_reading_speed(cue));
        violations.extend(self.layout.check_line_balance(cue));
        violations.extend(self.format.check_double_spaces(cue));
        violations.extend(self.format.check_dual_speaker_format(cue));

        violations.into_iter().map(|v| v.at_line(cue.source_line)).collect()
    }

    /// Validate already-parsed cues
    pub fn validate_cues(&self, path: &Path, cues: &[Cue]) -> FileReport {
        let violations: Vec<Violation> = cues.iter().flat_map(|cue| self.validate_cue(cue)).collect();

        debug!(
            "Validated {}: {} cues, {} violations",
            path.display(),
            cues.len(),
            violations.len()
        );

        FileReport {
            path: path.to_path_buf(),
            total_cues: cues.len(),
            violations,
        }
    }

    /// Read and validate an SRT file
    pub fn validate_file<P: AsRef<Path>>(&self, path: P) -> Result<FileReport> {
        let track = CueTrack::from_file(&path)?;
        Ok(self.validate_cues(path.as_ref(), &track.cues))
    }
}
