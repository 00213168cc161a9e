/*!
 * Timing validation for caption cues.
 *
 * This module validates that each cue:
 * - Stays on screen for at least the minimum duration
 * - Does not stay on screen longer than the maximum duration
 * - Can be read within the reading speed limit
 */

use crate::subtitle_processor::Cue;

use super::service::{Rule, Violation};

/// Minimum display time in milliseconds (5/6 of a second)
const DEFAULT_MIN_DURATION_MS: u64 = 833;

/// Maximum display time in seconds
const DEFAULT_MAX_DURATION_SEC: f64 = 7.0;

/// Maximum characters per second for adult content
const DEFAULT_MAX_CPS: f64 = 17.0;

/// Configuration for timing validation
#[derive(Debug, Clone)]
pub struct TimingValidatorConfig {
    /// Compared in whole milliseconds, matching what the reflow engine produces
    pub min_duration_ms: u64,
    pub max_duration_sec: f64,
    pub max_cps: f64,
}

impl Default for TimingValidatorConfig {
    fn default() -> Self {
        Self {
            min_duration_ms: DEFAULT_MIN_DURATION_MS,
            max_duration_sec: DEFAULT_MAX_DURATION_SEC,
            max_cps: DEFAULT_MAX_CPS,
        }
    }
}

/// Timing validator for caption cues
#[derive(Debug, Clone, Default)]
pub struct TimingValidator {
    config: TimingValidatorConfig,
}

impl TimingValidator {
    /// Create a new validator with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new validator with custom configuration
    pub fn with_config(config: TimingValidatorConfig) -> Self {
        Self { config }
    }

    /// Minimum and maximum duration checks
    pub fn check_duration(&self, cue: &Cue) -> Vec<Violation> {
        let mut violations = Vec::new();
        let duration = cue.duration_secs();
        let min_sec = self.config.min_duration_ms as f64 / 1000.0;
        let max_sec = self.config.max_duration_sec;

        if cue.duration_ms() < self.config.min_duration_ms {
            violations.push(
                Violation::warning(
                    Rule::MinDuration,
                    cue.index,
                    format!("Duration {:.2}s is too short (min {:.2}s)", duration, min_sec),
                )
                .with_fix("Extend cue duration or merge with adjacent", false)
                .with_values(format!("{:.2}s", duration), format!("{:.2}s", min_sec)),
            );
        }

        if duration > max_sec {
            violations.push(
                Violation::warning(
                    Rule::MaxDuration,
                    cue.index,
                    format!("Duration {:.2}s is too long (max {:.1}s)", duration, max_sec),
                )
                .with_fix("Split into multiple cues", false)
                .with_values(format!("{:.2}s", duration), format!("{:.1}s", max_sec)),
            );
        }

        violations
    }

    /// Reading speed check
    pub fn check_reading_speed(&self, cue: &Cue) -> Option<Violation> {
        let cps = cue.chars_per_second();
        let max_cps = self.config.max_cps;
        if cps <= max_cps {
            return None;
        }

        Some(
            Violation::warning(
                Rule::ReadingSpeed,
                cue.index,
                format!("Reading speed {:.1} CPS exceeds limit ({} CPS)", cps, max_cps),
            )
            .with_fix("Shorten text or extend duration", false)
            .with_values(format!("{:.1} CPS", cps), format!("{} CPS", max_cps)),
        )
    }
}
