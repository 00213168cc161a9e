/*!
 * Text formatting validation for caption cues.
 *
 * This module checks typographic details that do not depend on timing:
 * - Runs of two or more spaces
 * - Dual speaker dashes used consistently and without a trailing space
 */

use crate::subtitle_processor::Cue;

use super::service::{Rule, Violation};

/// Formatting validator for caption cues
#[derive(Debug, Clone, Default)]
pub struct FormatValidator;

impl FormatValidator {
    pub fn new() -> Self {
        Self
    }

    /// Violation when the text contains two consecutive spaces
    pub fn check_double_spaces(&self, cue: &Cue) -> Option<Violation> {
        if !cue.text.contains("  ") {
            return None;
        }

        Some(
            Violation::warning(Rule::DoubleSpace, cue.index, "Contains double spaces".to_string())
                .with_fix("Replace double spaces with single space", true),
        )
    }

    /// Dual speaker dash checks.
    ///
    /// A multi-line cue where exactly one line opens with a dash is flagged as
    /// inconsistent. Each line opening with "- " is flagged separately.
    pub fn check_dual_speaker_format(&self, cue: &Cue) -> Vec<Violation> {
        let lines = cue.lines();
        let mut violations = Vec::new();

        let dash_lines = lines.iter().filter(|l| l.trim_start().starts_with('-')).count();
        if dash_lines == 1 && lines.len() > 1 {
            violations.push(
                Violation::warning(
                    Rule::DualSpeakerFormat,
                    cue.index,
                    "Inconsistent dual speaker format (only one line has hyphen)".to_string(),
                )
                .with_fix("Add hyphen to both lines or remove from both", false),
            );
        }

        for (i, line) in lines.iter().enumerate() {
            if line.trim_start().starts_with("- ") {
                violations.push(
                    Violation::warning(
                        Rule::DualSpeakerFormat,
                        cue.index,
                        format!("Line {}: Space after hyphen in dual speaker cue", i + 1),
                    )
                    .with_fix("Remove space after hyphen", true),
                );
            }
        }

        violations
    }
}
