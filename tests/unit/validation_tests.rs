/*!
 * Tests for the style validator
 */

use anyhow::Result;
use std::path::Path;
use subreflow::app_config::Config;
use subreflow::subtitle_processor::Cue;
use subreflow::validation::{Rule, Severity, ValidationService, ValidationSummary};
use crate::common;

#[test]
fn test_validateFile_withCleanFile_shouldReportNothing() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_clean_subtitle(temp_dir.path(), "en_clean.srt")?;

    let report = ValidationService::new().validate_file(&path)?;

    assert_eq!(report.total_cues, 3);
    assert!(report.is_clean());
    Ok(())
}

#[test]
fn test_validateFile_withRawFile_shouldFlagLayoutAndTiming() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_subtitle(temp_dir.path(), "en_raw.srt")?;

    let report = ValidationService::new().validate_file(&path)?;
    let rules: Vec<Rule> = report.violations.iter().map(|v| v.rule).collect();

    // the 77 and 90 character cues are single lines
    assert_eq!(rules.iter().filter(|r| **r == Rule::LineLength).count(), 2);
    assert!(rules.contains(&Rule::MinDuration));
    assert!(rules.contains(&Rule::MaxDuration));
    assert!(rules.contains(&Rule::ReadingSpeed));
    assert_eq!(report.error_count(), 2);
    Ok(())
}

#[test]
fn test_validateCue_withThreeLines_shouldReportLineCountError() {
    let cue = Cue::new(5, 0, 3000, "One\nTwo\nThree");
    let violations = ValidationService::new().validate_cue(&cue);

    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].rule, Rule::LineCount);
    assert_eq!(violations[0].severity, Severity::Error);
    assert_eq!(violations[0].cue_index, 5);
}

#[test]
fn test_withConfig_customLineCap_shouldApplyToLineLength() {
    let mut config = Config::default();
    config.reflow.max_chars_per_line = 20;
    let cue = Cue::new(1, 0, 3000, "Twenty-five characters ok");

    assert!(ValidationService::new().validate_cue(&cue).is_empty());
    let violations = ValidationService::with_config(&config).validate_cue(&cue);
    assert_eq!(violations[0].limit_value.as_deref(), Some("20"));
}

#[test]
fn test_summary_overTwoFiles_shouldCountAffectedFilesOnce() {
    let service = ValidationService::new();
    let noisy = service.validate_cues(
        Path::new("a.srt"),
        &[Cue::new(1, 0, 2000, "Hi  there"), Cue::new(2, 3000, 5000, "Bye  now")],
    );
    let quiet = service.validate_cues(Path::new("b.srt"), &[Cue::new(1, 0, 2000, "Fine")]);

    let summary = ValidationSummary::from_reports(&[noisy, quiet]);

    let double = &summary.violations_by_rule[Rule::DoubleSpace.code()];
    assert_eq!(double.count, 2);
    assert_eq!(double.affected_files, 1);
    assert_eq!(summary.files_clean, 1);
    assert_eq!(summary.manual_count(), 0);
}
