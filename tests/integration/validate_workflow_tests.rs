/*!
 * End-to-end tests for folder validation and reports
 */

use anyhow::Result;
use std::fs;
use subreflow::app_config::Config;
use subreflow::app_controller::{Controller, FixOptions};
use subreflow::validation::{ReportWriter, Rule, ValidationSummary};
use crate::common;

#[test]
fn test_validateFolder_withPrefix_shouldOnlyCheckMatchingFiles() -> Result<()> {
    common::init_test_logger();
    let temp_dir = common::create_temp_dir()?;
    common::create_test_subtitle(temp_dir.path(), "en_raw.srt")?;
    common::create_clean_subtitle(temp_dir.path(), "en_clean.srt")?;
    common::create_test_subtitle(temp_dir.path(), "fr_raw.srt")?;

    let controller = Controller::new_for_test()?;
    let reports = controller.validate_folder(temp_dir.path(), Some("en_"))?;
    let summary = ValidationSummary::from_reports(&reports);

    assert_eq!(summary.total_files, 2);
    assert_eq!(summary.total_cues, 7);
    assert_eq!(summary.files_clean, 1);
    assert_eq!(summary.violations_by_rule[Rule::LineLength.code()].count, 2);
    Ok(())
}

#[test]
fn test_fixThenValidate_shouldClearLineLengthErrors() -> Result<()> {
    common::init_test_logger();
    let temp_dir = common::create_temp_dir()?;
    common::create_test_subtitle(temp_dir.path(), "en_raw.srt")?;

    let controller = Controller::new_for_test()?;
    let before = ValidationSummary::from_reports(&controller.validate_folder(temp_dir.path(), None)?);
    controller.fix_path(temp_dir.path(), FixOptions::default())?;
    let after = ValidationSummary::from_reports(&controller.validate_folder(temp_dir.path(), None)?);

    assert_eq!(before.total_errors, 2);
    assert_eq!(after.total_errors, 0);
    assert!(!after.violations_by_rule.contains_key(Rule::MaxDuration.code()));
    Ok(())
}

#[test]
fn test_writeReports_shouldProduceMarkdownAndJson() -> Result<()> {
    common::init_test_logger();
    let temp_dir = common::create_temp_dir()?;
    common::create_test_subtitle(temp_dir.path(), "en_raw.srt")?;

    let mut config = Config::default();
    config.validation.children = true;
    let controller = Controller::with_config(config)?;
    let reports = controller.validate_folder(temp_dir.path(), None)?;
    let summary = ValidationSummary::from_reports(&reports);

    let out_dir = temp_dir.path().join("out");
    ReportWriter::write_markdown(out_dir.join("report.md"), &reports, &summary)?;
    ReportWriter::write_json(out_dir.join("report.json"), &reports, &summary)?;

    let markdown = fs::read_to_string(out_dir.join("report.md"))?;
    assert!(markdown.contains("## Executive Summary"));
    assert!(markdown.contains("### LINE_LENGTH"));
    assert!(markdown.contains("en_raw.srt"));

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(out_dir.join("report.json"))?)?;
    assert_eq!(json["summary"]["total_files"], 1);
    assert_eq!(json["files"][0]["error_count"], 2);

    // the long sentence of cue 1 starts the file, the 90-char cue 2 starts on line 5
    let violations = json["files"][0]["violations"].as_array().expect("violations array");
    let first = violations.iter().find(|v| v["cue_index"] == 1).expect("cue 1 violation");
    assert_eq!(first["line_number"], 1);
    let second = violations.iter().find(|v| v["cue_index"] == 2).expect("cue 2 violation");
    assert_eq!(second["line_number"], 5);
    Ok(())
}
