/*!
 * End-to-end tests for reflowing caption files
 */

use anyhow::Result;
use std::fs;
use subreflow::app_config::Config;
use subreflow::app_controller::{render_fix_report, Controller, FixOptions, FixSummary};
use subreflow::file_utils::FileManager;
use subreflow::subtitle_processor::CueTrack;
use crate::common;

#[test]
fn test_fixFile_shouldRewriteWithinCapsAndKeepBackup() -> Result<()> {
    common::init_test_logger();
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_subtitle(temp_dir.path(), "episode.en.srt")?;
    let original = fs::read_to_string(&path)?;

    let controller = Controller::new_for_test()?;
    let result = controller.fix_file(&path, FixOptions::default())?;

    assert!(result.written);
    assert_eq!(result.stats.original_count, 4);
    assert_eq!(result.stats.final_count, 5);
    assert_eq!(result.stats.cues_split, 1);
    assert_eq!(fs::read_to_string(FileManager::backup_path(&path))?, original);

    let track = CueTrack::from_file(&path)?;
    assert_eq!(track.cues.len(), 5);
    for (i, cue) in track.cues.iter().enumerate() {
        assert_eq!(cue.index, i + 1);
        assert!(cue.line_count() <= 2);
        assert!(cue.lines().iter().all(|l| l.chars().count() <= 42));
    }
    assert_eq!(
        track.cues[0].text,
        "This is a test sentence that definitely\nexceeds forty two characters easily."
    );
    assert!(track.cues[1].text.ends_with("..."));
    assert!(track.cues[2].text.starts_with("..."));
    assert_eq!(track.cues[2].end_ms, 13000);
    assert_eq!(track.cues[3].end_ms, 14350);
    Ok(())
}

#[test]
fn test_fixFile_twice_shouldLeaveSecondRunUnchanged() -> Result<()> {
    common::init_test_logger();
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_subtitle(temp_dir.path(), "twice.srt")?;
    let controller = Controller::new_for_test()?;

    controller.fix_file(&path, FixOptions { no_backup: true, ..Default::default() })?;
    let after_first = fs::read_to_string(&path)?;
    let second = controller.fix_file(&path, FixOptions { no_backup: true, ..Default::default() })?;

    assert!(!second.stats.has_changes());
    assert_eq!(fs::read_to_string(&path)?, after_first);
    assert!(!FileManager::file_exists(FileManager::backup_path(&path)));
    Ok(())
}

#[test]
fn test_fixPath_withFolder_shouldProcessEverySrtFile() -> Result<()> {
    common::init_test_logger();
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    fs::create_dir(root.join("disc2"))?;
    common::create_test_subtitle(root, "a.srt")?;
    common::create_clean_subtitle(&root.join("disc2"), "b.srt")?;
    common::create_test_file(root, "notes.txt", "not a caption file")?;

    let controller = Controller::new_for_test()?;
    let results = controller.fix_path(root, FixOptions::default())?;

    assert_eq!(results.len(), 2);
    assert_eq!(results.iter().filter(|r| r.written).count(), 1);
    assert!(FileManager::file_exists(root.join("a.srt.bak")));
    assert!(!FileManager::file_exists(root.join("disc2").join("b.srt.bak")));

    // backups are not picked up as caption files on a later run
    let again = controller.fix_path(root, FixOptions::default())?;
    assert_eq!(again.len(), 2);
    assert!(again.iter().all(|r| !r.stats.has_changes()));
    Ok(())
}

#[test]
fn test_fixFile_withConfigFile_shouldUseConfiguredCap() -> Result<()> {
    common::init_test_logger();
    let temp_dir = common::create_temp_dir()?;
    let config_path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{ "reflow": { "max_chars_per_line": 32, "max_chars_per_block": 64 } }"#,
    )?;
    let path = common::create_test_subtitle(temp_dir.path(), "narrow.srt")?;

    let config = Config::load_or_default(&config_path)?;
    let controller = Controller::with_config(config)?;
    controller.fix_file(&path, FixOptions { no_backup: true, ..Default::default() })?;

    let track = CueTrack::from_file(&path)?;
    for cue in &track.cues {
        assert!(cue.lines().iter().all(|l| l.chars().count() <= 32), "{:?}", cue.text);
    }
    Ok(())
}

#[test]
fn test_fixFile_withArtifacts_shouldDropThemAndRenumber() -> Result<()> {
    common::init_test_logger();
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "artifacts.srt",
        "1\n00:00:01,000 --> 00:00:03,000\nHello there.\n\n\
         2\n00:00:03,500 --> 00:00:03,700\n.\n\n\
         3\n00:00:04,000 --> 00:00:06,000\nGoodbye now.\n",
    )?;

    let result = Controller::new_for_test()?.fix_file(&path, FixOptions { no_backup: true, ..Default::default() })?;

    assert_eq!(result.artifacts_removed, 1);
    assert!(result.written);
    let track = CueTrack::from_file(&path)?;
    let indices: Vec<usize> = track.cues.iter().map(|c| c.index).collect();
    assert_eq!(indices, vec![1, 2]);
    Ok(())
}

#[test]
fn test_renderFixReport_shouldShowArtifactAndMalformedCounts() -> Result<()> {
    common::init_test_logger();
    let temp_dir = common::create_temp_dir()?;
    let broken = common::create_test_file(
        temp_dir.path(),
        "broken.srt",
        "1\n00:00:01,000 --> 00:00:03,000\nHello there.\n\n\
         2\n00:00:03,500 --> 00:00:03,700\n?\n\n\
         x\n00:00:04,000 --> 00:00:05,000\nNo index here.\n\n\
         4\n00:00:06,000 --> 00:00:08,000\nGoodbye now.\n",
    )?;
    common::create_clean_subtitle(temp_dir.path(), "clean.srt")?;

    let controller = Controller::new_for_test()?;
    let results = controller.fix_path(temp_dir.path(), FixOptions { no_backup: true, ..Default::default() })?;
    let broken_result = results.iter().find(|r| r.path == broken).expect("broken.srt result");
    assert_eq!(broken_result.artifacts_removed, 1);
    assert_eq!(broken_result.malformed_blocks, 1);

    let summary = FixSummary::from_results(&results);
    assert_eq!(summary.files, 2);
    assert_eq!(summary.files_changed, 1);
    assert_eq!(summary.stats.original_count, 5);

    let report = render_fix_report(&results, false);
    let columns: Vec<&str> = report
        .lines()
        .find(|l| l.starts_with("broken.srt"))
        .expect("row for broken.srt")
        .split_whitespace()
        .collect();
    // File Before After Split Lines Ext Artif Malf Overlp
    assert_eq!(columns[6], "1");
    assert_eq!(columns[7], "1");

    let totals: Vec<&str> = report
        .lines()
        .find(|l| l.starts_with("TOTAL"))
        .expect("totals row")
        .split_whitespace()
        .collect();
    assert_eq!(totals[1], "5");
    assert_eq!(totals[6], "1");
    assert_eq!(totals[7], "1");

    assert!(report.contains("Artifacts removed:     1\n"));
    assert!(report.contains("Malformed blocks:      1\n"));
    assert!(report.contains("1 of 2 files changed, 1 rewritten"));
    Ok(())
}
