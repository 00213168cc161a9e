/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::fs;
use subreflow::file_utils::FileManager;
use crate::common;

/// Test that file_exists returns true for existing files
#[test]
fn test_fileExists_withExistingFile_shouldReturnTrue() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let test_file = common::create_test_file(temp_dir.path(), "exists.srt", "content")?;

    assert!(FileManager::file_exists(&test_file));
    assert!(!FileManager::dir_exists(&test_file));
    Ok(())
}

#[test]
fn test_fileExists_withNonExistentFile_shouldReturnFalse() {
    assert!(!FileManager::file_exists("non_existent_file.srt"));
}

/// Test that find_files walks subdirectories and honors the prefix
#[test]
fn test_findFiles_withPrefix_shouldFilterByNameAndExtension() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    fs::create_dir(root.join("season1"))?;

    common::create_test_file(root, "en_pilot.srt", "")?;
    common::create_test_file(root, "fr_pilot.srt", "")?;
    common::create_test_file(root, "en_notes.txt", "")?;
    common::create_test_file(&root.join("season1"), "en_ep1.SRT", "")?;

    let found = FileManager::find_files(root, "srt", Some("en_"))?;
    let names: Vec<String> = found
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["en_pilot.srt", "en_ep1.SRT"]);

    let all = FileManager::find_files(root, ".srt", None)?;
    assert_eq!(all.len(), 3);
    Ok(())
}

/// Test that backups sit next to the original and ignore later edits
#[test]
fn test_createBackup_shouldCopyToBakSuffix() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let original = common::create_test_file(temp_dir.path(), "movie.srt", "original")?;

    let backup = FileManager::create_backup(&original)?;
    fs::write(&original, "changed")?;

    assert_eq!(backup, temp_dir.path().join("movie.srt.bak"));
    assert_eq!(fs::read_to_string(&backup)?, "original");
    Ok(())
}

#[test]
fn test_writeToFile_withMissingParent_shouldCreateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let target = temp_dir.path().join("reports").join("nested").join("out.md");

    FileManager::write_to_file(&target, "# Report")?;

    assert_eq!(FileManager::read_to_string(&target)?, "# Report");
    Ok(())
}

#[test]
fn test_copyFile_withMissingSource_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let result = FileManager::copy_file(temp_dir.path().join("missing.srt"), temp_dir.path().join("copy.srt"));
    assert!(result.is_err());
}
