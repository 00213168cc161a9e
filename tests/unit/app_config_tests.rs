/*!
 * Tests for configuration loading and validation
 */

use anyhow::Result;
use subreflow::app_config::{Config, LogLevel};
use subreflow::errors::ConfigError;
use crate::common;

#[test]
fn test_loadOrDefault_withMissingFile_shouldReturnDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let config = Config::load_or_default(temp_dir.path().join("conf.json"))?;

    assert_eq!(config.reflow.max_chars_per_line, 42);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.validate().is_ok());
    Ok(())
}

#[test]
fn test_loadOrDefault_withPartialFile_shouldMergeDefaults() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        r#"{
            "validation": { "children": true },
            "heuristics": { "adversative_words": ["but", "yet"] }
        }"#,
    )?;

    let config = Config::load_or_default(&path)?;

    assert_eq!(config.validation.max_cps(), 15.0);
    assert_eq!(config.heuristics.adversative_words, vec!["but", "yet"]);
    assert!(!config.heuristics.coordinating_words.is_empty());
    assert_eq!(config.reflow.max_chars_per_block, 84);
    Ok(())
}

#[test]
fn test_loadOrDefault_withInvalidJson_shouldFail() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_test_file(temp_dir.path(), "conf.json", "{ not json")?;

    assert!(Config::load_or_default(&path).is_err());
    Ok(())
}

#[test]
fn test_validate_withZeroLineCap_shouldReportSetting() {
    let mut config = Config::default();
    config.reflow.max_chars_per_line = 0;
    assert_eq!(config.validate(), Err(ConfigError::NotPositive("max_chars_per_line")));
}

#[test]
fn test_loadSyllableDictionary_shouldReadConfiguredFile() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let dict_path = common::create_test_file(
        temp_dir.path(),
        "syllables.json",
        r#"{ "every": "ev-ery", "caption": "cap-tion" }"#,
    )?;

    let mut config = Config::default();
    assert!(config.load_syllable_dictionary()?.is_none());

    config.syllable_dictionary = Some(dict_path);
    let dictionary = config.load_syllable_dictionary()?.expect("dictionary configured");
    assert_eq!(dictionary.len(), 2);
    assert_eq!(dictionary.syllables("every"), Some(2));
    Ok(())
}

#[test]
fn test_loadSyllableDictionary_withMissingFile_shouldFail() {
    let config = Config {
        syllable_dictionary: Some("does/not/exist.json".into()),
        ..Default::default()
    };
    assert!(config.load_syllable_dictionary().is_err());
}
