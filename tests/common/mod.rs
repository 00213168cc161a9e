/*!
 * Common test utilities for the subreflow test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A 77-character sentence that needs two lines
pub const LONG_SENTENCE: &str = "This is a test sentence that definitely exceeds forty two characters easily.";

/// A 90-character sentence that needs two cues
pub const NINETY_CHARS: &str =
    "We walked along the river for hours and then we finally found an old bridge near the mill.";

/// Routes library logs to the test output, once per test binary
pub fn init_test_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file with the given content in the specified directory
pub fn create_test_file(dir: &Path, filename: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(filename);
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Creates a caption file that needs every kind of reflow
pub fn create_test_subtitle(dir: &Path, filename: &str) -> Result<PathBuf> {
    let content = format!(
        "1\n00:00:00,000 --> 00:00:03,000\n{}\n\n\
         2\n00:00:04,000 --> 00:00:13,000\n{}\n\n\
         3\n00:00:14,000 --> 00:00:14,300\nOkay.\n\n\
         4\n00:00:14,400 --> 00:00:16,000\nNext.\n",
        LONG_SENTENCE, NINETY_CHARS
    );
    create_test_file(dir, filename, &content)
}

/// Creates a caption file that already satisfies every limit
pub fn create_clean_subtitle(dir: &Path, filename: &str) -> Result<PathBuf> {
    let content = r#"1
00:00:01,000 --> 00:00:04,000
This is a test caption.

2
00:00:05,000 --> 00:00:09,000
It contains multiple entries.

3
00:00:10,000 --> 00:00:14,000
For testing purposes.
"#;
    create_test_file(dir, filename, content)
}
