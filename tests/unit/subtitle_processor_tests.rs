/*!
 * Tests for SRT reading and writing
 */

use anyhow::Result;
use subreflow::subtitle_processor::{Cue, CueTrack};
use subreflow::errors::SubtitleError;
use crate::common;

#[test]
fn test_fromFile_shouldReadAllCues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = common::create_clean_subtitle(temp_dir.path(), "clean.srt")?;

    let track = CueTrack::from_file(&path)?;

    assert_eq!(track.cues.len(), 3);
    assert_eq!(track.malformed_blocks, 0);
    assert_eq!(track.cues[0], Cue::new(1, 1000, 4000, "This is a test caption.").with_source_line(1));
    assert_eq!(track.cues[2].end_ms, 14000);
    Ok(())
}

#[test]
fn test_parseSrtString_withBomAndCrlf_shouldParse() {
    let content = "\u{feff}1\r\n00:00:01,000 --> 00:00:02,500\r\nFirst line\r\nSecond line\r\n\r\n2\r\n00:00:03.000 --> 00:00:04.000\r\nNext\r\n";
    let parsed = CueTrack::parse_srt_string(content);

    assert_eq!(parsed.cues.len(), 2);
    assert_eq!(parsed.cues[0].text, "First line\nSecond line");
    assert_eq!(parsed.cues[1].start_ms, 3000);
}

#[test]
fn test_parseSrtString_withOutOfOrderCues_shouldSortByStart() {
    let content = "1\n00:00:05,000 --> 00:00:06,000\nLater\n\n2\n00:00:01,000 --> 00:00:02,000\nEarlier\n";
    let parsed = CueTrack::parse_srt_string(content);

    let texts: Vec<&str> = parsed.cues.iter().map(|c| c.text.as_str()).collect();
    assert_eq!(texts, vec!["Earlier", "Later"]);
}

#[test]
fn test_parseSrtString_withInvertedRange_shouldCountMalformed() {
    let content = "1\n00:00:05,000 --> 00:00:04,000\nBackwards\n\n2\n00:00:06,000 --> 00:00:07,000\nFine\n";
    let parsed = CueTrack::parse_srt_string(content);

    assert_eq!(parsed.cues.len(), 1);
    assert_eq!(parsed.malformed_blocks, 1);
}

#[test]
fn test_parseTimestamp_withGarbage_shouldReturnInvalidTimestamp() {
    assert_eq!(
        Cue::parse_timestamp("not a time"),
        Err(SubtitleError::InvalidTimestamp("not a time".to_string()))
    );
}

#[test]
fn test_writeToSrt_thenFromFile_shouldPreserveCues() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let path = temp_dir.path().join("written.srt");
    let cues = vec![
        Cue::new(1, 0, 1500, "One\nTwo"),
        Cue::new(2, 3_723_004, 3_725_000, "Later"),
    ];

    CueTrack::new(path.clone(), cues.clone()).write_to_srt(&path)?;
    let content = std::fs::read_to_string(&path)?;
    assert!(content.contains("01:02:03,004 --> 01:02:05,000"));

    let track = CueTrack::from_file(&path)?;
    let expected: Vec<Cue> = cues
        .into_iter()
        .zip([1, 6])
        .map(|(cue, line)| cue.with_source_line(line))
        .collect();
    assert_eq!(track.cues, expected);
    Ok(())
}
