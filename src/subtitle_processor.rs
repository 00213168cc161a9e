use std::fmt;
use std::path::{Path, PathBuf};
use regex::Regex;
use once_cell::sync::Lazy;
use anyhow::{Result, Context};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::errors::SubtitleError;
use crate::file_utils::FileManager;

// @module: SRT cue model, reader and writer

// @const: SRT timestamp line, comma or period before the milliseconds
static TIMESTAMP_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(\d{2,}:\d{2}:\d{2}[,.]\d{3})\s*-->\s*(\d{2,}:\d{2}:\d{2}[,.]\d{3})").unwrap()
});

// @const: One or more blank lines between blocks
static BLOCK_SEPARATOR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\n(?:[ \t]*\n)+").unwrap()
});

/// Texts the reader treats as transcription leftovers rather than captions
const ARTIFACT_TEXTS: [&str; 5] = [".", "-", "?", "!", ","];

// @struct: Single timed caption
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cue {
    // @field: 1-based position, 0 while pending renumbering
    pub index: usize,

    // @field: Start time in ms
    pub start_ms: u64,

    // @field: End time in ms
    pub end_ms: u64,

    // @field: Caption text, lines separated by '\n'
    pub text: String,

    // @field: File line the cue's block starts on, when read from a file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_line: Option<usize>,
}

impl Cue {
    /// Creates a cue without checking its time range
    pub fn new(index: usize, start_ms: u64, end_ms: u64, text: impl Into<String>) -> Self {
        Cue {
            index,
            start_ms,
            end_ms,
            text: text.into(),
            source_line: None,
        }
    }

    // @creates: Cue whose end lies strictly after its start
    pub fn new_validated(index: usize, start_ms: u64, end_ms: u64, text: impl Into<String>) -> Result<Self, SubtitleError> {
        if end_ms <= start_ms {
            return Err(SubtitleError::InvalidTimeRange { start_ms, end_ms });
        }
        Ok(Self::new(index, start_ms, end_ms, text))
    }

    /// Display time in milliseconds
    pub fn duration_ms(&self) -> u64 {
        self.end_ms.saturating_sub(self.start_ms)
    }

    /// Display time in seconds
    pub fn duration_secs(&self) -> f64 {
        self.duration_ms() as f64 / 1000.0
    }

    /// Number of characters, not counting line breaks
    pub fn char_count(&self) -> usize {
        self.text.chars().filter(|c| *c != '\n').count()
    }

    /// Text split on line breaks
    pub fn lines(&self) -> Vec<&str> {
        self.text.split('\n').collect()
    }

    pub fn line_count(&self) -> usize {
        self.text.split('\n').count()
    }

    /// Reading speed in characters per second; infinite for empty spans
    pub fn chars_per_second(&self) -> f64 {
        let secs = self.duration_secs();
        if secs <= 0.0 {
            return f64::INFINITY;
        }
        self.char_count() as f64 / secs
    }

    /// Same timing, new text
    pub fn with_text(self, text: impl Into<String>) -> Self {
        Cue { text: text.into(), ..self }
    }

    /// Same text, new timing
    pub fn with_timing(self, start_ms: u64, end_ms: u64) -> Self {
        Cue { start_ms, end_ms, ..self }
    }

    /// Same cue at a new position
    pub fn with_index(self, index: usize) -> Self {
        Cue { index, ..self }
    }

    /// Same cue, tagged with the file line it was read from
    pub fn with_source_line(self, line: usize) -> Self {
        Cue { source_line: Some(line), ..self }
    }

    /// Parse an SRT timestamp (`HH:MM:SS,mmm` or `HH:MM:SS.mmm`) to milliseconds
    pub fn parse_timestamp(timestamp: &str) -> Result<u64, SubtitleError> {
        let parts: Vec<&str> = timestamp.trim().split(&[':', ',', '.'][..]).collect();

        if parts.len() != 4 {
            return Err(SubtitleError::InvalidTimestamp(timestamp.to_string()));
        }

        let parse = |part: &str| -> Result<u64, SubtitleError> {
            part.parse::<u64>()
                .map_err(|_| SubtitleError::InvalidTimestamp(timestamp.to_string()))
        };

        let hours = parse(parts[0])?;
        let minutes = parse(parts[1])?;
        let seconds = parse(parts[2])?;
        let millis = parse(parts[3])?;

        if minutes >= 60 || seconds >= 60 || millis >= 1000 {
            return Err(SubtitleError::InvalidTimeComponents(timestamp.to_string()));
        }

        Ok(hours * 3_600_000 + minutes * 60_000 + seconds * 1_000 + millis)
    }

    /// Format a timestamp in milliseconds to SRT format (HH:MM:SS,mmm)
    pub fn format_timestamp(ms: u64) -> String {
        let hours = ms / 3_600_000;
        let minutes = (ms % 3_600_000) / 60_000;
        let seconds = (ms % 60_000) / 1_000;
        let millis = ms % 1_000;

        format!("{:02}:{:02}:{:02},{:03}", hours, minutes, seconds, millis)
    }

    pub fn format_start_time(&self) -> String {
        Self::format_timestamp(self.start_ms)
    }

    pub fn format_end_time(&self) -> String {
        Self::format_timestamp(self.end_ms)
    }
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "{}", self.index)?;
        writeln!(f, "{} --> {}", self.format_start_time(), self.format_end_time())?;
        writeln!(f, "{}", self.text)?;
        writeln!(f)
    }
}

/// Result of reading SRT content
#[derive(Debug, Clone, Default)]
pub struct SrtParse {
    /// Cues in start-time order
    pub cues: Vec<Cue>,

    /// Blocks skipped because their index, timestamp or shape was unusable
    pub malformed_blocks: usize,

    /// Single-character transcription leftovers that were dropped
    pub artifacts_removed: usize,
}

/// A caption track loaded from, or destined for, an SRT file
#[derive(Debug)]
pub struct CueTrack {
    /// Source filename
    pub source_file: PathBuf,

    /// Cues in display order
    pub cues: Vec<Cue>,

    /// Blocks the reader had to skip
    pub malformed_blocks: usize,

    /// Artifacts the reader dropped
    pub artifacts_removed: usize,
}

impl CueTrack {
    /// Create a track from already-built cues
    pub fn new(source_file: PathBuf, cues: Vec<Cue>) -> Self {
        CueTrack {
            source_file,
            cues,
            malformed_blocks: 0,
            artifacts_removed: 0,
        }
    }

    /// Read and parse an SRT file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = FileManager::read_to_string(path)?;
        let parsed = Self::parse_srt_string(&content);

        if parsed.cues.is_empty() {
            warn!("No valid subtitle entries found in {}", path.display());
        }

        Ok(CueTrack {
            source_file: path.to_path_buf(),
            cues: parsed.cues,
            malformed_blocks: parsed.malformed_blocks,
            artifacts_removed: parsed.artifacts_removed,
        })
    }

    /// Parse SRT content. Malformed blocks are skipped, never reported as errors.
    pub fn parse_srt_string(content: &str) -> SrtParse {
        let normalized = content
            .trim_start_matches('\u{feff}')
            .replace("\r\n", "\n")
            .replace('\r', "\n");

        let mut parsed = SrtParse::default();
        if normalized.trim().is_empty() {
            return parsed;
        }

        for (line_number, block) in Self::blocks_with_lines(&normalized) {
            let lines: Vec<&str> = block.trim().split('\n').collect();
            if lines.len() < 3 {
                debug!("Skipping block with {} line(s)", lines.len());
                parsed.malformed_blocks += 1;
                continue;
            }

            let index = match lines[0].trim().parse::<usize>() {
                Ok(index) => index,
                Err(_) => {
                    debug!("Skipping block with unparsable index: {:?}", lines[0]);
                    parsed.malformed_blocks += 1;
                    continue;
                }
            };

            let Some((start_ms, end_ms)) = Self::parse_timestamp_line(lines[1]) else {
                debug!("Skipping block {} with unparsable timestamp: {:?}", index, lines[1]);
                parsed.malformed_blocks += 1;
                continue;
            };

            let text = lines[2..]
                .iter()
                .map(|line| line.trim_end())
                .collect::<Vec<_>>()
                .join("\n");

            if Self::is_single_char_artifact(&text) {
                debug!("Dropping artifact cue {}: {:?}", index, text);
                parsed.artifacts_removed += 1;
                continue;
            }

            match Cue::new_validated(index, start_ms, end_ms, text) {
                Ok(cue) => parsed.cues.push(cue.with_source_line(line_number)),
                Err(e) => {
                    debug!("Skipping block {}: {}", index, e);
                    parsed.malformed_blocks += 1;
                }
            }
        }

        // Stable, so equal start times keep file order
        parsed.cues.sort_by_key(|cue| cue.start_ms);

        parsed
    }

    /// Split normalized content into blocks, each with the 1-based line it starts on
    fn blocks_with_lines(normalized: &str) -> Vec<(usize, &str)> {
        let body = normalized.trim();
        let leading = normalized.len() - normalized.trim_start().len();
        let mut line = 1 + normalized[..leading].matches('\n').count();

        let mut blocks = Vec::new();
        let mut start = 0;
        for separator in BLOCK_SEPARATOR_REGEX.find_iter(body) {
            blocks.push((line, &body[start..separator.start()]));
            line += body[start..separator.end()].matches('\n').count();
            start = separator.end();
        }
        blocks.push((line, &body[start..]));
        blocks
    }

    /// Parse `start --> end` into milliseconds
    fn parse_timestamp_line(line: &str) -> Option<(u64, u64)> {
        let caps = TIMESTAMP_REGEX.captures(line.trim())?;
        let start = Cue::parse_timestamp(caps.get(1)?.as_str()).ok()?;
        let end = Cue::parse_timestamp(caps.get(2)?.as_str()).ok()?;
        Some((start, end))
    }

    /// Whether a cue's whole text is a lone punctuation mark
    pub fn is_single_char_artifact(text: &str) -> bool {
        ARTIFACT_TEXTS.contains(&text.trim())
    }

    /// Render cues as SRT text
    pub fn to_srt_string(cues: &[Cue]) -> String {
        cues.iter().map(|cue| cue.to_string()).collect()
    }

    /// Write the track to an SRT file
    pub fn write_to_srt<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        FileManager::write_to_file(path, &Self::to_srt_string(&self.cues))
            .with_context(|| format!("Failed to write subtitle file: {}", path.display()))
    }
}

impl fmt::Display for CueTrack {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Cue Track")?;
        writeln!(f, "Source: {:?}", self.source_file)?;
        writeln!(f, "Cues: {}", self.cues.len())?;
        Ok(())
    }
}
