use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};

use crate::app_config::Config;
use crate::errors::AppError;
use crate::file_utils::FileManager;
use crate::reflow::{ReflowEngine, ReflowStats};
use crate::subtitle_processor::CueTrack;
use crate::validation::{FileReport, ValidationService};

// @module: Application controller for caption reflow and validation

/// Switches for a fix run
#[derive(Debug, Clone, Copy, Default)]
pub struct FixOptions {
    // @field: Skip the `.bak` copy of the original
    pub no_backup: bool,
    // @field: Compute changes without writing anything
    pub dry_run: bool,
}

/// Outcome of reflowing one file
#[derive(Debug, Clone)]
pub struct FileFixResult {
    pub path: PathBuf,
    pub stats: ReflowStats,
    /// Lone punctuation cues dropped while reading
    pub artifacts_removed: usize,
    /// Blocks the reader could not use
    pub malformed_blocks: usize,
    /// Whether the file on disk was rewritten
    pub written: bool,
}

impl FileFixResult {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|f| f.to_string_lossy().to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Whether the reflow or the reader changed the file's content
    pub fn has_changes(&self) -> bool {
        self.stats.has_changes() || self.artifacts_removed > 0 || self.malformed_blocks > 0
    }
}

/// Totals over every file of a fix run
#[derive(Debug, Clone, Default)]
pub struct FixSummary {
    pub files: usize,
    pub files_changed: usize,
    pub files_written: usize,
    pub artifacts_removed: usize,
    pub malformed_blocks: usize,
    // @field: Reflow counters merged across files
    pub stats: ReflowStats,
}

impl FixSummary {
    pub fn from_results(results: &[FileFixResult]) -> Self {
        let mut summary = Self {
            files: results.len(),
            ..Default::default()
        };

        for result in results {
            summary.stats.merge(&result.stats);
            summary.artifacts_removed += result.artifacts_removed;
            summary.malformed_blocks += result.malformed_blocks;
            if result.has_changes() {
                summary.files_changed += 1;
            }
            if result.written {
                summary.files_written += 1;
            }
        }

        summary
    }
}

const NAME_WIDTH: usize = 36;

/// Render the per-file results table, its totals row and the results block
pub fn render_fix_report(results: &[FileFixResult], dry_run: bool) -> String {
    let summary = FixSummary::from_results(results);
    let row = |name: &str, stats: &ReflowStats, artifacts: usize, malformed: usize| {
        format!(
            "{:<w$} {:>6} {:>6} {:>6} {:>6} {:>6} {:>6} {:>6} {:>6}\n",
            name,
            stats.original_count,
            stats.final_count,
            stats.cues_split,
            stats.lines_rebalanced,
            stats.durations_extended,
            artifacts,
            malformed,
            stats.overlaps_found,
            w = NAME_WIDTH
        )
    };

    let mut report = String::new();
    report.push_str(&format!(
        "{:<w$} {:>6} {:>6} {:>6} {:>6} {:>6} {:>6} {:>6} {:>6}\n",
        "File", "Before", "After", "Split", "Lines", "Ext", "Artif", "Malf", "Overlp",
        w = NAME_WIDTH
    ));
    let rule = "-".repeat(NAME_WIDTH + 7 * 8);
    report.push_str(&format!("{}\n", rule));

    for result in results {
        let mut name = result.file_name();
        if name.chars().count() > NAME_WIDTH {
            name = format!("{}...", name.chars().take(NAME_WIDTH - 3).collect::<String>());
        }
        report.push_str(&row(&name, &result.stats, result.artifacts_removed, result.malformed_blocks));
    }

    report.push_str(&format!("{}\n", rule));
    report.push_str(&row("TOTAL", &summary.stats, summary.artifacts_removed, summary.malformed_blocks));

    let banner = "=".repeat(50);
    report.push_str(&format!("\n{}\nRESULTS\n{}\n", banner, banner));
    for (label, value) in [
        ("Files processed:", summary.files),
        ("Original cues:", summary.stats.original_count),
        ("Final cues:", summary.stats.final_count),
        ("Artifacts removed:", summary.artifacts_removed),
        ("Malformed blocks:", summary.malformed_blocks),
        ("Cues split:", summary.stats.cues_split),
        ("Lines rebalanced:", summary.stats.lines_rebalanced),
        ("Durations extended:", summary.stats.durations_extended),
        ("Overlaps found:", summary.stats.overlaps_found),
    ] {
        report.push_str(&format!("{:<23}{}\n", label, value));
    }
    report.push_str(&format!("{}\n", banner));

    if dry_run {
        report.push_str(&format!(
            "Dry run: {} of {} files would change\n",
            summary.files_changed, summary.files
        ));
    } else {
        report.push_str(&format!(
            "{} of {} files changed, {} rewritten\n",
            summary.files_changed, summary.files, summary.files_written
        ));
    }

    report
}

/// Main application controller
pub struct Controller {
    // @field: App configuration
    config: Config,
    engine: ReflowEngine,
    validator: ValidationService,
}

impl Controller {
    /// Create a controller with default configuration
    pub fn new_for_test() -> Result<Self> {
        Self::with_config(Config::default())
    }

    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().map_err(AppError::from)?;
        let engine = ReflowEngine::from_config(&config)?;
        let validator = ValidationService::with_config(&config);

        Ok(Self {
            config,
            engine,
            validator,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Reflow one SRT file in place
    pub fn fix_file<P: AsRef<Path>>(&self, path: P, options: FixOptions) -> Result<FileFixResult> {
        let path = path.as_ref();
        if !FileManager::file_exists(path) {
            return Err(AppError::File(format!("Input file does not exist: {:?}", path)).into());
        }

        let track = CueTrack::from_file(path)
            .with_context(|| format!("Failed to read subtitle file: {:?}", path))?;
        if track.malformed_blocks > 0 {
            warn!("{}: skipped {} malformed blocks", path.display(), track.malformed_blocks);
        }
        if track.artifacts_removed > 0 {
            debug!("{}: dropped {} artifact cues", path.display(), track.artifacts_removed);
        }

        let CueTrack {
            source_file,
            cues,
            malformed_blocks,
            artifacts_removed,
        } = track;

        let outcome = self.engine.reflow(cues);
        let output = CueTrack::new(source_file, outcome.cues);
        let mut result = FileFixResult {
            path: path.to_path_buf(),
            stats: outcome.stats,
            artifacts_removed,
            malformed_blocks,
            written: false,
        };

        if options.dry_run {
            info!("Dry run, not writing {}", path.display());
        } else if result.has_changes() {
            if !options.no_backup {
                let backup = FileManager::create_backup(path)?;
                debug!("Backup written to {}", backup.display());
            }
            output.write_to_srt(path)?;
            result.written = true;
            info!("Success: {}", path.display());
        } else {
            debug!("No changes needed for {}", path.display());
        }

        Ok(result)
    }

    /// Reflow every `.srt` file under a directory.
    /// A file that fails is logged and left out of the results.
    pub fn fix_folder<P: AsRef<Path>>(&self, dir: P, options: FixOptions) -> Result<Vec<FileFixResult>> {
        let dir = dir.as_ref();
        if !FileManager::dir_exists(dir) {
            return Err(AppError::File(format!("Input directory does not exist: {:?}", dir)).into());
        }

        let files = FileManager::find_files(dir, "srt", None)?;
        if files.is_empty() {
            warn!("No .srt files found in {}", dir.display());
            return Ok(Vec::new());
        }

        let progress_bar = Self::progress_bar(files.len() as u64, "files");
        let mut results = Vec::with_capacity(files.len());
        let mut error_count = 0;

        for file in &files {
            let file_name = file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            progress_bar.set_message(format!("Processing: {}", file_name));

            match self.fix_file(file, options) {
                Ok(result) => results.push(result),
                Err(e) => {
                    error!("Error processing file {}: {}", file_name, e);
                    error_count += 1;
                }
            }

            progress_bar.inc(1);
        }

        progress_bar.finish_with_message("Folder processing complete");
        info!(
            "Folder processing completed: {} processed, {} errors",
            results.len(),
            error_count
        );

        Ok(results)
    }

    /// Reflow a file, or every `.srt` file in a directory
    pub fn fix_path<P: AsRef<Path>>(&self, input: P, options: FixOptions) -> Result<Vec<FileFixResult>> {
        let input = input.as_ref();
        if FileManager::dir_exists(input) {
            self.fix_folder(input, options)
        } else {
            Ok(vec![self.fix_file(input, options)?])
        }
    }

    /// Validate every `.srt` file under a directory whose name starts with `prefix`
    pub fn validate_folder<P: AsRef<Path>>(&self, dir: P, prefix: Option<&str>) -> Result<Vec<FileReport>> {
        let dir = dir.as_ref();
        if !FileManager::dir_exists(dir) {
            return Err(AppError::File(format!("Directory does not exist: {:?}", dir)).into());
        }

        let files = FileManager::find_files(dir, "srt", prefix)?;
        info!("Found {} files in {}", files.len(), dir.display());

        let progress_bar = Self::progress_bar(files.len() as u64, "files");
        progress_bar.set_message("Validating");

        let mut reports = Vec::with_capacity(files.len());
        for file in &files {
            match self.validator.validate_file(file) {
                Ok(report) => reports.push(report),
                Err(e) => warn!("Skipping {}: {}", file.display(), e),
            }
            progress_bar.inc(1);
        }

        progress_bar.finish_with_message("Validation complete");
        Ok(reports)
    }

    fn progress_bar(len: u64, unit: &str) -> ProgressBar {
        let progress_bar = ProgressBar::new(len);
        let style = ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} {} ({{percent}}%) {{msg}}",
                unit
            ))
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(style.progress_chars("#>-"));
        progress_bar
    }
}
