// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use subreflow::app_config::{self, Config};
use subreflow::app_controller::{render_fix_report, Controller, FileFixResult, FixOptions};
use subreflow::validation::{ReportWriter, ValidationSummary};

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Reflow caption files: split long cues, balance lines, extend short cues
    Fix(FixArgs),

    /// Check caption files against the style rules and write a report
    Validate(ValidateArgs),

    /// Generate shell completions for subreflow
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct FixArgs {
    /// Input .srt file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Do not keep a .bak copy of each rewritten file
    #[arg(long)]
    no_backup: bool,

    /// Show what would change without writing
    #[arg(long)]
    dry_run: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct ValidateArgs {
    /// Directory to scan for .srt files
    #[arg(long, default_value = ".")]
    dir: PathBuf,

    /// Only validate files whose name starts with this prefix
    #[arg(long)]
    prefix: Option<String>,

    /// Report path without extension
    #[arg(long, default_value = "validation_report")]
    output: PathBuf,

    /// Use the children's reading speed limit
    #[arg(long)]
    children: bool,

    /// Also write a JSON report
    #[arg(long)]
    json: bool,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: PathBuf,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// subreflow - caption reflow and style validation
///
/// Splits oversized cues, balances their lines and stretches cues that are
/// shown too briefly, keeping every cue inside the broadcast caption limits.
#[derive(Parser, Debug)]
#[command(name = "subreflow")]
#[command(version)]
#[command(about = "Caption reflow and duration redistribution tool")]
#[command(long_about = "subreflow rewrites SRT caption files so every cue fits the line, block and duration limits.

EXAMPLES:
    subreflow fix movie.en.srt                  # Reflow one file, keeping movie.en.srt.bak
    subreflow fix --dry-run captions/           # Report what would change in a directory
    subreflow fix --no-backup -l debug ep1.srt  # Rewrite without backup, with debug logging
    subreflow validate --dir pairs --prefix en_ # Validate en_*.srt under pairs/
    subreflow validate --children --json        # Stricter reading speed, plus a JSON report
    subreflow completions bash > subreflow.bash # Generate bash completions

CONFIGURATION:
    Configuration is read from conf.json by default. Every setting has a default,
    so a missing file or a missing section is fine.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Commands,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: ANSI color and tag for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("\x1B[1;31m", "ERROR"),
            Level::Warn => ("\x1B[1;33m", "WARN "),
            Level::Info => ("\x1B[1;32m", "INFO "),
            Level::Debug => ("\x1B[1;36m", "DEBUG"),
            Level::Trace => ("\x1B[1;35m", "TRACE"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (color, tag) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, tag, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

fn main() -> Result<()> {
    // Installed at trace so the level can be lowered once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Commands::Completions { shell } => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "subreflow", &mut std::io::stdout());
            Ok(())
        }
        Commands::Fix(args) => run_fix(args),
        Commands::Validate(args) => run_validate(args),
    }
}

/// Load the config, apply the CLI log level over it and set the logger level
fn load_config(config_path: &Path, log_level: Option<CliLogLevel>) -> Result<Config> {
    let mut config = Config::load_or_default(config_path)?;
    if let Some(level) = log_level {
        config.log_level = level.into();
    }
    log::set_max_level(LevelFilter::from(&config.log_level));

    config.validate().context("Configuration validation failed")?;
    Ok(config)
}

fn run_fix(args: FixArgs) -> Result<()> {
    let config = load_config(&args.config_path, args.log_level)?;
    let controller = Controller::with_config(config)?;

    let options = FixOptions {
        no_backup: args.no_backup,
        dry_run: args.dry_run,
    };
    let results = controller.fix_path(&args.input_path, options)?;

    print_fix_results(&results, args.dry_run);
    Ok(())
}

fn print_fix_results(results: &[FileFixResult], dry_run: bool) {
    println!();
    print!("{}", render_fix_report(results, dry_run));

    for result in results {
        for (first, second) in &result.stats.overlaps {
            warn!("{}: cue {} overlaps cue {}", result.file_name(), first, second);
        }
    }
}

fn run_validate(args: ValidateArgs) -> Result<()> {
    let mut config = load_config(&args.config_path, args.log_level)?;
    if args.children {
        config.validation.children = true;
    }
    let controller = Controller::with_config(config)?;

    info!("Scanning for caption files in {}", args.dir.display());
    let reports = controller.validate_folder(&args.dir, args.prefix.as_deref())?;
    let summary = ValidationSummary::from_reports(&reports);

    let md_path = args.output.with_extension("md");
    ReportWriter::write_markdown(&md_path, &reports, &summary)?;
    if args.json {
        let json_path = args.output.with_extension("json");
        ReportWriter::write_json(&json_path, &reports, &summary)?;
    }

    print_validation_summary(&summary);
    Ok(())
}

fn print_validation_summary(summary: &ValidationSummary) {
    let pct = |part: usize, whole: usize| part as f64 / whole.max(1) as f64 * 100.0;

    println!();
    println!("Files analyzed:        {}", summary.total_files);
    println!("Total cues:            {}", summary.total_cues);
    println!(
        "Files with issues:     {} ({:.1}%)",
        summary.files_with_violations,
        pct(summary.files_with_violations, summary.total_files)
    );
    println!("Clean files:           {}", summary.files_clean);
    println!("Total violations:      {}", summary.total_violations);
    println!("  - Errors:            {}", summary.total_errors);
    println!("  - Warnings:          {}", summary.total_warnings);
    println!(
        "Auto-fixable:          {} ({:.1}%)",
        summary.total_auto_fixable,
        pct(summary.total_auto_fixable, summary.total_violations)
    );
    println!("Manual review needed:  {}", summary.manual_count());

    if !summary.violations_by_rule.is_empty() {
        println!();
        for (code, data) in summary.rules_by_count() {
            println!(
                "  {:25} {:5} total  ({} auto, {} manual)",
                code,
                data.count,
                data.auto_fixable,
                data.manual()
            );
        }
    }
}
