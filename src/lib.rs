/*!
 * # subreflow - caption reflow and style validation
 *
 * A Rust library that rewrites SRT caption tracks so every cue fits the
 * broadcast limits for line length, block size and display time.
 *
 * ## Features
 *
 * - Split oversized cues into timed blocks, weighting time by syllables and pauses
 * - Balance each cue's text over at most two lines at natural boundaries
 * - Extend cues shown too briefly without running into the next cue
 * - Report overlaps and unsplittable layouts instead of losing text
 * - Validate caption files against the house style with Markdown/JSON reports
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `subtitle_processor`: SRT reading and writing
 * - `reflow`: The reflow engine:
 *   - `reflow::line_balancer`: Two-line layout
 *   - `reflow::block_splitter`: Block partitioning and time allocation
 *   - `reflow::duration`: Minimum duration extension
 *   - `reflow::pipeline`: Stage orchestration and statistics
 * - `validation`: Style rules and reports
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod reflow;
pub mod subtitle_processor;
pub mod validation;

// Re-export main types for easier usage
pub use app_config::{Config, ReflowConfig};
pub use errors::{AppError, ConfigError, SubtitleError};
pub use reflow::{reflow, ReflowEngine, ReflowOutcome, ReflowStats};
pub use subtitle_processor::{Cue, CueTrack};
pub use validation::ValidationService;
