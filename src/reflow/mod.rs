/*!
 * Caption reflow engine.
 *
 * - `heuristics`: word lists and scoring weights
 * - `prosody`: syllable and pause estimates
 * - `line_balancer`: wraps one cue's text into lines within the cap
 * - `block_splitter`: cuts oversized cues and redistributes their time
 * - `duration`: stretches cues below the minimum display time
 * - `pipeline`: runs the stages in order and collects statistics
 */

pub mod block_splitter;
pub mod duration;
pub mod heuristics;
pub mod line_balancer;
pub mod pipeline;
pub mod prosody;
pub mod text;

pub use block_splitter::BlockSplitter;
pub use duration::DurationExtender;
pub use heuristics::{BoundaryWeights, ClauseKind, HeuristicTables, PauseMark};
pub use line_balancer::{Layout, LayoutKind, LineBalancer};
pub use pipeline::{detect_overlaps, reflow, renumber, ReflowEngine, ReflowOutcome, ReflowStats};
pub use prosody::{ProsodyEstimator, SyllableDictionary};
