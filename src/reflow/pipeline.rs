/*!
 * Reflow pipeline: split, balance, extend, renumber, check overlaps.
 *
 * Each phase takes the previous phase's cues by value and returns a new
 * sequence. Overlaps left after extension are reported, never corrected.
 */

use anyhow::Result;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::app_config::{Config, ReflowConfig};
use crate::subtitle_processor::Cue;
use super::block_splitter::BlockSplitter;
use super::duration::DurationExtender;
use super::heuristics::HeuristicTables;
use super::line_balancer::LineBalancer;
use super::prosody::{ProsodyEstimator, SyllableDictionary};
use super::text::{fix_ellipsis_spacing, normalize_whitespace};

/// Counters collected over one reflow run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflowStats {
    pub original_count: usize,
    pub final_count: usize,
    /// Input cues that became more than one cue
    pub cues_split: usize,
    /// Cues whose text changed during line balancing
    pub lines_rebalanced: usize,
    pub durations_extended: usize,
    pub overlaps_found: usize,
    /// Final indices of each overlapping adjacent pair
    pub overlaps: Vec<(usize, usize)>,
    /// Cues that still need more than two lines
    pub needs_block_split: usize,
    /// Cues laid out by hyphenating or leaving an oversized word
    pub hard_breaks: usize,
}

impl ReflowStats {
    /// Whether the run changed anything
    pub fn has_changes(&self) -> bool {
        self.cues_split > 0 || self.lines_rebalanced > 0 || self.durations_extended > 0
    }

    /// Add another run's counters to this one
    pub fn merge(&mut self, other: &ReflowStats) {
        self.original_count += other.original_count;
        self.final_count += other.final_count;
        self.cues_split += other.cues_split;
        self.lines_rebalanced += other.lines_rebalanced;
        self.durations_extended += other.durations_extended;
        self.overlaps_found += other.overlaps_found;
        self.overlaps.extend(other.overlaps.iter().copied());
        self.needs_block_split += other.needs_block_split;
        self.hard_breaks += other.hard_breaks;
    }
}

/// Reflowed cues plus the run's counters
#[derive(Debug, Clone, PartialEq)]
pub struct ReflowOutcome {
    pub cues: Vec<Cue>,
    pub stats: ReflowStats,
}

/// The assembled reflow stages
#[derive(Debug, Clone)]
pub struct ReflowEngine {
    splitter: BlockSplitter,
    balancer: LineBalancer,
    extender: DurationExtender,
}

impl Default for ReflowEngine {
    fn default() -> Self {
        Self::new(&ReflowConfig::default(), &HeuristicTables::default(), None)
    }
}

impl ReflowEngine {
    pub fn new(config: &ReflowConfig, tables: &HeuristicTables, dictionary: Option<SyllableDictionary>) -> Self {
        let prosody = ProsodyEstimator::new(tables, dictionary);
        Self {
            splitter: BlockSplitter::new(config, tables, prosody),
            balancer: LineBalancer::new(config, tables),
            extender: DurationExtender::new(config),
        }
    }

    /// Build the engine from the application config, loading its dictionary
    pub fn from_config(config: &Config) -> Result<Self> {
        let dictionary = config.load_syllable_dictionary()?;
        Ok(Self::new(&config.reflow, &config.heuristics, dictionary))
    }

    /// Run every phase over a start-ordered cue sequence
    pub fn reflow(&self, cues: Vec<Cue>) -> ReflowOutcome {
        let mut stats = ReflowStats {
            original_count: cues.len(),
            ..Default::default()
        };

        let cues = self.split_phase(cues, &mut stats);
        let cues = self.balance_phase(cues, &mut stats);

        let (cues, extended) = self.extender.extend_all(cues);
        stats.durations_extended = extended;

        let cues = renumber(cues);
        stats.final_count = cues.len();

        stats.overlaps = detect_overlaps(&cues);
        stats.overlaps_found = stats.overlaps.len();
        for (first, second) in &stats.overlaps {
            warn!("Cue {} overlaps cue {}", first, second);
        }

        info!(
            "Reflowed {} cues into {}: {} split, {} rebalanced, {} extended, {} overlaps",
            stats.original_count,
            stats.final_count,
            stats.cues_split,
            stats.lines_rebalanced,
            stats.durations_extended,
            stats.overlaps_found
        );

        ReflowOutcome { cues, stats }
    }

    fn split_phase(&self, cues: Vec<Cue>, stats: &mut ReflowStats) -> Vec<Cue> {
        let mut result = Vec::with_capacity(cues.len());

        for cue in cues {
            let blocks = self.splitter.split(cue);
            if blocks.len() > 1 {
                stats.cues_split += 1;
            }
            result.extend(blocks);
        }

        result
    }

    fn balance_phase(&self, cues: Vec<Cue>, stats: &mut ReflowStats) -> Vec<Cue> {
        cues.into_iter()
            .enumerate()
            .map(|(position, cue)| {
                let cleaned = fix_ellipsis_spacing(&normalize_whitespace(&cue.text));
                let layout = self.balancer.balance(&cleaned);

                if layout.needs_block_split() {
                    stats.needs_block_split += 1;
                    warn!(
                        "Cue {} needs {} lines and should be split further",
                        position + 1,
                        layout.lines.len()
                    );
                }
                if layout.kind.is_last_resort() {
                    stats.hard_breaks += 1;
                    warn!("Cue {} contains a word longer than a line ({:?})", position + 1, layout.kind);
                }

                let text = layout.text();
                if text == cue.text {
                    return cue;
                }

                debug!("Rebalanced cue {}: {:?} -> {:?}", position + 1, cue.text, text);
                stats.lines_rebalanced += 1;
                cue.with_text(text)
            })
            .collect()
    }
}

/// Reflow with the default heuristic tables and no syllable dictionary
pub fn reflow(cues: Vec<Cue>, config: &ReflowConfig) -> ReflowOutcome {
    ReflowEngine::new(config, &HeuristicTables::default(), None).reflow(cues)
}

/// Assign indices 1..N in sequence order
pub fn renumber(cues: Vec<Cue>) -> Vec<Cue> {
    cues.into_iter()
        .enumerate()
        .map(|(i, cue)| cue.with_index(i + 1))
        .collect()
}

/// Index pairs of adjacent cues where the first ends after the next starts
pub fn detect_overlaps(cues: &[Cue]) -> Vec<(usize, usize)> {
    cues.windows(2)
        .filter(|pair| pair[0].end_ms > pair[1].start_ms)
        .map(|pair| (pair[0].index, pair[1].index))
        .collect()
}
