/*!
 * Minimum-duration extension bounded by the next cue.
 */

use log::debug;

use crate::app_config::ReflowConfig;
use crate::subtitle_processor::Cue;

// @struct: Stretches cues shorter than the minimum display time
#[derive(Debug, Clone, Copy)]
pub struct DurationExtender {
    min_duration_ms: u64,
    min_gap_ms: u64,
}

impl DurationExtender {
    pub fn new(config: &ReflowConfig) -> Self {
        Self {
            min_duration_ms: config.min_duration_ms(),
            min_gap_ms: config.min_gap_ms(),
        }
    }

    /// Extend a short cue, never past `next.start - gap`.
    ///
    /// A cue whose clamped end would not move is returned unchanged.
    pub fn extend(&self, cue: Cue, next: Option<&Cue>) -> Cue {
        self.extend_before(cue, next.map(|n| n.start_ms))
    }

    fn extend_before(&self, cue: Cue, next_start: Option<u64>) -> Cue {
        let duration = cue.duration_ms();
        if duration >= self.min_duration_ms {
            return cue;
        }

        let mut new_end = cue.end_ms + (self.min_duration_ms - duration);

        if let Some(next_start) = next_start {
            let max_end = next_start.saturating_sub(self.min_gap_ms);
            if new_end > max_end {
                new_end = max_end;
                if new_end <= cue.end_ms {
                    return cue;
                }
            }
        }

        let (start, end) = (cue.start_ms, cue.end_ms);
        debug!("Extending cue {} from {} ms to {} ms", cue.index, end - start, new_end - start);
        cue.with_timing(start, new_end)
    }

    /// Extend every cue against its successor; returns the cues and how many changed
    pub fn extend_all(&self, cues: Vec<Cue>) -> (Vec<Cue>, usize) {
        // successors only ever have their end moved, so original starts stay valid bounds
        let next_starts: Vec<Option<u64>> = cues
            .iter()
            .skip(1)
            .map(|c| Some(c.start_ms))
            .chain(std::iter::once(None))
            .collect();

        let mut extended = 0;
        let result = cues
            .into_iter()
            .zip(next_starts)
            .map(|(cue, next_start)| {
                let original_end = cue.end_ms;
                let cue = self.extend_before(cue, next_start);
                if cue.end_ms != original_end {
                    extended += 1;
                }
                cue
            })
            .collect();

        (result, extended)
    }
}
