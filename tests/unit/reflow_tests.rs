/*!
 * Tests for the reflow engine through its public API
 */

use subreflow::app_config::ReflowConfig;
use subreflow::reflow::{
    reflow, BlockSplitter, DurationExtender, HeuristicTables, LayoutKind, LineBalancer, ProsodyEstimator,
    ReflowEngine, SyllableDictionary,
};
use subreflow::subtitle_processor::Cue;
use crate::common::{LONG_SENTENCE, NINETY_CHARS};

fn balancer() -> LineBalancer {
    LineBalancer::new(&ReflowConfig::default(), &HeuristicTables::default())
}

fn splitter() -> BlockSplitter {
    let tables = HeuristicTables::default();
    BlockSplitter::new(&ReflowConfig::default(), &tables, ProsodyEstimator::new(&tables, None))
}

#[test]
fn test_balance_withLongSentence_shouldKeepTextApartFromBreak() {
    let layout = balancer().balance(LONG_SENTENCE);

    assert_eq!(layout.lines.len(), 2);
    assert!(layout.lines.iter().all(|l| l.chars().count() <= 42));
    assert_eq!(layout.lines.join(" "), LONG_SENTENCE);
    assert_eq!(layout.kind, LayoutKind::Balanced);
}

#[test]
fn test_balance_overVariedInputs_shouldRespectCapUnlessFlagged() {
    let inputs = [
        "Hello there.",
        "I told you already, we are not going back there tonight.",
        "Well, if you really think so then maybe we should ask somebody who actually knows the way",
        "Supercalifragilisticexpialidocious-and-then-some-more-text",
        "- Where are you going?\n- Out, I need some air and some time to think it through.",
    ];

    for text in inputs {
        let layout = balancer().balance(text);
        if layout.kind.fits_cap() {
            assert!(layout.longest_line() <= 42, "{:?} -> {:?}", text, layout.lines);
        } else {
            assert!(layout.kind.is_last_resort() || layout.needs_block_split());
        }
        let original_words: Vec<&str> = text.split_whitespace().collect();
        let layout_text = layout.text();
        let new_words: Vec<&str> = layout_text.split_whitespace().collect();
        if layout.kind != LayoutKind::HardBreak {
            assert_eq!(new_words, original_words, "words lost for {:?}", text);
        }
    }
}

#[test]
fn test_split_ninetyCharsOverNineSeconds_shouldProduceTwoContiguousCues() {
    let cue = Cue::new(7, 4000, 13000, NINETY_CHARS);
    let blocks = splitter().split(cue);

    assert_eq!(blocks.len(), 2);
    assert_eq!(blocks[0].start_ms, 4000);
    assert_eq!(blocks[0].end_ms, blocks[1].start_ms);
    assert_eq!(blocks[1].end_ms, 13000);
    assert!(blocks.iter().all(|b| b.index == 0));
}

#[test]
fn test_allocateDurations_shouldConserveWithinRounding() {
    let splitter = splitter();
    let blocks = splitter.partition(NINETY_CHARS, 2);
    let durations = splitter.allocate_durations(&blocks, 9000);

    let sum: u64 = durations.iter().sum();
    assert!(sum <= 9000 && 9000 - sum <= durations.len() as u64);
}

#[test]
fn test_split_withDictionary_shouldStillEndAtOriginalEnd() {
    let tables = HeuristicTables::default();
    let dictionary = SyllableDictionary::from_entries([("bridge", "bridge"), ("finally", "fi-nal-ly")]);
    let splitter = BlockSplitter::new(
        &ReflowConfig::default(),
        &tables,
        ProsodyEstimator::new(&tables, Some(dictionary)),
    );

    let blocks = splitter.split(Cue::new(1, 0, 20_000, NINETY_CHARS));
    assert!(blocks.len() >= 3);
    assert_eq!(blocks.last().map(|b| b.end_ms), Some(20_000));
    assert!(blocks.windows(2).all(|w| w[0].end_ms == w[1].start_ms));
}

#[test]
fn test_extend_scenarios_shouldMatchBroadcastMinimum() {
    let extender = DurationExtender::new(&ReflowConfig::default());

    let free = extender.extend(Cue::new(1, 0, 500, "Hi"), Some(&Cue::new(2, 2000, 3000, "x")));
    assert_eq!(free.end_ms, 833);

    let next = Cue::new(2, 600, 3000, "x");
    let clamped = extender.extend(Cue::new(1, 0, 500, "Hi"), Some(&next));
    assert_eq!(clamped.end_ms, 550);
    assert!(clamped.end_ms <= next.start_ms - 50);
}

#[test]
fn test_reflow_secondPass_shouldNotChangeTextOrTiming() {
    let cues = vec![
        Cue::new(1, 0, 3000, LONG_SENTENCE),
        Cue::new(2, 4000, 13000, NINETY_CHARS),
        Cue::new(3, 14000, 14300, "Okay."),
    ];
    let config = ReflowConfig::default();

    let first = reflow(cues, &config);
    let second = reflow(first.cues.clone(), &config);

    assert_eq!(second.cues, first.cues);
    assert_eq!(second.stats.lines_rebalanced, 0);
    assert_eq!(second.stats.cues_split, 0);
    assert_eq!(second.stats.durations_extended, 0);
}

#[test]
fn test_reflowEngine_withNarrowCaps_shouldUseConfiguredLimits() {
    let config = ReflowConfig {
        max_chars_per_line: 32,
        max_chars_per_block: 64,
        ..Default::default()
    };
    let engine = ReflowEngine::new(&config, &HeuristicTables::default(), None);

    let outcome = engine.reflow(vec![Cue::new(1, 0, 6000, LONG_SENTENCE)]);

    assert_eq!(outcome.stats.cues_split, 1);
    for cue in &outcome.cues {
        assert!(cue.lines().iter().all(|l| l.chars().count() <= 32), "{:?}", cue.text);
    }
    assert_eq!(outcome.cues.last().map(|c| c.end_ms), Some(6000));
}
