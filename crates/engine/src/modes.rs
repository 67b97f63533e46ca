//! Engine presets per game mode.

use blockfall_core::EngineConfig;
use blockfall_records::{GameMode, ScoreRecord};

use crate::replay::{Outcome, Summary};

/// Total lines that finish a Rush session.
pub const RUSH_LINE_GOAL: u32 = 40;

/// Lines per level-up in the progressing modes.
pub const LINES_PER_LEVEL: u32 = 10;

pub fn config_for_mode(mode: GameMode, seed: u32) -> EngineConfig {
    let base = EngineConfig::with_seed(seed);
    match mode {
        GameMode::Rush => EngineConfig {
            lines_per_level: None,
            line_goal: Some(RUSH_LINE_GOAL),
            ..base
        },
        GameMode::Ascent | GameMode::Infinity => EngineConfig {
            lines_per_level: Some(LINES_PER_LEVEL),
            line_goal: None,
            ..base
        },
    }
}

/// Build the record a finished session submits for `mode`.
///
/// Rush only produces a record once the line goal was reached; a topped-out
/// Rush run has no time to rank.
pub fn record_for(mode: GameMode, summary: &Summary, achieved_at: u64) -> Option<ScoreRecord> {
    if mode.is_timed() {
        return (summary.outcome == Outcome::Finished)
            .then(|| ScoreRecord::timed(summary.elapsed_ms, summary.lines, achieved_at));
    }
    Some(ScoreRecord::scored(
        summary.score,
        summary.elapsed_ms,
        summary.lines,
        achieved_at,
    ))
}
