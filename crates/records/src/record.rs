use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::mode::GameMode;

/// One finished session as submitted for ranking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreRecord {
    pub time_ms: u64,
    pub lines_cleared: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u64>,
    /// Unix time in milliseconds.
    pub achieved_at: u64,
}

impl ScoreRecord {
    /// Record for a timed mode (no score).
    pub fn timed(time_ms: u64, lines_cleared: u32, achieved_at: u64) -> Self {
        Self {
            time_ms,
            lines_cleared,
            score: None,
            achieved_at,
        }
    }

    /// Record for a scored mode.
    pub fn scored(score: u64, time_ms: u64, lines_cleared: u32, achieved_at: u64) -> Self {
        Self {
            time_ms,
            lines_cleared,
            score: Some(score),
            achieved_at,
        }
    }
}

/// Ranking order for `mode`; `Less` means `a` ranks ahead of `b`.
///
/// Records that tie on every ranked field keep their relative order under a
/// stable sort; `achieved_at` settles remaining Rush ties the same way.
pub fn compare(mode: GameMode, a: &ScoreRecord, b: &ScoreRecord) -> Ordering {
    match mode {
        GameMode::Rush => a
            .time_ms
            .cmp(&b.time_ms)
            .then_with(|| b.lines_cleared.cmp(&a.lines_cleared))
            .then_with(|| a.achieved_at.cmp(&b.achieved_at)),
        GameMode::Ascent | GameMode::Infinity => b
            .score
            .unwrap_or(0)
            .cmp(&a.score.unwrap_or(0))
            .then_with(|| a.time_ms.cmp(&b.time_ms))
            .then_with(|| a.achieved_at.cmp(&b.achieved_at)),
    }
}

/// Sort `records` for `mode` and keep the best `n`.
pub fn rank_records(mode: GameMode, mut records: Vec<ScoreRecord>, n: usize) -> Vec<ScoreRecord> {
    records.sort_by(|a, b| compare(mode, a, b));
    records.truncate(n);
    records
}
