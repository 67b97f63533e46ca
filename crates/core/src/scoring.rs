//! Scoring module - guideline scoring with combos and back-to-back
//!
//! Scoring is a pure transition: `(ScoreState, clear) -> ClearOutcome`.
//! - Base points come from the line, T-spin or mini tables and are scaled by level.
//! - B2B applies a 3/2 multiplier (floored) to the scaled base points.
//! - Combo bonus is `50 * combo * level`, added after the multiplier.
//! - Drop points are never scaled by level.

use crate::types::{
    DropKind, PieceKind, SpinResult, B2B_DENOMINATOR, B2B_NUMERATOR, COMBO_BASE,
    DROP_INTERVALS, DROP_INTERVAL_FLOOR_MS, LINE_SCORES, TSPIN_MINI_SCORES, TSPIN_SCORES,
};

/// How J/L/S/Z spins are scored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GenericSpinPolicy {
    /// Shown as "X-Spin" but scored as the plain line clear.
    #[default]
    DisplayOnly,
    /// Scored with the full T-spin table.
    ScoreAsTSpin,
}

/// Rule switches for the scoring engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScoringRules {
    pub generic_spin: GenericSpinPolicy,
}

/// Running score state for one session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreState {
    pub score: u64,
    /// 1-based, driven from outside.
    pub level: u32,
    /// -1 when no chain is active.
    pub combo: i32,
    pub back_to_back: bool,
}

impl ScoreState {
    pub fn new(level: u32) -> Self {
        Self {
            score: 0,
            level: level.max(1),
            combo: -1,
            back_to_back: false,
        }
    }
}

impl Default for ScoreState {
    fn default() -> Self {
        Self::new(1)
    }
}

/// Display label of a clear.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClearLabel {
    #[default]
    None,
    Single,
    Double,
    Triple,
    Quad,
    /// `lines` is capped at 3.
    TSpin { lines: u8, mini: bool },
    Spin { kind: PieceKind, lines: u8 },
}

impl ClearLabel {
    /// Human-readable name ("Quad", "T-Spin Mini Single", "J-Spin Double").
    pub fn name(&self) -> Option<String> {
        let name = match *self {
            ClearLabel::None => return None,
            ClearLabel::Single => "Single".to_string(),
            ClearLabel::Double => "Double".to_string(),
            ClearLabel::Triple => "Triple".to_string(),
            ClearLabel::Quad => "Quad".to_string(),
            ClearLabel::TSpin { lines, mini } => {
                let mut name = String::from("T-Spin");
                if mini {
                    name.push_str(" Mini");
                }
                push_line_word(&mut name, lines);
                name
            }
            ClearLabel::Spin { kind, lines } => {
                let mut name = format!("{}-Spin", kind.letter());
                push_line_word(&mut name, lines);
                name
            }
        };
        Some(name)
    }
}

fn push_line_word(name: &mut String, lines: u8) {
    let word = match lines {
        1 => "Single",
        2 => "Double",
        3 => "Triple",
        4 => "Quad",
        _ => return,
    };
    name.push(' ');
    name.push_str(word);
}

/// Result of scoring one lock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClearOutcome {
    /// Total points awarded (clear points plus combo bonus).
    pub gained: u32,
    /// Clear points after the B2B multiplier.
    pub clear_points: u32,
    pub combo_bonus: u32,
    pub next: ScoreState,
    pub label: ClearLabel,
    pub b2b_applied: bool,
    /// Lines of text joined with '\n'.
    pub callout: Option<String>,
}

/// What a clear is scored as, after applying the generic spin policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScoredAs {
    /// Plain clear table. `spin` marks a generic spin scored as a plain clear.
    Lines { lines: u8, spin: bool },
    TSpin { lines: u8, mini: bool },
}

impl ScoredAs {
    fn base_points(self) -> u32 {
        match self {
            ScoredAs::Lines { lines, .. } => LINE_SCORES[lines.min(4) as usize],
            ScoredAs::TSpin { lines, mini: false } => TSPIN_SCORES[lines.min(3) as usize],
            ScoredAs::TSpin { lines, mini: true } => {
                TSPIN_MINI_SCORES.get(lines as usize).copied().unwrap_or(0)
            }
        }
    }

    /// `Some(true)` starts or keeps a B2B chain, `Some(false)` breaks it,
    /// `None` leaves it alone.
    fn b2b_effect(self) -> Option<bool> {
        match self {
            ScoredAs::Lines { lines: 4, .. } => Some(true),
            ScoredAs::Lines {
                lines: 1..=3,
                spin: false,
            } => Some(false),
            ScoredAs::TSpin { lines, .. } if lines >= 1 => Some(true),
            _ => None,
        }
    }
}

/// Derive the display label for a clear.
pub fn clear_label(lines: u8, spin: SpinResult) -> ClearLabel {
    match spin {
        SpinResult::TSpin { mini } => ClearLabel::TSpin {
            lines: lines.min(3),
            mini,
        },
        SpinResult::Spin(kind) => ClearLabel::Spin { kind, lines },
        SpinResult::None => match lines {
            0 => ClearLabel::None,
            1 => ClearLabel::Single,
            2 => ClearLabel::Double,
            3 => ClearLabel::Triple,
            _ => ClearLabel::Quad,
        },
    }
}

fn scored_as(lines: u8, spin: SpinResult, rules: &ScoringRules) -> ScoredAs {
    match (spin, rules.generic_spin) {
        (SpinResult::TSpin { mini }, _) => ScoredAs::TSpin { lines, mini },
        (SpinResult::Spin(_), GenericSpinPolicy::ScoreAsTSpin) => {
            ScoredAs::TSpin { lines, mini: false }
        }
        (SpinResult::Spin(_), GenericSpinPolicy::DisplayOnly) => {
            ScoredAs::Lines { lines, spin: true }
        }
        (SpinResult::None, _) => ScoredAs::Lines { lines, spin: false },
    }
}

/// Apply the B2B multiplier (3/2, floored) to a point value.
pub fn apply_b2b_multiplier(points: u32) -> u32 {
    points.saturating_mul(B2B_NUMERATOR) / B2B_DENOMINATOR
}

/// Score one lock.
///
/// `lines` is the number of rows cleared by the lock (0-4). The combo chain
/// advances on any clear and resets on a lock that clears nothing.
pub fn apply_clear(
    state: &ScoreState,
    lines: u8,
    spin: SpinResult,
    perfect_clear: bool,
    rules: &ScoringRules,
) -> ClearOutcome {
    let level = state.level.max(1);
    let label = clear_label(lines, spin);
    let scored = scored_as(lines, spin, rules);

    let base = scored.base_points().saturating_mul(level);
    let b2b_effect = scored.b2b_effect();
    let b2b_applied = b2b_effect == Some(true) && state.back_to_back;
    let clear_points = if b2b_applied {
        apply_b2b_multiplier(base)
    } else {
        base
    };

    let combo = if lines > 0 {
        state.combo.max(-1) + 1
    } else {
        -1
    };
    let combo_bonus = if combo > 0 {
        COMBO_BASE.saturating_mul(combo as u32).saturating_mul(level)
    } else {
        0
    };

    // TODO: score perfect clears once a bonus table is chosen; they are only announced for now.
    let gained = clear_points.saturating_add(combo_bonus);

    let next = ScoreState {
        score: state.score.saturating_add(gained as u64),
        level: state.level,
        combo,
        back_to_back: b2b_effect.unwrap_or(state.back_to_back),
    };

    let callout = compose_callout(b2b_applied, label, combo, perfect_clear);

    ClearOutcome {
        gained,
        clear_points,
        combo_bonus,
        next,
        label,
        b2b_applied,
        callout,
    }
}

fn compose_callout(
    b2b_applied: bool,
    label: ClearLabel,
    combo: i32,
    perfect_clear: bool,
) -> Option<String> {
    let mut parts: Vec<String> = Vec::with_capacity(4);
    if b2b_applied {
        parts.push("Back-to-Back".to_string());
    }
    if let Some(name) = label.name() {
        parts.push(name);
    }
    if combo >= 1 {
        parts.push(format!("Combo {}", combo));
    }
    if perfect_clear {
        parts.push("Perfect Clear".to_string());
    }

    if parts.is_empty() {
        None
    } else {
        Some(parts.join("\n"))
    }
}

/// Drop points: soft drop +1 per cell, hard drop +2 per cell.
pub fn drop_points(kind: DropKind, cells: u32) -> u32 {
    kind.points_per_cell().saturating_mul(cells)
}

/// Add drop points to the score; nothing else changes.
pub fn apply_drop_points(state: &ScoreState, kind: DropKind, cells: u32) -> ScoreState {
    ScoreState {
        score: state.score.saturating_add(drop_points(kind, cells) as u64),
        ..*state
    }
}

/// Level for a total line count.
///
/// With `lines_per_level` unset (or zero) the level stays at `start_level`.
pub fn level_for_lines(start_level: u32, total_lines: u32, lines_per_level: Option<u32>) -> u32 {
    let start = start_level.max(1);
    match lines_per_level {
        Some(per) if per > 0 => start.saturating_add(total_lines / per),
        _ => start,
    }
}

/// Gravity interval for a 1-based level, clamped at the floor.
pub fn drop_interval_ms(level: u32) -> u32 {
    let index = level.max(1) as usize - 1;
    DROP_INTERVALS
        .get(index)
        .copied()
        .unwrap_or(DROP_INTERVAL_FLOOR_MS)
}
