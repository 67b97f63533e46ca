//! Deterministic replay of scripted input frames.
//!
//! A script is plain JSON:
//!
//! ```json
//! {
//!   "seed": 7,
//!   "mode": "rush",
//!   "frames": [
//!     { "actions": ["moveLeft", "rotateCw"], "elapsed_ms": 16 },
//!     { "actions": [{ "place": { "x": 0, "rotation": 1, "hold": false } }] },
//!     { "actions": [], "elapsed_ms": 16, "repeat": 30 }
//!   ]
//! }
//! ```
//!
//! Every frame applies its actions in order and then advances the clock once,
//! so the same script always produces the same transcript.

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use blockfall_core::{EngineEvent, GameState, LockEvent, TopOut};
use blockfall_records::{GameMode, ScoreRecord};
use blockfall_types::{GameAction, Rotation, TICK_MS};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::modes::{config_for_mode, record_for};
use crate::place::apply_place;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Script {
    pub seed: u32,
    #[serde(default = "default_mode")]
    pub mode: GameMode,
    #[serde(default)]
    pub frames: Vec<Frame>,
}

fn default_mode() -> GameMode {
    GameMode::Infinity
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Frame {
    #[serde(default)]
    pub actions: Vec<ScriptAction>,
    #[serde(default = "default_elapsed")]
    pub elapsed_ms: u32,
    #[serde(default = "default_repeat")]
    pub repeat: u32,
}

fn default_elapsed() -> u32 {
    TICK_MS
}

fn default_repeat() -> u32 {
    1
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ScriptAction {
    /// A single action by name, e.g. `"hardDrop"`.
    Named(String),
    Place { place: PlaceTarget },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PlaceTarget {
    pub x: i8,
    /// Any integer; normalised mod 4 (0 = north, 1 = east, ...).
    pub rotation: i32,
    #[serde(default)]
    pub hold: bool,
}

impl Script {
    pub fn from_json(text: &str) -> Result<Self> {
        let script: Self = serde_json::from_str(text).context("Failed to parse replay script")?;
        Ok(script)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("Failed to load {}", path.display()))
    }
}

/// How the replayed session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The script ran out of frames with the game still in progress.
    Running,
    Finished,
    ToppedOut,
}

/// One locked piece as seen in a transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LockRecord {
    pub frame: usize,
    pub piece: &'static str,
    pub rotation: &'static str,
    pub x: i8,
    pub y: i8,
    pub lines: u8,
    pub cleared_rows: Vec<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spin: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub gained: u32,
    pub combo: i32,
    pub back_to_back: bool,
    pub perfect_clear: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub callout: Option<String>,
}

impl LockRecord {
    fn new(frame: usize, event: &LockEvent) -> Self {
        Self {
            frame,
            piece: event.piece.kind.as_str(),
            rotation: event.piece.rotation.as_str(),
            x: event.piece.x,
            y: event.piece.y,
            lines: event.lines,
            cleared_rows: event.cleared_rows.to_vec(),
            spin: event.spin.as_str(),
            label: event.label.name(),
            gained: event.gained,
            combo: event.combo,
            back_to_back: event.back_to_back,
            perfect_clear: event.perfect_clear,
            callout: event.callout.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub score: u64,
    pub lines: u32,
    pub level: u32,
    pub pieces_locked: u32,
    pub elapsed_ms: u64,
    pub outcome: Outcome,
}

impl Summary {
    pub fn from_state(state: &GameState) -> Self {
        let outcome = if state.finished() {
            Outcome::Finished
        } else if state.game_over() {
            Outcome::ToppedOut
        } else {
            Outcome::Running
        };
        Self {
            score: state.score(),
            lines: state.lines(),
            level: state.level(),
            pieces_locked: state.pieces_locked(),
            elapsed_ms: state.elapsed_ms(),
            outcome,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transcript {
    pub mode: GameMode,
    pub seed: u32,
    pub locks: Vec<LockRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_out: Option<&'static str>,
    /// Actions that had no effect (blocked moves, invalid places, ...).
    pub rejected_actions: u32,
    pub summary: Summary,
}

impl Transcript {
    pub fn score_record(&self, achieved_at: u64) -> Option<ScoreRecord> {
        record_for(self.mode, &self.summary, achieved_at)
    }
}

fn top_out_name(reason: TopOut) -> &'static str {
    match reason {
        TopOut::BlockOut => "block_out",
        TopOut::LockOut => "lock_out",
    }
}

/// Run `script` from a fresh session and collect what happened.
///
/// Unknown action names fail the whole run; actions that are merely
/// impossible in the current position are counted and skipped.
pub fn run_script(script: &Script) -> Result<Transcript> {
    let mut state = GameState::with_config(config_for_mode(script.mode, script.seed))?;
    state.start();

    let mut locks = Vec::new();
    let mut top_out = None;
    let mut rejected_actions = 0u32;

    'frames: for (index, frame) in script.frames.iter().enumerate() {
        for _ in 0..frame.repeat {
            if state.game_over() || state.finished() {
                break 'frames;
            }

            for action in &frame.actions {
                let applied = match action {
                    ScriptAction::Named(name) => {
                        let action = GameAction::from_str(name)
                            .ok_or_else(|| anyhow!("frame {}: unknown action {:?}", index, name))?;
                        state.apply_action(action)
                    }
                    ScriptAction::Place { place } => {
                        let rotation = Rotation::from_index(place.rotation);
                        match apply_place(&mut state, place.x, rotation, place.hold) {
                            Ok(()) => true,
                            Err(err) => {
                                warn!(frame = index, code = err.code(), "{}", err.message());
                                false
                            }
                        }
                    }
                };
                if !applied {
                    rejected_actions += 1;
                }
            }

            state.tick(frame.elapsed_ms);

            for event in state.drain_events() {
                match event {
                    EngineEvent::Locked(lock) => locks.push(LockRecord::new(index, &lock)),
                    EngineEvent::ToppedOut(reason) => top_out = Some(top_out_name(reason)),
                    EngineEvent::GoalReached { .. } => {}
                }
            }
        }
    }

    let summary = Summary::from_state(&state);
    debug!(
        mode = %script.mode,
        locks = locks.len(),
        rejected_actions,
        outcome = ?summary.outcome,
        "replay finished"
    );

    Ok(Transcript {
        mode: script.mode,
        seed: script.seed,
        locks,
        top_out,
        rejected_actions,
        summary,
    })
}
