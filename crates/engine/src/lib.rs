//! Session orchestration above the core rules.
//!
//! - [`place`]: rotate, shift and hard drop the active piece in one request
//! - [`modes`]: engine presets per [`GameMode`] and the record each submits
//! - [`replay`]: deterministic replay of scripted frames into a [`Transcript`]
//!
//! ```
//! use blockfall_engine::{run_script, Script};
//!
//! let script = Script::from_json(
//!     r#"{ "seed": 1, "mode": "ascent", "frames": [{ "actions": ["hardDrop"], "repeat": 2 }] }"#,
//! )
//! .unwrap();
//! let transcript = run_script(&script).unwrap();
//! assert_eq!(transcript.locks.len(), 2);
//! ```

pub mod modes;
pub mod place;
pub mod replay;

pub use blockfall_records::GameMode;
pub use modes::{config_for_mode, record_for, LINES_PER_LEVEL, RUSH_LINE_GOAL};
pub use place::{apply_place, PlaceError};
pub use replay::{
    run_script, Frame, LockRecord, Outcome, PlaceTarget, Script, ScriptAction, Summary,
    Transcript,
};
