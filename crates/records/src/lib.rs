//! Score records and highscore tables.
//!
//! The engine produces one [`ScoreRecord`] per finished session; this crate
//! ranks them per [`GameMode`] and keeps the best N in a JSON file.
//!
//! Ranking contract:
//! - **Rush**: fastest `time_ms` first, more `lines_cleared` breaks ties
//! - **Ascent / Infinity**: highest `score` first, then faster `time_ms`,
//!   then earlier `achieved_at`
//!
//! ```
//! use blockfall_records::{rank_records, GameMode, ScoreRecord};
//!
//! let runs: Vec<ScoreRecord> = [62_000, 61_500, 59_999, 70_000]
//!     .into_iter()
//!     .map(|t| ScoreRecord::timed(t, 40, 0))
//!     .collect();
//! let top: Vec<u64> = rank_records(GameMode::Rush, runs, 3)
//!     .iter()
//!     .map(|r| r.time_ms)
//!     .collect();
//! assert_eq!(top, vec![59_999, 61_500, 62_000]);
//! ```

pub mod book;
pub mod mode;
pub mod record;

pub use book::{HighscoreBook, Leaderboard, DEFAULT_CAPACITY};
pub use mode::GameMode;
pub use record::{compare, rank_records, ScoreRecord};
