//! Core game logic - pure, deterministic, and testable
//!
//! This crate contains the rules engine of the falling-block game: collision,
//! rotation with wall kicks, spin classification, lockdown, line clears,
//! scoring and piece sequencing, plus the [`GameState`] orchestrator that
//! composes them. It has **no dependencies** on rendering, storage or input
//! devices:
//!
//! - **Deterministic**: the same seed and the same action stream produce
//!   identical sessions
//! - **Testable**: every rule is a small function or state machine
//! - **Portable**: runs headless, in a terminal, or behind any front end
//!
//! # Module Structure
//!
//! - [`board`]: fixed-size grid with line clearing
//! - [`collision`]: shape/board overlap test
//! - [`pieces`]: tetromino shapes and SRS rotation with wall kicks
//! - [`spin`]: T-spin (3-corner) and generic immobility spins
//! - [`lockdown`]: extended placement lock delay
//! - [`scoring`]: guideline scoring with combos and back-to-back
//! - [`rng`]: 7-bag and random piece sequencing
//! - [`game_state`]: the session orchestrator
//!
//! # Game Rules
//!
//! - **7-Bag Randomizer**: every bag holds each of the seven pieces once
//! - **SRS Rotation**: kick tables for I, O and the shared J/L/S/T/Z family
//! - **Lock Delay**: 500ms, reset by moves/rotations at most 15 times per
//!   piece; reaching a new lowest row restores the reset budget
//! - **Scoring**: level-scaled base points, 3/2 back-to-back multiplier,
//!   `50 * combo * level` combo bonus
//!
//! # Example
//!
//! ```
//! use blockfall_core::GameState;
//! use blockfall_core::types::GameAction;
//!
//! // Create and start a game
//! let mut game = GameState::new(12345);
//! game.start();
//!
//! // Actions for one frame, then 16ms of gravity
//! game.step(&[GameAction::MoveRight, GameAction::RotateCw], 16);
//! game.apply_action(GameAction::HardDrop);
//!
//! assert!(game.score() > 0); // Hard drop awards points
//! assert_eq!(game.pieces_locked(), 1);
//! ```
//!
//! # Timing
//!
//! Call [`GameState::tick`] (or [`GameState::step`]) with the elapsed time of
//! each frame. Gravity uses the level's drop interval (1000ms at level 1 down
//! to a 120ms floor); a grounded piece runs the lock timer instead.

pub mod board;
pub mod collision;
pub mod error;
pub mod game_state;
pub mod lockdown;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod snapshot;
pub mod spin;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, ClearedRows};
pub use collision::collides;
pub use error::EngineError;
pub use game_state::{EngineConfig, EngineEvent, GameState, LockEvent, Tetromino, TopOut};
pub use lockdown::{LockdownConfig, LockdownTimer};
pub use pieces::{get_shape, kick_offsets, try_rotate, KickFamily, RotationOutcome};
pub use rng::{PieceSequencer, SequencerStrategy, SimpleRng};
pub use scoring::{
    apply_clear, apply_drop_points, ClearLabel, ClearOutcome, GenericSpinPolicy, ScoreState,
    ScoringRules,
};
pub use snapshot::{ActiveSnapshot, GameSnapshot, LockdownSnapshot};
