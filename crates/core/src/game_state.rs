//! Game state module - manages the complete game state
//!
//! This module ties together all core components: board, pieces, sequencer,
//! lockdown and scoring. It handles gravity, piece movement, rotation, line
//! clears and the game lifecycle.
//!
//! Ordering within one frame ([`GameState::step`]): every queued action is
//! applied in arrival order, then gravity and the lock timer are evaluated once
//! against the post-input state.

use tracing::debug;

use crate::board::{Board, ClearedRows, MAX_BOARD_HEIGHT, MAX_BOARD_WIDTH, MIN_BOARD_DIM};
use crate::error::EngineError;
use crate::lockdown::{LockdownConfig, LockdownTimer};
use crate::pieces::try_rotate;
pub use crate::pieces::Tetromino;
use crate::rng::{PieceSequencer, SequencerStrategy};
use crate::scoring::{self, ClearLabel, ScoreState, ScoringRules};
use crate::snapshot::{ActiveSnapshot, GameSnapshot, LockdownSnapshot};
use crate::spin;
use crate::types::{
    DropKind, GameAction, PieceKind, Rotation, SpinResult, BOARD_HEIGHT, BOARD_WIDTH,
    DEFAULT_PREVIEW_DEPTH,
};

/// Largest supported lookahead depth.
pub const MAX_PREVIEW_DEPTH: usize = 7;

/// Session configuration. Everything the engine needs is passed here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    pub width: u8,
    pub height: u8,
    pub seed: u32,
    pub lockdown: LockdownConfig,
    pub sequencer: SequencerStrategy,
    pub preview_depth: usize,
    pub start_level: u32,
    /// Lines per level-up; `None` keeps the level at `start_level`.
    pub lines_per_level: Option<u32>,
    /// Total lines that finish the session.
    pub line_goal: Option<u32>,
    pub scoring: ScoringRules,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            seed: 1,
            lockdown: LockdownConfig::default(),
            sequencer: SequencerStrategy::default(),
            preview_depth: DEFAULT_PREVIEW_DEPTH,
            start_level: 1,
            lines_per_level: Some(10),
            line_goal: None,
            scoring: ScoringRules::default(),
        }
    }
}

impl EngineConfig {
    pub fn with_seed(seed: u32) -> Self {
        Self {
            seed,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), EngineError> {
        if !(MIN_BOARD_DIM..=MAX_BOARD_WIDTH).contains(&self.width)
            || !(MIN_BOARD_DIM..=MAX_BOARD_HEIGHT).contains(&self.height)
        {
            return Err(EngineError::InvalidBoardSize {
                width: self.width,
                height: self.height,
            });
        }
        if !(1..=MAX_PREVIEW_DEPTH).contains(&self.preview_depth) {
            return Err(EngineError::InvalidPreviewDepth(self.preview_depth));
        }
        Ok(())
    }
}

/// Everything that happened when a piece locked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockEvent {
    pub piece: Tetromino,
    /// Cleared rows in pre-clear board coordinates, bottom to top.
    pub cleared_rows: ClearedRows,
    pub lines: u8,
    pub spin: SpinResult,
    pub label: ClearLabel,
    pub gained: u32,
    pub combo: i32,
    pub back_to_back: bool,
    pub b2b_applied: bool,
    pub perfect_clear: bool,
    pub callout: Option<String>,
    /// Level the clear was scored at.
    pub level: u32,
}

/// How the session topped out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TopOut {
    /// The next piece overlapped the stack at spawn.
    BlockOut,
    /// A piece locked with minos above the visible board.
    LockOut,
}

/// Plain-data events for presentation layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    Locked(LockEvent),
    ToppedOut(TopOut),
    GoalReached { lines: u32 },
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    config: EngineConfig,
    board: Board,
    active: Option<Tetromino>,
    hold: Option<PieceKind>,
    sequencer: PieceSequencer,
    lockdown: LockdownTimer,
    score: ScoreState,
    lines: u32,
    drop_timer_ms: u32,
    /// Session clock, advanced by ticks while playing.
    elapsed_ms: u64,
    /// Monotonic episode id (increments on restart).
    episode_id: u32,
    /// Monotonic id for spawned pieces.
    piece_id: u32,
    pieces_locked: u32,
    events: Vec<EngineEvent>,
    paused: bool,
    game_over: bool,
    finished: bool,
    started: bool,
    can_hold: bool,
    last_action_was_rotate: bool,
}

impl GameState {
    /// Create a standard 10x20 game with the given RNG seed
    pub fn new(seed: u32) -> Self {
        Self::build(EngineConfig::with_seed(seed), Board::new())
    }

    /// Create a game from an explicit configuration.
    pub fn with_config(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let board = Board::with_size(config.width, config.height)?;
        Ok(Self::build(config, board))
    }

    fn build(config: EngineConfig, board: Board) -> Self {
        Self {
            board,
            active: None,
            hold: None,
            sequencer: PieceSequencer::new(config.sequencer, config.seed, config.preview_depth),
            lockdown: LockdownTimer::new(config.lockdown),
            score: ScoreState::new(config.start_level),
            lines: 0,
            drop_timer_ms: 0,
            elapsed_ms: 0,
            episode_id: 0,
            piece_id: 0,
            pieces_locked: 0,
            events: Vec::new(),
            paused: false,
            game_over: false,
            finished: false,
            started: false,
            can_hold: true,
            last_action_was_rotate: false,
            config,
        }
    }

    /// Start the game and spawn the first piece
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.spawn_piece();
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn started(&self) -> bool {
        self.started
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn game_over(&self) -> bool {
        self.game_over
    }

    /// The line goal was reached.
    pub fn finished(&self) -> bool {
        self.finished
    }

    /// Accepting piece input right now.
    pub fn playable(&self) -> bool {
        self.started && !self.paused && !self.game_over && !self.finished
    }

    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn piece_id(&self) -> u32 {
        self.piece_id
    }

    pub fn pieces_locked(&self) -> u32 {
        self.pieces_locked
    }

    pub fn score(&self) -> u64 {
        self.score.score
    }

    pub fn score_state(&self) -> &ScoreState {
        &self.score
    }

    pub fn level(&self) -> u32 {
        self.score.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn combo(&self) -> i32 {
        self.score.combo
    }

    pub fn back_to_back(&self) -> bool {
        self.score.back_to_back
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    pub fn hold_piece(&self) -> Option<PieceKind> {
        self.hold
    }

    /// Upcoming pieces, next first.
    pub fn preview(&self) -> impl Iterator<Item = PieceKind> + '_ {
        self.sequencer.preview()
    }

    /// Current RNG state of the sequencer.
    pub fn seed(&self) -> u32 {
        self.sequencer.seed()
    }

    pub fn active(&self) -> Option<Tetromino> {
        self.active
    }

    pub fn lockdown(&self) -> &LockdownTimer {
        &self.lockdown
    }

    pub fn last_action_was_rotate(&self) -> bool {
        self.last_action_was_rotate
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Mutable board access for setting up positions (garbage, puzzles, tests).
    ///
    /// The grounded state of the active piece is not refreshed until its next
    /// movement or tick.
    pub fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Take all events emitted since the last drain.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, EngineEvent> {
        self.events.drain(..)
    }

    pub fn snapshot_into(&self, out: &mut GameSnapshot) {
        self.board.write_tag_grid(&mut out.board);
        out.width = self.board.width();
        out.height = self.board.height();

        out.active = self.active.map(ActiveSnapshot::from);
        out.ghost_y = self.ghost_y();
        out.hold = self.hold;
        out.next_queue.clear();
        out.next_queue.extend(self.sequencer.preview());
        out.can_hold = self.can_hold;
        out.paused = self.paused;
        out.game_over = self.game_over;
        out.finished = self.finished;
        out.episode_id = self.episode_id;
        out.seed = self.sequencer.seed();
        out.piece_id = self.piece_id;
        out.score = self.score.score;
        out.level = self.score.level;
        out.lines = self.lines;
        out.combo = self.score.combo;
        out.back_to_back = self.score.back_to_back;
        out.elapsed_ms = self.elapsed_ms;
        out.drop_timer_ms = self.drop_timer_ms;
        out.lockdown = LockdownSnapshot {
            grounded: self.lockdown.grounded(),
            time_left_ms: self.lockdown.time_left_ms(),
            resets_used: self.lockdown.resets_used(),
        };
    }

    pub fn snapshot(&self) -> GameSnapshot {
        let mut s = GameSnapshot::default();
        self.snapshot_into(&mut s);
        s
    }

    /// Spawn a new piece from the queue
    pub fn spawn_piece(&mut self) -> bool {
        let kind = self.sequencer.draw();
        if !self.place_new_piece(kind) {
            return false;
        }
        self.piece_id = self.piece_id.wrapping_add(1);
        self.can_hold = true;
        true
    }

    /// Put `kind` at the spawn position, topping out if it does not fit.
    fn place_new_piece(&mut self, kind: PieceKind) -> bool {
        let piece = Tetromino::spawn(kind, self.board.width());
        if !piece.is_valid(&self.board) {
            self.active = None;
            self.top_out(TopOut::BlockOut);
            return false;
        }

        self.active = Some(piece);
        self.drop_timer_ms = 0;
        self.last_action_was_rotate = false;
        self.lockdown.on_spawn(piece.y);
        self.refresh_grounded();
        debug!(kind = kind.as_str(), x = piece.x, "spawned piece");
        true
    }

    fn top_out(&mut self, reason: TopOut) {
        debug!(?reason, score = self.score.score, lines = self.lines, "topped out");
        self.game_over = true;
        self.events.push(EngineEvent::ToppedOut(reason));
    }

    fn refresh_grounded(&mut self) {
        let grounded = self
            .active
            .is_some_and(|piece| piece.is_grounded(&self.board));
        self.lockdown.update_grounded(grounded);
    }

    /// Get current drop interval based on level
    pub fn drop_interval_ms(&self) -> u32 {
        scoring::drop_interval_ms(self.score.level)
    }

    /// Try to move the active piece
    pub fn try_move(&mut self, dx: i8, dy: i8) -> bool {
        if !self.playable() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };
        if active.collides_at(&self.board, dx, dy) {
            return false;
        }

        let moved = Tetromino {
            x: active.x + dx,
            y: active.y + dy,
            ..active
        };
        self.active = Some(moved);

        // Any translation ends spin eligibility.
        self.last_action_was_rotate = false;
        self.lockdown.on_successful_move_or_rotate();
        if dy > 0 {
            self.lockdown.on_fell_to_y(moved.y);
        }
        self.refresh_grounded();
        true
    }

    /// Try to rotate the active piece to `to` with SRS wall kicks
    pub fn try_rotate_to(&mut self, to: Rotation) -> bool {
        if !self.playable() {
            return false;
        }
        let Some(active) = self.active else {
            return false;
        };

        let Some(outcome) = try_rotate(
            active.kind,
            active.rotation,
            to,
            &self.board,
            active.x,
            active.y,
        ) else {
            return false;
        };

        self.active = Some(Tetromino {
            rotation: outcome.rotation,
            x: outcome.x,
            y: outcome.y,
            ..active
        });
        self.last_action_was_rotate = true;
        self.lockdown.on_successful_move_or_rotate();
        self.lockdown.on_fell_to_y(outcome.y);
        self.refresh_grounded();
        true
    }

    /// Gravity step: one row down without counting as a lock reset.
    fn fall_one(&mut self) -> bool {
        let Some(active) = self.active else {
            return false;
        };
        if active.collides_at(&self.board, 0, 1) {
            return false;
        }
        let y = active.y + 1;
        self.active = Some(Tetromino { y, ..active });
        self.last_action_was_rotate = false;
        self.lockdown.on_fell_to_y(y);
        self.refresh_grounded();
        true
    }

    /// Move down one row, awarding soft drop points.
    pub fn soft_drop(&mut self) -> bool {
        let moved = self.try_move(0, 1);
        if moved {
            self.score = scoring::apply_drop_points(&self.score, DropKind::Soft, 1);
        }
        moved
    }

    /// Hard drop the active piece to the bottom and lock it.
    ///
    /// Returns the number of rows dropped.
    pub fn hard_drop(&mut self) -> u32 {
        if !self.playable() {
            return 0;
        }
        let Some(active) = self.active else {
            return 0;
        };

        let distance = self.drop_distance(&active);
        if distance > 0 {
            self.active = Some(Tetromino {
                y: active.y + distance,
                ..active
            });
            self.last_action_was_rotate = false;
        }

        let cells = distance as u32;
        self.score = scoring::apply_drop_points(&self.score, DropKind::Hard, cells);
        self.lock_piece();
        cells
    }

    /// Swap active piece with hold piece
    pub fn hold(&mut self) -> bool {
        if !self.playable() || !self.can_hold {
            return false;
        }
        let Some(active) = self.active.take() else {
            return false;
        };

        match self.hold.replace(active.kind) {
            Some(held) => {
                self.place_new_piece(held);
            }
            None => {
                self.spawn_piece();
            }
        }
        debug!(held = active.kind.as_str(), "hold");

        self.can_hold = false;
        true
    }

    /// Lock the active piece onto the board and handle line clears
    pub fn lock_piece(&mut self) {
        let Some(active) = self.active.take() else {
            return;
        };

        // Classified against the board without the piece itself.
        let spin = spin::classify(&self.board, &active, self.last_action_was_rotate);

        let fully_visible = self
            .board
            .lock_piece(&active.shape(), active.x, active.y, active.kind);
        self.pieces_locked += 1;

        let cleared_rows = self.board.clear_full_rows();
        let lines = cleared_rows.len() as u8;
        let perfect_clear = lines > 0 && self.board.is_empty();

        let scored_level = self.score.level;
        let outcome = scoring::apply_clear(
            &self.score,
            lines,
            spin,
            perfect_clear,
            &self.config.scoring,
        );
        self.score = outcome.next;
        self.lines += lines as u32;
        self.score.level = scoring::level_for_lines(
            self.config.start_level,
            self.lines,
            self.config.lines_per_level,
        );

        debug!(
            kind = active.kind.as_str(),
            lines,
            spin = ?spin,
            gained = outcome.gained,
            combo = outcome.next.combo,
            "locked piece"
        );

        self.events.push(EngineEvent::Locked(LockEvent {
            piece: active,
            cleared_rows,
            lines,
            spin,
            label: outcome.label,
            gained: outcome.gained,
            combo: outcome.next.combo,
            back_to_back: outcome.next.back_to_back,
            b2b_applied: outcome.b2b_applied,
            perfect_clear,
            callout: outcome.callout,
            level: scored_level,
        }));

        if !fully_visible {
            self.top_out(TopOut::LockOut);
            return;
        }

        if let Some(goal) = self.config.line_goal {
            if self.lines >= goal {
                debug!(lines = self.lines, elapsed_ms = self.elapsed_ms, "line goal reached");
                self.finished = true;
                self.events.push(EngineEvent::GoalReached { lines: self.lines });
                return;
            }
        }

        self.spawn_piece();
    }

    /// Check if the active piece is on the ground
    pub fn is_grounded(&self) -> bool {
        match self.active {
            Some(ref piece) => piece.is_grounded(&self.board),
            None => false,
        }
    }

    fn drop_distance(&self, piece: &Tetromino) -> i8 {
        let mut distance: i8 = 0;
        while !piece.collides_at(&self.board, 0, distance + 1) {
            distance += 1;
        }
        distance
    }

    /// Calculate the ghost piece Y position (where piece would land)
    pub fn ghost_y(&self) -> Option<i8> {
        let active = self.active?;
        Some(active.y + self.drop_distance(&active))
    }

    /// Advance gravity and the lock timer by `elapsed_ms`.
    ///
    /// Returns true if the active piece fell or locked.
    pub fn tick(&mut self, elapsed_ms: u32) -> bool {
        if !self.playable() {
            return false;
        }
        self.elapsed_ms += elapsed_ms as u64;

        if self.active.is_none() {
            return false;
        }

        if self.lockdown.grounded() {
            if self.lockdown.tick(elapsed_ms) {
                self.lock_piece();
                return true;
            }
            return false;
        }

        let interval = self.drop_interval_ms();
        self.drop_timer_ms += elapsed_ms;
        let mut fell = false;
        while self.drop_timer_ms >= interval {
            self.drop_timer_ms -= interval;
            if !self.fall_one() {
                self.drop_timer_ms = 0;
                break;
            }
            fell = true;
            if self.lockdown.grounded() {
                self.drop_timer_ms = 0;
                break;
            }
        }
        fell
    }

    /// Apply one frame: every action in order, then one tick.
    pub fn step(&mut self, actions: &[GameAction], elapsed_ms: u32) -> bool {
        for &action in actions {
            self.apply_action(action);
        }
        self.tick(elapsed_ms)
    }

    /// Apply a game action
    pub fn apply_action(&mut self, action: GameAction) -> bool {
        let Some(active) = self.active else {
            return match action {
                GameAction::Pause => self.toggle_pause(),
                GameAction::Restart => self.restart(),
                _ => false,
            };
        };

        match action {
            GameAction::MoveLeft => self.try_move(-1, 0),
            GameAction::MoveRight => self.try_move(1, 0),
            GameAction::SoftDrop => self.soft_drop(),
            GameAction::HardDrop => {
                if !self.playable() {
                    return false;
                }
                self.hard_drop();
                true
            }
            GameAction::RotateCw => self.try_rotate_to(active.rotation.rotate_cw()),
            GameAction::RotateCcw => self.try_rotate_to(active.rotation.rotate_ccw()),
            GameAction::Rotate180 => self.try_rotate_to(active.rotation.rotate_180()),
            GameAction::Hold => self.hold(),
            GameAction::Pause => self.toggle_pause(),
            GameAction::Restart => self.restart(),
        }
    }

    fn toggle_pause(&mut self) -> bool {
        if !self.started || self.game_over || self.finished {
            return false;
        }
        self.paused = !self.paused;
        true
    }

    /// Start over with the same configuration and a seed taken from the
    /// current RNG state.
    pub fn restart(&mut self) -> bool {
        let mut config = self.config;
        config.seed = self.sequencer.seed();
        let next_episode = self.episode_id.wrapping_add(1);

        let mut board = std::mem::take(&mut self.board);
        board.clear();
        let events = std::mem::take(&mut self.events);

        *self = Self::build(config, board);
        self.episode_id = next_episode;
        self.events = events;
        debug!(episode_id = next_episode, seed = config.seed, "restart");
        self.start();
        true
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn put_active(state: &mut GameState, piece: Tetromino) {
        state.active = Some(piece);
        state.last_action_was_rotate = false;
        state.lockdown.on_spawn(piece.y);
        state.refresh_grounded();
    }

    fn fill_row_except(state: &mut GameState, y: i8, holes: &[i8]) {
        for x in 0..state.board.width() as i8 {
            if !holes.contains(&x) {
                state.board.set(x, y, Some(PieceKind::Z));
            }
        }
    }

    fn locked_events(state: &mut GameState) -> Vec<LockEvent> {
        state
            .drain_events()
            .filter_map(|ev| match ev {
                EngineEvent::Locked(lock) => Some(lock),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_new_game_state() {
        let state = GameState::new(12345);

        assert!(!state.started());
        assert!(!state.game_over());
        assert!(!state.paused());
        assert_eq!(state.score(), 0);
        assert_eq!(state.level(), 1);
        assert_eq!(state.lines(), 0);
        assert_eq!(state.combo(), -1);
        assert!(!state.back_to_back());
        assert_eq!(state.episode_id(), 0);
        assert!(state.active().is_none());
        assert!(state.hold_piece().is_none());
        assert_eq!(state.preview().count(), 5);
    }

    #[test]
    fn test_with_config_validates() {
        let bad = EngineConfig {
            width: 2,
            ..EngineConfig::default()
        };
        assert_eq!(
            GameState::with_config(bad).unwrap_err(),
            EngineError::InvalidBoardSize {
                width: 2,
                height: 20
            }
        );

        let bad = EngineConfig {
            preview_depth: 0,
            ..EngineConfig::default()
        };
        assert_eq!(
            GameState::with_config(bad).unwrap_err(),
            EngineError::InvalidPreviewDepth(0)
        );

        let small = EngineConfig {
            width: 6,
            height: 8,
            preview_depth: 3,
            ..EngineConfig::default()
        };
        let mut state = GameState::with_config(small).unwrap();
        state.start();
        assert_eq!(state.active().unwrap().x, 1);
        assert_eq!(state.preview().count(), 3);
    }

    #[test]
    fn test_spawn_takes_preview_head() {
        let mut state = GameState::new(12345);
        state.start();

        assert_eq!(state.piece_id(), 1);
        let active = state.active().unwrap();
        assert_eq!((active.x, active.y), (3, 0));
        assert_eq!(active.rotation, Rotation::North);

        let next_kind = state.preview().next().unwrap();
        state.hard_drop();
        assert!(!state.game_over());
        assert_eq!(state.piece_id(), 2);
        assert_eq!(state.active().unwrap().kind, next_kind);
    }

    #[test]
    fn test_try_move_walls() {
        let mut state = GameState::new(12345);
        state.start();
        put_active(&mut state, Tetromino::new(PieceKind::T));

        assert!(state.try_move(1, 0));
        assert_eq!(state.active().unwrap().x, 4);
        assert!(state.try_move(-1, 0));
        assert!(!state.try_move(0, 100));

        let mut moved = 0;
        for _ in 0..10 {
            if state.try_move(-1, 0) {
                moved += 1;
            }
        }
        // T north spans columns x..x+2, spawned at x=3.
        assert_eq!(moved, 3);
        assert_eq!(state.active().unwrap().x, 0);
    }

    #[test]
    fn test_four_clockwise_rotations_return_home() {
        for kind in PieceKind::ALL {
            let mut state = GameState::new(7);
            state.start();
            let start = Tetromino {
                kind,
                rotation: Rotation::North,
                x: 3,
                y: 6,
            };
            put_active(&mut state, start);
            for _ in 0..4 {
                assert!(state.apply_action(GameAction::RotateCw), "{:?}", kind);
            }
            assert_eq!(state.active(), Some(start), "{:?}", kind);
        }
    }

    #[test]
    fn test_rotate_180_checks_in_place_only() {
        let mut state = GameState::new(7);
        state.start();
        put_active(&mut state, Tetromino { kind: PieceKind::T, rotation: Rotation::North, x: 3, y: 6 });
        assert!(state.apply_action(GameAction::Rotate180));
        assert_eq!(state.active().unwrap().rotation, Rotation::South);
        assert_eq!(state.active().unwrap().x, 3);

        // Block the cell South needs but North does not.
        state.board_mut().set(4, 8, Some(PieceKind::I));
        assert!(state.apply_action(GameAction::Rotate180));
        assert!(!state.apply_action(GameAction::Rotate180));
        assert_eq!(state.active().unwrap().rotation, Rotation::North);
    }

    #[test]
    fn test_rotation_flag_cleared_by_moves() {
        let mut state = GameState::new(7);
        state.start();
        put_active(&mut state, Tetromino { kind: PieceKind::T, rotation: Rotation::North, x: 3, y: 6 });

        assert!(state.apply_action(GameAction::RotateCw));
        assert!(state.last_action_was_rotate());

        // Failed moves leave the flag alone.
        state.board_mut().set(6, 7, Some(PieceKind::I));
        assert!(!state.apply_action(GameAction::MoveRight));
        assert!(state.last_action_was_rotate());

        assert!(state.apply_action(GameAction::MoveLeft));
        assert!(!state.last_action_was_rotate());
    }

    #[test]
    fn test_hard_drop_scores_two_per_cell() {
        let mut state = GameState::new(12345);
        state.start();
        state.drain_events().for_each(drop);
        put_active(&mut state, Tetromino::new(PieceKind::T));

        // T north occupies rows y and y+1; lands at y = 18.
        assert_eq!(state.ghost_y(), Some(18));
        assert_eq!(state.hard_drop(), 18);
        assert_eq!(state.score(), 36);
        assert_eq!(state.pieces_locked(), 1);

        let locks = locked_events(&mut state);
        assert_eq!(locks.len(), 1);
        assert_eq!(locks[0].piece.y, 18);
        assert_eq!(locks[0].lines, 0);
        assert_eq!(locks[0].gained, 0);
        assert_eq!(locks[0].callout, None);
    }

    #[test]
    fn test_soft_drop_scores_one_per_cell() {
        let mut state = GameState::new(12345);
        state.start();
        put_active(&mut state, Tetromino::new(PieceKind::O));
        for _ in 0..5 {
            assert!(state.apply_action(GameAction::SoftDrop));
        }
        assert_eq!(state.score(), 5);
        assert_eq!(state.active().unwrap().y, 5);
    }

    #[test]
    fn test_gravity_follows_level_interval() {
        let mut state = GameState::new(12345);
        state.start();
        put_active(&mut state, Tetromino::new(PieceKind::O));

        assert!(!state.tick(999));
        assert_eq!(state.active().unwrap().y, 0);
        assert!(state.tick(1));
        assert_eq!(state.active().unwrap().y, 1);
        // Large deltas apply several rows at once.
        assert!(state.tick(3000));
        assert_eq!(state.active().unwrap().y, 4);
        assert_eq!(state.elapsed_ms(), 4000);
    }

    #[test]
    fn test_grounded_piece_locks_after_delay() {
        let mut state = GameState::new(12345);
        state.start();
        state.drain_events().for_each(drop);
        put_active(&mut state, Tetromino { kind: PieceKind::T, rotation: Rotation::North, x: 3, y: 18 });
        assert!(state.lockdown().grounded());

        assert!(!state.tick(499));
        assert_eq!(state.pieces_locked(), 0);
        assert!(state.tick(1));
        assert_eq!(state.pieces_locked(), 1);
        assert_eq!(locked_events(&mut state).len(), 1);
    }

    #[test]
    fn test_move_resets_are_capped() {
        let mut state = GameState::new(12345);
        state.start();
        put_active(&mut state, Tetromino { kind: PieceKind::T, rotation: Rotation::North, x: 3, y: 18 });

        for i in 0..15 {
            assert!(!state.tick(400));
            let action = if i % 2 == 0 {
                GameAction::MoveRight
            } else {
                GameAction::MoveLeft
            };
            assert!(state.apply_action(action));
            assert_eq!(state.lockdown().time_left_ms(), 500);
        }
        assert_eq!(state.lockdown().resets_used(), 15);

        assert!(!state.tick(400));
        assert!(state.apply_action(GameAction::MoveRight));
        assert_eq!(state.lockdown().time_left_ms(), 100);
        assert!(state.tick(100));
        assert_eq!(state.pieces_locked(), 1);
    }

    #[test]
    fn test_tspin_double_through_rotation() {
        let mut state = GameState::new(12345);
        state.start();
        state.drain_events().for_each(drop);

        fill_row_except(&mut state, 19, &[4]);
        fill_row_except(&mut state, 18, &[3, 4, 5]);
        state.board_mut().set(3, 17, Some(PieceKind::L));

        put_active(&mut state, Tetromino { kind: PieceKind::T, rotation: Rotation::West, x: 3, y: 17 });
        assert!(state.apply_action(GameAction::RotateCcw));
        assert_eq!(state.active().unwrap().rotation, Rotation::South);
        assert!(state.apply_action(GameAction::HardDrop));

        let locks = locked_events(&mut state);
        let lock = &locks[0];
        assert_eq!(lock.spin, SpinResult::TSpin { mini: false });
        assert_eq!(lock.lines, 2);
        assert_eq!(lock.cleared_rows.as_slice(), &[19, 18]);
        assert_eq!(lock.gained, 1200);
        assert!(lock.back_to_back);
        assert_eq!(lock.callout.as_deref(), Some("T-Spin Double"));
        assert_eq!(state.score(), 1200);
        assert_eq!(state.lines(), 2);
        // The overhang fell to the floor.
        assert_eq!(state.board().get(3, 19), Some(Some(PieceKind::L)));
    }

    #[test]
    fn test_level_up_after_scoring() {
        let config = EngineConfig {
            lines_per_level: Some(1),
            ..EngineConfig::with_seed(3)
        };
        let mut state = GameState::with_config(config).unwrap();
        state.start();
        state.drain_events().for_each(drop);

        fill_row_except(&mut state, 19, &[0, 1, 2, 3]);
        put_active(&mut state, Tetromino { kind: PieceKind::I, rotation: Rotation::North, x: 0, y: 18 });
        state.hard_drop();

        let locks = locked_events(&mut state);
        assert_eq!(locks[0].level, 1);
        assert_eq!(locks[0].gained, 100);
        assert!(locks[0].perfect_clear);
        assert_eq!(locks[0].callout.as_deref(), Some("Single\nPerfect Clear"));
        assert_eq!(state.level(), 2);
        assert_eq!(state.drop_interval_ms(), 800);
    }

    #[test]
    fn test_line_goal_finishes_session() {
        let config = EngineConfig {
            line_goal: Some(1),
            ..EngineConfig::with_seed(3)
        };
        let mut state = GameState::with_config(config).unwrap();
        state.start();
        state.drain_events().for_each(drop);

        fill_row_except(&mut state, 19, &[0, 1, 2, 3]);
        put_active(&mut state, Tetromino { kind: PieceKind::I, rotation: Rotation::North, x: 0, y: 18 });
        state.hard_drop();

        assert!(state.finished());
        assert!(!state.game_over());
        assert!(!state.playable());
        assert!(state.active().is_none());
        let events: Vec<EngineEvent> = state.drain_events().collect();
        assert!(matches!(events.last(), Some(EngineEvent::GoalReached { lines: 1 })));

        // Frozen once finished.
        assert!(!state.tick(5000));
        assert_eq!(state.elapsed_ms(), 0);
    }

    #[test]
    fn test_block_out_on_spawn() {
        let mut state = GameState::new(12345);
        for x in 3..7 {
            state.board_mut().set(x, 0, Some(PieceKind::Z));
            state.board_mut().set(x, 1, Some(PieceKind::Z));
        }
        state.start();

        assert!(state.game_over());
        assert!(state.active().is_none());
        let events: Vec<EngineEvent> = state.drain_events().collect();
        assert_eq!(events, vec![EngineEvent::ToppedOut(TopOut::BlockOut)]);
    }

    #[test]
    fn test_lock_out_above_board() {
        let mut state = GameState::new(12345);
        state.start();
        state.drain_events().for_each(drop);
        for x in 3..6 {
            state.board_mut().set(x, 1, Some(PieceKind::Z));
        }
        put_active(&mut state, Tetromino { kind: PieceKind::T, rotation: Rotation::North, x: 3, y: -1 });
        state.lock_piece();

        assert!(state.game_over());
        let events: Vec<EngineEvent> = state.drain_events().collect();
        assert!(matches!(events[0], EngineEvent::Locked(_)));
        assert_eq!(events[1], EngineEvent::ToppedOut(TopOut::LockOut));
    }

    #[test]
    fn test_hold() {
        let mut state = GameState::new(12345);
        state.start();

        let initial_kind = state.active().unwrap().kind;

        // First hold (no previous hold)
        assert!(state.hold());
        assert_eq!(state.hold_piece(), Some(initial_kind));
        assert!(state.active().is_some());
        assert!(!state.can_hold());

        // Try to hold again (should fail)
        assert!(!state.hold());

        state.hard_drop();
        assert!(state.can_hold());
        let third_kind = state.active().unwrap().kind;
        assert!(state.hold());
        assert_eq!(state.active().unwrap().kind, initial_kind);
        assert_eq!(state.active().unwrap().y, 0);
        assert_eq!(state.hold_piece(), Some(third_kind));
    }

    #[test]
    fn test_pause_freezes_time() {
        let mut state = GameState::new(12345);
        assert!(!state.apply_action(GameAction::Pause));
        state.start();

        assert!(state.apply_action(GameAction::Pause));
        assert!(state.paused());
        assert!(!state.tick(5000));
        assert!(!state.apply_action(GameAction::MoveLeft));
        assert_eq!(state.elapsed_ms(), 0);

        assert!(state.apply_action(GameAction::Pause));
        assert!(!state.paused());
        state.tick(16);
        assert_eq!(state.elapsed_ms(), 16);
    }

    #[test]
    fn test_restart_increments_episode_id() {
        let mut state = GameState::new(12345);
        state.start();
        state.hard_drop();
        assert!(state.score() > 0);

        assert!(state.apply_action(GameAction::Restart));
        assert_eq!(state.episode_id(), 1);
        assert_eq!(state.score(), 0);
        assert!(state.board().is_empty());
        assert!(state.active().is_some());
    }

    #[test]
    fn test_step_applies_actions_before_gravity() {
        let mut state = GameState::new(12345);
        state.start();
        put_active(&mut state, Tetromino::new(PieceKind::O));

        assert!(state.step(&[GameAction::MoveLeft, GameAction::MoveLeft], 1000));
        let active = state.active().unwrap();
        assert_eq!((active.x, active.y), (1, 1));
    }

    #[test]
    fn test_snapshot() {
        let mut state = GameState::new(12345);
        state.start();
        let snap = state.snapshot();
        assert_eq!(snap.board.len(), 200);
        assert_eq!((snap.width, snap.height), (10, 20));
        assert_eq!(snap.next_queue.len(), 5);
        assert_eq!(snap.active.map(|a| a.kind), state.active().map(|a| a.kind));
        assert_eq!(snap.ghost_y, state.ghost_y());
        assert_eq!(snap.level, 1);
        assert!(snap.playable());
    }
}
