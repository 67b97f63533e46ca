use crate::pieces::Tetromino;
use crate::types::{PieceKind, Rotation, EMPTY_TAG};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl From<Tetromino> for ActiveSnapshot {
    fn from(value: Tetromino) -> Self {
        Self {
            kind: value.kind,
            rotation: value.rotation,
            x: value.x,
            y: value.y,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LockdownSnapshot {
    pub grounded: bool,
    pub time_left_ms: u32,
    pub resets_used: u8,
}

/// Read-only view of a session for presentation layers.
///
/// Buffers are reused by [`GameState::snapshot_into`](crate::GameState::snapshot_into).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GameSnapshot {
    /// Row-major cell tags, `width * height` long.
    pub board: Vec<u8>,
    pub width: u8,
    pub height: u8,
    pub active: Option<ActiveSnapshot>,
    pub ghost_y: Option<i8>,
    pub hold: Option<PieceKind>,
    pub next_queue: Vec<PieceKind>,
    pub can_hold: bool,
    pub paused: bool,
    pub game_over: bool,
    pub finished: bool,
    pub episode_id: u32,
    pub seed: u32,
    pub piece_id: u32,
    pub score: u64,
    pub level: u32,
    pub lines: u32,
    pub combo: i32,
    pub back_to_back: bool,
    pub elapsed_ms: u64,
    pub drop_timer_ms: u32,
    pub lockdown: LockdownSnapshot,
}

impl GameSnapshot {
    /// Tag at (x, y); `EMPTY_TAG` outside the board.
    pub fn cell(&self, x: i8, y: i8) -> u8 {
        if x < 0 || y < 0 || x >= self.width as i8 || y >= self.height as i8 {
            return EMPTY_TAG;
        }
        let idx = y as usize * self.width as usize + x as usize;
        self.board.get(idx).copied().unwrap_or(EMPTY_TAG)
    }

    pub fn playable(&self) -> bool {
        !self.game_over && !self.finished && !self.paused
    }
}
