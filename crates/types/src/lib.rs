//! Plain data shared by every blockfall crate.
//!
//! Nothing here has behaviour beyond parsing and small conversions, so the
//! rules engine, the replay runner and any front end can agree on the same
//! piece, rotation and action vocabulary.
//!
//! Coordinates: x grows to the right, y grows downward. The default playfield
//! is 10 by 20; pieces spawn with their 4-wide box anchored at (3, 0).
//!
//! Gravity per 1-based level, in ms per row: 1000, 800, 650, 500, 400, 320,
//! 250, 200, 160, then 120 from level 10 on.
//!
//! ```
//! use blockfall_types::{GameAction, PieceKind, Rotation};
//!
//! assert_eq!(PieceKind::from_str("t"), Some(PieceKind::T));
//! assert_eq!(PieceKind::T.tag(), 3);
//! assert_eq!(Rotation::from_index(-3), Rotation::East);
//! assert_eq!(GameAction::from_str("ROTATE180"), Some(GameAction::Rotate180));
//! ```

use std::fmt;

/// Default playfield width.
pub const BOARD_WIDTH: u8 = 10;

/// Default playfield height.
pub const BOARD_HEIGHT: u8 = 20;

/// Frame length used by replay scripts when a frame gives none.
pub const TICK_MS: u32 = 16;

/// Lock delay when a piece is grounded (500ms)
pub const LOCK_DELAY_MS: u32 = 500;

/// Lock resets allowed before the timer stops extending.
pub const LOCK_RESET_LIMIT: u8 = 15;

/// Default lookahead depth of the next-piece queue
pub const DEFAULT_PREVIEW_DEPTH: usize = 5;

/// Gravity interval for levels 1 through 9.
pub const DROP_INTERVALS: [u32; 9] = [1000, 800, 650, 500, 400, 320, 250, 200, 160];

/// Gravity interval from level 10 on.
pub const DROP_INTERVAL_FLOOR_MS: u32 = 120;

/// Tag used for empty cells in exported grids.
pub const EMPTY_TAG: u8 = 0;

/// The seven tetromino piece kinds
///
/// - **I**: horizontal bar
/// - **O**: 2x2 square
/// - **T**: T-shaped
/// - **S**: S-shaped
/// - **Z**: Z-shaped (mirror of S)
/// - **J**: J-shaped
/// - **L**: L-shaped (mirror of J)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceKind {
    I,
    O,
    T,
    S,
    Z,
    J,
    L,
}

impl PieceKind {
    /// All kinds in canonical order (also the bag fill order).
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::O,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "o" => Some(PieceKind::O),
            "t" => Some(PieceKind::T),
            "s" => Some(PieceKind::S),
            "z" => Some(PieceKind::Z),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::O => "o",
            PieceKind::T => "t",
            PieceKind::S => "s",
            PieceKind::Z => "z",
            PieceKind::J => "j",
            PieceKind::L => "l",
        }
    }

    /// Uppercase letter used in callouts ("J-Spin", "T-Spin").
    pub fn letter(&self) -> char {
        match self {
            PieceKind::I => 'I',
            PieceKind::O => 'O',
            PieceKind::T => 'T',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
        }
    }

    /// Numeric cell tag (1-7). `EMPTY_TAG` (0) is never a piece.
    pub fn tag(&self) -> u8 {
        match self {
            PieceKind::I => 1,
            PieceKind::O => 2,
            PieceKind::T => 3,
            PieceKind::S => 4,
            PieceKind::Z => 5,
            PieceKind::J => 6,
            PieceKind::L => 7,
        }
    }

    /// Decode a numeric cell tag.
    ///
    /// ```
    /// use blockfall_types::{InvalidPieceType, PieceKind};
    ///
    /// assert_eq!(PieceKind::from_tag(3), Ok(PieceKind::T));
    /// assert_eq!(PieceKind::from_tag(0), Err(InvalidPieceType(0)));
    /// ```
    pub fn from_tag(tag: u8) -> Result<Self, InvalidPieceType> {
        match tag {
            1 => Ok(PieceKind::I),
            2 => Ok(PieceKind::O),
            3 => Ok(PieceKind::T),
            4 => Ok(PieceKind::S),
            5 => Ok(PieceKind::Z),
            6 => Ok(PieceKind::J),
            7 => Ok(PieceKind::L),
            other => Err(InvalidPieceType(other)),
        }
    }
}

/// A tag that does not name any of the seven piece kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidPieceType(pub u8);

impl fmt::Display for InvalidPieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid piece type tag {}", self.0)
    }
}

impl std::error::Error for InvalidPieceType {}

/// Rotation states following the Super Rotation System (SRS)
///
/// - **North**: Spawn orientation (state 0)
/// - **East**: Rotated 90° clockwise (state 1, "Right")
/// - **South**: Rotated 180° (state 2, "Reverse")
/// - **West**: Rotated 90° counter-clockwise (state 3, "Left")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rotation {
    North,
    East,
    South,
    West,
}

impl Rotation {
    /// Rotation state index (0-3)
    pub fn index(&self) -> usize {
        match self {
            Rotation::North => 0,
            Rotation::East => 1,
            Rotation::South => 2,
            Rotation::West => 3,
        }
    }

    /// Build a rotation from any integer, wrapping modulo 4.
    ///
    /// ```
    /// use blockfall_types::Rotation;
    ///
    /// assert_eq!(Rotation::from_index(0), Rotation::North);
    /// assert_eq!(Rotation::from_index(-1), Rotation::West);
    /// assert_eq!(Rotation::from_index(6), Rotation::South);
    /// ```
    pub fn from_index(index: i32) -> Self {
        match index.rem_euclid(4) {
            0 => Rotation::North,
            1 => Rotation::East,
            2 => Rotation::South,
            _ => Rotation::West,
        }
    }

    /// Rotate clockwise (90°)
    pub fn rotate_cw(&self) -> Self {
        match self {
            Rotation::North => Rotation::East,
            Rotation::East => Rotation::South,
            Rotation::South => Rotation::West,
            Rotation::West => Rotation::North,
        }
    }

    /// Rotate counter-clockwise (-90° or 270°)
    pub fn rotate_ccw(&self) -> Self {
        match self {
            Rotation::North => Rotation::West,
            Rotation::West => Rotation::South,
            Rotation::South => Rotation::East,
            Rotation::East => Rotation::North,
        }
    }

    /// Rotate by 180°
    pub fn rotate_180(&self) -> Self {
        self.rotate_cw().rotate_cw()
    }

    /// Parse rotation from string
    ///
    /// Accepts full names or single letters (case-insensitive):
    /// "north" | "n", "east" | "e", "south" | "s", "west" | "w"
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "north" | "n" => Some(Rotation::North),
            "east" | "e" => Some(Rotation::East),
            "south" | "s" => Some(Rotation::South),
            "west" | "w" => Some(Rotation::West),
            _ => None,
        }
    }

    /// Convert to lowercase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Rotation::North => "north",
            Rotation::East => "east",
            Rotation::South => "south",
            Rotation::West => "west",
        }
    }
}

/// Game actions that can be applied to modify game state
///
/// The engine receives these abstract actions; mapping raw keys or
/// controller input onto them happens outside the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameAction {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Drop piece one cell down (1 point per cell)
    SoftDrop,
    /// Instantly drop piece to lowest valid position and lock (2 points per cell)
    HardDrop,
    /// Rotate piece 90° clockwise
    RotateCw,
    /// Rotate piece 90° counter-clockwise
    RotateCcw,
    /// Rotate piece 180° (no kicks, in-place check only)
    Rotate180,
    /// Hold current piece (once per piece)
    Hold,
    /// Toggle pause state
    Pause,
    /// Restart the session with the same configuration
    Restart,
}

impl GameAction {
    /// Parse action from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::GameAction;
    ///
    /// assert_eq!(GameAction::from_str("moveLeft"), Some(GameAction::MoveLeft));
    /// assert_eq!(GameAction::from_str("rotate180"), Some(GameAction::Rotate180));
    /// assert_eq!(GameAction::from_str("unknown"), None);
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(GameAction::MoveLeft),
            "moveright" => Some(GameAction::MoveRight),
            "softdrop" => Some(GameAction::SoftDrop),
            "harddrop" => Some(GameAction::HardDrop),
            "rotatecw" => Some(GameAction::RotateCw),
            "rotateccw" => Some(GameAction::RotateCcw),
            "rotate180" => Some(GameAction::Rotate180),
            "hold" => Some(GameAction::Hold),
            "pause" => Some(GameAction::Pause),
            "restart" => Some(GameAction::Restart),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            GameAction::MoveLeft => "moveLeft",
            GameAction::MoveRight => "moveRight",
            GameAction::SoftDrop => "softDrop",
            GameAction::HardDrop => "hardDrop",
            GameAction::RotateCw => "rotateCw",
            GameAction::RotateCcw => "rotateCcw",
            GameAction::Rotate180 => "rotate180",
            GameAction::Hold => "hold",
            GameAction::Pause => "pause",
            GameAction::Restart => "restart",
        }
    }
}

/// Spin classification of a locking piece.
///
/// - **None**: no spin
/// - **TSpin**: T piece rotated into a pocket with 3+ corners filled;
///   `mini` unless both front corners are filled
/// - **Spin**: J/L/S/Z rotated into a spot where it can move neither left,
///   right nor down
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SpinResult {
    #[default]
    None,
    TSpin { mini: bool },
    Spin(PieceKind),
}

impl SpinResult {
    /// Short label ("t-spin", "t-spin-mini", "j-spin"); `None` for no spin.
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            SpinResult::None => None,
            SpinResult::TSpin { mini: false } => Some("t-spin"),
            SpinResult::TSpin { mini: true } => Some("t-spin-mini"),
            SpinResult::Spin(PieceKind::J) => Some("j-spin"),
            SpinResult::Spin(PieceKind::L) => Some("l-spin"),
            SpinResult::Spin(PieceKind::S) => Some("s-spin"),
            SpinResult::Spin(PieceKind::Z) => Some("z-spin"),
            SpinResult::Spin(PieceKind::I) => Some("i-spin"),
            SpinResult::Spin(PieceKind::O) => Some("o-spin"),
            SpinResult::Spin(PieceKind::T) => Some("t-spin"),
        }
    }

    pub fn is_spin(&self) -> bool {
        !matches!(self, SpinResult::None)
    }
}

/// How a piece was dropped, for drop points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropKind {
    /// 1 point per cell
    Soft,
    /// 2 points per cell
    Hard,
}

impl DropKind {
    pub fn points_per_cell(&self) -> u32 {
        match self {
            DropKind::Soft => 1,
            DropKind::Hard => 2,
        }
    }
}

/// A cell on the game board
///
/// - `None`: Empty cell
/// - `Some(PieceKind)`: Cell filled with the specified piece kind
pub type Cell = Option<PieceKind>;

/// Line clear base points (guideline), indexed by lines cleared.
///
/// Points are multiplied by the current level.
pub const LINE_SCORES: [u32; 5] = [0, 100, 300, 500, 800];

/// Full T-spin base points for 0-3 lines.
pub const TSPIN_SCORES: [u32; 4] = [400, 800, 1200, 1600];

/// Mini T-spin base points for 0-2 lines (3 lines is undefined and scores 0).
pub const TSPIN_MINI_SCORES: [u32; 3] = [100, 200, 400];

/// Combo scoring base value (50 points per combo step, times level)
pub const COMBO_BASE: u32 = 50;

/// Back-to-back bonus numerator (3/2 = 1.5x multiplier, floored)
pub const B2B_NUMERATOR: u32 = 3;

/// Back-to-back bonus denominator
pub const B2B_DENOMINATOR: u32 = 2;
