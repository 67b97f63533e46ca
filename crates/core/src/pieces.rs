//! Pieces module - Tetromino shapes and SRS rotation system
//!
//! Implements the Super Rotation System (SRS) with wall kick tables.
//! Reference: https://tetris.wiki/SRS
//!
//! The published kick tables use a y-up convention. Board coordinates grow
//! downward, so every table below is converted once, at compile time, by
//! `flip_vertical`. Lookups never adjust signs.

use tracing::error;

use crate::board::Board;
use crate::collision::collides;
use crate::types::{PieceKind, Rotation};

/// Offset of a single mino relative to piece origin
pub type MinoOffset = (i8, i8);

/// Shape of a piece - 4 mino offsets from piece origin
pub type PieceShape = [MinoOffset; 4];

/// Candidate (dx, dy) translation tried during a rotation, board coordinates.
pub type KickOffset = (i8, i8);

/// Spawn position for new pieces (x, y) on a 10-wide board
pub const SPAWN_POSITION: (i8, i8) = (3, 0);

/// Spawn column for a board of the given width (centres the 4-wide box).
pub fn spawn_x(board_width: u8) -> i8 {
    ((board_width as i16 - 4) / 2) as i8
}

/// Active falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tetromino {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
}

impl Tetromino {
    /// Create a new tetromino at the spawn position of a 10-wide board
    pub fn new(kind: PieceKind) -> Self {
        Self {
            kind,
            rotation: Rotation::North,
            x: SPAWN_POSITION.0,
            y: SPAWN_POSITION.1,
        }
    }

    /// Spawn position for a board of the given width.
    pub fn spawn(kind: PieceKind, board_width: u8) -> Self {
        Self {
            x: spawn_x(board_width),
            ..Self::new(kind)
        }
    }

    /// Get the shape (mino offsets) for current rotation
    pub fn shape(&self) -> PieceShape {
        get_shape(self.kind, self.rotation)
    }

    /// Whether the piece shifted by (dx, dy) would collide.
    pub fn collides_at(&self, board: &Board, dx: i8, dy: i8) -> bool {
        collides(board, &self.shape(), self.x, self.y, dx, dy)
    }

    /// Check that no mino overlaps a wall, the floor or a filled cell
    pub fn is_valid(&self, board: &Board) -> bool {
        !self.collides_at(board, 0, 0)
    }

    /// Check if the piece is grounded (cannot fall one row)
    pub fn is_grounded(&self, board: &Board) -> bool {
        self.collides_at(board, 0, 1)
    }
}

/// Get the shape (mino offsets) for a piece kind and rotation
pub fn get_shape(kind: PieceKind, rotation: Rotation) -> PieceShape {
    match kind {
        PieceKind::I => get_i_shape(rotation),
        PieceKind::O => get_o_shape(rotation),
        PieceKind::T => get_t_shape(rotation),
        PieceKind::S => get_s_shape(rotation),
        PieceKind::Z => get_z_shape(rotation),
        PieceKind::J => get_j_shape(rotation),
        PieceKind::L => get_l_shape(rotation),
    }
}

/// Shape lookup by raw cell tag.
pub fn shape_for_tag(tag: u8, rotation: Rotation) -> Result<PieceShape, crate::EngineError> {
    let kind = PieceKind::from_tag(tag)?;
    Ok(get_shape(kind, rotation))
}

/// Get initial shape for a new piece at spawn position
pub fn get_spawn_shape(kind: PieceKind) -> PieceShape {
    get_shape(kind, Rotation::North)
}

/// I piece shapes
fn get_i_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        // N: horizontal, row 1
        Rotation::North => [(0, 1), (1, 1), (2, 1), (3, 1)],
        // E: vertical, column 2
        Rotation::East => [(2, 0), (2, 1), (2, 2), (2, 3)],
        // S: horizontal, row 2
        Rotation::South => [(0, 2), (1, 2), (2, 2), (3, 2)],
        // W: vertical, column 1
        Rotation::West => [(1, 0), (1, 1), (1, 2), (1, 3)],
    }
}

/// O piece shapes (same for all rotations)
fn get_o_shape(_rotation: Rotation) -> PieceShape {
    [(1, 0), (2, 0), (1, 1), (2, 1)]
}

fn get_t_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(1, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (1, 1), (2, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (1, 2)],
        Rotation::West => [(1, 0), (0, 1), (1, 1), (1, 2)],
    }
}

fn get_s_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(1, 0), (2, 0), (0, 1), (1, 1)],
        Rotation::East => [(1, 0), (1, 1), (2, 1), (2, 2)],
        Rotation::South => [(1, 1), (2, 1), (0, 2), (1, 2)],
        Rotation::West => [(0, 0), (0, 1), (1, 1), (1, 2)],
    }
}

fn get_z_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 0), (1, 0), (1, 1), (2, 1)],
        Rotation::East => [(2, 0), (1, 1), (2, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (1, 2), (2, 2)],
        Rotation::West => [(1, 0), (0, 1), (1, 1), (0, 2)],
    }
}

fn get_j_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(0, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (2, 0), (1, 1), (1, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (2, 2)],
        Rotation::West => [(1, 0), (1, 1), (0, 2), (1, 2)],
    }
}

fn get_l_shape(rotation: Rotation) -> PieceShape {
    match rotation {
        Rotation::North => [(2, 0), (0, 1), (1, 1), (2, 1)],
        Rotation::East => [(1, 0), (1, 1), (1, 2), (2, 2)],
        Rotation::South => [(0, 1), (1, 1), (2, 1), (0, 2)],
        Rotation::West => [(0, 0), (1, 0), (1, 1), (1, 2)],
    }
}

/// Kick table family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KickFamily {
    I,
    O,
    /// Shared by J, L, S, T, Z
    Jlstz,
}

impl KickFamily {
    pub fn of(kind: PieceKind) -> Self {
        match kind {
            PieceKind::I => KickFamily::I,
            PieceKind::O => KickFamily::O,
            PieceKind::T | PieceKind::S | PieceKind::Z | PieceKind::J | PieceKind::L => {
                KickFamily::Jlstz
            }
        }
    }
}

/// Row order shared by every table:
/// 0->R, R->0, R->2, 2->R, 2->L, L->2, L->0, 0->L
const fn transition_index(from: Rotation, to: Rotation) -> Option<usize> {
    match (from, to) {
        (Rotation::North, Rotation::East) => Some(0),
        (Rotation::East, Rotation::North) => Some(1),
        (Rotation::East, Rotation::South) => Some(2),
        (Rotation::South, Rotation::East) => Some(3),
        (Rotation::South, Rotation::West) => Some(4),
        (Rotation::West, Rotation::South) => Some(5),
        (Rotation::West, Rotation::North) => Some(6),
        (Rotation::North, Rotation::West) => Some(7),
        _ => None,
    }
}

/// Negate the vertical component of every offset (y-up table -> board coordinates).
const fn flip_vertical<const K: usize>(table: [[KickOffset; K]; 8]) -> [[KickOffset; K]; 8] {
    let mut out = table;
    let mut i = 0;
    while i < 8 {
        let mut j = 0;
        while j < K {
            out[i][j].1 = -table[i][j].1;
            j += 1;
        }
        i += 1;
    }
    out
}

/// JLSTZ kicks as published (y up).
const JLSTZ_KICKS_Y_UP: [[KickOffset; 5]; 8] = [
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
];

/// I kicks as published (y up).
const I_KICKS_Y_UP: [[KickOffset; 5]; 8] = [
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    [(0, 0), (1, 0), (-2, 0), (1, -2), (-2, 1)],
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
];

/// O never kicks.
const O_KICKS_Y_UP: [[KickOffset; 1]; 8] = [[(0, 0)]; 8];

const JLSTZ_KICKS: [[KickOffset; 5]; 8] = flip_vertical(JLSTZ_KICKS_Y_UP);
const I_KICKS: [[KickOffset; 5]; 8] = flip_vertical(I_KICKS_Y_UP);
const O_KICKS: [[KickOffset; 1]; 8] = flip_vertical(O_KICKS_Y_UP);

/// Used for transitions without a table entry (180° turns): check in place only.
const IN_PLACE: [KickOffset; 1] = [(0, 0)];

/// Ordered kick offsets for a rotation transition, in board coordinates.
///
/// Rotations are compared as given; transitions with no entry (180° or
/// identity) fall back to a single `(0, 0)` trial.
pub fn kick_offsets(family: KickFamily, from: Rotation, to: Rotation) -> &'static [KickOffset] {
    let Some(i) = transition_index(from, to) else {
        return &IN_PLACE;
    };
    match family {
        KickFamily::I => &I_KICKS[i],
        KickFamily::O => &O_KICKS[i],
        KickFamily::Jlstz => &JLSTZ_KICKS[i],
    }
}

/// Kick lookup by raw cell tag and rotation indices (wrapped modulo 4).
///
/// An unknown tag is a data error: it trips a debug assertion, and in release
/// builds yields an empty list so the rotation fails without moving anything.
pub fn kick_offsets_for_tag(tag: u8, from: i32, to: i32) -> &'static [KickOffset] {
    match PieceKind::from_tag(tag) {
        Ok(kind) => kick_offsets(
            KickFamily::of(kind),
            Rotation::from_index(from),
            Rotation::from_index(to),
        ),
        Err(err) => {
            error!(%err, "kick lookup with unknown piece tag");
            debug_assert!(false, "{}", err);
            &[]
        }
    }
}

/// Successful rotation result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationOutcome {
    pub rotation: Rotation,
    pub x: i8,
    pub y: i8,
    /// Offset that was applied.
    pub kick: KickOffset,
    /// Position of that offset in the kick list (0 = no kick).
    pub kick_index: usize,
}

/// Try to rotate a piece with wall kicks
///
/// Each offset is tried in order against the target rotation's shape; the first
/// one that does not collide wins. Returns None if every offset collides, in
/// which case the caller keeps the piece as it was.
pub fn try_rotate(
    kind: PieceKind,
    from: Rotation,
    to: Rotation,
    board: &Board,
    x: i8,
    y: i8,
) -> Option<RotationOutcome> {
    let new_shape = get_shape(kind, to);
    let kicks = kick_offsets(KickFamily::of(kind), from, to);

    kicks
        .iter()
        .copied()
        .enumerate()
        .find(|&(_, (dx, dy))| !collides(board, &new_shape, x, y, dx, dy))
        .map(|(kick_index, (dx, dy))| RotationOutcome {
            rotation: to,
            x: x + dx,
            y: y + dy,
            kick: (dx, dy),
            kick_index,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tetromino_grounding_on_empty_board() {
        let board = Board::new();
        let mut piece = Tetromino::spawn(PieceKind::T, board.width());
        assert!(piece.is_valid(&board));
        assert!(!piece.is_grounded(&board));

        // North T occupies rows y and y + 1.
        piece.y = 18;
        assert!(piece.is_grounded(&board));
        assert!(piece.collides_at(&board, 0, 1));
    }

    #[test]
    fn test_tables_are_flipped_once() {
        // 0->R third JLSTZ test is (-1, +1) up, i.e. one row up on the board.
        let kicks = kick_offsets(KickFamily::Jlstz, Rotation::North, Rotation::East);
        assert_eq!(kicks, &[(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)]);

        let kicks = kick_offsets(KickFamily::I, Rotation::North, Rotation::East);
        assert_eq!(kicks, &[(0, 0), (-2, 0), (1, 0), (-2, 1), (1, -2)]);

        let kicks = kick_offsets(KickFamily::O, Rotation::West, Rotation::North);
        assert_eq!(kicks, &[(0, 0)]);
    }

    #[test]
    fn test_reverse_transitions_negate() {
        let families = [KickFamily::I, KickFamily::Jlstz];
        let pairs = [
            (Rotation::North, Rotation::East),
            (Rotation::East, Rotation::South),
            (Rotation::South, Rotation::West),
            (Rotation::West, Rotation::North),
        ];
        for family in families {
            for (a, b) in pairs {
                let fwd = kick_offsets(family, a, b);
                let back = kick_offsets(family, b, a);
                for (f, r) in fwd.iter().zip(back) {
                    assert_eq!((f.0, f.1), (-r.0, -r.1), "{:?} {:?}->{:?}", family, a, b);
                }
            }
        }
    }

    #[test]
    fn test_missing_entry_is_in_place() {
        assert_eq!(
            kick_offsets(KickFamily::Jlstz, Rotation::North, Rotation::South),
            &[(0, 0)]
        );
        assert_eq!(
            kick_offsets(KickFamily::I, Rotation::East, Rotation::East),
            &[(0, 0)]
        );
    }

    #[test]
    fn test_kick_lookup_by_tag_wraps_rotation() {
        assert_eq!(
            kick_offsets_for_tag(PieceKind::T.tag(), 4, 5),
            kick_offsets(KickFamily::Jlstz, Rotation::North, Rotation::East)
        );
        assert_eq!(
            kick_offsets_for_tag(PieceKind::I.tag(), -1, 0),
            kick_offsets(KickFamily::I, Rotation::West, Rotation::North)
        );
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "invalid piece type tag")]
    fn test_kick_lookup_unknown_tag_asserts_in_debug() {
        let _ = kick_offsets_for_tag(42, 0, 1);
    }

    #[test]
    #[cfg(not(debug_assertions))]
    fn test_kick_lookup_unknown_tag_is_empty_in_release() {
        assert!(kick_offsets_for_tag(42, 0, 1).is_empty());
    }

    #[test]
    fn test_shape_for_tag() {
        assert_eq!(
            shape_for_tag(PieceKind::L.tag(), Rotation::East),
            Ok(get_shape(PieceKind::L, Rotation::East))
        );
        assert_eq!(
            shape_for_tag(0, Rotation::East),
            Err(crate::EngineError::InvalidPieceType(0))
        );
    }

    #[test]
    fn test_spawn_x() {
        assert_eq!(spawn_x(10), SPAWN_POSITION.0);
        assert_eq!(spawn_x(4), 0);
        assert_eq!(spawn_x(12), 4);
    }

    #[test]
    fn test_failed_rotation_returns_none() {
        // Fill everything except the I piece's current row so no kick fits.
        let mut board = Board::with_size(4, 4).unwrap();
        for y in 0..4 {
            for x in 0..4 {
                if y != 1 {
                    board.set(x, y, Some(PieceKind::Z));
                }
            }
        }
        let result = try_rotate(
            PieceKind::I,
            Rotation::North,
            Rotation::East,
            &board,
            0,
            0,
        );
        assert_eq!(result, None);
    }
}
