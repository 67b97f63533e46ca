//! Spin classification for a locking piece.
//!
//! T pieces use the 3-corner rule: at least three of the four diagonal cells
//! around the bounding-box centre must be filled, and the result is a full
//! T-spin only when both corners on the pointing side are filled. J, L, S and
//! Z get a generic spin when they cannot move left, right or down.

use crate::board::Board;
use crate::pieces::Tetromino;
use crate::types::{PieceKind, Rotation, SpinResult};

/// Diagonal cells around the T's centre (anchor + 1, anchor + 1).
const T_CORNERS: [(i8, i8); 4] = [(0, 0), (2, 0), (0, 2), (2, 2)];

/// Corners on the pointing side, indexed by rotation state.
const T_FRONT_CORNERS: [[(i8, i8); 2]; 4] = [
    // North: points up
    [(0, 0), (2, 0)],
    // East: points right
    [(2, 0), (2, 2)],
    // South: points down
    [(0, 2), (2, 2)],
    // West: points left
    [(0, 0), (0, 2)],
];

/// Classify the spin of `piece` at its current position.
///
/// Returns `SpinResult::None` unless the last successful action on the piece was
/// a rotation.
pub fn classify(board: &Board, piece: &Tetromino, last_action_was_rotation: bool) -> SpinResult {
    if !last_action_was_rotation {
        return SpinResult::None;
    }

    match piece.kind {
        PieceKind::T => classify_t(board, piece.x, piece.y, piece.rotation),
        PieceKind::J | PieceKind::L | PieceKind::S | PieceKind::Z => {
            let immobile = piece.collides_at(board, -1, 0)
                && piece.collides_at(board, 1, 0)
                && piece.collides_at(board, 0, 1);
            if immobile {
                SpinResult::Spin(piece.kind)
            } else {
                SpinResult::None
            }
        }
        PieceKind::I | PieceKind::O => SpinResult::None,
    }
}

fn classify_t(board: &Board, x: i8, y: i8, rotation: Rotation) -> SpinResult {
    // Off-board sides and below the floor count as filled; above the board does not.
    let filled = |(cx, cy): (i8, i8)| board.is_blocked(x + cx, y + cy);

    let corners = T_CORNERS.iter().copied().filter(|&c| filled(c)).count();
    if corners < 3 {
        return SpinResult::None;
    }

    let front = T_FRONT_CORNERS[rotation.index()];
    let mini = !front.iter().copied().all(filled);
    SpinResult::TSpin { mini }
}
