//! Collision detection between a piece shape and the board.

use crate::board::Board;
use crate::pieces::PieceShape;

/// Whether `shape` placed at `(anchor + offset)` overlaps a wall, the floor or
/// an occupied cell. Rows above the board never collide.
#[inline]
pub fn collides(
    board: &Board,
    shape: &PieceShape,
    anchor_x: i8,
    anchor_y: i8,
    offset_x: i8,
    offset_y: i8,
) -> bool {
    let x = anchor_x + offset_x;
    let y = anchor_y + offset_y;
    shape
        .iter()
        .any(|&(mx, my)| board.is_blocked(x + mx, y + my))
}
