//! One-shot placement: hold, rotate, shift, hard drop.

use std::fmt;

use blockfall_core::pieces::PieceShape;
use blockfall_core::GameState;
use blockfall_types::GameAction::{self, Rotate180, RotateCcw, RotateCw};
use blockfall_types::Rotation;

/// Why a placement request was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceError {
    HoldUnavailable,
    RotationBlocked,
    XOutOfBounds,
    XBlocked,
    NotPlayable,
    NoActive,
}

impl PlaceError {
    /// Stable machine-readable code.
    pub fn code(self) -> &'static str {
        match self {
            PlaceError::HoldUnavailable => "hold_unavailable",
            _ => "invalid_place",
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            PlaceError::HoldUnavailable => "hold already used for this piece",
            PlaceError::RotationBlocked => "target rotation is unreachable",
            PlaceError::XOutOfBounds => "target column puts the piece outside the board",
            PlaceError::XBlocked => "path to the target column is obstructed",
            PlaceError::NotPlayable => "session is not accepting input",
            PlaceError::NoActive => "no piece in play",
        }
    }
}

impl fmt::Display for PlaceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code(), self.message())
    }
}

impl std::error::Error for PlaceError {}

/// Action sequences that turn a piece by `quarter_turns` clockwise, preferred first.
fn rotation_paths(quarter_turns: i32) -> &'static [&'static [GameAction]] {
    match quarter_turns.rem_euclid(4) {
        0 => &[&[]],
        1 => &[&[RotateCw], &[RotateCcw, RotateCcw, RotateCcw]],
        2 => &[&[RotateCw, RotateCw], &[RotateCcw, RotateCcw], &[Rotate180]],
        _ => &[&[RotateCcw], &[RotateCw, RotateCw, RotateCw]],
    }
}

/// Leftmost and rightmost mino columns of `shape`, relative to its anchor.
fn column_span(shape: &PieceShape) -> (i8, i8) {
    shape
        .iter()
        .fold((i8::MAX, i8::MIN), |(lo, hi), &(dx, _)| (lo.min(dx), hi.max(dx)))
}

/// Turn the active piece to `target`, leaving the session untouched on failure.
fn rotate_into(state: &mut GameState, target: Rotation) -> Result<(), PlaceError> {
    let current = state.active().ok_or(PlaceError::NoActive)?.rotation;
    let turns = target.index() as i32 - current.index() as i32;

    let start = state.clone();
    for path in rotation_paths(turns) {
        let reached = path.iter().all(|&action| state.apply_action(action))
            && state.active().is_some_and(|piece| piece.rotation == target);
        if reached {
            return Ok(());
        }
        *state = start.clone();
    }
    Err(PlaceError::RotationBlocked)
}

/// Hold (optionally), rotate to `rotation`, shift to column `x`, hard drop.
///
/// `x` is the anchor column of the piece's bounding box, as in
/// [`Tetromino::x`](blockfall_core::Tetromino). A refused placement leaves the
/// session exactly as it was.
pub fn apply_place(
    state: &mut GameState,
    x: i8,
    rotation: Rotation,
    hold: bool,
) -> Result<(), PlaceError> {
    if !state.playable() {
        return Err(PlaceError::NotPlayable);
    }

    let start = state.clone();
    let placed = place(state, x, rotation, hold);
    if placed.is_err() {
        *state = start;
    }
    placed
}

fn place(state: &mut GameState, x: i8, rotation: Rotation, hold: bool) -> Result<(), PlaceError> {
    if hold && !state.apply_action(GameAction::Hold) {
        return Err(PlaceError::HoldUnavailable);
    }

    rotate_into(state, rotation)?;

    let piece = state.active().ok_or(PlaceError::NoActive)?;
    let (left, right) = column_span(&piece.shape());
    let target = i16::from(x);
    if target + i16::from(left) < 0
        || target + i16::from(right) >= i16::from(state.board().width())
    {
        return Err(PlaceError::XOutOfBounds);
    }

    let shift = target - i16::from(piece.x);
    for _ in 0..shift.unsigned_abs() {
        if !state.try_move(shift.signum() as i8, 0) {
            return Err(PlaceError::XBlocked);
        }
    }

    if state.apply_action(GameAction::HardDrop) {
        Ok(())
    } else {
        Err(PlaceError::NotPlayable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockfall_core::get_shape;
    use blockfall_types::PieceKind;

    fn started(seed: u32) -> GameState {
        let mut gs = GameState::new(seed);
        gs.start();
        gs
    }

    #[test]
    fn paused_session_refuses_placement() {
        let mut gs = started(1);
        assert!(gs.apply_action(GameAction::Pause));

        let piece = gs.active().unwrap();
        let err = apply_place(&mut gs, piece.x, piece.rotation, false).unwrap_err();
        assert_eq!(err, PlaceError::NotPlayable);
        assert_eq!(err.to_string(), "invalid_place: session is not accepting input");
    }

    #[test]
    fn column_outside_the_board_is_refused() {
        let mut gs = started(1);
        let rotation = gs.active().unwrap().rotation;
        assert_eq!(
            apply_place(&mut gs, -50, rotation, false),
            Err(PlaceError::XOutOfBounds)
        );
        assert_eq!(
            apply_place(&mut gs, 9, rotation, false),
            Err(PlaceError::XOutOfBounds)
        );
        for x in [i8::MIN, i8::MAX] {
            assert_eq!(
                apply_place(&mut gs, x, rotation, false),
                Err(PlaceError::XOutOfBounds)
            );
        }
    }

    #[test]
    fn refused_hold_and_place_restores_the_session() {
        let mut gs = started(5);
        for y in 0..20 {
            gs.board_mut().set(0, y, Some(PieceKind::I));
        }
        let incoming = gs.preview().next().unwrap();
        let (left, _) = column_span(&get_shape(incoming, Rotation::North));
        let before = gs.snapshot();

        let err = apply_place(&mut gs, -left, Rotation::North, true).unwrap_err();
        assert_eq!(err, PlaceError::XBlocked);
        assert_eq!(gs.snapshot(), before);
        assert!(gs.can_hold());
        assert_eq!(gs.hold_piece(), None);
    }

    #[test]
    fn obstructed_path_is_refused() {
        let mut gs = started(1);
        let piece = gs.active().unwrap();
        for (dx, dy) in piece.shape() {
            gs.board_mut()
                .set(piece.x + dx - 1, piece.y + dy, Some(PieceKind::I));
        }

        let err = apply_place(&mut gs, piece.x - 1, piece.rotation, false).unwrap_err();
        assert_eq!(err, PlaceError::XBlocked);
        assert_eq!(gs.pieces_locked(), 0);
    }

    #[test]
    fn rotates_shifts_and_locks_against_the_left_wall() {
        let mut gs = started(1);
        let kind = gs.active().unwrap().kind;
        let (left, _) = column_span(&get_shape(kind, Rotation::East));

        apply_place(&mut gs, -left, Rotation::East, false).unwrap();

        assert_eq!(gs.pieces_locked(), 1);
        assert!((0..20).any(|y| gs.board().is_occupied(0, y)));
    }

    #[test]
    fn hold_swaps_before_placing() {
        let mut gs = started(9);
        let first = gs.active().unwrap().kind;

        apply_place(&mut gs, 3, Rotation::North, true).unwrap();
        assert_eq!(gs.hold_piece(), Some(first));
        assert_eq!(gs.pieces_locked(), 1);
        assert!(gs.can_hold());
    }

    #[test]
    fn second_hold_for_the_same_piece_is_refused() {
        let mut gs = started(3);
        assert!(gs.apply_action(GameAction::Hold));

        let err = apply_place(&mut gs, 3, Rotation::North, true).unwrap_err();
        assert_eq!(err, PlaceError::HoldUnavailable);
        assert_eq!(err.code(), "hold_unavailable");
        assert_eq!(gs.pieces_locked(), 0);
    }

    #[test]
    fn half_turns_have_three_routes() {
        assert_eq!(rotation_paths(2).len(), 3);
        assert_eq!(rotation_paths(-1), rotation_paths(3));
        assert!(rotation_paths(4)[0].is_empty());
    }

    #[test]
    fn span_of_common_shapes() {
        assert_eq!(column_span(&get_shape(PieceKind::I, Rotation::East)), (2, 2));
        assert_eq!(column_span(&get_shape(PieceKind::T, Rotation::North)), (0, 2));
    }
}
