use blockfall::core::{GameSnapshot, GameState};
use blockfall::types::{GameAction, EMPTY_TAG};

fn board_tags(gs: &GameState) -> Vec<u8> {
    let mut tags = Vec::new();
    gs.board().write_tag_grid(&mut tags);
    tags
}

#[test]
fn snapshot_into_tracks_the_board() {
    let mut gs = GameState::new(1);
    gs.start();

    let mut snap = GameSnapshot::default();
    gs.snapshot_into(&mut snap);
    assert!(snap.board.iter().all(|&tag| tag == EMPTY_TAG));
    let first = gs.active().unwrap();
    assert_eq!(snap.active.map(|a| a.kind), Some(first.kind));

    gs.apply_action(GameAction::HardDrop);
    gs.tick(1000);

    gs.snapshot_into(&mut snap);
    assert_eq!(snap.board, board_tags(&gs));
    assert_eq!(
        snap.board.iter().filter(|&&tag| tag == first.kind.tag()).count(),
        4
    );
    assert_eq!(snap.cell(-1, 0), EMPTY_TAG);
}

#[test]
fn snapshot_into_reuses_buffers() {
    let mut gs = GameState::new(1);
    gs.start();

    let mut snap = GameSnapshot::default();
    gs.snapshot_into(&mut snap);
    let board_ptr = snap.board.as_ptr();
    let queue_ptr = snap.next_queue.as_ptr();

    gs.apply_action(GameAction::MoveLeft);
    gs.snapshot_into(&mut snap);
    assert_eq!(snap.board.as_ptr(), board_ptr);
    assert_eq!(snap.next_queue.as_ptr(), queue_ptr);
    assert_eq!(snap, gs.snapshot());
}

#[test]
fn snapshot_shows_ghost_and_lockdown() {
    let mut gs = GameState::new(6);
    gs.start();

    let snap = gs.snapshot();
    assert_eq!(snap.ghost_y, gs.ghost_y());
    assert!(snap.ghost_y.unwrap() > snap.active.unwrap().y);
    assert!(!snap.lockdown.grounded);
    assert!(snap.playable());

    while gs.soft_drop() {}
    let snap = gs.snapshot();
    assert!(snap.lockdown.grounded);
    assert_eq!(snap.ghost_y, Some(snap.active.unwrap().y));
    assert_eq!(snap.lockdown.time_left_ms, 500);
}
