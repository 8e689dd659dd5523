//! Turn scheduler scenarios: quitting, dying with and without a
//! snapshot, portals, level transitions and manual control.

use pacmaze_core::{
    collaborator::{DrawMode, NullRenderer, QueuedInput},
    config::GameConfig,
    error::GameError,
    event::{ActorId, GameEvent},
    scheduler::{Phase, RunOutcome, TurnScheduler},
    types::Position,
};
use std::fs;
use tempfile::TempDir;

fn level_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    for (name, body) in files {
        fs::write(dir.path().join(name), body).expect("write level file");
    }
    dir
}

fn scheduler(dir: &TempDir) -> TurnScheduler {
    let _ = env_logger::builder().is_test(true).try_init();
    TurnScheduler::open(dir.path(), GameConfig::default().with_seed(1)).expect("open scheduler")
}

/// One state-machine step with no keys waiting.
fn step(s: &mut TurnScheduler, renderer: &mut NullRenderer) -> Vec<GameEvent> {
    s.advance(&mut QueuedInput::default(), renderer).expect("advance")
}

fn pacman_position(s: &TurnScheduler) -> Position {
    s.state().expect("level loaded").pacman.actor.position
}

#[test]
fn scripted_quit_terminates_without_death() {
    let dir = level_dir(&[
        ("a.lvl", "DIM 4 5\nTEMPO 0\nPAC pac.p\nXXXXX\nXoooX\nXoooX\nXXXXX\n"),
        ("pac.p", "PASSO 1\nPOS 1 3\nA A S Q\n"),
    ]);
    let mut s = scheduler(&dir);
    let mut renderer = NullRenderer::default();

    let mut events = Vec::new();
    while s.phase() != Phase::Terminated {
        events.extend(step(&mut s, &mut renderer));
    }

    let moves: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::ActorMoved { actor: ActorId::Pacman, from, to, .. } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        moves,
        vec![
            (Position::new(1, 3), Position::new(1, 2)),
            (Position::new(1, 2), Position::new(1, 1)),
            (Position::new(1, 1), Position::new(2, 1)),
        ]
    );

    let summary = s.summary();
    assert_eq!(summary.outcome, Some(RunOutcome::Quit));
    assert_eq!(summary.points, 3);
    // PASSO 1 idles every other turn: four steps take eight turns.
    assert_eq!(summary.turns, 8);
    assert!(s.state().expect("state").pacman.actor.alive);
    assert!(!events.iter().any(|e| matches!(e, GameEvent::GameOver { .. })));
    assert!(events.iter().any(|e| matches!(e, GameEvent::QuitRequested { turn: 8 })));
}

/// Pacman saves on its first step, then walks right into a ghost that
/// never moves.
fn doomed_run() -> TempDir {
    level_dir(&[
        ("a.lvl", "DIM 3 7\nTEMPO 0\nPAC pac.p\nMON ghost.m\nXXXXXXX\nX.oo..X\nXXXXXXX\n"),
        ("pac.p", "PASSO 0\nPOS 1 1\nG D D D D\n"),
        ("ghost.m", "PASSO 0\nPOS 1 5\nT 100\n"),
    ])
}

#[test]
fn death_with_snapshot_restores_it_and_keeps_playing() {
    let dir = doomed_run();
    let mut s = scheduler(&dir);
    let mut renderer = NullRenderer::default();

    step(&mut s, &mut renderer); // load
    let events = step(&mut s, &mut renderer); // G
    assert!(events.contains(&GameEvent::SnapshotCaptured { turn: 1 }));
    let saved = s.snapshots().held().cloned().expect("snapshot held");

    for _ in 0..3 {
        step(&mut s, &mut renderer);
    }
    assert_eq!(pacman_position(&s), Position::new(1, 4));
    assert_eq!(s.state().expect("state").pacman.points, 2);

    let events = step(&mut s, &mut renderer); // D into the ghost
    assert!(events.iter().any(|e| matches!(e, GameEvent::PacmanDied { ghost: 0, .. })));
    assert!(events.contains(&GameEvent::SnapshotRestored { turn: 5, captured_at: 1 }));
    assert_eq!(s.phase(), Phase::Playing);
    assert!(!s.snapshots().is_held());
    assert_eq!(s.state(), Some(&saved.state));
    assert_eq!(s.state().expect("state").board.dot_count(), 2);
}

#[test]
fn second_death_without_snapshot_is_game_over() {
    let dir = doomed_run();
    let mut s = scheduler(&dir);
    let mut renderer = NullRenderer::default();

    // load, save, three steps, death + restore, four steps to die again
    for _ in 0..10 {
        step(&mut s, &mut renderer);
    }
    assert_eq!(s.phase(), Phase::GameOver);
    assert!(!s.state().expect("state").pacman.actor.alive);
    assert_eq!(renderer.frames.last(), Some(&DrawMode::GameOver));

    let events = step(&mut s, &mut renderer);
    assert_eq!(s.phase(), Phase::Terminated);
    assert_eq!(s.summary().outcome, Some(RunOutcome::GameOver));
    assert!(matches!(events.as_slice(), [GameEvent::RunFinished { points: 2, .. }]));
}

#[test]
fn death_without_snapshot_is_game_over() {
    let dir = level_dir(&[
        ("a.lvl", "DIM 3 4\nTEMPO 0\nPAC pac.p\nMON ghost.m\nXXXX\nX..X\nXXXX\n"),
        ("pac.p", "PASSO 0\nPOS 1 1\nD\n"),
        ("ghost.m", "PASSO 0\nPOS 1 2\nT 5\n"),
    ]);
    let mut s = scheduler(&dir);
    let mut renderer = NullRenderer::default();

    step(&mut s, &mut renderer);
    let events = step(&mut s, &mut renderer);
    assert!(events.iter().any(|e| matches!(e, GameEvent::GameOver { turn: 1, .. })));
    assert_eq!(s.phase(), Phase::GameOver);
}

#[test]
fn ghost_stepping_onto_manual_pacman_kills_it() {
    let dir = level_dir(&[
        ("a.lvl", "DIM 3 5\nTEMPO 0\nMON ghost.m\nXXXXX\nX...X\nXXXXX\n"),
        ("ghost.m", "PASSO 0\nPOS 1 3\nA\n"),
    ]);
    let mut s = scheduler(&dir);
    let mut renderer = NullRenderer::default();
    let mut keys = QueuedInput::new(['W', 'W']);

    s.advance(&mut keys, &mut renderer).expect("load");
    s.advance(&mut keys, &mut renderer).expect("turn 1");
    assert_eq!(pacman_position(&s), Position::new(1, 1), "wall absorbs W");
    assert_eq!(s.state().expect("state").ghosts[0].actor.position, Position::new(1, 2));

    let events = s.advance(&mut keys, &mut renderer).expect("turn 2");
    assert!(events.iter().any(|e| matches!(e, GameEvent::PacmanDied { .. })));
    assert_eq!(s.phase(), Phase::GameOver);
}

#[test]
fn manual_pacman_without_input_freezes_the_board() {
    let dir = level_dir(&[
        ("a.lvl", "DIM 3 6\nTEMPO 20\nMON ghost.m\nXXXXXX\nX....X\nXXXXXX\n"),
        ("ghost.m", "PASSO 0\nPOS 1 4\nA\n"),
    ]);
    let mut s = scheduler(&dir);
    let mut renderer = NullRenderer::default();

    step(&mut s, &mut renderer);
    for _ in 0..5 {
        assert!(step(&mut s, &mut renderer).is_empty());
    }
    assert_eq!(s.state().expect("state").ghosts[0].actor.position, Position::new(1, 4));
    assert_eq!(s.turn(), 5);
    // Every frozen turn is still drawn and paced.
    assert_eq!(renderer.delayed_ms, 100);

    let mut keys = QueuedInput::new(['?']);
    s.advance(&mut keys, &mut renderer).expect("unmapped key");
    assert_eq!(s.state().expect("state").ghosts[0].actor.position, Position::new(1, 4));
}

#[test]
fn manual_save_key_captures_once() {
    let dir = level_dir(&[("a.lvl", "DIM 3 4\nTEMPO 0\nXXXX\nXo.X\nXXXX\n")]);
    let mut s = scheduler(&dir);
    let mut renderer = NullRenderer::default();
    let mut keys = QueuedInput::new(['G', 'D', 'g']);

    s.advance(&mut keys, &mut renderer).expect("load");
    let first = s.advance(&mut keys, &mut renderer).expect("save");
    assert!(first.contains(&GameEvent::SnapshotCaptured { turn: 1 }));
    let held = s.snapshots().held().cloned();

    s.advance(&mut keys, &mut renderer).expect("move");
    let second = s.advance(&mut keys, &mut renderer).expect("save again");
    assert!(second.is_empty(), "second save is a no-op: {second:?}");
    assert_eq!(s.snapshots().held().cloned(), held);
}

#[test]
fn portals_chain_levels_and_carry_points() {
    let dir = level_dir(&[
        ("1-first.lvl", "DIM 3 5\nTEMPO 10\nXXXXX\nX.o@X\nXXXXX\n"),
        ("2-second.lvl", "DIM 3 4\nTEMPO 10\nXXXX\nX.@X\nXXXX\n"),
    ]);
    let mut s = scheduler(&dir);
    let mut renderer = NullRenderer::default();
    let mut keys = QueuedInput::new(['D', 'D', 'D']);

    let mut events = Vec::new();
    let summary = s
        .run(&mut keys, &mut renderer, |batch| events.extend_from_slice(batch))
        .expect("run");

    assert_eq!(summary.outcome, Some(RunOutcome::AllLevelsCleared));
    assert_eq!(summary.levels_completed, 2);
    assert_eq!(summary.points, 1);
    assert_eq!(keys.remaining(), 0);

    let loaded: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            GameEvent::LevelLoaded { level, points, .. } => Some((level.as_str(), *points)),
            _ => None,
        })
        .collect();
    assert_eq!(loaded, vec![("1-first.lvl", 0), ("2-second.lvl", 1)]);
    assert!(events.iter().any(|e| matches!(
        e,
        GameEvent::PortalReached { at, .. } if *at == Position::new(1, 3)
    )));
    assert_eq!(renderer.frames.iter().filter(|m| **m == DrawMode::Win).count(), 2);
}

#[test]
fn portal_step_keeps_pacman_alive_and_points_unchanged() {
    let dir = level_dir(&[("a.lvl", "DIM 3 4\nTEMPO 0\nXXXX\nX.@X\nXXXX\n")]);
    let mut s = scheduler(&dir);
    let mut renderer = NullRenderer::default();
    let mut keys = QueuedInput::new(['d']);

    s.advance(&mut keys, &mut renderer).expect("load");
    s.advance(&mut keys, &mut renderer).expect("portal");
    assert_eq!(s.phase(), Phase::LevelComplete);
    let state = s.state().expect("state");
    assert!(state.pacman.actor.alive);
    assert_eq!(state.pacman.points, 0);
    assert_eq!(s.carried_points(), 0);
}

#[test]
fn broken_level_aborts_the_run() {
    let dir = level_dir(&[("a.lvl", "DIM 3 3\nPAC missing.p\nXXX\nXoX\nXXX\n")]);
    let mut s = scheduler(&dir);
    let mut renderer = NullRenderer::default();

    let err = s
        .advance(&mut QueuedInput::default(), &mut renderer)
        .unwrap_err();
    assert!(matches!(err, GameError::ScriptUnreadable { .. }), "got {err:?}");
    assert_eq!(s.phase(), Phase::Terminated);
    assert!(s.state().is_none());
}

#[test]
fn empty_level_directory_fails_to_open() {
    let dir = level_dir(&[("notes.txt", "nothing here")]);
    let err = TurnScheduler::open(dir.path(), GameConfig::default()).err().expect("error");
    assert!(matches!(err, GameError::NoLevels { .. }));
}
