//! Turn events — what happened during each turn, for logging and tools.
//!
//! RULE: Events are observational. Nothing in the simulation reads them
//! back to make a decision.

use crate::types::{Points, Position, Turn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "index", rename_all = "snake_case")]
pub enum ActorId {
    Pacman,
    Ghost(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameEvent {
    // ── Level lifecycle ────────────────────────────
    LevelLoaded {
        level:  String,
        width:  usize,
        height: usize,
        ghosts: usize,
        dots:   usize,
        points: Points,
    },
    LevelCompleted {
        turn:   Turn,
        level:  String,
        points: Points,
    },
    GameOver {
        turn:   Turn,
        points: Points,
    },
    QuitRequested {
        turn: Turn,
    },
    RunFinished {
        levels_completed: usize,
        points:           Points,
    },

    // ── Movement ───────────────────────────────────
    ActorMoved {
        turn:  Turn,
        actor: ActorId,
        from:  Position,
        to:    Position,
    },
    MoveBlocked {
        turn:   Turn,
        actor:  ActorId,
        target: Position,
    },
    DotEaten {
        turn:   Turn,
        actor:  ActorId,
        at:     Position,
        points: Points,
    },
    PortalReached {
        turn: Turn,
        at:   Position,
    },
    PacmanDied {
        turn:  Turn,
        at:    Position,
        ghost: usize,
    },
    GhostCharged {
        turn:    Turn,
        ghost:   usize,
        charged: bool,
    },

    // ── Snapshots ──────────────────────────────────
    SnapshotCaptured {
        turn: Turn,
    },
    SnapshotRestored {
        turn:        Turn,
        captured_at: Turn,
    },
}
