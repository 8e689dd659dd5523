//! Single-slot snapshot of the full simulation state.
//!
//! A snapshot is taken on an explicit save request and consumed when
//! pacman dies. At most one is held at a time: capturing while one is
//! held and restoring while none is held are both no-ops.

use crate::{board::GameState, types::Turn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationSnapshot {
    pub captured_at: Turn,
    pub state:       GameState,
}

#[derive(Debug, Default)]
pub struct SnapshotManager {
    held: Option<SimulationSnapshot>,
}

impl SnapshotManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_held(&self) -> bool {
        self.held.is_some()
    }

    pub fn held(&self) -> Option<&SimulationSnapshot> {
        self.held.as_ref()
    }

    /// Deep-copy `state` into the slot. Returns false if the slot was
    /// already full, leaving the earlier snapshot untouched.
    pub fn capture(&mut self, state: &GameState, turn: Turn) -> bool {
        if self.held.is_some() {
            log::debug!("turn={turn} save ignored: snapshot already held");
            return false;
        }
        self.held = Some(SimulationSnapshot { captured_at: turn, state: state.clone() });
        log::info!("turn={turn} snapshot captured");
        true
    }

    /// Overwrite `state` with the held snapshot and empty the slot.
    /// Returns the turn the snapshot was captured at, or None if empty.
    pub fn restore(&mut self, state: &mut GameState) -> Option<Turn> {
        let snapshot = self.held.take()?;
        *state = snapshot.state;
        log::info!("snapshot from turn {} restored", snapshot.captured_at);
        Some(snapshot.captured_at)
    }

    /// Drop any held snapshot without restoring it.
    pub fn discard(&mut self) {
        if self.held.take().is_some() {
            log::debug!("snapshot discarded");
        }
    }
}
