//! The turn scheduler — the state machine that drives a whole run.
//!
//! PHASES:
//!   LevelLoading → Playing → {LevelComplete, GameOver} → (LevelLoading | Terminated)
//!
//! TURN ORDER (fixed, never reordered):
//!   1. Pacman's command: polled input for manual control, otherwise the
//!      next gated script step. No input ends the turn at once.
//!   2. Quit terminates the run.
//!   3. SaveRequest captures a snapshot and ends the turn.
//!   4. Pacman's command is resolved. Portal completes the level; death
//!      restores the snapshot if one is held, otherwise the game is over.
//!   5. Every ghost's gated step is resolved, in ghost index order.
//!   6. The frame is drawn and the turn is paced by the level tempo.
//!
//! RULES:
//!   - The scheduler owns all board and actor state for a level.
//!   - All randomness flows through the scheduler's GameRng.
//!   - Input and output go through the collaborator traits only.

use crate::{
    board::{ActorTurn, GameState},
    catalog::LevelCatalog,
    collaborator::{DrawMode, InputSource, Renderer},
    command::MoveCommand,
    config::GameConfig,
    error::{GameError, GameResult},
    event::{ActorId, GameEvent},
    level::load_level,
    movement::{MoveOutcome, MovementResolver},
    rng::GameRng,
    snapshot::SnapshotManager,
    types::{Points, Turn},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Seed used when the config does not name one.
pub const DEFAULT_SEED: u64 = 0x5EED_0F_9AC3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    LevelLoading,
    Playing,
    LevelComplete,
    GameOver,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    Quit,
    GameOver,
    AllLevelsCleared,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub levels_completed: usize,
    pub points:           Points,
    pub turns:            Turn,
    pub outcome:          Option<RunOutcome>,
}

/// How a Playing turn ended, before phase bookkeeping.
enum TurnEnd {
    Continue,
    Saved,
    Quit,
    Portal,
    Died,
}

pub struct TurnScheduler {
    config:           GameConfig,
    catalog:          LevelCatalog,
    resolver:         MovementResolver,
    rng:              GameRng,
    snapshots:        SnapshotManager,
    phase:            Phase,
    state:            Option<GameState>,
    carried_points:   Points,
    turn:             Turn,
    levels_completed: usize,
    outcome:          Option<RunOutcome>,
}

impl TurnScheduler {
    pub fn new(catalog: LevelCatalog, config: GameConfig) -> Self {
        let rng = GameRng::new(config.seed.unwrap_or(DEFAULT_SEED));
        log::debug!("Scheduler seeded with {:#x}", rng.seed());
        Self {
            resolver:         MovementResolver::new(config.points_per_dot),
            rng,
            snapshots:        SnapshotManager::new(),
            phase:            Phase::LevelLoading,
            state:            None,
            carried_points:   0,
            turn:             0,
            levels_completed: 0,
            outcome:          None,
            catalog,
            config,
        }
    }

    /// Scan `directory` and build a scheduler positioned at its first level.
    pub fn open(directory: impl AsRef<Path>, config: GameConfig) -> GameResult<Self> {
        let catalog = LevelCatalog::init(directory, &config)?;
        Ok(Self::new(catalog, config))
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    pub fn snapshots(&self) -> &SnapshotManager {
        &self.snapshots
    }

    pub fn catalog(&self) -> &LevelCatalog {
        &self.catalog
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    pub fn carried_points(&self) -> Points {
        self.carried_points
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            levels_completed: self.levels_completed,
            points: self
                .state
                .as_ref()
                .map_or(self.carried_points, |s| s.pacman.points),
            turns: self.turn,
            outcome: self.outcome,
        }
    }

    /// Drive the state machine until the run terminates, handing each
    /// step's events to `on_events`.
    pub fn run(
        &mut self,
        input: &mut dyn InputSource,
        renderer: &mut dyn Renderer,
        mut on_events: impl FnMut(&[GameEvent]),
    ) -> GameResult<RunSummary> {
        while self.phase != Phase::Terminated {
            let events = self.advance(input, renderer)?;
            on_events(&events);
        }
        Ok(self.summary())
    }

    /// Perform one state-machine step: load a level, play one turn, or
    /// settle a finished level.
    pub fn advance(
        &mut self,
        input: &mut dyn InputSource,
        renderer: &mut dyn Renderer,
    ) -> GameResult<Vec<GameEvent>> {
        match self.phase {
            Phase::LevelLoading => self.load_current_level(renderer),
            Phase::Playing => self.play_turn(input, renderer),
            Phase::LevelComplete => {
                self.dump_board();
                if self.catalog.advance() {
                    self.phase = Phase::LevelLoading;
                    Ok(vec![])
                } else {
                    log::info!("All levels cleared");
                    Ok(vec![self.terminate(RunOutcome::AllLevelsCleared)])
                }
            }
            Phase::GameOver => {
                self.dump_board();
                Ok(vec![self.terminate(RunOutcome::GameOver)])
            }
            Phase::Terminated => Ok(vec![]),
        }
    }

    fn load_current_level(&mut self, renderer: &mut dyn Renderer) -> GameResult<Vec<GameEvent>> {
        self.snapshots.discard();
        let state = match load_level(&self.catalog, &self.config, self.carried_points) {
            Ok(state) => state,
            Err(e) => {
                log::error!(
                    "Could not load level {} from {}: {e}",
                    self.catalog.current_index(),
                    self.catalog.directory().display()
                );
                self.phase = Phase::Terminated;
                return Err(e);
            }
        };

        let event = GameEvent::LevelLoaded {
            level:  state.board.name.clone(),
            width:  state.board.width,
            height: state.board.height,
            ghosts: state.ghosts.len(),
            dots:   state.board.dot_count(),
            points: state.pacman.points,
        };
        renderer.draw(&state, DrawMode::Menu);
        renderer.refresh();
        self.state = Some(state);
        self.phase = Phase::Playing;
        Ok(vec![event])
    }

    fn play_turn(
        &mut self,
        input: &mut dyn InputSource,
        renderer: &mut dyn Renderer,
    ) -> GameResult<Vec<GameEvent>> {
        let Some(state) = self.state.as_mut() else {
            return Err(GameError::Other(anyhow::anyhow!("playing without a loaded level")));
        };
        self.turn += 1;
        let turn = self.turn;
        let mut events = Vec::new();

        let command = if state.pacman.actor.is_manual() {
            match input.poll_input() {
                Some(key) => {
                    log::debug!("KEY {key}");
                    let command = MoveCommand::from_letter(key);
                    if command.is_none() {
                        log::debug!("turn={turn} ignoring unmapped key {key:?}");
                    }
                    command
                }
                None => None,
            }
        } else {
            match state.pacman.actor.take_turn() {
                ActorTurn::Execute(command) => Some(command),
                ActorTurn::Idle => None,
            }
        };

        // A manual pacman with nothing to do freezes the whole board.
        let end = if command.is_none() && state.pacman.actor.is_manual() {
            TurnEnd::Continue
        } else {
            resolve_turn(
                state,
                command,
                &self.resolver,
                &mut self.rng,
                &mut self.snapshots,
                turn,
                &mut events,
            )
        };

        match end {
            TurnEnd::Continue | TurnEnd::Saved => self.present(renderer, DrawMode::Menu),
            TurnEnd::Quit => {
                log::info!("turn={turn} quit requested");
                events.push(GameEvent::QuitRequested { turn });
                self.present(renderer, DrawMode::GameOver);
                self.linger(renderer);
                self.dump_board();
                events.push(self.terminate(RunOutcome::Quit));
            }
            TurnEnd::Portal => {
                let (level, points) = self
                    .state
                    .as_ref()
                    .map(|s| (s.board.name.clone(), s.pacman.points))
                    .unwrap_or_default();
                log::info!("turn={turn} level {level} completed with {points} points");
                self.carried_points = points;
                self.levels_completed += 1;
                self.phase = Phase::LevelComplete;
                events.push(GameEvent::LevelCompleted { turn, level, points });
                self.present(renderer, DrawMode::Win);
                self.linger(renderer);
            }
            TurnEnd::Died => {
                let restored = self
                    .state
                    .as_mut()
                    .and_then(|s| self.snapshots.restore(s));
                match restored {
                    Some(captured_at) => {
                        events.push(GameEvent::SnapshotRestored { turn, captured_at });
                        self.present(renderer, DrawMode::Menu);
                    }
                    None => {
                        let points = self.summary().points;
                        log::info!("turn={turn} game over with {points} points");
                        self.phase = Phase::GameOver;
                        events.push(GameEvent::GameOver { turn, points });
                        self.present(renderer, DrawMode::GameOver);
                        self.linger(renderer);
                    }
                }
            }
        }

        Ok(events)
    }

    fn terminate(&mut self, outcome: RunOutcome) -> GameEvent {
        self.phase = Phase::Terminated;
        self.outcome = Some(outcome);
        let summary = self.summary();
        GameEvent::RunFinished {
            levels_completed: summary.levels_completed,
            points: summary.points,
        }
    }

    fn tempo(&self) -> u64 {
        self.state.as_ref().map_or(0, |s| s.board.tempo_ms)
    }

    /// Draw, refresh and pace by the level tempo.
    fn present(&self, renderer: &mut dyn Renderer, mode: DrawMode) {
        if let Some(state) = &self.state {
            renderer.draw(state, mode);
        }
        renderer.refresh();
        let tempo = self.tempo();
        if tempo != 0 {
            renderer.delay(tempo);
        }
    }

    /// Extra pause on win and game-over frames.
    fn linger(&self, renderer: &mut dyn Renderer) {
        let tempo = self.tempo();
        if tempo != 0 {
            renderer.delay(tempo);
        }
    }

    fn dump_board(&self) {
        if let Some(state) = &self.state {
            log::debug!("Final board of {}:\n{}", state.board.name, state.render_text());
        }
    }
}

fn resolve_turn(
    state: &mut GameState,
    command: Option<MoveCommand>,
    resolver: &MovementResolver,
    rng: &mut GameRng,
    snapshots: &mut SnapshotManager,
    turn: Turn,
    events: &mut Vec<GameEvent>,
) -> TurnEnd {
    if let Some(command) = command {
        match command {
            MoveCommand::Quit => return TurnEnd::Quit,
            MoveCommand::SaveRequest => {
                if snapshots.capture(state, turn) {
                    events.push(GameEvent::SnapshotCaptured { turn });
                }
                return TurnEnd::Saved;
            }
            _ => match resolver.apply(state, ActorId::Pacman, command, rng, turn, events) {
                MoveOutcome::ReachedPortal => return TurnEnd::Portal,
                MoveOutcome::Dead => return TurnEnd::Died,
                MoveOutcome::Continue => {}
            },
        }
    }

    for i in 0..state.ghosts.len() {
        if let ActorTurn::Execute(command) = state.ghosts[i].actor.take_turn() {
            resolver.apply(state, ActorId::Ghost(i), command, rng, turn, events);
        }
    }

    if state.pacman.actor.alive {
        TurnEnd::Continue
    } else {
        TurnEnd::Died
    }
}
