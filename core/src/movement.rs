//! Movement resolution — one command, one actor, one outcome.
//!
//! RULES:
//!   - Walls and off-grid targets absorb the step.
//!   - Entering a cell held by the opposing kind kills pacman; the mover
//!     stays where it was.
//!   - A ghost never enters a cell held by another ghost.
//!   - Dots are eaten by whoever enters the cell; only pacman scores.
//!   - Only pacman reacts to portals.

use crate::{
    board::{GameState, Occupant},
    command::MoveCommand,
    event::{ActorId, GameEvent},
    rng::GameRng,
    types::{Direction, Points, Position, Turn},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveOutcome {
    Continue,
    ReachedPortal,
    Dead,
}

pub struct MovementResolver {
    points_per_dot: Points,
}

impl MovementResolver {
    pub fn new(points_per_dot: Points) -> Self {
        Self { points_per_dot }
    }

    /// Apply `command` to `actor`. Quit and SaveRequest belong to the
    /// scheduler and are no-ops here.
    pub fn apply(
        &self,
        state: &mut GameState,
        actor: ActorId,
        command: MoveCommand,
        rng: &mut GameRng,
        turn: Turn,
        events: &mut Vec<GameEvent>,
    ) -> MoveOutcome {
        match command {
            MoveCommand::Step { direction } => self.step(state, actor, direction, turn, events),
            MoveCommand::RandomStep => {
                let direction = rng.direction();
                self.step(state, actor, direction, turn, events)
            }
            MoveCommand::ChargeToggle => {
                if let ActorId::Ghost(i) = actor {
                    let ghost = &mut state.ghosts[i];
                    ghost.charged = !ghost.charged;
                    events.push(GameEvent::GhostCharged { turn, ghost: i, charged: ghost.charged });
                }
                MoveOutcome::Continue
            }
            MoveCommand::Wait { .. } | MoveCommand::Quit | MoveCommand::SaveRequest => {
                MoveOutcome::Continue
            }
        }
    }

    fn step(
        &self,
        state: &mut GameState,
        actor: ActorId,
        direction: Direction,
        turn: Turn,
        events: &mut Vec<GameEvent>,
    ) -> MoveOutcome {
        let from = position(state, actor);
        let to = from.step(direction);

        let walkable = state.board.cell(to).is_some_and(|c| !c.is_wall());
        if !walkable {
            events.push(GameEvent::MoveBlocked { turn, actor, target: to });
            return MoveOutcome::Continue;
        }

        match (actor, state.occupant_at(to)) {
            (ActorId::Pacman, Some(Occupant::Ghost(ghost)))
            | (ActorId::Ghost(ghost), Some(Occupant::Pacman)) => {
                state.pacman.actor.alive = false;
                let at = state.pacman.actor.position;
                log::debug!("turn={turn} pacman caught by ghost {ghost} at ({}, {})", at.row, at.col);
                events.push(GameEvent::PacmanDied { turn, at, ghost });
                return MoveOutcome::Dead;
            }
            (ActorId::Ghost(_), Some(Occupant::Ghost(_))) => {
                events.push(GameEvent::MoveBlocked { turn, actor, target: to });
                return MoveOutcome::Continue;
            }
            _ => {}
        }

        match actor {
            ActorId::Pacman => state.pacman.actor.position = to,
            ActorId::Ghost(i) => state.ghosts[i].actor.position = to,
        }
        events.push(GameEvent::ActorMoved { turn, actor, from, to });

        let Some(cell) = state.board.cell_mut(to) else {
            return MoveOutcome::Continue;
        };
        let portal = cell.is_portal();
        if cell.take_dot() {
            if actor == ActorId::Pacman {
                state.pacman.points += self.points_per_dot;
            }
            events.push(GameEvent::DotEaten { turn, actor, at: to, points: state.pacman.points });
        }

        if portal && actor == ActorId::Pacman {
            events.push(GameEvent::PortalReached { turn, at: to });
            return MoveOutcome::ReachedPortal;
        }
        MoveOutcome::Continue
    }
}

fn position(state: &GameState, actor: ActorId) -> Position {
    match actor {
        ActorId::Pacman => state.pacman.actor.position,
        ActorId::Ghost(i) => state.ghosts[i].actor.position,
    }
}
