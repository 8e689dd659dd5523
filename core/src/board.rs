//! The grid and every actor record for one loaded level.
//!
//! GameState is the unit the snapshot subsystem copies: the board plus
//! pacman plus all ghosts. Occupancy is derived from actor positions.

use crate::{
    command::MoveCommand,
    types::{Points, Position},
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellContent {
    Open,
    Wall,
    Portal,
}

/// One grid cell. Walls and portals never carry a dot; the
/// constructors are the only way to build one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    content: CellContent,
    has_dot: bool,
}

impl Cell {
    pub const fn open() -> Self {
        Self { content: CellContent::Open, has_dot: false }
    }

    pub const fn dot() -> Self {
        Self { content: CellContent::Open, has_dot: true }
    }

    pub const fn wall() -> Self {
        Self { content: CellContent::Wall, has_dot: false }
    }

    pub const fn portal() -> Self {
        Self { content: CellContent::Portal, has_dot: false }
    }

    /// Decode a matrix symbol. Unknown symbols are open floor.
    pub fn from_symbol(symbol: char) -> Self {
        match symbol {
            'X' => Self::wall(),
            'o' => Self::dot(),
            '@' => Self::portal(),
            _ => Self::open(),
        }
    }

    pub fn content(&self) -> CellContent {
        self.content
    }

    pub fn has_dot(&self) -> bool {
        self.has_dot
    }

    pub fn is_wall(&self) -> bool {
        self.content == CellContent::Wall
    }

    pub fn is_portal(&self) -> bool {
        self.content == CellContent::Portal
    }

    /// Clear the dot, reporting whether there was one.
    pub fn take_dot(&mut self) -> bool {
        std::mem::replace(&mut self.has_dot, false)
    }

    fn symbol(&self) -> char {
        match (self.content, self.has_dot) {
            (CellContent::Wall, _) => 'X',
            (CellContent::Portal, _) => '@',
            (CellContent::Open, true) => 'o',
            (CellContent::Open, false) => ' ',
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    pub name:     String,
    pub width:    usize,
    pub height:   usize,
    /// Pacing delay between turns, in milliseconds.
    pub tempo_ms: u64,
    cells:        Vec<Cell>,
}

impl Board {
    /// Build a board from row-major cells. `cells` must hold exactly
    /// `width * height` entries.
    pub fn new(name: impl Into<String>, width: usize, height: usize, tempo_ms: u64, cells: Vec<Cell>) -> Self {
        assert_eq!(cells.len(), width * height, "cell count must match dimensions");
        Self { name: name.into(), width, height, tempo_ms, cells }
    }

    /// Row-major index of `pos`, or None when it lies off the grid.
    pub fn index(&self, pos: Position) -> Option<usize> {
        if pos.row < 0 || pos.col < 0 {
            return None;
        }
        let (row, col) = (pos.row as usize, pos.col as usize);
        (row < self.height && col < self.width).then(|| row * self.width + col)
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.index(pos).is_some()
    }

    pub fn cell(&self, pos: Position) -> Option<&Cell> {
        self.index(pos).map(|i| &self.cells[i])
    }

    pub fn cell_mut(&mut self, pos: Position) -> Option<&mut Cell> {
        let i = self.index(pos)?;
        Some(&mut self.cells[i])
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn dot_count(&self) -> usize {
        self.cells.iter().filter(|c| c.has_dot()).count()
    }
}

/// What an actor does with its turn once cadence gating has run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorTurn {
    Idle,
    Execute(MoveCommand),
}

/// The shape shared by pacman and ghosts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptedActor {
    pub position:  Position,
    /// Turns between executed steps.
    pub cadence:   u32,
    script:        Vec<MoveCommand>,
    /// Monotonic count of completed steps; see `active_index`.
    current_step:  u64,
    /// Turns left to idle before the next step executes.
    wait:          u32,
    /// Slots left in a multi-slot step (`T n`). Zero between steps.
    hold_left:     u32,
    pub alive:     bool,
}

impl ScriptedActor {
    pub fn scripted(position: Position, cadence: u32, script: Vec<MoveCommand>) -> Self {
        Self {
            position,
            cadence,
            script,
            current_step: 0,
            wait: cadence,
            hold_left: 0,
            alive: true,
        }
    }

    /// An actor with no script; it is driven by external input.
    pub fn manual(position: Position) -> Self {
        Self::scripted(position, 0, Vec::new())
    }

    pub fn is_manual(&self) -> bool {
        self.script.is_empty()
    }

    pub fn script(&self) -> &[MoveCommand] {
        &self.script
    }

    pub fn steps_completed(&self) -> u64 {
        self.current_step
    }

    pub fn wait_counter(&self) -> u32 {
        self.wait
    }

    /// Index of the step that will execute next. Always in bounds.
    pub fn active_index(&self) -> Option<usize> {
        let len = self.script.len() as u64;
        (len > 0).then(|| (self.current_step % len) as usize)
    }

    pub fn active_command(&self) -> Option<MoveCommand> {
        self.active_index().map(|i| self.script[i])
    }

    /// Run cadence gating and hand out this turn's command.
    /// Manual actors always idle here; the scheduler polls input for them.
    pub fn take_turn(&mut self) -> ActorTurn {
        let Some(command) = self.active_command() else {
            return ActorTurn::Idle;
        };
        if self.wait > 0 {
            self.wait -= 1;
            return ActorTurn::Idle;
        }
        self.wait = self.cadence;

        if self.hold_left == 0 {
            self.hold_left = command.repeat();
        }
        self.hold_left -= 1;
        if self.hold_left == 0 {
            self.current_step += 1;
        }
        ActorTurn::Execute(command)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pacman {
    pub actor:  ScriptedActor,
    pub points: Points,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ghost {
    pub actor:   ScriptedActor,
    /// Toggled by `C`. Nothing reads it yet.
    pub charged: bool,
}

/// Who stands on a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Occupant {
    Pacman,
    Ghost(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub board:  Board,
    pub pacman: Pacman,
    pub ghosts: Vec<Ghost>,
}

impl GameState {
    /// Pacman wins ties so a ghost spawned on pacman still collides.
    pub fn occupant_at(&self, pos: Position) -> Option<Occupant> {
        if self.pacman.actor.position == pos {
            return Some(Occupant::Pacman);
        }
        self.ghosts
            .iter()
            .position(|g| g.actor.position == pos)
            .map(Occupant::Ghost)
    }

    /// Plain-text frame: `P` pacman, `M` ghost, then cell symbols.
    pub fn render_text(&self) -> String {
        let board = &self.board;
        let mut out = String::with_capacity((board.width + 1) * board.height);
        for row in 0..board.height {
            for col in 0..board.width {
                let pos = Position::new(row as i32, col as i32);
                let symbol = match self.occupant_at(pos) {
                    Some(Occupant::Pacman) if self.pacman.actor.alive => 'P',
                    Some(Occupant::Ghost(_)) => 'M',
                    _ => board.cells[row * board.width + col].symbol(),
                };
                out.push(symbol);
            }
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Direction;

    fn left() -> MoveCommand {
        MoveCommand::Step { direction: Direction::Left }
    }

    #[test]
    fn index_rejects_off_grid_positions() {
        let board = Board::new("t", 3, 2, 0, vec![Cell::open(); 6]);
        assert_eq!(board.index(Position::new(1, 2)), Some(5));
        assert_eq!(board.index(Position::new(2, 0)), None);
        assert_eq!(board.index(Position::new(0, 3)), None);
        assert_eq!(board.index(Position::new(-1, 0)), None);
    }

    #[test]
    fn walls_and_portals_never_hold_dots() {
        let mut wall = Cell::from_symbol('X');
        let mut portal = Cell::from_symbol('@');
        assert!(!wall.take_dot());
        assert!(!portal.take_dot());
        assert!(Cell::from_symbol('o').has_dot());
        assert_eq!(Cell::from_symbol('.'), Cell::open());
    }

    #[test]
    fn step_index_wraps_modulo_script_length() {
        let script = vec![left(), MoveCommand::RandomStep, MoveCommand::ChargeToggle];
        let mut actor = ScriptedActor::scripted(Position::new(0, 0), 0, script);
        for k in 0..10u64 {
            assert_eq!(actor.steps_completed(), k);
            assert_eq!(actor.active_index(), Some((k % 3) as usize));
            assert!(matches!(actor.take_turn(), ActorTurn::Execute(_)));
        }
    }

    #[test]
    fn cadence_idles_between_steps() {
        let mut actor = ScriptedActor::scripted(Position::new(0, 0), 2, vec![left()]);
        assert_eq!(actor.wait_counter(), 2);
        let turns: Vec<_> = (0..6).map(|_| actor.take_turn()).collect();
        assert_eq!(
            turns,
            vec![
                ActorTurn::Idle,
                ActorTurn::Idle,
                ActorTurn::Execute(left()),
                ActorTurn::Idle,
                ActorTurn::Idle,
                ActorTurn::Execute(left()),
            ]
        );
        assert_eq!(actor.wait_counter(), 2);
        assert_eq!(actor.steps_completed(), 2);
    }

    #[test]
    fn wait_step_holds_the_index_for_its_count() {
        let script = vec![MoveCommand::Wait { turns: 3 }, left()];
        let mut actor = ScriptedActor::scripted(Position::new(0, 0), 0, script);
        for _ in 0..3 {
            assert_eq!(actor.active_index(), Some(0));
            assert_eq!(actor.take_turn(), ActorTurn::Execute(MoveCommand::Wait { turns: 3 }));
        }
        assert_eq!(actor.active_index(), Some(1));
        assert_eq!(actor.take_turn(), ActorTurn::Execute(left()));
        assert_eq!(actor.active_index(), Some(0));
    }

    #[test]
    fn manual_actor_never_executes_on_its_own() {
        let mut actor = ScriptedActor::manual(Position::new(1, 1));
        assert!(actor.is_manual());
        assert_eq!(actor.active_index(), None);
        assert_eq!(actor.take_turn(), ActorTurn::Idle);
    }
}
