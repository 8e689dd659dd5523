//! Behavior scripts: an actor's cadence, start position and move cycle.
//!
//! ```text
//! PASSO <n>          turns between executed steps
//! POS <row> <col>    starting position
//! <step>*            A|D|W|S|R|C|Q|G, or "T <n>"
//! ```
//! Numbers parse leniently: a malformed number reads as zero.

use crate::{
    command::MoveCommand,
    error::{GameError, GameResult},
    tokens::{lenient_int, lenient_u32, Tokens},
    types::Position,
};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BehaviorScript {
    pub cadence: u32,
    pub start:   Position,
    pub steps:   Vec<MoveCommand>,
}

/// Coordinates that do not fit an i32 land far off the grid, so placement
/// rejects them instead of wrapping onto a real cell.
fn coordinate(token: Option<&str>) -> i32 {
    i32::try_from(lenient_int(token)).unwrap_or(i32::MAX)
}

pub fn parse_script(text: &str) -> BehaviorScript {
    let mut tokens = Tokens::new(text);
    let mut cadence = 0;
    let mut start = Position::new(0, 0);
    let mut steps = Vec::new();

    while let Some(word) = tokens.next() {
        match word {
            "PASSO" => cadence = lenient_u32(tokens.next()),
            "POS" => {
                let row = coordinate(tokens.next());
                let col = coordinate(tokens.next());
                start = Position::new(row, col);
            }
            "T" => steps.push(MoveCommand::Wait { turns: lenient_u32(tokens.next()) }),
            _ => {
                let mut chars = word.chars();
                match (chars.next(), chars.next()) {
                    (Some(letter), None) if letter.is_ascii_uppercase() => {
                        match MoveCommand::from_letter(letter) {
                            Some(command) => steps.push(command),
                            None => log::debug!("Ignoring unknown step '{word}'"),
                        }
                    }
                    _ => log::debug!("Ignoring script token '{word}'"),
                }
            }
        }
    }

    BehaviorScript { cadence, start, steps }
}

pub fn load_script(path: &Path) -> GameResult<BehaviorScript> {
    let text = std::fs::read_to_string(path).map_err(|source| GameError::ScriptUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    let script = parse_script(&text);
    log::debug!(
        "Loaded script {}: passo={} pos=({}, {}) steps={}",
        path.display(),
        script.cadence,
        script.start.row,
        script.start.col,
        script.steps.len()
    );
    Ok(script)
}
