//! Level files: header keys, then the board matrix.
//!
//! ```text
//! DIM <height> <width>
//! TEMPO <milliseconds>
//! PAC <pacman-script>          optional, absent = manual control
//! MON <ghost-script>*          each ends in the ghost suffix
//! <height*width cell symbols>
//! ```
//! Parsing is two-phase. Header keys are read in any order; the first
//! token that is neither a key nor a key argument starts the matrix and
//! is decoded as its first cells.

use crate::{
    board::{Board, Cell, GameState, Ghost, Pacman, ScriptedActor},
    catalog::LevelCatalog,
    config::GameConfig,
    error::{GameError, GameResult},
    script::load_script,
    tokens::{lenient_int, lenient_u32, Tokens},
    types::{Points, Position},
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LevelHeader {
    pub height:        usize,
    pub width:         usize,
    pub tempo_ms:      u64,
    pub pacman_script: Option<String>,
    pub ghost_scripts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedLevel {
    pub header: LevelHeader,
    /// Row-major, exactly `height * width` cells.
    pub cells:  Vec<Cell>,
}

impl ParsedLevel {
    pub fn dot_count(&self) -> usize {
        self.cells.iter().filter(|c| c.has_dot()).count()
    }
}

fn dimension(token: Option<&str>) -> usize {
    lenient_int(token).max(0) as usize
}

fn invalid(level: &str, reason: impl Into<String>) -> GameError {
    GameError::InvalidLevel { level: level.to_string(), reason: reason.into() }
}

/// Parse level text. Unknown symbols are open floor. A matrix short by
/// at most one row is padded with open floor; a zero, overflowing or
/// badly underfilled board is rejected.
pub fn parse_level(name: &str, text: &str, config: &GameConfig) -> GameResult<ParsedLevel> {
    let mut tokens = Tokens::new(text).peekable();
    let mut header = LevelHeader::default();

    // Phase 1: header keys.
    while let Some(&word) = tokens.peek() {
        match word {
            "DIM" => {
                tokens.next();
                header.height = dimension(tokens.next());
                header.width = dimension(tokens.next());
            }
            "TEMPO" => {
                tokens.next();
                header.tempo_ms = lenient_u32(tokens.next()) as u64;
            }
            "PAC" => {
                tokens.next();
                header.pacman_script = tokens.next().map(str::to_string);
            }
            "MON" => {
                tokens.next();
                while let Some(file) = tokens.next_if(|t| t.ends_with(&config.ghost_suffix)) {
                    header.ghost_scripts.push(file.to_string());
                }
            }
            _ => break,
        }
    }

    if header.width == 0 || header.height == 0 {
        return Err(invalid(name, "DIM missing or zero"));
    }
    let expected = header.height.checked_mul(header.width).ok_or_else(|| {
        invalid(name, format!("DIM {} {} overflows", header.height, header.width))
    })?;

    // Phase 2: the matrix, starting with the token that ended phase 1.
    let mut cells: Vec<Cell> = tokens
        .flat_map(str::chars)
        .take(expected)
        .map(Cell::from_symbol)
        .collect();
    let missing = expected - cells.len();
    if missing > header.width {
        return Err(invalid(
            name,
            format!("board matrix has {} of {expected} cells", cells.len()),
        ));
    }
    if missing > 0 {
        log::warn!(
            "Board matrix has {} of {expected} cells; padding with open floor",
            cells.len()
        );
        cells.resize(expected, Cell::open());
    }

    Ok(ParsedLevel { header, cells })
}

fn place(level: &str, board: &Board, what: &str, pos: Position) -> GameResult<Position> {
    if board.contains(pos) {
        Ok(pos)
    } else {
        Err(invalid(
            level,
            format!(
                "{what} starts at ({}, {}) outside the {}x{} board",
                pos.row, pos.col, board.height, board.width
            ),
        ))
    }
}

/// Load the catalog's current level, its scripts, and place every actor.
/// Pacman starts with the points carried over from earlier levels.
pub fn load_level(
    catalog: &LevelCatalog,
    config: &GameConfig,
    carried_points: Points,
) -> GameResult<GameState> {
    let path = catalog.current_path()?;
    let name = catalog.current_level().unwrap_or_default().to_string();
    let text = std::fs::read_to_string(&path)
        .map_err(|source| GameError::LevelUnreadable { path: path.clone(), source })?;

    let ParsedLevel { header, cells } = parse_level(&name, &text, config)?;
    let board = Board::new(name.clone(), header.width, header.height, header.tempo_ms, cells);

    let pacman_actor = match &header.pacman_script {
        Some(file) => {
            if !file.ends_with(&config.pacman_suffix) {
                log::warn!("PAC script '{file}' lacks the {} suffix", config.pacman_suffix);
            }
            let script = load_script(&catalog.resolve(file))?;
            let start = place(&name, &board, "pacman", script.start)?;
            ScriptedActor::scripted(start, script.cadence, script.steps)
        }
        None => ScriptedActor::manual(place(&name, &board, "pacman", config.manual_start)?),
    };

    let mut ghosts = Vec::with_capacity(header.ghost_scripts.len());
    for file in &header.ghost_scripts {
        let script = load_script(&catalog.resolve(file))?;
        let start = place(&name, &board, file, script.start)?;
        ghosts.push(Ghost {
            actor:   ScriptedActor::scripted(start, script.cadence, script.steps),
            charged: false,
        });
    }

    log::info!(
        "Loaded level: {} (dimensions: {}x{}, tempo: {}, ghosts: {}, dots: {})",
        board.name,
        board.width,
        board.height,
        board.tempo_ms,
        ghosts.len(),
        board.dot_count()
    );

    Ok(GameState {
        board,
        pacman: Pacman { actor: pacman_actor, points: carried_points },
        ghosts,
    })
}
