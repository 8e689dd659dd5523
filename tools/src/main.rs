//! maze-runner: plays a directory of levels in the terminal.
//!
//! Usage:
//!   maze-runner <level_dir>
//!   maze-runner <level_dir> --seed 12345 --config game.json
//!   maze-runner <level_dir> --keys DDWWG --headless --events

use anyhow::{Context, Result};
use pacmaze_core::{
    board::GameState,
    collaborator::{DrawMode, InputSource, NullRenderer, QueuedInput, Renderer},
    config::GameConfig,
    scheduler::TurnScheduler,
};
use std::env;
use std::io::{self, Read, Write};
use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

/// Keys read from stdin on a background thread so polling never blocks.
struct StdinInput {
    keys: Receiver<char>,
}

impl StdinInput {
    fn spawn() -> Self {
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            for byte in io::stdin().lock().bytes() {
                let Ok(byte) = byte else { break };
                if byte.is_ascii_whitespace() {
                    continue;
                }
                if tx.send(byte as char).is_err() {
                    break;
                }
            }
        });
        Self { keys: rx }
    }
}

impl InputSource for StdinInput {
    fn poll_input(&mut self) -> Option<char> {
        self.keys.try_recv().ok()
    }
}

/// Prints each frame as plain text.
struct TextRenderer {
    out: io::Stdout,
}

impl Renderer for TextRenderer {
    fn draw(&mut self, state: &GameState, mode: DrawMode) {
        let banner = match mode {
            DrawMode::Menu => "",
            DrawMode::Win => "  LEVEL COMPLETE",
            DrawMode::GameOver => "  GAME OVER",
        };
        let frame = format!(
            "{} | points: {}{banner}\n{}",
            state.board.name,
            state.pacman.points,
            state.render_text()
        );
        if let Err(e) = self.out.write_all(frame.as_bytes()) {
            log::warn!("draw failed: {e}");
        }
    }

    fn refresh(&mut self) {
        if let Err(e) = self.out.flush() {
            log::warn!("refresh failed: {e}");
        }
    }

    fn delay(&mut self, millis: u64) {
        std::thread::sleep(Duration::from_millis(millis));
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let Some(level_dir) = args.get(1).filter(|a| !a.starts_with("--")) else {
        eprintln!(
            "Usage: {} <level_directory> [--seed N] [--config FILE] [--keys KEYS] [--headless] [--events]",
            args[0]
        );
        std::process::exit(1);
    };
    let headless = args.iter().any(|a| a == "--headless");
    let print_events = args.iter().any(|a| a == "--events");

    let mut config = match flag_value(&args, "--config") {
        Some(path) => GameConfig::load(path).with_context(|| format!("loading {path}"))?,
        None => GameConfig::default(),
    };
    if let Some(seed) = flag_value(&args, "--seed").and_then(|s| s.parse().ok()) {
        config.seed = Some(seed);
    }
    if config.seed.is_none() {
        config.seed = Some(clock_seed());
    }

    let mut scheduler = match TurnScheduler::open(level_dir, config) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: Could not initialize level catalog: {e}");
            std::process::exit(1);
        }
    };

    let mut input: Box<dyn InputSource> = match flag_value(&args, "--keys") {
        // A replay quits once its keys run out.
        Some(keys) => Box::new(QueuedInput::new(keys.chars().chain(['Q']))),
        None => Box::new(StdinInput::spawn()),
    };
    let mut renderer: Box<dyn Renderer> = if headless {
        Box::new(NullRenderer::default())
    } else {
        Box::new(TextRenderer { out: io::stdout() })
    };

    let summary = scheduler.run(input.as_mut(), renderer.as_mut(), |events| {
        if print_events {
            for event in events {
                match serde_json::to_string(event) {
                    Ok(line) => println!("{line}"),
                    Err(e) => log::warn!("cannot encode event: {e}"),
                }
            }
        }
    })?;

    println!("=== RUN SUMMARY ===");
    println!("  outcome:          {:?}", summary.outcome);
    println!("  levels completed: {}", summary.levels_completed);
    println!("  points:           {}", summary.points);
    println!("  turns:            {}", summary.turns);
    Ok(())
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.windows(2)
        .find(|w| w[0] == flag)
        .map(|w| w[1].as_str())
}

fn clock_seed() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}
