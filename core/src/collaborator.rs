//! The seams between the simulation and the outside world.
//!
//! RULE: The scheduler talks to the keyboard and the screen only through
//! these traits. Nothing here may change game state.

use crate::board::GameState;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawMode {
    Menu,
    Win,
    GameOver,
}

/// Source of manual-control keys.
pub trait InputSource {
    /// Non-blocking. None when no key is waiting.
    fn poll_input(&mut self) -> Option<char>;
}

/// Frame sink. `delay` paces the game and is only ever wall-clock time.
pub trait Renderer {
    fn draw(&mut self, state: &GameState, mode: DrawMode);
    fn refresh(&mut self);
    fn delay(&mut self, millis: u64);
}

/// Keys fed from a queue. Used for replays and tests.
#[derive(Debug, Default, Clone)]
pub struct QueuedInput {
    keys: VecDeque<char>,
}

impl QueuedInput {
    pub fn new(keys: impl IntoIterator<Item = char>) -> Self {
        Self { keys: keys.into_iter().collect() }
    }

    pub fn remaining(&self) -> usize {
        self.keys.len()
    }
}

impl InputSource for QueuedInput {
    fn poll_input(&mut self) -> Option<char> {
        self.keys.pop_front()
    }
}

/// Draws nothing and never sleeps; remembers the modes it was asked for.
#[derive(Debug, Default, Clone)]
pub struct NullRenderer {
    pub frames: Vec<DrawMode>,
    pub delayed_ms: u64,
}

impl Renderer for NullRenderer {
    fn draw(&mut self, _state: &GameState, mode: DrawMode) {
        self.frames.push(mode);
    }

    fn refresh(&mut self) {}

    fn delay(&mut self, millis: u64) {
        self.delayed_ms += millis;
    }
}
