//! Turn-based maze-chase engine: level and behavior-script parsing,
//! movement resolution, the turn scheduler and single-slot snapshots.

pub mod board;
pub mod catalog;
pub mod collaborator;
pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod level;
pub mod movement;
pub mod rng;
pub mod scheduler;
pub mod script;
pub mod snapshot;
pub mod tokens;
pub mod types;
