//! Game configuration — file suffixes, defaults, seed and catalog policy.
//!
//! Every field has a default, so a config file only needs to name the
//! values it overrides. In tests, use GameConfig::default().

use crate::{
    error::{GameError, GameResult},
    types::{Points, Position},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// How discovered level files are ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CatalogOrder {
    /// Sorted by file name. Reproducible across machines.
    #[default]
    Lexicographic,
    /// Whatever order the directory listing yields.
    Filesystem,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub level_suffix:   String,
    pub pacman_suffix:  String,
    pub ghost_suffix:   String,
    /// Where a pacman without a PAC script starts.
    pub manual_start:   Position,
    pub points_per_dot: Points,
    /// Seed for RandomStep. None lets the caller pick one.
    pub seed:           Option<u64>,
    pub catalog_order:  CatalogOrder,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            level_suffix:   ".lvl".into(),
            pacman_suffix:  ".p".into(),
            ghost_suffix:   ".m".into(),
            manual_start:   Position::new(1, 1),
            points_per_dot: 1,
            seed:           None,
            catalog_order:  CatalogOrder::Lexicographic,
        }
    }
}

impl GameConfig {
    /// Load overrides from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> GameResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| {
            GameError::ConfigUnreadable { path: path.to_path_buf(), source }
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> GameResult<Self> {
        let config: GameConfig = serde_json::from_str(content)?;
        log::debug!("Loaded config: {config:?}");
        Ok(config)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}
