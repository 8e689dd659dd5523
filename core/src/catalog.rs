//! Level discovery: every file in a directory with the level suffix is
//! one playable level, played in catalog order.

use crate::{
    config::{CatalogOrder, GameConfig},
    error::{GameError, GameResult},
};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct LevelCatalog {
    directory: PathBuf,
    levels:    Vec<String>,
    current:   usize,
}

impl LevelCatalog {
    /// Scan `directory` for level files.
    pub fn init(directory: impl AsRef<Path>, config: &GameConfig) -> GameResult<Self> {
        let directory = directory.as_ref().to_path_buf();
        let unreadable = |source| GameError::CatalogUnreadable {
            dir: directory.clone(),
            source,
        };

        let mut levels = Vec::new();
        for entry in std::fs::read_dir(&directory).map_err(unreadable)? {
            let name = entry.map_err(unreadable)?.file_name();
            let Some(name) = name.to_str() else { continue };
            if name.ends_with(&config.level_suffix) {
                levels.push(name.to_string());
            }
        }

        if levels.is_empty() {
            log::warn!("No {} files in {}", config.level_suffix, directory.display());
            return Err(GameError::NoLevels {
                dir: directory,
                suffix: config.level_suffix.clone(),
            });
        }
        if config.catalog_order == CatalogOrder::Lexicographic {
            levels.sort();
        }

        log::info!("Found {} level files in {}", levels.len(), directory.display());
        for level in &levels {
            log::debug!("  - {level}");
        }

        Ok(Self { directory, levels, current: 0 })
    }

    /// Move to the next level. Returns false once the catalog is exhausted.
    pub fn advance(&mut self) -> bool {
        self.current += 1;
        self.current < self.levels.len()
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn levels(&self) -> &[String] {
        &self.levels
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_level(&self) -> Option<&str> {
        self.levels.get(self.current).map(String::as_str)
    }

    pub fn current_path(&self) -> GameResult<PathBuf> {
        self.current_level()
            .map(|name| self.directory.join(name))
            .ok_or(GameError::CatalogExhausted)
    }

    /// Path of a file referenced by a level (scripts live beside levels).
    pub fn resolve(&self, file_name: &str) -> PathBuf {
        self.directory.join(file_name)
    }
}
