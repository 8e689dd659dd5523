use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GameError {
    #[error("Cannot open level directory {dir}: {source}")]
    CatalogUnreadable {
        dir: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No '{suffix}' level files found in {dir}")]
    NoLevels { dir: PathBuf, suffix: String },

    #[error("Level catalog exhausted")]
    CatalogExhausted,

    #[error("Cannot open level file {path}: {source}")]
    LevelUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot open behavior script {path}: {source}")]
    ScriptUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid level '{level}': {reason}")]
    InvalidLevel { level: String, reason: String },

    #[error("Cannot read config {path}: {source}")]
    ConfigUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Config error: {0}")]
    ConfigInvalid(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type GameResult<T> = Result<T, GameError>;
