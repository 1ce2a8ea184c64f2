use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which of the two owned unit collections a problem refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Roster {
    Npcs,
    Reinforcements,
}

impl fmt::Display for Roster {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Roster::Npcs => f.write_str("npcs"),
            Roster::Reinforcements => f.write_str("reinforcements"),
        }
    }
}

#[derive(Debug, Error)]
pub enum EncounterError {
    #[error("malformed encounter record at {path}: {message}")]
    Malformed { path: String, message: String },
    #[error("{roster}[{index}] could not be loaded: {source}")]
    Npc {
        roster: Roster,
        index: usize,
        #[source]
        source: NpcError,
    },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum NpcError {
    #[error("unit record has no id")]
    MissingId,
    #[error("unit record must be a JSON object")]
    NotAnObject,
    #[error("{0}")]
    Other(String),
}

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error("save rejected: {0}")]
    Rejected(String),
}
