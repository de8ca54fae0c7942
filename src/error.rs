use thiserror::Error;

use crate::session::Phase;

pub type GameResult<T> = Result<T, GameError>;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("render backend failed: {0}")]
    Backend(String),
}

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("blob store failed on key {key}: {source}")]
    Store {
        key: String,
        #[source]
        source: std::io::Error,
    },
    #[error("could not serialize snapshot: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("saved snapshot is malformed: {0}")]
    Malformed(String),
}

#[derive(Debug, Error)]
pub enum GameError {
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("input handling failed: {0}")]
    Input(String),
    #[error("cannot {action} while {phase:?}")]
    StateTransition { action: &'static str, phase: Phase },
    #[error("no free cell left on the board")]
    BoardFull,
}
