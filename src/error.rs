use std::path::PathBuf;

use thiserror::Error;

pub use anyhow::Context;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Reqwest(#[from] reqwest::Error),
    #[error("invalid configuration:\n  - {}", .0.join("\n  - "))]
    Config(Vec<String>),
    #[error("price API returned an error: {0}")]
    Api(String),
    #[error("failed to read history file {}: {source}", path.display())]
    HistoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("history file {} is not a valid document: {source}", path.display())]
    HistoryParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to write history file {}: {source}", path.display())]
    HistoryWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("{0}")]
    Message(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AppError {
    pub fn message<T: Into<String>>(msg: T) -> Self {
        AppError::Message(msg.into())
    }
}
