use std::path::PathBuf;

use thiserror::Error;

use crate::model::separator::SeparatorKind;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("dictionary not found: {}", .0.display())]
    DictionaryNotFound(PathBuf),

    #[error("unknown {kind} separator: {id}")]
    UnknownSeparator { kind: SeparatorKind, id: String },

    #[error("{0}")]
    InvalidPayload(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;
