use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Song record is not a JSON object")]
    NotAnObject,

    #[error("Song envelope key is present but does not hold an object")]
    MalformedEnvelope,

    #[error("Song record is missing required field: {0}")]
    MissingField(&'static str),

    #[error("Song record field has the wrong type: {0}")]
    InvalidField(&'static str),

    #[error("Format must be json or txt, got: {0}")]
    InvalidFormat(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read overwrite confirmation: {0}")]
    Prompt(#[source] std::io::Error),
}
