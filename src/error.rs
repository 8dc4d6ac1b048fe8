use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Request failed: {0}")]
    Http(#[from] ureq::Error),

    #[error("Request timed out after {0} ms")]
    Timeout(u64),

    #[error("HTTP {status} {reason}: {body}")]
    HttpStatus {
        status: u16,
        reason: String,
        body: String,
    },

    #[error("Response is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Failed to write JSON output: {0}")]
    Output(#[from] serde_json::Error),

    #[error(
        "Unexpected payload shape: expected an array or an object with a `clients` or `data` array"
    )]
    UnexpectedPayload,

    #[error("Client '{0}' not found")]
    ClientNotFound(String),

    #[error("Client '{0}' has no valid location and cannot be shown on the map")]
    NotMappable(String),
}

pub type Result<T> = std::result::Result<T, TrackerError>;
