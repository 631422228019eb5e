use std::path::PathBuf;
use thiserror::Error;

/// Raised at the selection boundary, before a file ever reaches the registry.
#[derive(Error, Debug)]
pub enum SelectionError {
    #[error("{name}: unsupported file type '.{extension}'")]
    Unsupported { name: String, extension: String },

    #[error("{name}: {size} bytes exceeds the {limit} byte limit")]
    TooLarge { name: String, size: u64, limit: u64 },

    #[error("Failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Terminal failure of one submitted batch.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Failed to build upload request: {0}")]
    Request(#[source] reqwest::Error),

    #[error("Failed to send request: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Upload failed with status: {status}")]
    Status { status: u16, body: String },

    #[error("Failed to parse upload response: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("Upload task ended without a response")]
    Interrupted,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum SubmitError {
    #[error("An upload is already in progress")]
    Busy,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid endpoint URL '{url}'")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}
