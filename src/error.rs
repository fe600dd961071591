use thiserror::Error;

#[derive(Error, Debug)]
pub enum SubrelayError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("No subtitle entries could be read from {0}")]
    UnreadableSubtitle(String),

    #[error("Subtitle has {entries} entries, the limit is {limit}")]
    CapacityExceeded { entries: usize, limit: usize },

    #[error("Unknown language: {0}")]
    UnknownLanguage(String),

    #[error("Nothing to translate")]
    EmptyInput,

    #[error("No translation service could handle the request")]
    ServiceUnavailable,
}

pub type Result<T> = std::result::Result<T, SubrelayError>;
