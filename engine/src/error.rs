use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Market data fetch failed: {0}")]
    FetchFailure(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("CSV parsing system error: {source}")]
    Csv {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("JSON decoding error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

/// Coarse classification the front-ends map to user-visible messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidArgument,
    FetchFailure,
    InsufficientData,
    Config,
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::InvalidArgument(_) => ErrorKind::InvalidArgument,
            EngineError::InsufficientData(_) => ErrorKind::InsufficientData,
            EngineError::Config(_) => ErrorKind::Config,
            // Raw csv/io/json errors only surface while reading provider data.
            EngineError::FetchFailure(_)
            | EngineError::Csv { .. }
            | EngineError::Io { .. }
            | EngineError::Json { .. } => ErrorKind::FetchFailure,
        }
    }
}

impl From<shared::models::ParseTimeFrameError> for EngineError {
    fn from(err: shared::models::ParseTimeFrameError) -> Self {
        EngineError::InvalidArgument(err.to_string())
    }
}

impl From<shared::models::ParseAssetClassError> for EngineError {
    fn from(err: shared::models::ParseAssetClassError) -> Self {
        EngineError::InvalidArgument(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
