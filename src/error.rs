use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error("need at least 2 points, got {n}")]
    InsufficientPoints { n: usize },
    #[error("tour has {actual} nodes but the instance has {expected}")]
    InvalidTourLength { expected: usize, actual: usize },
    #[error("tour node {index} is duplicated or out of range for {n} nodes")]
    InvalidTourIndex { index: usize, n: usize },
    #[error("invalid parameters: {0}")]
    InvalidParams(String),
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("logger init failed: {0}")]
    Logger(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_params(message: impl Into<String>) -> Self {
        Self::InvalidParams(message.into())
    }

    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}
