use thiserror::Error;

#[derive(Error, Debug)]
pub enum TriCountError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed project: {0}")]
    MalformedProject(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TriCountError>;
