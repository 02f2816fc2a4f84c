use thiserror::Error;

pub type TaperResult<T> = Result<T, TaperError>;

#[derive(Error, Debug)]
pub enum TaperError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Plan snapshot error: {0}")]
    Snapshot(String),

    #[error("Event log error: {0}")]
    EventLog(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
