use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(&'static str),
    #[error("Malformed memento: {0}")]
    MalformedMemento(String),
    #[error("Unsupported memento version {0}")]
    UnsupportedMementoVersion(u32),
    #[error("Storage failure: {0}")]
    Storage(String),
}

pub type Result<T> = std::result::Result<T, GameError>;
