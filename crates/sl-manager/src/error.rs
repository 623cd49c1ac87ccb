use sl_core::LogError;
use sl_output::OutputError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("no log collection called `{0}`")]
    UnknownCollection(String),

    #[error("log collection `{0}` already exists")]
    DuplicateCollection(String),

    #[error("logging configuration error: {0}")]
    Config(String),

    #[error("could not read config: {0}")]
    ConfigIo(#[from] std::io::Error),

    #[error("could not parse config: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("logging manager lock poisoned")]
    Poisoned,

    #[error(transparent)]
    Log(#[from] LogError),

    #[error(transparent)]
    Output(#[from] OutputError),
}

pub type ManagerResult<T> = Result<T, ManagerError>;
