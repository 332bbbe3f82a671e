use thiserror::Error;

#[derive(Error, Debug)]
pub enum KycError {
    #[error("config parse error: {0}")]
    ConfigParse(String),

    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),

    #[error("path does not exist: {0}")]
    PathNotFound(String),

    #[error("snapshot parse error: {0}")]
    SnapshotParse(String),

    #[error("unknown goal: {0}")]
    UnknownGoal(String),

    #[error("session error: {0}")]
    Session(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, KycError>;
