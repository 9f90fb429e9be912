use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document not found: {0}")]
    NotFound(String),

    #[error("access denied: path escapes docs root: {0}")]
    AccessDenied(String),

    #[error("io error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("corpus scan cancelled")]
    Cancelled,

    #[error("config error: {0}")]
    Config(String),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    #[error("regex error: {0}")]
    RegexError(#[from] regex::Error),

    #[error("worker task failed: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}

impl EngineError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, EngineError::Store(StoreError::NotFound(_)))
    }
}

pub type Result<T, E = EngineError> = std::result::Result<T, E>;
