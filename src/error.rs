use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Redis {op} timed out after {timeout_ms}ms")]
    Timeout { op: String, timeout_ms: u64 },

    #[error("Could not serialize value: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Value stored at '{key}' is not valid JSON: {source}")]
    InvalidJson {
        key: String,
        source: serde_json::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Upload of '{object_key}' failed: {source}")]
    Upload {
        object_key: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

pub type Result<T> = std::result::Result<T, ExportError>;
