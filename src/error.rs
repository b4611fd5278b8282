use thiserror::Error;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Size exceeded: {len} characters (max {max})")]
    SizeExceeded { len: usize, max: usize },

    #[error("Malformed payload encoding: {0}")]
    MalformedEncoding(String),

    #[error("Decoded payload is not valid UTF-8")]
    InvalidUtf8,

    #[error("Malformed snapshot: {0}")]
    MalformedStructure(String),

    #[error("Unsupported schema version {got:?} (this reader supports version {supported:?})")]
    UnsupportedSchemaVersion {
        got: String,
        supported: &'static str,
    },

    #[error("Invalid cache key format")]
    InvalidKeyFormat,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
