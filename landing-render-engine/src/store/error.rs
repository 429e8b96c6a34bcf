use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("network error: {0}")]
    Network(String),
    #[error("store responded with status {0}")]
    Status(u16),
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("unexpected payload: {0}")]
    Shape(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
