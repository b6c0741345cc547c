use thiserror::Error;

#[derive(Debug, Error)]
pub enum ArError {
    #[error("failed to decode asset {path}: {reason}")]
    AssetDecode { path: String, reason: String },
    #[error("failed to fetch asset {path}: {reason}")]
    Fetch { path: String, reason: String },
    #[error("scene node no longer exists")]
    UnknownNode,
    #[error("node cannot be parented under itself or its descendant")]
    InvalidParent,
}

pub type ArResult<T> = Result<T, ArError>;
