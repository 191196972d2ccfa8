use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("not found: {path}")]
    NotFound { path: String, status: Option<u16> },
    #[error("invalid content path: {0}")]
    InvalidPath(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
}

impl FetchError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, FetchError::NotFound { .. })
    }
}

#[derive(Debug, Error)]
pub enum IndexLoadError {
    #[error("failed to fetch post index: {0}")]
    Fetch(#[from] FetchError),
    #[error("failed to parse post index: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum HostError {
    #[error("{0} is not available on this host")]
    Unsupported(&'static str),
    #[error("host operation failed: {0}")]
    Failed(String),
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ShareError {
    #[error("share cancelled by the user")]
    Cancelled,
    #[error("share failed: {0}")]
    Failed(String),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error(transparent)]
    Index(#[from] IndexLoadError),
    #[error("post not in index: {0}")]
    PostNotFound(String),
    #[error("failed to load post content: {0}")]
    Content(#[from] FetchError),
    #[error("superseded by a newer request")]
    Stale,
}
