//! Where the index and markdown files come from.

use std::future::Future;
use std::path::{Component, Path, PathBuf};

use crate::error::FetchError;

/// Read-only access to the files of a static site root.
pub trait ContentSource {
    /// Fetches the file at `path`, relative to the site root.
    fn fetch_text(&self, path: &str) -> impl Future<Output = Result<String, FetchError>>;
}

/// Serves files from a local directory.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl ContentSource for DirSource {
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        let rel = clean_relative_path(path).ok_or_else(|| FetchError::InvalidPath(path.into()))?;
        match tokio::fs::read_to_string(self.root.join(rel)).await {
            Ok(text) => Ok(text),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Err(FetchError::NotFound {
                path: path.to_string(),
                status: None,
            }),
            Err(err) => Err(err.into()),
        }
    }
}

/// Serves files from a deployed site over HTTP.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpSource {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl ContentSource for HttpSource {
    async fn fetch_text(&self, path: &str) -> Result<String, FetchError> {
        let response = self.client.get(self.url_for(path)).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::NotFound {
                path: path.to_string(),
                status: Some(status.as_u16()),
            });
        }
        Ok(response.text().await?)
    }
}

/// Rejects absolute paths and parent traversal.
pub fn clean_relative_path(path: &str) -> Option<PathBuf> {
    if path.contains('\\') {
        return None;
    }
    let mut clean = PathBuf::new();
    for component in Path::new(path.trim_start_matches('/')).components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    if clean.as_os_str().is_empty() {
        None
    } else {
        Some(clean)
    }
}
