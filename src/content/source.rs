//! Content source boundary
//!
//! Plain-text retrieval of Markdown or HTML files by location. The
//! pipeline only sees this trait; the filesystem implementation below
//! covers static-asset hosting, where the deployment root maps onto a
//! directory.

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

/// Retrieval failure for a single location.
#[derive(Debug, Error)]
pub enum SourceError {
    /// The location does not exist under this source (the 404 case);
    /// eligible for fallback scanning.
    #[error("content not found: {0}")]
    NotFound(String),

    /// The location cannot be served by this source at all.
    #[error("unsupported location: {0}")]
    Unsupported(String),

    /// Read failed for a reason other than absence.
    #[error("failed to read {location}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },
}

/// Format of a content file, guessed from its location.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Markdown,
    Html,
}

impl ContentKind {
    /// Markdown unless the extension says HTML.
    pub fn from_location(location: &str) -> Self {
        let ext = Path::new(location)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("");
        match ext {
            "html" | "htm" => ContentKind::Html,
            _ => ContentKind::Markdown,
        }
    }
}

/// A place content can be fetched from.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetch the raw text at a location.
    async fn fetch(&self, location: &str) -> Result<String, SourceError>;
}

/// Filesystem-backed content source.
///
/// Locations are URL-space paths; the mount prefix (the deployment root
/// the pipeline prepends) is stripped before resolving under the content
/// root directory.
pub struct FsContentSource {
    root: PathBuf,
    mount: String,
}

impl FsContentSource {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            mount: "/".to_string(),
        }
    }

    /// Set the mount prefix this source is served under.
    pub fn with_mount(mut self, mount: &str) -> Self {
        self.mount = mount.to_string();
        self
    }

    /// Map a URL-space location to a path under the content root.
    fn resolve(&self, location: &str) -> Result<PathBuf, SourceError> {
        if location.starts_with("http://")
            || location.starts_with("https://")
            || location.starts_with("//")
        {
            return Err(SourceError::Unsupported(location.to_string()));
        }

        let relative = location
            .strip_prefix(&self.mount)
            .unwrap_or(location)
            .trim_start_matches('/');

        let path = Path::new(relative);
        // Keep reads inside the content root.
        if path
            .components()
            .any(|c| matches!(c, Component::ParentDir | Component::RootDir))
        {
            return Err(SourceError::Unsupported(location.to_string()));
        }

        Ok(self.root.join(path))
    }
}

#[async_trait]
impl ContentSource for FsContentSource {
    async fn fetch(&self, location: &str) -> Result<String, SourceError> {
        let path = self.resolve(location)?;
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(SourceError::NotFound(location.to_string()))
            }
            Err(e) => Err(SourceError::Io {
                location: location.to_string(),
                source: e,
            }),
        }
    }
}
