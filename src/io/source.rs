use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::error::IoError;

/// Default upper bound on the size of a file loaded into memory (256 MiB).
pub const DEFAULT_MAX_FILE_SIZE: u64 = 256 * 1024 * 1024;

/// Trait for acquiring the complete byte buffer of an image.
///
/// The decoder never touches the filesystem; a source hands it an immutable
/// buffer and releases whatever handle it used before parsing begins.
/// Implementations must be thread-safe.
#[async_trait]
pub trait ImageSource: Send + Sync {
    /// Load the whole resource into memory.
    async fn load(&self) -> Result<Bytes, IoError>;

    /// Get a unique identifier for this resource (for logging and reports).
    fn identifier(&self) -> &str;
}

/// Loads images from the local filesystem.
#[derive(Debug, Clone)]
pub struct LocalFileSource {
    path: PathBuf,
    identifier: String,
    max_size: u64,
}

impl LocalFileSource {
    /// Create a source for `path` with the default size limit.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let identifier = path.display().to_string();
        Self {
            path,
            identifier,
            max_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Override the maximum number of bytes this source will load.
    pub fn with_max_size(mut self, max_size: u64) -> Self {
        self.max_size = max_size;
        self
    }

    /// Path this source reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn map_io_error(&self, err: std::io::Error) -> IoError {
        if err.kind() == std::io::ErrorKind::NotFound {
            IoError::NotFound(self.identifier.clone())
        } else {
            IoError::Read {
                identifier: self.identifier.clone(),
                message: err.to_string(),
            }
        }
    }
}

#[async_trait]
impl ImageSource for LocalFileSource {
    async fn load(&self) -> Result<Bytes, IoError> {
        let metadata = tokio::fs::metadata(&self.path)
            .await
            .map_err(|e| self.map_io_error(e))?;

        if !metadata.is_file() {
            return Err(IoError::Read {
                identifier: self.identifier.clone(),
                message: "not a regular file".to_string(),
            });
        }

        if metadata.len() > self.max_size {
            return Err(IoError::TooLarge {
                identifier: self.identifier.clone(),
                size: metadata.len(),
                limit: self.max_size,
            });
        }

        let data = tokio::fs::read(&self.path)
            .await
            .map_err(|e| self.map_io_error(e))?;

        debug!(source = %self.identifier, bytes = data.len(), "loaded image");
        Ok(Bytes::from(data))
    }

    fn identifier(&self) -> &str {
        &self.identifier
    }
}
