//! Batch inspection of image files.
//!
//! Loading is async and I/O bound; decoding is CPU bound and runs on the
//! blocking thread pool so it never stalls the runtime. A semaphore bounds
//! how many files are loaded and decoded at once, which also bounds how many
//! file buffers are held in memory.
//!
//! ```text
//!   paths ──► spawn per file ──► acquire permit ──► ImageSource::load
//!                                                        │
//!                                                        ▼
//!   outcomes (input order) ◄── FileReport ◄── spawn_blocking(parse)
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::error::InspectError;
use crate::io::{ImageSource, LocalFileSource, DEFAULT_MAX_FILE_SIZE};
use crate::metadata::MetadataModel;

use super::report::FileReport;

/// Default number of files processed concurrently.
pub const DEFAULT_JOBS: usize = 4;

// =============================================================================
// FileOutcome
// =============================================================================

/// Result of inspecting one file.
#[derive(Debug, Clone)]
pub struct FileOutcome {
    /// Identifier of the file as given on input
    pub path: String,

    pub result: Result<FileReport, InspectError>,
}

impl FileOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

// =============================================================================
// Inspector
// =============================================================================

/// Loads and decodes image files with bounded concurrency.
///
/// # Example
///
/// ```ignore
/// use exif_inspector::inspect::Inspector;
///
/// let inspector = Inspector::new(8).with_digest(true);
/// for outcome in inspector.inspect_paths(paths).await {
///     match outcome.result {
///         Ok(report) => println!("{}: {} tags", report.path, report.entry_count()),
///         Err(e) => eprintln!("{}: {}", outcome.path, e),
///     }
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Inspector {
    jobs: usize,
    max_file_size: u64,
    digest: bool,
}

impl Default for Inspector {
    fn default() -> Self {
        Self::new(DEFAULT_JOBS)
    }
}

impl Inspector {
    /// Create an inspector running at most `jobs` files at once (minimum 1).
    pub fn new(jobs: usize) -> Self {
        Self {
            jobs: jobs.max(1),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            digest: false,
        }
    }

    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    /// Include a SHA-256 digest of each file in its report.
    pub fn with_digest(mut self, digest: bool) -> Self {
        self.digest = digest;
        self
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// Load and decode a single source.
    ///
    /// The source's buffer is moved into the blocking task, so no file
    /// handle is held while decoding.
    pub async fn inspect_source<S: ImageSource + ?Sized>(
        &self,
        source: &S,
    ) -> Result<FileReport, InspectError> {
        let data = source.load().await?;
        let identifier = source.identifier().to_string();
        let digest = self.digest;

        tokio::task::spawn_blocking(move || -> Result<FileReport, InspectError> {
            let model = MetadataModel::parse(data.clone())?;
            Ok(FileReport::new(identifier, &data, &model, digest))
        })
        .await
        .map_err(|e| InspectError::Task(e.to_string()))?
    }

    /// Inspect many files concurrently, returning outcomes in input order.
    pub async fn inspect_paths<I, P>(&self, paths: I) -> Vec<FileOutcome>
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let semaphore = Arc::new(Semaphore::new(self.jobs));

        let handles: Vec<_> = paths
            .into_iter()
            .map(|path| {
                let source = LocalFileSource::new(path).with_max_size(self.max_file_size);
                let inspector = self.clone();
                let semaphore = Arc::clone(&semaphore);

                let path = source.identifier().to_string();
                let handle = tokio::spawn(async move {
                    let _permit = semaphore
                        .acquire_owned()
                        .await
                        .map_err(|e| InspectError::Task(e.to_string()))?;
                    inspector.inspect_source(&source).await
                });
                (path, handle)
            })
            .collect();

        let mut outcomes = Vec::with_capacity(handles.len());
        for (path, handle) in handles {
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => Err(InspectError::Task(e.to_string())),
            };

            match &result {
                Ok(report) => debug!(path = %path, entries = report.entry_count(), "inspected"),
                Err(e) => warn!(path = %path, error = %e, "inspection failed"),
            }
            outcomes.push(FileOutcome { path, result });
        }

        outcomes
    }
}

// =============================================================================
// Tests
// =============================================================================
