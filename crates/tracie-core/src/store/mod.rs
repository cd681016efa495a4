//! Trace store resolution
//!
//! Makes sure a trace referenced by the manifest exists under the local
//! traces directory, fetching it from the manifest's download URL when it is
//! missing. Whether a missing trace can be fetched is decided up front by
//! [`TraceStore::locate`], so callers can tell a recoverable miss from a
//! configuration error without any I/O beyond a metadata check.

use std::path::{Path, PathBuf};
use std::time::Instant;

use thiserror::Error;
use tracing::{debug, info};

use crate::recovery::{classify_status, retry_async, ErrorClass, RetryConfig, Retryable};

/// Errors that can occur while resolving a trace
#[derive(Debug, Error)]
pub enum StoreError {
    /// Trace is absent and there is nowhere to fetch it from
    #[error("{path} missing and no download URL is configured")]
    NotFoundFatal { path: PathBuf },

    /// The download request failed
    #[error("Failed to download {url}: {message}")]
    Download {
        url: String,
        message: String,
        status: Option<u16>,
    },

    /// The trace could not be written locally
    #[error("Failed to store trace {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Retryable for StoreError {
    fn error_class(&self) -> ErrorClass {
        match self {
            StoreError::Download {
                status: Some(status),
                ..
            } => classify_status(*status),
            StoreError::Download { status: None, .. } => ErrorClass::Transient,
            _ => ErrorClass::Permanent,
        }
    }
}

/// Where a trace stands before any download happens
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// Already on disk
    Present(PathBuf),
    /// Missing, but can be fetched from `url`
    NotFoundRecoverable { path: PathBuf, url: String },
    /// Missing and cannot be fetched
    NotFoundFatal { path: PathBuf },
}

/// Outcome of a successful [`TraceStore::ensure`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The trace was already present
    Present(PathBuf),
    /// The trace was downloaded during this call
    Downloaded(PathBuf),
}

impl Resolution {
    /// Local path of the trace
    pub fn path(&self) -> &Path {
        match self {
            Resolution::Present(path) | Resolution::Downloaded(path) => path,
        }
    }
}

/// Local trace directory backed by an optional remote archive
#[derive(Debug, Clone)]
pub struct TraceStore {
    root: PathBuf,
    client: reqwest::Client,
    retry: RetryConfig,
}

impl TraceStore {
    /// Create a store rooted at `root`
    pub fn new(root: impl Into<PathBuf>, client: reqwest::Client) -> Self {
        Self {
            root: root.into(),
            client,
            retry: RetryConfig::default(),
        }
    }

    /// Set the retry policy used for downloads
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Local path for a trace
    pub fn trace_path(&self, trace: &str) -> PathBuf {
        self.root.join(trace)
    }

    /// Decide how a trace can be made available
    pub fn locate(&self, trace: &str, download_url: Option<&str>) -> Location {
        let path = self.trace_path(trace);
        if path.exists() {
            return Location::Present(path);
        }
        match download_url {
            Some(base) => Location::NotFoundRecoverable {
                path,
                url: format!("{}{}", base, trace),
            },
            None => Location::NotFoundFatal { path },
        }
    }

    /// Ensure the trace exists locally, downloading it if possible
    pub async fn ensure(&self, trace: &str, download_url: Option<&str>) -> Result<Resolution, StoreError> {
        match self.locate(trace, download_url) {
            Location::Present(path) => {
                debug!("Trace {} already present", path.display());
                Ok(Resolution::Present(path))
            }
            Location::NotFoundFatal { path } => Err(StoreError::NotFoundFatal { path }),
            Location::NotFoundRecoverable { path, url } => {
                if let Some(parent) = path.parent() {
                    tokio::fs::create_dir_all(parent)
                        .await
                        .map_err(|source| StoreError::Io {
                            path: parent.to_path_buf(),
                            source,
                        })?;
                }

                info!("Downloading trace {}", trace);
                let started = Instant::now();
                let body = retry_async(&self.retry, "Trace download", || self.fetch(&url)).await?;
                tokio::fs::write(&path, &body)
                    .await
                    .map_err(|source| StoreError::Io {
                        path: path.clone(),
                        source,
                    })?;
                info!(
                    "Downloaded trace {} ({} bytes) in {}s",
                    trace,
                    body.len(),
                    started.elapsed().as_secs()
                );

                Ok(Resolution::Downloaded(path))
            }
        }
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, StoreError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| StoreError::Download {
                url: url.to_string(),
                message: e.to_string(),
                status: None,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Download {
                url: url.to_string(),
                message: format!("server responded with {}", status),
                status: Some(status.as_u16()),
            });
        }

        let body = response.bytes().await.map_err(|e| StoreError::Download {
            url: url.to_string(),
            message: format!("failed to read response body: {}", e),
            status: Some(status.as_u16()),
        })?;
        Ok(body.to_vec())
    }
}
