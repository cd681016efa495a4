//! Artifact uploads
//!
//! Frames of failing traces and the results file can be pushed to an
//! S3-compatible object store using temporary credentials and the legacy
//! `AWS <key>:<signature>` HMAC-SHA1 request signing scheme.

mod credentials;
mod publisher;
mod signing;

pub use credentials::Credentials;
pub use publisher::{ArtifactPublisher, SignedRequest};
pub use signing::{http_date, sign, string_to_sign};

use std::path::PathBuf;

use thiserror::Error;

use crate::recovery::{classify_status, ErrorClass, Retryable};

/// Errors raised while uploading artifacts
#[derive(Debug, Error)]
pub enum PublishError {
    /// Credentials file missing, unreadable or without an entry for the host
    #[error("Invalid credentials in {path}: {message}")]
    Credentials { path: PathBuf, message: String },

    /// Endpoint URL could not be parsed
    #[error("Invalid upload endpoint '{endpoint}': {message}")]
    InvalidEndpoint { endpoint: String, message: String },

    /// Request signature could not be computed
    #[error("Failed to sign upload request: {message}")]
    Signing { message: String },

    /// Artifact could not be read
    #[error("Failed to read artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Request did not complete
    #[error("Upload to {url} failed: {message}")]
    Request { url: String, message: String },

    /// Server rejected the upload
    #[error("Upload to {url} rejected with status {status}: {body}")]
    Status { url: String, status: u16, body: String },
}

impl Retryable for PublishError {
    fn error_class(&self) -> ErrorClass {
        match self {
            PublishError::Request { .. } => ErrorClass::Transient,
            PublishError::Status { status, .. } => classify_status(*status),
            _ => ErrorClass::Permanent,
        }
    }
}
