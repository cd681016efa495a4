//! Core error type for tracie

use std::path::PathBuf;

use thiserror::Error;

use crate::manifest::ManifestError;
use crate::publish::PublishError;
use crate::store::StoreError;

/// Result type alias for tracie operations
pub type TracieResult<T> = Result<T, TracieError>;

/// Main error type for tracie runs
#[derive(Error, Debug)]
pub enum TracieError {
    /// Invalid or incomplete run configuration
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        context: Option<String>,
    },

    /// Manifest could not be read or parsed
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// Trace could not be made available locally
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Artifact upload failed
    #[error(transparent)]
    Publish(#[from] PublishError),

    /// Report could not be rendered
    #[error("Report error: {message}")]
    Report { message: String },

    /// Filesystem errors while filing results
    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<PathBuf>,
        #[source]
        source: std::io::Error,
    },
}

impl TracieError {
    /// Short stable code for programmatic handling and log fields
    pub fn error_code(&self) -> &'static str {
        match self {
            TracieError::Config { .. } => "TRACIE_CONFIG",
            TracieError::Manifest(_) => "TRACIE_MANIFEST",
            TracieError::Store(StoreError::NotFoundFatal { .. }) => "TRACIE_TRACE_MISSING",
            TracieError::Store(_) => "TRACIE_STORE",
            TracieError::Publish(_) => "TRACIE_PUBLISH",
            TracieError::Report { .. } => "TRACIE_REPORT",
            TracieError::Io { .. } => "TRACIE_IO",
        }
    }

    /// Optional context attached to the error
    pub fn context(&self) -> Option<&str> {
        match self {
            TracieError::Config { context, .. } => context.as_deref(),
            _ => None,
        }
    }
}

impl From<std::io::Error> for TracieError {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            message: source.to_string(),
            path: None,
            source,
        }
    }
}

impl From<serde_yaml::Error> for TracieError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::report(format!("YAML serialization failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let missing = TracieError::from(StoreError::NotFoundFatal {
            path: PathBuf::from("traces-db/a.trace"),
        });
        assert_eq!(missing.error_code(), "TRACIE_TRACE_MISSING");
        assert!(missing.to_string().contains("traces-db/a.trace"));

        let config = TracieError::config_with_context("bad endpoint", "upload");
        assert_eq!(config.error_code(), "TRACIE_CONFIG");
        assert_eq!(config.context(), Some("upload"));
    }

    #[test]
    fn test_io_conversion_keeps_message() {
        let err: TracieError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
        assert_eq!(err.error_code(), "TRACIE_IO");
        assert_eq!(err.to_string(), "IO error: denied");
    }
}
