//! Object store upload settings

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where and with which credentials artifacts are uploaded
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Base URL of the object store
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// JSON file holding the temporary credentials, keyed by host
    #[serde(default = "default_credentials_file")]
    pub credentials_file: PathBuf,
}

fn default_endpoint() -> String {
    "https://minio-packet.freedesktop.org".to_string()
}

fn default_credentials_file() -> PathBuf {
    PathBuf::from(".minio_credentials")
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            credentials_file: default_credentials_file(),
        }
    }
}

impl UploadConfig {
    /// Set the object store endpoint
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set the credentials file
    pub fn with_credentials_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_file = path.into();
        self
    }
}
