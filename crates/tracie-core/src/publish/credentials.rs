//! Temporary object store credentials

use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use super::PublishError;

/// Session credentials for one object store host
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: String,
}

impl Credentials {
    /// Create credentials from their parts
    pub fn new(
        access_key_id: impl Into<String>,
        secret_access_key: impl Into<String>,
        session_token: impl Into<String>,
    ) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key: secret_access_key.into(),
            session_token: session_token.into(),
        }
    }

    /// Load the entry for `host` from a credentials file.
    ///
    /// The file maps host names to credential objects:
    /// `{"minio-packet.freedesktop.org": {"AccessKeyId": .., "SecretAccessKey": .., "SessionToken": ..}}`
    pub fn load(path: &Path, host: &str) -> Result<Self, PublishError> {
        let invalid = |message: String| PublishError::Credentials {
            path: path.to_path_buf(),
            message,
        };

        let content = std::fs::read_to_string(path).map_err(|e| invalid(e.to_string()))?;
        let mut by_host: HashMap<String, Credentials> =
            serde_json::from_str(&content).map_err(|e| invalid(e.to_string()))?;

        by_host
            .remove(host)
            .ok_or_else(|| invalid(format!("no credentials for host {}", host)))
    }
}
