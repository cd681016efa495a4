//! Manifest loading from YAML files

use std::path::{Component, Path, PathBuf};

use thiserror::Error;

use super::TraceManifest;

/// Errors raised while loading a manifest
#[derive(Debug, Error)]
pub enum ManifestError {
    /// Manifest file could not be read
    #[error("Failed to read manifest {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Manifest is not valid YAML or has the wrong shape
    #[error("Failed to parse manifest {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// A trace path would escape the traces directory
    #[error("Invalid trace path '{trace}': {reason}")]
    InvalidTracePath { trace: String, reason: String },
}

impl TraceManifest {
    /// Load and validate a manifest file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let manifest = Self::parse(&content).map_err(|source| ManifestError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        manifest.validate()?;

        tracing::debug!(
            "Loaded {} trace(s) from {}",
            manifest.traces.len(),
            path.display()
        );
        Ok(manifest)
    }

    /// Parse a manifest from a YAML string without validating it
    pub fn parse(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Check that every trace path stays inside the traces directory
    pub fn validate(&self) -> Result<(), ManifestError> {
        for trace in &self.traces {
            let invalid = |reason: &str| ManifestError::InvalidTracePath {
                trace: trace.path.clone(),
                reason: reason.to_string(),
            };

            let path = Path::new(&trace.path);
            if trace.path.is_empty() {
                return Err(invalid("path is empty"));
            }
            if path.is_absolute() {
                return Err(invalid("absolute paths are not allowed"));
            }
            if path
                .components()
                .any(|c| matches!(c, Component::ParentDir | Component::Prefix(_)))
            {
                return Err(invalid("path traversal is not allowed"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_manifest() {
        let yaml = r#"
traces-db:
  download-url: "https://minio-packet.freedesktop.org/mesa-tracie-public/"

traces:
  - path: trace1/magenta.testtrace
    expectations:
    - device: gl-test-device
      checksum: 8e0a801367e1714463475a824dab363b
  - path: trace2/olive.testtrace
    expectations:
    - device: vk-test-device
      checksum: 5efda83854befe0155ff8517a58d5b51
"#;

        let manifest = TraceManifest::parse(yaml).unwrap();
        assert_eq!(
            manifest.download_url(),
            Some("https://minio-packet.freedesktop.org/mesa-tracie-public/")
        );
        assert_eq!(manifest.traces.len(), 2);
        assert_eq!(manifest.traces[1].path, "trace2/olive.testtrace");
        assert_eq!(manifest.traces[1].expectations[0].device, "vk-test-device");
        assert!(manifest.validate().is_ok());
    }

    #[test]
    fn test_parse_null_traces() {
        let manifest = TraceManifest::parse("traces:").unwrap();
        assert!(manifest.traces.is_empty());
        assert!(manifest.download_url().is_none());
    }

    #[test]
    fn test_parse_null_expectations() {
        let yaml = r#"
traces:
  - path: trace1/red.testtrace
    expectations:
"#;
        let manifest = TraceManifest::parse(yaml).unwrap();
        assert_eq!(manifest.traces.len(), 1);
        assert!(manifest.traces[0].expectations.is_empty());
    }

    #[test]
    fn test_rejects_path_traversal() {
        let yaml = r#"
traces:
  - path: ../outside.trace
    expectations: []
"#;
        let manifest = TraceManifest::parse(yaml).unwrap();
        assert!(matches!(
            manifest.validate(),
            Err(ManifestError::InvalidTracePath { .. })
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let err = TraceManifest::load("/nonexistent/traces.yml").unwrap_err();
        assert!(matches!(err, ManifestError::Read { .. }));
    }

    #[test]
    fn test_load_reports_parse_errors() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("traces.yml");
        std::fs::write(&path, "traces: [unterminated").unwrap();

        let err = TraceManifest::load(&path).unwrap_err();
        assert!(matches!(err, ManifestError::Parse { .. }));
        assert!(err.to_string().contains("traces.yml"));
    }
}
