//! Configuration for a single tracie run

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::UploadConfig;
use crate::recovery::RetryConfig;

/// CI identifiers used for artifact paths and dashboard links.
///
/// The values are opaque and passed through verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CiContext {
    /// Project path, e.g. `mesa/mesa`
    #[serde(default)]
    pub project_path: String,

    /// Pipeline identifier
    #[serde(default)]
    pub pipeline_id: String,

    /// Job identifier
    #[serde(default)]
    pub job_id: String,
}

impl CiContext {
    /// Create a CI context from its three identifiers
    pub fn new(
        project_path: impl Into<String>,
        pipeline_id: impl Into<String>,
        job_id: impl Into<String>,
    ) -> Self {
        Self {
            project_path: project_path.into(),
            pipeline_id: pipeline_id.into(),
            job_id: job_id.into(),
        }
    }
}

/// Configuration for a tracie run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    /// Local directory holding the traces
    #[serde(default = "default_traces_db")]
    pub traces_db: PathBuf,

    /// Directory receiving logs, stored images and reports
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,

    /// Store rendered images even when the checksum matches
    #[serde(default)]
    pub store_images: bool,

    /// Upload settings; uploads are disabled when absent
    #[serde(default)]
    pub upload: Option<UploadConfig>,

    /// CI identifiers
    #[serde(default)]
    pub ci: CiContext,

    /// Host serving the image diff dashboard
    #[serde(default = "default_dashboard_host")]
    pub dashboard_host: String,

    /// Where to write the JUnit XML report, if anywhere
    #[serde(default)]
    pub junit_xml: Option<PathBuf>,

    /// Kill the replayer after this long (no limit when absent)
    #[serde(default, with = "humantime_serde")]
    pub replay_timeout: Option<Duration>,

    /// Per-request timeout for downloads and uploads
    #[serde(default = "default_http_timeout", with = "humantime_serde")]
    pub http_timeout: Duration,

    /// Retry policy for downloads and uploads
    #[serde(default)]
    pub retry: RetryConfig,
}

fn default_traces_db() -> PathBuf {
    PathBuf::from("./traces-db/")
}

fn default_results_dir() -> PathBuf {
    PathBuf::from("./results/")
}

fn default_dashboard_host() -> String {
    "tracie.freedesktop.org".to_string()
}

fn default_http_timeout() -> Duration {
    Duration::from_secs(300)
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            traces_db: default_traces_db(),
            results_dir: default_results_dir(),
            store_images: false,
            upload: None,
            ci: CiContext::default(),
            dashboard_host: default_dashboard_host(),
            junit_xml: None,
            replay_timeout: None,
            http_timeout: default_http_timeout(),
            retry: RetryConfig::default(),
        }
    }
}

impl RunConfig {
    /// Set the traces directory
    pub fn with_traces_db(mut self, dir: impl Into<PathBuf>) -> Self {
        self.traces_db = dir.into();
        self
    }

    /// Set the results directory
    pub fn with_results_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.results_dir = dir.into();
        self
    }

    /// Always keep rendered images
    pub fn with_store_images(mut self, store: bool) -> Self {
        self.store_images = store;
        self
    }

    /// Enable uploads
    pub fn with_upload(mut self, upload: UploadConfig) -> Self {
        self.upload = Some(upload);
        self
    }

    /// Set CI identifiers
    pub fn with_ci(mut self, ci: CiContext) -> Self {
        self.ci = ci;
        self
    }

    /// Set the dashboard host
    pub fn with_dashboard_host(mut self, host: impl Into<String>) -> Self {
        self.dashboard_host = host.into();
        self
    }

    /// Write a JUnit report to the given path
    pub fn with_junit_xml(mut self, path: impl Into<PathBuf>) -> Self {
        self.junit_xml = Some(path.into());
        self
    }

    /// Limit how long a single replay may run
    pub fn with_replay_timeout(mut self, timeout: Duration) -> Self {
        self.replay_timeout = Some(timeout);
        self
    }

    /// Set the HTTP request timeout
    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// Set the network retry policy
    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    /// Whether artifact uploads are enabled
    pub fn upload_enabled(&self) -> bool {
        self.upload.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = RunConfig::default();
        assert_eq!(config.traces_db, PathBuf::from("./traces-db/"));
        assert_eq!(config.results_dir, PathBuf::from("./results/"));
        assert!(!config.store_images);
        assert!(!config.upload_enabled());
        assert!(config.replay_timeout.is_none());
        assert_eq!(config.retry.max_attempts, 1);
    }

    #[test]
    fn test_config_builder() {
        let config = RunConfig::default()
            .with_store_images(true)
            .with_upload(UploadConfig::default())
            .with_ci(CiContext::new("mesa/mesa", "42", "1337"))
            .with_replay_timeout(Duration::from_secs(600));

        assert!(config.store_images);
        assert!(config.upload_enabled());
        assert_eq!(config.ci.job_id, "1337");
        assert_eq!(config.replay_timeout, Some(Duration::from_secs(600)));
    }

    #[test]
    fn test_config_from_yaml_uses_defaults() {
        let yaml = r#"
store_images: true
replay_timeout: 10m
ci:
  project_path: mesa/mesa
"#;
        let config: RunConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.store_images);
        assert_eq!(config.replay_timeout, Some(Duration::from_secs(600)));
        assert_eq!(config.http_timeout, Duration::from_secs(300));
        assert_eq!(config.ci.project_path, "mesa/mesa");
        assert_eq!(config.ci.job_id, "");
        assert_eq!(config.dashboard_host, "tracie.freedesktop.org");
    }
}
