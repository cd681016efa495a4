//! Manifest-level run execution

use std::path::Path;

use tracing::{debug, info, warn};

use super::TraceChecker;
use crate::config::RunConfig;
use crate::error::{TracieError, TracieResult};
use crate::manifest::TraceManifest;
use crate::publish::ArtifactPublisher;
use crate::replay::Replayer;
use crate::report::{write_junit, write_results, DashboardLinks, DeviceReport, RESULTS_FILE};
use crate::store::TraceStore;

/// Outcome of a run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Whether every evaluated trace passed on every device
    pub passed: bool,

    /// One report per distinct requested device, in request order
    pub reports: Vec<DeviceReport>,
}

impl RunSummary {
    /// Total number of evaluated (trace, device) pairs
    pub fn evaluated(&self) -> usize {
        self.reports.iter().map(|r| r.records.len()).sum()
    }

    /// Total number of failures
    pub fn failures(&self) -> usize {
        self.reports.iter().map(DeviceReport::failures).sum()
    }
}

/// Runs manifests against a replayer
pub struct RunExecutor {
    config: RunConfig,
    store: TraceStore,
    replayer: Box<dyn Replayer>,
    publisher: Option<ArtifactPublisher>,
}

impl RunExecutor {
    /// Create an executor, loading upload credentials if uploads are enabled
    pub fn new(config: RunConfig, replayer: Box<dyn Replayer>) -> TracieResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .user_agent(concat!("tracie/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TracieError::config_with_context(e.to_string(), "HTTP client"))?;

        Self::with_client(config, replayer, client)
    }

    /// Create an executor sharing an existing HTTP client for downloads and uploads
    pub fn with_client(
        config: RunConfig,
        replayer: Box<dyn Replayer>,
        client: reqwest::Client,
    ) -> TracieResult<Self> {
        let store = TraceStore::new(config.traces_db.clone(), client.clone()).with_retry(config.retry.clone());

        let publisher = match &config.upload {
            Some(upload) => Some(
                ArtifactPublisher::from_config(upload, config.ci.clone(), client)?
                    .with_retry(config.retry.clone()),
            ),
            None => None,
        };

        Ok(Self {
            config,
            store,
            replayer,
            publisher,
        })
    }

    /// Configuration of this executor
    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// Load `manifest_path` and run it for every device
    pub async fn run_manifest_file(
        &self,
        manifest_path: impl AsRef<Path>,
        devices: &[String],
    ) -> TracieResult<RunSummary> {
        let manifest_path = manifest_path.as_ref();
        let manifest = TraceManifest::load(manifest_path)?;
        let name = manifest_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| manifest_path.display().to_string());

        self.run(&manifest, &name, devices).await
    }

    /// Run every trace of `manifest` that has an expectation for a requested device.
    ///
    /// Devices are processed one after the other. Reports are written once
    /// all devices are done.
    pub async fn run(
        &self,
        manifest: &TraceManifest,
        manifest_name: &str,
        devices: &[String],
    ) -> TracieResult<RunSummary> {
        if devices.is_empty() {
            return Err(TracieError::config("at least one device name is required"));
        }

        let checker = TraceChecker::new(&self.store, self.replayer.as_ref(), &self.config.results_dir)
            .with_publisher(self.publisher.as_ref())
            .with_store_images(self.config.store_images);

        let mut passed = true;
        let mut reports: Vec<DeviceReport> = Vec::with_capacity(devices.len());

        for device in devices {
            if reports.iter().any(|r| &r.device == device) {
                warn!("Device {} requested more than once; checking it once", device);
                continue;
            }
            let mut report = DeviceReport::new(manifest_name, device.as_str());

            for (trace, expectation) in manifest.traces_for(device) {
                let record = checker
                    .check(trace, expectation, device, manifest.download_url())
                    .await?;
                passed &= record.passed();
                report.insert(trace.path.as_str(), record);
            }

            let skipped = manifest.traces.len() - report.records.len();
            if skipped > 0 {
                debug!("{} trace(s) have no expectation for {}", skipped, device);
            }
            info!(
                "{}: {} trace(s) checked, {} failed",
                report.suite_name(),
                report.records.len(),
                report.failures()
            );
            reports.push(report);
        }

        let results_file = write_results(&self.config.results_dir, &reports).await?;
        if let Some(publisher) = &self.publisher {
            publisher
                .upload(&results_file, &format!("traces/{}", RESULTS_FILE), "text/yaml")
                .await?;
        }

        if let Some(junit) = &self.config.junit_xml {
            write_junit(junit, &reports, &DashboardLinks::from_config(&self.config)).await?;
        }

        Ok(RunSummary { passed, reports })
    }
}
