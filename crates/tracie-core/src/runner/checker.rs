//! Evaluation of a single trace

use std::path::{Path, PathBuf};

use tracing::{error, info, warn};

use crate::error::{TracieError, TracieResult};
use crate::manifest::{Expectation, TraceDescriptor};
use crate::publish::ArtifactPublisher;
use crate::replay::{self, ReplayOutcome, Replayer};
use crate::report::TraceRecord;
use crate::store::TraceStore;

const README_URL: &str = "https://gitlab.freedesktop.org/mesa/mesa/blob/master/.gitlab-ci/tracie/README.md";

/// Checks traces against their expectations and files the results
pub struct TraceChecker<'a> {
    store: &'a TraceStore,
    replayer: &'a dyn Replayer,
    publisher: Option<&'a ArtifactPublisher>,
    results_dir: &'a Path,
    store_images: bool,
}

impl<'a> TraceChecker<'a> {
    /// Create a checker filing results under `results_dir`
    pub fn new(store: &'a TraceStore, replayer: &'a dyn Replayer, results_dir: &'a Path) -> Self {
        Self {
            store,
            replayer,
            publisher: None,
            results_dir,
            store_images: false,
        }
    }

    /// Upload frames of mismatching traces
    pub fn with_publisher(mut self, publisher: Option<&'a ArtifactPublisher>) -> Self {
        self.publisher = publisher;
        self
    }

    /// Keep frames of matching traces too
    pub fn with_store_images(mut self, store_images: bool) -> Self {
        self.store_images = store_images;
        self
    }

    /// Evaluate `trace` on `device` against `expectation`.
    ///
    /// Replay failures and mismatches are returned as failing records. Only
    /// infrastructure problems (missing trace, failed upload, filesystem
    /// errors) are returned as errors.
    pub async fn check(
        &self,
        trace: &TraceDescriptor,
        expectation: &Expectation,
        device: &str,
        download_url: Option<&str>,
    ) -> TracieResult<TraceRecord> {
        let resolution = self.store.ensure(&trace.path, download_url).await?;

        let result = match replay::replay(self.replayer, resolution.path(), device).await {
            ReplayOutcome::Rendered(result) => result,
            ReplayOutcome::Failed(err) => {
                error!(
                    "Trace {} couldn't be replayed on {}: {}",
                    trace.path, device, err
                );
                return Ok(TraceRecord::replay_error(&expectation.checksum));
            }
        };

        let matched = result.checksum == expectation.checksum;
        if matched {
            info!("Images match for {} on {}", trace.path, device);
        } else {
            warn!(
                "Images differ for {} on {} (expected: {}, actual: {})",
                trace.path, device, expectation.checksum, result.checksum
            );
            warn!("For more information see {}", README_URL);
        }

        let dir_in_results = results_subdir(trace, device);
        let target_dir = self.results_dir.join(&dir_in_results);
        tokio::fs::create_dir_all(&target_dir)
            .await
            .map_err(|e| TracieError::io_at(&target_dir, e))?;

        move_into(&result.log, &target_dir).await?;

        if !matched {
            if let Some(publisher) = self.publisher {
                publisher
                    .upload(&result.image, &format!("traces/{}.png", result.checksum), "image/png")
                    .await?;
            }
        }

        let mut record = TraceRecord::rendered(&expectation.checksum, &result.checksum);
        if !matched || self.store_images {
            let image_name = move_into(&result.image, &target_dir).await?;
            record = record.with_image(format!("{}/{}", dir_in_results, image_name));
        }

        Ok(record)
    }
}

/// `<trace dir>/test/<device>`, relative to the results directory
fn results_subdir(trace: &TraceDescriptor, device: &str) -> String {
    match trace.dir() {
        "" => format!("test/{}", device),
        dir => format!("{}/test/{}", dir, device),
    }
}

/// Move `file` into `dir`, keeping its name; returns the name
async fn move_into(file: &Path, dir: &Path) -> TracieResult<String> {
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| TracieError::report(format!("{} has no file name", file.display())))?;
    let target: PathBuf = dir.join(&name);

    if tokio::fs::rename(file, &target).await.is_err() {
        // Fall back to copy + delete when crossing filesystems
        tokio::fs::copy(file, &target)
            .await
            .map_err(|e| TracieError::io_at(file, e))?;
        tokio::fs::remove_file(file)
            .await
            .map_err(|e| TracieError::io_at(file, e))?;
    }

    Ok(name)
}
