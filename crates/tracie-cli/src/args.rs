//! CLI argument definitions using clap
//!
//! CI-provided settings (`TRACIE_*`, `CI_*`) can be given either as flags
//! or through the environment.

use clap::builder::BoolishValueParser;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

use tracie_core::{CiContext, RetryConfig, RunConfig, UploadConfig};

#[derive(Debug, Parser)]
#[command(name = "tracie")]
#[command(about = "Replay graphics traces and compare rendered frames against known checksums")]
#[command(version)]
pub struct Cli {
    /// Trace manifest (YAML)
    #[arg(long)]
    pub file: PathBuf,

    /// Device to check; may be given several times
    #[arg(long = "device-name", required = true)]
    pub device_names: Vec<String>,

    /// Local directory holding the traces
    #[arg(long, default_value = "./traces-db/")]
    pub traces_db: PathBuf,

    /// Directory receiving logs, images and results.yml
    #[arg(long, default_value = "./results/")]
    pub results_dir: PathBuf,

    /// Also write a JUnit XML report to this path
    #[arg(long)]
    pub junit_xml: Option<PathBuf>,

    /// Replay tool to run for each trace
    #[arg(long, default_value = "dump_trace_images")]
    pub replayer: String,

    /// Extra argument for the replay tool; may be given several times
    #[arg(long = "replay-arg", allow_hyphen_values = true)]
    pub replay_args: Vec<String>,

    /// Kill the replay tool after this long, e.g. `10m`
    #[arg(long, value_parser = humantime::parse_duration)]
    pub replay_timeout: Option<Duration>,

    /// Retry failed downloads and uploads this many times
    #[arg(long, default_value_t = 0)]
    pub retries: u32,

    /// Store rendered frames of passing traces too
    #[arg(long, env = "TRACIE_STORE_IMAGES", value_parser = BoolishValueParser::new())]
    pub store_images: bool,

    /// Upload mismatching frames and the results file
    #[arg(long, env = "TRACIE_UPLOAD_TO_MINIO", value_parser = BoolishValueParser::new())]
    pub upload: bool,

    /// Object store receiving uploads
    #[arg(long, default_value = "https://minio-packet.freedesktop.org")]
    pub upload_endpoint: String,

    /// Credentials file for the object store
    #[arg(long, default_value = ".minio_credentials")]
    pub credentials: PathBuf,

    /// Host serving the image diff dashboard
    #[arg(long, default_value = "tracie.freedesktop.org")]
    pub dashboard_host: String,

    #[arg(long, env = "CI_PROJECT_PATH", default_value = "", hide_default_value = true)]
    pub project_path: String,

    #[arg(long, env = "CI_PIPELINE_ID", default_value = "", hide_default_value = true)]
    pub pipeline_id: String,

    #[arg(long, env = "CI_JOB_ID", default_value = "", hide_default_value = true)]
    pub job_id: String,

    /// Enable debug logging
    #[arg(long, short)]
    pub verbose: bool,
}

impl Cli {
    /// Build the run configuration described by the arguments
    pub fn run_config(&self) -> RunConfig {
        let mut config = RunConfig::default()
            .with_traces_db(&self.traces_db)
            .with_results_dir(&self.results_dir)
            .with_store_images(self.store_images)
            .with_dashboard_host(&self.dashboard_host)
            .with_ci(CiContext::new(&self.project_path, &self.pipeline_id, &self.job_id))
            .with_retry(RetryConfig::default().with_max_attempts(self.retries.saturating_add(1)));

        if let Some(junit) = &self.junit_xml {
            config = config.with_junit_xml(junit);
        }
        if let Some(limit) = self.replay_timeout {
            config = config.with_replay_timeout(limit);
        }
        if self.upload {
            config = config.with_upload(
                UploadConfig::default()
                    .with_endpoint(&self.upload_endpoint)
                    .with_credentials_file(&self.credentials),
            );
        }
        config
    }
}
