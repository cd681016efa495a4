//! Tracie Core Library
//!
//! Replays recorded graphics traces through an external replayer, hashes the
//! rendered frames and compares them against the checksums recorded in a
//! trace manifest. Results are written as a YAML report (and optionally
//! JUnit XML), and mismatching frames can be uploaded to an S3-compatible
//! object store.
//!
//! # Example
//!
//! ```rust,ignore
//! use tracie_core::{CommandReplayer, RunConfig, RunExecutor};
//!
//! let config = RunConfig::default().with_store_images(true);
//! let executor = RunExecutor::new(config, Box::new(CommandReplayer::new("dump_trace_images")))?;
//! let summary = executor.run_manifest_file("traces.yml", &["gl-test-device".into()]).await?;
//! std::process::exit(if summary.passed { 0 } else { 1 });
//! ```

pub mod config;
pub mod error;
pub mod manifest;
pub mod publish;
pub mod recovery;
pub mod replay;
pub mod report;
pub mod runner;
pub mod store;

// Re-export commonly used types
pub use config::{CiContext, RunConfig, UploadConfig};
pub use error::{TracieError, TracieResult};
pub use manifest::{Expectation, TraceDescriptor, TraceManifest};
pub use publish::{ArtifactPublisher, Credentials, PublishError};
pub use recovery::RetryConfig;
pub use replay::{CommandReplayer, RenderedArtifacts, ReplayError, ReplayOutcome, Replayer};
pub use report::{Actual, DashboardLinks, DeviceReport, TraceRecord};
pub use runner::{RunExecutor, RunSummary, TraceChecker};
pub use store::{Location, Resolution, StoreError, TraceStore};
