//! Trace replay
//!
//! Rendering is delegated to an external replayer. A [`Replayer`] produces a
//! frame image and a log next to the trace; [`replay`] then hashes the frame.
//! Every failure along the way is reported as [`ReplayOutcome::Failed`] so a
//! broken trace never aborts the run.

mod artifacts;
mod checksum;
mod invoker;

pub use artifacts::{locate_artifacts, output_dir};
pub use checksum::{checksum_bytes, image_checksum};
pub use invoker::{CommandReplayer, Replayer};

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;

/// Files produced by a successful replay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedArtifacts {
    /// Rendered frame
    pub image: PathBuf,
    /// Replayer log
    pub log: PathBuf,
}

/// Why a replay did not yield a checksum
#[derive(Debug, Error)]
pub enum ReplayError {
    /// The replayer could not be started
    #[error("failed to start replayer '{program}': {message}")]
    Spawn { program: String, message: String },

    /// The replayer exited unsuccessfully
    #[error("replayer exited with {}", exit_code_label(.code))]
    ExitStatus { code: Option<i32>, stderr: String },

    /// The replayer ran past its deadline and was killed
    #[error("replayer timed out after {0:?}")]
    TimedOut(Duration),

    /// The replayer succeeded but left no matching output
    #[error("replayer produced no file matching {pattern}")]
    MissingArtifact { pattern: String },

    /// The rendered frame could not be decoded
    #[error("failed to decode {path}: {message}")]
    Decode { path: PathBuf, message: String },
}

fn exit_code_label(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {}", code),
        None => "no status (killed by signal)".to_string(),
    }
}

/// A replay that produced a checksum
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplayResult {
    /// Lowercase hex checksum of the frame's pixels
    pub checksum: String,
    /// Rendered frame
    pub image: PathBuf,
    /// Replayer log
    pub log: PathBuf,
}

/// Result of replaying one trace on one device
#[derive(Debug)]
pub enum ReplayOutcome {
    Rendered(ReplayResult),
    Failed(ReplayError),
}

impl ReplayOutcome {
    /// Checksum, if the replay succeeded
    pub fn checksum(&self) -> Option<&str> {
        match self {
            ReplayOutcome::Rendered(result) => Some(&result.checksum),
            ReplayOutcome::Failed(_) => None,
        }
    }
}

/// Replay `trace` on `device` and hash the rendered frame
pub async fn replay(replayer: &dyn Replayer, trace: &Path, device: &str) -> ReplayOutcome {
    let artifacts = match replayer.render(trace, device).await {
        Ok(artifacts) => artifacts,
        Err(err) => return ReplayOutcome::Failed(err),
    };

    match image_checksum(&artifacts.image) {
        Ok(checksum) => ReplayOutcome::Rendered(ReplayResult {
            checksum,
            image: artifacts.image,
            log: artifacts.log,
        }),
        Err(err) => ReplayOutcome::Failed(err),
    }
}
