//! Replayer backends

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

use super::{locate_artifacts, RenderedArtifacts, ReplayError};

/// Renders a trace for a device
#[async_trait]
pub trait Replayer: Send + Sync {
    /// Replay `trace` on `device` and return the files it produced
    async fn render(&self, trace: &Path, device: &str) -> Result<RenderedArtifacts, ReplayError>;
}

/// Runs an external replay tool as a subprocess.
///
/// The tool is invoked as `<program> [args...] --device-name <device> <trace>`
/// and must write its output into `<trace dir>/test/<device>/`.
#[derive(Debug, Clone)]
pub struct CommandReplayer {
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl CommandReplayer {
    /// Create a replayer running `program`
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            timeout: None,
        }
    }

    /// Extra arguments placed before the device and trace
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    /// Kill the tool if it runs longer than `timeout`
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Program being run
    pub fn program(&self) -> &str {
        &self.program
    }

    fn command(&self, trace: &Path, device: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .arg("--device-name")
            .arg(device)
            .arg(trace)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl Replayer for CommandReplayer {
    async fn render(&self, trace: &Path, device: &str) -> Result<RenderedArtifacts, ReplayError> {
        debug!(
            "Running {} {:?} --device-name {} {}",
            self.program,
            self.args,
            device,
            trace.display()
        );

        let mut cmd = self.command(trace, device);
        let output = cmd.output();
        let output = match self.timeout {
            // Dropping the future kills the child
            Some(limit) => timeout(limit, output)
                .await
                .map_err(|_| ReplayError::TimedOut(limit))?,
            None => output.await,
        }
        .map_err(|e| ReplayError::Spawn {
            program: self.program.clone(),
            message: e.to_string(),
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        if !stdout.trim().is_empty() {
            debug!("replayer stdout:\n{}", stdout.trim_end());
        }

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            warn!(
                "Replay of {} on {} failed: {}",
                trace.display(),
                device,
                stderr.trim_end()
            );
            return Err(ReplayError::ExitStatus {
                code: output.status.code(),
                stderr,
            });
        }

        locate_artifacts(trace, device)
    }
}
