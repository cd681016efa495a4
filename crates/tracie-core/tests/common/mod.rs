//! Shared fixtures for integration tests
//!
//! Traces used here are tiny text files holding an RGBA colour as eight hex
//! digits. [`FakeReplayer`] "renders" them as a 2x2 PNG filled with that
//! colour, so the expected checksum of a trace is known up front.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use image::{Rgba, RgbaImage};
use tempfile::TempDir;
use tracie_core::replay::{checksum_bytes, locate_artifacts, output_dir};
use tracie_core::{RenderedArtifacts, ReplayError, Replayer, RunConfig};
use wiremock::{MockServer, Request};

pub const MAGENTA: &str = "ff00ffff";
pub const OLIVE: &str = "808000ff";

/// Install a test log writer once per test binary
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("tracie_core=debug")
        .with_test_writer()
        .try_init();
}

fn parse_color(text: &str) -> Option<[u8; 4]> {
    let text = text.trim();
    if text.len() != 8 || !text.is_ascii() {
        return None;
    }
    let mut rgba = [0u8; 4];
    for (i, channel) in rgba.iter_mut().enumerate() {
        *channel = u8::from_str_radix(&text[i * 2..i * 2 + 2], 16).ok()?;
    }
    Some(rgba)
}

/// Checksum the fake replayer produces for a trace holding `color`
pub fn checksum_of(color: &str) -> String {
    let rgba = parse_color(color).unwrap();
    let pixels: Vec<u8> = rgba.iter().copied().cycle().take(4 * 4).collect();
    checksum_bytes(&pixels)
}

/// Replayer that paints the colour stored in the trace file.
///
/// A trace holding anything other than a colour makes the replay fail;
/// `no-frame` makes it succeed without writing a frame.
#[derive(Debug, Clone, Default)]
pub struct FakeReplayer {
    calls: Arc<Mutex<Vec<(PathBuf, String)>>>,
}

impl FakeReplayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle on the (trace, device) pairs replayed so far
    pub fn calls(&self) -> Arc<Mutex<Vec<(PathBuf, String)>>> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Replayer for FakeReplayer {
    async fn render(&self, trace: &Path, device: &str) -> Result<RenderedArtifacts, ReplayError> {
        self.calls
            .lock()
            .unwrap()
            .push((trace.to_path_buf(), device.to_string()));

        let content = std::fs::read_to_string(trace).unwrap_or_default();
        let dir = output_dir(trace, device);
        std::fs::create_dir_all(&dir).unwrap();
        let name = trace.file_name().unwrap().to_string_lossy().into_owned();

        if content.trim() == "no-frame" {
            std::fs::write(dir.join(format!("{}.log", name)), "replayed, no frame\n").unwrap();
            return locate_artifacts(trace, device);
        }

        let Some(rgba) = parse_color(&content) else {
            return Err(ReplayError::ExitStatus {
                code: Some(1),
                stderr: format!("cannot parse {}", trace.display()),
            });
        };

        RgbaImage::from_pixel(2, 2, Rgba(rgba))
            .save(dir.join(format!("{}-0.png", name)))
            .unwrap();
        std::fs::write(dir.join(format!("{}.log", name)), format!("rendered on {}\n", device)).unwrap();

        locate_artifacts(trace, device)
    }
}

/// Temporary directory laid out like a CI job checkout
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        init_tracing();
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn traces_db(&self) -> PathBuf {
        self.path().join("traces-db")
    }

    pub fn results_dir(&self) -> PathBuf {
        self.path().join("results")
    }

    /// Write a trace file below the traces directory
    pub fn add_trace(&self, trace: &str, content: &str) -> PathBuf {
        let path = self.traces_db().join(trace);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Write `traces.yml` and return its path
    pub fn write_manifest(&self, yaml: &str) -> PathBuf {
        let path = self.path().join("traces.yml");
        std::fs::write(&path, yaml).unwrap();
        path
    }

    /// Configuration pointing at this workspace
    pub fn config(&self) -> RunConfig {
        RunConfig::default()
            .with_traces_db(self.traces_db())
            .with_results_dir(self.results_dir())
    }

    pub fn results_yaml(&self) -> String {
        std::fs::read_to_string(self.results_dir().join("results.yml")).unwrap()
    }

    pub fn results(&self) -> serde_yaml::Value {
        serde_yaml::from_str(&self.results_yaml()).unwrap()
    }
}

/// HTTP client for loopback mock servers; ignores any proxy set in the environment
pub fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .no_proxy()
        .build()
        .expect("Failed to create HTTP client")
}

/// Requests of `method` received by `server`, in arrival order
pub async fn received(server: &MockServer, method: &str) -> Vec<Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|r| r.method.as_str() == method)
        .collect()
}

/// Value of header `name` in `request`
pub fn header<'a>(request: &'a Request, name: &str) -> Option<&'a str> {
    request.headers.get(name).and_then(|v| v.to_str().ok())
}

/// Write a credentials file holding an entry for `host`
pub fn write_credentials(dir: &Path, host: &str) -> PathBuf {
    let path = dir.join(".minio_credentials");
    let json = serde_json::json!({
        host: {
            "AccessKeyId": "key",
            "SecretAccessKey": "secret",
            "SessionToken": "token",
        }
    });
    std::fs::write(&path, json.to_string()).unwrap();
    path
}
