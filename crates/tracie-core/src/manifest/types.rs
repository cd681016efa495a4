//! Manifest data model

use serde::{Deserialize, Deserializer, Serialize};

/// Remote archive the traces can be fetched from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TracesDb {
    /// Prefix the trace path is appended to
    #[serde(rename = "download-url", default)]
    pub download_url: Option<String>,
}

/// Expected checksum of a trace on one device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expectation {
    /// Device name as passed to the replayer
    pub device: String,

    /// Checksum of the rendered frame
    pub checksum: String,
}

impl Expectation {
    /// Create a new expectation
    pub fn new(device: impl Into<String>, checksum: impl Into<String>) -> Self {
        Self {
            device: device.into(),
            checksum: checksum.into(),
        }
    }
}

/// A trace and its per-device expectations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceDescriptor {
    /// Path relative to the traces directory
    pub path: String,

    /// Expectations in manifest order
    #[serde(default, deserialize_with = "nullable_list")]
    pub expectations: Vec<Expectation>,
}

impl TraceDescriptor {
    /// Create a trace without expectations
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            expectations: Vec::new(),
        }
    }

    /// Add an expectation
    pub fn with_expectation(mut self, device: impl Into<String>, checksum: impl Into<String>) -> Self {
        self.expectations.push(Expectation::new(device, checksum));
        self
    }

    /// First expectation recorded for `device`, if any.
    ///
    /// Later expectations for the same device are ignored with a warning.
    pub fn expectation_for(&self, device: &str) -> Option<&Expectation> {
        let mut matching = self.expectations.iter().filter(|e| e.device == device);
        let first = matching.next()?;
        if matching.next().is_some() {
            tracing::warn!(
                "{} lists several expectations for {}; using the first",
                self.path,
                device
            );
        }
        Some(first)
    }

    /// Directory part of the trace path (empty for top-level traces)
    pub fn dir(&self) -> &str {
        self.path.rsplit_once('/').map(|(dir, _)| dir).unwrap_or("")
    }
}

/// Parsed trace manifest
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceManifest {
    /// Remote trace archive
    #[serde(rename = "traces-db", default, skip_serializing_if = "Option::is_none")]
    pub traces_db: Option<TracesDb>,

    /// Traces in manifest order
    #[serde(default, deserialize_with = "nullable_list")]
    pub traces: Vec<TraceDescriptor>,
}

impl TraceManifest {
    /// Configured download URL prefix, if any
    pub fn download_url(&self) -> Option<&str> {
        self.traces_db
            .as_ref()
            .and_then(|db| db.download_url.as_deref())
            .filter(|url| !url.is_empty())
    }

    /// Traces that carry an expectation for `device`, paired with it
    pub fn traces_for<'a>(
        &'a self,
        device: &'a str,
    ) -> impl Iterator<Item = (&'a TraceDescriptor, &'a Expectation)> + 'a {
        self.traces
            .iter()
            .filter_map(move |trace| trace.expectation_for(device).map(|e| (trace, e)))
    }
}

/// `key:` with no value parses as null; treat it like an empty list.
fn nullable_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
