//! Per-trace result records

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

const ERROR_MARKER: &str = "error";

/// Checksum actually observed, or the replay error marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Actual {
    Checksum(String),
    Error,
}

impl From<String> for Actual {
    fn from(value: String) -> Self {
        if value == ERROR_MARKER {
            Actual::Error
        } else {
            Actual::Checksum(value)
        }
    }
}

impl From<Actual> for String {
    fn from(actual: Actual) -> Self {
        match actual {
            Actual::Checksum(checksum) => checksum,
            Actual::Error => ERROR_MARKER.to_string(),
        }
    }
}

impl std::fmt::Display for Actual {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Actual::Checksum(checksum) => f.write_str(checksum),
            Actual::Error => f.write_str(ERROR_MARKER),
        }
    }
}

/// Result of evaluating one trace on one device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceRecord {
    /// Observed checksum
    pub actual: Actual,

    /// Checksum from the manifest
    pub expected: String,

    /// Stored frame, relative to the results directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl TraceRecord {
    /// Record for a replay that produced `actual`
    pub fn rendered(expected: impl Into<String>, actual: impl Into<String>) -> Self {
        Self {
            actual: Actual::Checksum(actual.into()),
            expected: expected.into(),
            image: None,
        }
    }

    /// Record for a replay that failed
    pub fn replay_error(expected: impl Into<String>) -> Self {
        Self {
            actual: Actual::Error,
            expected: expected.into(),
            image: None,
        }
    }

    /// Attach the stored frame path
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// Whether the observed checksum equals the expected one
    pub fn passed(&self) -> bool {
        matches!(&self.actual, Actual::Checksum(actual) if *actual == self.expected)
    }
}

/// All records of one device, keyed by trace path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceReport {
    /// Manifest file name, used to name the JUnit suite
    pub manifest: String,

    /// Device the traces were replayed on
    pub device: String,

    /// Records keyed by trace path
    pub records: BTreeMap<String, TraceRecord>,
}

impl DeviceReport {
    /// Create an empty report
    pub fn new(manifest: impl Into<String>, device: impl Into<String>) -> Self {
        Self {
            manifest: manifest.into(),
            device: device.into(),
            records: BTreeMap::new(),
        }
    }

    /// Add or replace the record of a trace
    pub fn insert(&mut self, trace: impl Into<String>, record: TraceRecord) {
        self.records.insert(trace.into(), record);
    }

    /// Whether every record passed
    pub fn passed(&self) -> bool {
        self.records.values().all(TraceRecord::passed)
    }

    /// Number of failed records
    pub fn failures(&self) -> usize {
        self.records.values().filter(|r| !r.passed()).count()
    }

    /// `<manifest>:<device>`, the JUnit suite and class name
    pub fn suite_name(&self) -> String {
        format!("{}:{}", self.manifest, self.device)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_pass_fail() {
        assert!(TraceRecord::rendered("abc", "abc").passed());
        assert!(!TraceRecord::rendered("abc", "def").passed());
        assert!(!TraceRecord::replay_error("abc").passed());
    }

    #[test]
    fn test_error_marker_serialization() {
        let yaml = serde_yaml::to_string(&TraceRecord::replay_error("8e0a80")).unwrap();
        assert!(yaml.contains("actual: error"));
        assert!(yaml.contains("expected: 8e0a80"));
        assert!(!yaml.contains("image"));

        let parsed: TraceRecord = serde_yaml::from_str("actual: error\nexpected: x\n").unwrap();
        assert_eq!(parsed.actual, Actual::Error);
    }

    #[test]
    fn test_device_report_counts() {
        let mut report = DeviceReport::new("traces.yml", "gl-test-device");
        assert!(report.passed());

        report.insert("a.trace", TraceRecord::rendered("1", "1"));
        report.insert("b.trace", TraceRecord::rendered("1", "2").with_image("test/gl/b.png"));
        assert!(!report.passed());
        assert_eq!(report.failures(), 1);
        assert_eq!(report.suite_name(), "traces.yml:gl-test-device");
    }
}
