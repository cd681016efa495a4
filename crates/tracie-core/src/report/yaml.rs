//! YAML results file

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::{DeviceReport, TraceRecord};
use crate::error::{TracieError, TracieResult};

/// Name of the results file inside the results directory
pub const RESULTS_FILE: &str = "results.yml";

/// Render the results document.
///
/// A single device renders as `trace path -> record`; several devices are
/// nested one level deeper under their device names.
pub fn render_results(reports: &[DeviceReport]) -> TracieResult<String> {
    let yaml = match reports {
        [] => serde_yaml::to_string(&BTreeMap::<String, TraceRecord>::new())?,
        [single] => serde_yaml::to_string(&single.records)?,
        many => {
            let by_device: BTreeMap<&str, &BTreeMap<String, TraceRecord>> = many
                .iter()
                .map(|report| (report.device.as_str(), &report.records))
                .collect();
            serde_yaml::to_string(&by_device)?
        }
    };
    Ok(yaml)
}

/// Write `results.yml` into `results_dir`, creating it if needed
pub async fn write_results(results_dir: &Path, reports: &[DeviceReport]) -> TracieResult<PathBuf> {
    tokio::fs::create_dir_all(results_dir)
        .await
        .map_err(|e| TracieError::io_at(results_dir, e))?;

    let path = results_dir.join(RESULTS_FILE);
    let yaml = render_results(reports)?;
    tokio::fs::write(&path, yaml)
        .await
        .map_err(|e| TracieError::io_at(&path, e))?;

    tracing::debug!("Wrote {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_report() {
        assert_eq!(render_results(&[]).unwrap().trim(), "{}");
        let report = DeviceReport::new("traces.yml", "gl");
        assert_eq!(render_results(&[report]).unwrap().trim(), "{}");
    }

    #[test]
    fn test_single_device_layout() {
        let mut report = DeviceReport::new("traces.yml", "vk-test-device");
        report.insert(
            "trace2/olive.testtrace",
            TraceRecord::rendered("8e0a801367e1714463475a824dab363b", "5efda83854befe0155ff8517a58d5b51")
                .with_image("trace2/test/vk-test-device/olive.testtrace-0.png"),
        );

        let yaml = render_results(&[report]).unwrap();
        let parsed: BTreeMap<String, TraceRecord> = serde_yaml::from_str(&yaml).unwrap();
        let record = &parsed["trace2/olive.testtrace"];
        assert_eq!(record.expected, "8e0a801367e1714463475a824dab363b");
        assert_eq!(
            record.image.as_deref(),
            Some("trace2/test/vk-test-device/olive.testtrace-0.png")
        );
        assert!(yaml.contains("actual: 5efda83854befe0155ff8517a58d5b51"));
    }

    #[test]
    fn test_multi_device_layout() {
        let mut gl = DeviceReport::new("traces.yml", "gl-test-device");
        gl.insert("trace1/magenta.testtrace", TraceRecord::rendered("a", "a"));
        let mut vk = DeviceReport::new("traces.yml", "vk-test-device");
        vk.insert("trace2/olive.testtrace", TraceRecord::replay_error("b"));

        let yaml = render_results(&[gl, vk]).unwrap();
        let parsed: BTreeMap<String, BTreeMap<String, TraceRecord>> = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed.len(), 2);
        assert!(parsed["gl-test-device"]["trace1/magenta.testtrace"].passed());
        assert_eq!(
            parsed["vk-test-device"]["trace2/olive.testtrace"].actual,
            crate::report::Actual::Error
        );
    }

    #[tokio::test]
    async fn test_write_creates_directory() {
        let dir = tempfile::TempDir::new().unwrap();
        let results = dir.path().join("nested/results");
        let path = write_results(&results, &[]).await.unwrap();
        assert_eq!(path, results.join(RESULTS_FILE));
        assert_eq!(std::fs::read_to_string(path).unwrap().trim(), "{}");
    }
}
