//! JUnit XML report

use std::path::Path;

use super::{Actual, DeviceReport, TraceRecord};
use crate::config::RunConfig;
use crate::error::{TracieError, TracieResult};

/// Builds links into the image diff dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardLinks {
    host: String,
    project_path: String,
    job_id: String,
}

impl DashboardLinks {
    /// Create links for a CI job
    pub fn new(host: impl Into<String>, project_path: impl Into<String>, job_id: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            project_path: project_path.into(),
            job_id: job_id.into(),
        }
    }

    /// Links for the job described by `config`
    pub fn from_config(config: &RunConfig) -> Self {
        Self::new(
            config.dashboard_host.clone(),
            config.ci.project_path.clone(),
            config.ci.job_id.clone(),
        )
    }

    /// Image diff page of a trace
    pub fn imagediff_url(&self, trace: &str) -> String {
        format!(
            "https://{}/dashboard/imagediff/{}/{}/{}",
            self.host,
            self.project_path,
            self.job_id,
            strip_extension(trace)
        )
    }
}

/// Drop the extension of the last path component only
fn strip_extension(trace: &str) -> &str {
    let name_start = trace.rfind('/').map(|i| i + 1).unwrap_or(0);
    match trace[name_start..].rfind('.') {
        Some(0) | None => trace,
        Some(dot) => &trace[..name_start + dot],
    }
}

fn xml_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn failure_message(record: &TraceRecord) -> String {
    match &record.actual {
        Actual::Checksum(actual) => format!(
            "Images differ (expected: {}, actual: {})",
            record.expected, actual
        ),
        Actual::Error => format!("Trace replay failed (expected: {})", record.expected),
    }
}

/// Render the JUnit document: one suite per device, one case per trace
pub fn render_junit(reports: &[DeviceReport], links: &DashboardLinks) -> String {
    let tests: usize = reports.iter().map(|r| r.records.len()).sum();
    let failures: usize = reports.iter().map(DeviceReport::failures).sum();

    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(&format!(
        "<testsuites tests=\"{}\" failures=\"{}\">\n",
        tests, failures
    ));

    for report in reports {
        let suite = xml_escape(&report.suite_name());
        xml.push_str(&format!(
            "  <testsuite name=\"{}\" tests=\"{}\" failures=\"{}\">\n",
            suite,
            report.records.len(),
            report.failures()
        ));

        for (trace, record) in &report.records {
            let name = xml_escape(trace);
            if record.passed() {
                xml.push_str(&format!(
                    "    <testcase name=\"{}\" classname=\"{}\"/>\n",
                    name, suite
                ));
                continue;
            }

            let message = failure_message(record);
            xml.push_str(&format!(
                "    <testcase name=\"{}\" classname=\"{}\">\n",
                name, suite
            ));
            xml.push_str(&format!(
                "      <failure message=\"{}\">{}\nTo view the image differences visit: {}</failure>\n",
                xml_escape(&message),
                xml_escape(&message),
                xml_escape(&links.imagediff_url(trace))
            ));
            xml.push_str("    </testcase>\n");
        }

        xml.push_str("  </testsuite>\n");
    }

    xml.push_str("</testsuites>\n");
    xml
}

/// Write the JUnit document to `path`
pub async fn write_junit(path: &Path, reports: &[DeviceReport], links: &DashboardLinks) -> TracieResult<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| TracieError::io_at(parent, e))?;
    }
    tokio::fs::write(path, render_junit(reports, links))
        .await
        .map_err(|e| TracieError::io_at(path, e))?;
    tracing::debug!("Wrote JUnit report {}", path.display());
    Ok(())
}
