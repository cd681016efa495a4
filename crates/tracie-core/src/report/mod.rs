//! Result reports
//!
//! Every evaluated (trace, device) pair yields a [`TraceRecord`]. Records
//! are grouped per device into a [`DeviceReport`] and written out once at
//! the end of the run as YAML and, optionally, JUnit XML.

mod junit;
mod record;
mod yaml;

pub use junit::{render_junit, write_junit, DashboardLinks};
pub use record::{Actual, DeviceReport, TraceRecord};
pub use yaml::{render_results, write_results, RESULTS_FILE};
