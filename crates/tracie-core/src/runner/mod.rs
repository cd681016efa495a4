//! Run orchestration
//!
//! [`TraceChecker`] evaluates a single trace on a single device and files
//! its artifacts; [`RunExecutor`] walks a manifest for one or more devices
//! and writes the reports.

mod checker;
mod executor;

pub use checker::TraceChecker;
pub use executor::{RunExecutor, RunSummary};
