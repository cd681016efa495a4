//! Error types for tracie
//!
//! Per-trace problems (replay failures, checksum mismatches) are not errors:
//! they are folded into the report. The types here cover the infrastructure
//! failures that abort a run: bad configuration, unreadable manifests,
//! missing traces that cannot be fetched, failed uploads and report I/O.

mod constructors;
mod types;

pub use types::{TracieError, TracieResult};
