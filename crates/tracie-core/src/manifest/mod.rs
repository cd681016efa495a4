//! Trace manifests
//!
//! A manifest lists the traces to replay and, for each of them, the checksum
//! expected on every device the trace is known to render on.

mod loader;
mod types;

pub use loader::ManifestError;
pub use types::{Expectation, TraceDescriptor, TraceManifest, TracesDb};
