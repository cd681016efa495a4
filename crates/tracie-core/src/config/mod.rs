//! Run configuration
//!
//! Everything a run needs to know about its environment is collected here
//! and handed to the executor at construction time. Library code never reads
//! environment variables; the CLI is responsible for mapping `TRACIE_*` and
//! `CI_*` variables onto these structs.

mod run;
mod upload;

pub use run::{CiContext, RunConfig};
pub use upload::UploadConfig;
