//! Locating replayer output
//!
//! The replayer writes into `<trace dir>/test/<device>/`: frames are named
//! `<trace file name>-<call>.png` and the log `<trace file name>.log`.

use std::path::{Path, PathBuf};

use glob::Pattern;

use super::{RenderedArtifacts, ReplayError};

/// Directory the replayer writes its output to
pub fn output_dir(trace: &Path, device: &str) -> PathBuf {
    trace
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join("test")
        .join(device)
}

/// Find the frame and log the replayer produced for `trace`
pub fn locate_artifacts(trace: &Path, device: &str) -> Result<RenderedArtifacts, ReplayError> {
    let dir = output_dir(trace, device);
    let file_name = trace
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();

    let image = first_match(&dir, &format!("{}-*.png", Pattern::escape(&file_name)))?;
    let log = first_match(&dir, &format!("{}.log", Pattern::escape(&file_name)))?;

    Ok(RenderedArtifacts { image, log })
}

fn first_match(dir: &Path, file_pattern: &str) -> Result<PathBuf, ReplayError> {
    let pattern = format!(
        "{}/{}",
        Pattern::escape(&dir.to_string_lossy()),
        file_pattern
    );
    let missing = || ReplayError::MissingArtifact {
        pattern: pattern.clone(),
    };

    // glob yields matches in alphabetical order
    glob::glob(&pattern)
        .map_err(|_| missing())?
        .filter_map(Result::ok)
        .find(|path| path.is_file())
        .ok_or_else(missing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_output_dir() {
        assert_eq!(
            output_dir(Path::new("traces-db/trace1/magenta.testtrace"), "gl-test-device"),
            PathBuf::from("traces-db/trace1/test/gl-test-device")
        );
    }

    #[test]
    fn test_locate_takes_first_frame() {
        let dir = TempDir::new().unwrap();
        let trace = dir.path().join("trace1/magenta.testtrace");
        let out = output_dir(&trace, "gl");
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(out.join("magenta.testtrace-1.png"), "b").unwrap();
        std::fs::write(out.join("magenta.testtrace-0.png"), "a").unwrap();
        std::fs::write(out.join("magenta.testtrace.log"), "log").unwrap();
        std::fs::write(out.join("other.testtrace-0.png"), "x").unwrap();

        let artifacts = locate_artifacts(&trace, "gl").unwrap();
        assert_eq!(artifacts.image, out.join("magenta.testtrace-0.png"));
        assert_eq!(artifacts.log, out.join("magenta.testtrace.log"));
    }

    #[test]
    fn test_locate_missing_log() {
        let dir = TempDir::new().unwrap();
        let trace = dir.path().join("olive.testtrace");
        let out = output_dir(&trace, "vk");
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(out.join("olive.testtrace-0.png"), "a").unwrap();

        let err = locate_artifacts(&trace, "vk").unwrap_err();
        match err {
            ReplayError::MissingArtifact { pattern } => assert!(pattern.ends_with("olive.testtrace.log")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_locate_escapes_special_characters() {
        let dir = TempDir::new().unwrap();
        let trace = dir.path().join("[weird]/frame[1].trace");
        let out = output_dir(&trace, "gl");
        std::fs::create_dir_all(&out).unwrap();
        std::fs::write(out.join("frame[1].trace-0.png"), "a").unwrap();
        std::fs::write(out.join("frame[1].trace.log"), "log").unwrap();

        let artifacts = locate_artifacts(&trace, "gl").unwrap();
        assert_eq!(artifacts.image, out.join("frame[1].trace-0.png"));
    }
}
