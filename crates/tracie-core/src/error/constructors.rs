//! Constructor methods for TracieError

use std::path::Path;

use super::types::TracieError;

impl TracieError {
    /// Create a new configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: None,
        }
    }

    /// Create a configuration error with context
    pub fn config_with_context(message: impl Into<String>, context: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            context: Some(context.into()),
        }
    }

    /// Create a new report error
    pub fn report(message: impl Into<String>) -> Self {
        Self::Report {
            message: message.into(),
        }
    }

    /// Create an IO error tied to a path
    pub fn io_at(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        let path = path.as_ref();
        Self::Io {
            message: format!("{}: {}", path.display(), source),
            path: Some(path.to_path_buf()),
            source,
        }
    }
}
