//! Frame checksums
//!
//! The checksum is the MD5 of the decoded pixel buffer, so re-encoding a
//! frame or changing PNG metadata does not change it.

use std::path::Path;

use md5::{Digest, Md5};

use super::ReplayError;

/// Lowercase hex MD5 of `bytes`
pub fn checksum_bytes(bytes: &[u8]) -> String {
    format!("{:x}", Md5::digest(bytes))
}

/// Checksum of the pixels stored in an image file
pub fn image_checksum(path: &Path) -> Result<String, ReplayError> {
    let image = image::open(path).map_err(|e| ReplayError::Decode {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    Ok(checksum_bytes(image.as_bytes()))
}
