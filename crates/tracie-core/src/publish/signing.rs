//! Request signing
//!
//! The signature covers exactly
//! `PUT\n\n<content-type>\n<date>\nx-amz-security-token:<token>\n<resource>`;
//! any deviation in this layout makes the server reject the request.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use sha1::Sha1;

use super::PublishError;

type HmacSha1 = Hmac<Sha1>;

/// Build the string the signature is computed over
pub fn string_to_sign(content_type: &str, date: &str, security_token: &str, resource: &str) -> String {
    format!(
        "PUT\n\n{}\n{}\nx-amz-security-token:{}\n{}",
        content_type, date, security_token, resource
    )
}

/// Base64 encoded HMAC-SHA1 of `message` keyed with `secret`
pub fn sign(secret: &str, message: &str) -> Result<String, PublishError> {
    let mut mac = HmacSha1::new_from_slice(secret.as_bytes()).map_err(|e| PublishError::Signing {
        message: e.to_string(),
    })?;
    mac.update(message.as_bytes());
    Ok(STANDARD.encode(mac.finalize().into_bytes()))
}

/// RFC 1123 date as used in the `Date` header
pub fn http_date(time: DateTime<Utc>) -> String {
    time.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}
