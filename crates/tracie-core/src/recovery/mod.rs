//! Retry support for network calls
//!
//! Trace downloads and artifact uploads are single blocking requests by
//! default. A run can opt into retrying transient failures with exponential
//! backoff through [`RetryConfig`].

mod retry;

pub use retry::{retry_async, RetryConfig};

/// Error classification for recovery decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// Transient errors that may succeed on retry
    Transient,
    /// Permanent errors that will not succeed on retry
    Permanent,
}

/// Errors that know whether retrying them makes sense
pub trait Retryable {
    /// Classify this error
    fn error_class(&self) -> ErrorClass;

    /// Check if the error is retryable
    fn is_retryable(&self) -> bool {
        self.error_class() == ErrorClass::Transient
    }
}

/// Classify an HTTP status code
pub fn classify_status(status: u16) -> ErrorClass {
    match status {
        408 | 425 | 429 | 500..=599 => ErrorClass::Transient,
        _ => ErrorClass::Permanent,
    }
}
