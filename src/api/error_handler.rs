//! Error classification for background requests

use super::error::ApiError;
use crate::logging::LogLevel;

/// Decides how loudly a failed background request (progress poll, list
/// refresh) is reported. Nothing here retries; the next tick does that.
#[derive(Debug, Clone, Default)]
pub struct ErrorHandler;

impl ErrorHandler {
    pub fn new() -> Self {
        Self
    }

    /// Classify error and determine appropriate log level
    pub fn classify_error(&self, error: &ApiError) -> LogLevel {
        match error {
            // Rate limiting - low priority
            ApiError::Http { status, .. } if *status == 429 => LogLevel::Debug,

            // Server errors - temporary issues
            ApiError::Http { status, .. } if (500..=599).contains(status) => LogLevel::Warn,

            // The campaign is gone or the console is not allowed to see it
            ApiError::Http { status, .. } if *status == 401 || *status == 403 => LogLevel::Error,
            ApiError::Http { status, .. } if *status == 404 => LogLevel::Error,

            // Contract drift between console and backend
            ApiError::Decode(_) => LogLevel::Error,

            // Network issues - usually temporary
            ApiError::Reqwest(_) => LogLevel::Warn,

            _ => LogLevel::Warn,
        }
    }
}
