use serde::{Deserialize, Serialize};
use std::fmt;

pub const PROFILE_READ_FAILED: &str = "PROFILE_READ_FAILED";
pub const PROFILE_DECODE_FAILED: &str = "PROFILE_DECODE_FAILED";
pub const VALIDATION_PROFILE_INVALID: &str = "VALIDATION_PROFILE_INVALID";

/// Structured error shared by every fallible operation in the workspace.
///
/// Ranking itself is total; only configuration loading produces these.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppError {
    pub code: String,
    pub message: String,
    pub details: Option<String>,
    pub retryable: bool,
}

impl AppError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
            retryable: false,
        }
    }

    pub fn profile_invalid(message: impl Into<String>) -> Self {
        Self::new(VALIDATION_PROFILE_INVALID, message)
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    pub fn with_retryable(mut self, retryable: bool) -> Self {
        self.retryable = retryable;
        self
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.details {
            Some(details) => write!(f, "[{}] {} ({details})", self.code, self.message),
            None => write!(f, "[{}] {}", self.code, self.message),
        }
    }
}

impl std::error::Error for AppError {}
