// Feedback validation error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Feedback error code constants
///
/// Error code range: 3001-3002
pub struct FeedbackErrorCodes {}

impl FeedbackErrorCodes {
    /// Report text empty after trimming
    pub const EMPTY_FEEDBACK: i32 = 3001;

    /// Report text exceeds the length cap
    pub const TOO_LONG: i32 = 3002;
}

/// Feedback report validation errors
///
/// Surfaced to the caller before analysis or submission.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedbackError {
    /// Report text was empty after trimming
    EmptyFeedback,

    /// Report text longer than the configured maximum
    TooLong { chars: usize, limit: usize },
}

impl ErrorCode for FeedbackError {
    fn code(&self) -> i32 {
        match self {
            FeedbackError::EmptyFeedback => FeedbackErrorCodes::EMPTY_FEEDBACK,
            FeedbackError::TooLong { .. } => FeedbackErrorCodes::TOO_LONG,
        }
    }

    fn message(&self) -> String {
        match self {
            FeedbackError::EmptyFeedback => "Feedback cannot be empty".to_string(),
            FeedbackError::TooLong { chars, limit } => {
                format!("Feedback too long: {} characters (maximum {})", chars, limit)
            }
        }
    }
}

impl fmt::Display for FeedbackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FeedbackError (code {}): {}", self.code(), self.message())
    }
}

impl std::error::Error for FeedbackError {}

/// Log a feedback error with structured context
pub fn log_feedback_error(err: &FeedbackError, context: &str) {
    error!(
        "Feedback error in {}: code={}, component=Feedback, message={}",
        context,
        err.code(),
        err.message()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feedback_error_codes() {
        assert_eq!(FeedbackError::EmptyFeedback.code(), 3001);
        assert_eq!(
            FeedbackError::TooLong {
                chars: 1200,
                limit: 1000
            }
            .code(),
            3002
        );
    }

    #[test]
    fn test_feedback_error_messages() {
        let err = FeedbackError::TooLong {
            chars: 1200,
            limit: 1000,
        };
        assert!(err.message().contains("1200"));
        assert!(err.message().contains("1000"));
    }
}
