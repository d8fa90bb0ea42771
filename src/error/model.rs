// Model collaborator error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Model error code constants
///
/// Error code range: 2001-2003
pub struct ModelErrorCodes {}

impl ModelErrorCodes {
    /// Inference collaborator could not be reached
    pub const UNAVAILABLE: i32 = 2001;

    /// Inference ran but failed
    pub const INFERENCE_FAILED: i32 = 2002;

    /// Inference succeeded but produced no labels
    pub const EMPTY_OUTPUT: i32 = 2003;
}

/// Errors from the external classification model
///
/// All of these are absorbed at the context boundary by the synthetic
/// fallback path; they never propagate past `AppContext`.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Model service unreachable or not configured
    Unavailable { reason: String },

    /// Model ran but inference failed
    InferenceFailed { details: String },

    /// Model returned an empty label set
    EmptyOutput,
}

impl ErrorCode for ModelError {
    fn code(&self) -> i32 {
        match self {
            ModelError::Unavailable { .. } => ModelErrorCodes::UNAVAILABLE,
            ModelError::InferenceFailed { .. } => ModelErrorCodes::INFERENCE_FAILED,
            ModelError::EmptyOutput => ModelErrorCodes::EMPTY_OUTPUT,
        }
    }

    fn message(&self) -> String {
        match self {
            ModelError::Unavailable { reason } => {
                format!("Classification model unavailable: {}", reason)
            }
            ModelError::InferenceFailed { details } => {
                format!("Inference failed: {}", details)
            }
            ModelError::EmptyOutput => "Model returned no labels".to_string(),
        }
    }
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ModelError (code {}): {}", self.code(), self.message())
    }
}

impl std::error::Error for ModelError {}

/// Log a model error with structured context
pub fn log_model_error(err: &ModelError, context: &str) {
    error!(
        "Model error in {}: code={}, component=SoundModel, message={}",
        context,
        err.code(),
        err.message()
    );
}
