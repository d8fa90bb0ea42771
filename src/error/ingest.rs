// Audio ingest error types and constants

use crate::error::ErrorCode;
use log::error;
use std::fmt;

/// Ingest error code constants
///
/// Single source of truth for the codes returned in HTTP error bodies and
/// CLI diagnostics when an upload is rejected before classification.
///
/// Error code range: 1001-1007
pub struct IngestErrorCodes {}

impl IngestErrorCodes {
    /// No audio payload was provided
    pub const MISSING_AUDIO: i32 = 1001;

    /// File extension is not in the accepted set
    pub const UNSUPPORTED_FORMAT: i32 = 1002;

    /// Payload exceeds the upload size cap
    pub const FILE_TOO_LARGE: i32 = 1003;

    /// Payload could not be decoded as WAV
    pub const MALFORMED_AUDIO: i32 = 1004;

    /// Decoded audio contains no samples
    pub const EMPTY_AUDIO: i32 = 1005;

    /// Sample rate outside the accepted range
    pub const SAMPLE_RATE_OUT_OF_RANGE: i32 = 1006;

    /// Audio appears to be silent
    pub const SILENT_AUDIO: i32 = 1007;
}

/// Audio ingest errors
///
/// These cover every way an upload can be rejected before it reaches the
/// classification pipeline. Rejections are user-visible; none of them is
/// recoverable by the pipeline itself.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestError {
    /// Request carried no audio payload
    MissingAudio,

    /// File extension outside the accepted set
    UnsupportedFormat { extension: String },

    /// Payload larger than the configured cap
    FileTooLarge { bytes: usize, limit: usize },

    /// WAV container could not be parsed
    MalformedAudio { details: String },

    /// Decoded stream held zero samples
    EmptyAudio,

    /// Sample rate outside [min, max]
    SampleRateOutOfRange { rate: u32 },

    /// Peak amplitude below the silence floor
    SilentAudio,
}

impl ErrorCode for IngestError {
    fn code(&self) -> i32 {
        match self {
            IngestError::MissingAudio => IngestErrorCodes::MISSING_AUDIO,
            IngestError::UnsupportedFormat { .. } => IngestErrorCodes::UNSUPPORTED_FORMAT,
            IngestError::FileTooLarge { .. } => IngestErrorCodes::FILE_TOO_LARGE,
            IngestError::MalformedAudio { .. } => IngestErrorCodes::MALFORMED_AUDIO,
            IngestError::EmptyAudio => IngestErrorCodes::EMPTY_AUDIO,
            IngestError::SampleRateOutOfRange { .. } => {
                IngestErrorCodes::SAMPLE_RATE_OUT_OF_RANGE
            }
            IngestError::SilentAudio => IngestErrorCodes::SILENT_AUDIO,
        }
    }

    fn message(&self) -> String {
        match self {
            IngestError::MissingAudio => "No audio file provided".to_string(),
            IngestError::UnsupportedFormat { extension } => {
                format!("Invalid file format: .{}", extension)
            }
            IngestError::FileTooLarge { bytes, limit } => {
                format!("File too large: {} bytes (maximum {})", bytes, limit)
            }
            IngestError::MalformedAudio { details } => {
                format!("Could not decode audio: {}", details)
            }
            IngestError::EmptyAudio => "Empty audio file".to_string(),
            IngestError::SampleRateOutOfRange { rate } => {
                format!("Sample rate {} Hz outside accepted range", rate)
            }
            IngestError::SilentAudio => "Audio appears to be silent".to_string(),
        }
    }
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IngestError (code {}): {}", self.code(), self.message())
    }
}

impl std::error::Error for IngestError {}

impl From<hound::Error> for IngestError {
    fn from(err: hound::Error) -> Self {
        IngestError::MalformedAudio {
            details: err.to_string(),
        }
    }
}

/// Log an ingest error with structured context
pub fn log_ingest_error(err: &IngestError, context: &str) {
    error!(
        "Ingest error in {}: code={}, component=AudioIngest, message={}",
        context,
        err.code(),
        err.message()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ingest_error_codes() {
        assert_eq!(IngestError::MissingAudio.code(), 1001);
        assert_eq!(
            IngestError::UnsupportedFormat {
                extension: "exe".to_string()
            }
            .code(),
            1002
        );
        assert_eq!(
            IngestError::FileTooLarge {
                bytes: 20_000_000,
                limit: 16_777_216
            }
            .code(),
            1003
        );
        assert_eq!(
            IngestError::MalformedAudio {
                details: "test".to_string()
            }
            .code(),
            1004
        );
        assert_eq!(IngestError::EmptyAudio.code(), 1005);
        assert_eq!(IngestError::SampleRateOutOfRange { rate: 4000 }.code(), 1006);
        assert_eq!(IngestError::SilentAudio.code(), 1007);
    }

    #[test]
    fn test_ingest_error_messages() {
        let err = IngestError::UnsupportedFormat {
            extension: "exe".to_string(),
        };
        assert!(err.message().contains(".exe"));

        let err = IngestError::FileTooLarge {
            bytes: 100,
            limit: 50,
        };
        assert!(err.message().contains("100"));
        assert!(err.message().contains("50"));
    }

    #[test]
    fn test_hound_error_conversion() {
        let hound_err = hound::Error::FormatError("not a wave file");
        let err: IngestError = hound_err.into();
        match err {
            IngestError::MalformedAudio { details } => {
                assert!(details.contains("wave"));
            }
            _ => panic!("Expected MalformedAudio variant"),
        }
    }
}
