// Batch error types and constants

use crate::error::{ErrorCode, ExtractionError};
use std::fmt;

/// Batch error code constants
///
/// Error code range: 3101-3102
pub struct BatchErrorCodes {}

impl BatchErrorCodes {
    /// Strict mode aborted the batch on a failing track
    pub const TRACK_FAILED: i32 = 3101;

    /// The dedicated worker pool could not be built
    pub const THREAD_POOL: i32 = 3102;
}

/// Errors that abort a whole batch
///
/// In collect-and-report mode per-track failures never surface here; they
/// are listed in the batch report instead.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchError {
    /// First failing track in input order (strict mode only)
    TrackFailed { source: ExtractionError },

    /// Worker pool construction failed
    ThreadPool { reason: String },
}

impl ErrorCode for BatchError {
    fn code(&self) -> i32 {
        match self {
            BatchError::TrackFailed { .. } => BatchErrorCodes::TRACK_FAILED,
            BatchError::ThreadPool { .. } => BatchErrorCodes::THREAD_POOL,
        }
    }

    fn message(&self) -> String {
        match self {
            BatchError::TrackFailed { source } => {
                format!("Batch aborted: {}", source.message())
            }
            BatchError::ThreadPool { reason } => {
                format!("Failed to build worker pool: {}", reason)
            }
        }
    }
}

impl fmt::Display for BatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BatchError (code {}): {}", self.code(), self.message())
    }
}

impl std::error::Error for BatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BatchError::TrackFailed { source } => Some(source),
            BatchError::ThreadPool { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::track::Attribute;

    #[test]
    fn test_batch_error_codes() {
        let err = BatchError::ThreadPool {
            reason: "test".to_string(),
        };
        assert_eq!(err.code(), BatchErrorCodes::THREAD_POOL);
        assert_eq!(err.message(), "Failed to build worker pool: test");
    }

    #[test]
    fn test_track_failed_keeps_source() {
        use std::error::Error;

        let source = ExtractionError::EmptySeries {
            track_id: "t1".to_string(),
            attribute: Attribute::Tempo,
        };
        let err = BatchError::TrackFailed {
            source: source.clone(),
        };
        assert_eq!(err.code(), BatchErrorCodes::TRACK_FAILED);
        assert!(err.message().contains("t1"));
        assert!(err.source().is_some());
    }
}
