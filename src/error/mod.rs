// Error types for the track feature pipeline
//
// This module defines custom error types for record shaping, feature
// extraction and batch assembly, providing structured error handling with
// numeric error codes suitable for batch reports.

mod batch;
mod extraction;

pub use batch::{BatchError, BatchErrorCodes};
pub use extraction::{
    log_extraction_error, ExtractionError, ExtractionErrorCodes, StatsError, TimbreError,
};

/// Error codes for structured error reporting
///
/// This trait provides a standard way to get error codes and messages
/// from custom error types, enabling consistent failure reports for
/// callers that decide whether to refetch or drop a track.
pub trait ErrorCode {
    /// Get the numeric error code
    fn code(&self) -> i32;

    /// Get the human-readable error message
    fn message(&self) -> String;
}
