//! Error types and handling
//!
//! Error taxonomy for the recorder and the structured form it takes when it
//! crosses the plugin boundary.

use crate::capture::CaptureError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Recorder-level error
#[derive(Error, Debug)]
pub enum RecorderError {
    /// The recorder (or the service behind it) is not ready to take calls yet
    #[error("Audio recording service not ready: {0}")]
    NotReady(String),

    /// Acquiring, configuring or starting the capture resource failed
    #[error("Failed to start recording: {0}")]
    AcquisitionFailure(String),

    /// Stopping or finalizing the capture resource failed
    #[error("Failed to finalize recording: {0}")]
    FinalizationFailure(String),

    /// The bound recording service reported a failure
    #[error("Recording service error: {0}")]
    Service(String),

    /// Unknown method name
    #[error("Method not implemented: {0}")]
    Unimplemented(String),
}

impl RecorderError {
    /// Stable code reported to the frontend
    pub fn code(&self) -> &'static str {
        match self {
            RecorderError::NotReady(_) => "NOT_READY",
            RecorderError::AcquisitionFailure(_) => "RECORDING_ERROR",
            RecorderError::FinalizationFailure(_) => "RECORDING_ERROR",
            RecorderError::Service(_) => "SERVICE_ERROR",
            RecorderError::Unimplemented(_) => "NOT_IMPLEMENTED",
        }
    }
}

/// Any resource-level failure reached outside of `stop` counts as an
/// acquisition failure, including a resource found in an unexpected state.
impl From<CaptureError> for RecorderError {
    fn from(error: CaptureError) -> Self {
        RecorderError::AcquisitionFailure(error.to_string())
    }
}

/// Error response for frontend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl From<RecorderError> for ErrorResponse {
    fn from(error: RecorderError) -> Self {
        ErrorResponse {
            code: error.code().to_string(),
            message: error.to_string(),
        }
    }
}

/// Result type alias using RecorderError
pub type RecorderResult<T> = Result<T, RecorderError>;
