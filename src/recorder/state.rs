//! Recording state management
//!
//! Defines the session state machine and the result of a finished recording.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use uuid::Uuid;

/// State of a recording session
///
/// `Idle -> Configuring -> Active -> Released`, or `Configuring -> Released`
/// when the capture resource can't be brought up. The manager reports `Idle`
/// whenever it holds no session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    /// No session
    Idle,
    /// Output allocated, capture resource being set up
    Configuring,
    /// Capturing to the output file
    Active,
    /// Capture resource released; the session is done
    Released,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Result of a stopped recording
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingOutput {
    pub session_id: Uuid,

    /// Path of the recorded file
    pub path: PathBuf,

    /// Time spent in the active state, in milliseconds
    pub duration_ms: i64,

    /// Size of the output file, when it could be read
    pub size_bytes: Option<u64>,

    /// Set when finalizing the capture failed. The resource was still
    /// released and the file may be incomplete.
    pub finalize_error: Option<String>,
}

impl RecordingOutput {
    /// Output path as a string, for the method-call bridge
    pub fn path_string(&self) -> String {
        self.path.to_string_lossy().to_string()
    }
}
