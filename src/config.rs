//! Plugin configuration
//!
//! Read from the `plugins.voice-recorder` section of `tauri.conf.json`.
//! Every field is optional.

use crate::capture::CaptureConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Where the session manager runs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Topology {
    /// The plugin owns the session manager directly
    InProcess,
    /// Calls go through a binder to a hosted recording service
    Service,
}

impl Default for Topology {
    fn default() -> Self {
        Self::InProcess
    }
}

/// Recorder configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecorderConfig {
    /// Capture parameters
    pub capture: CaptureConfig,

    /// Subdirectory of the app cache dir for recordings
    pub recordings_dir: Option<String>,

    /// File name prefix for recordings
    pub file_prefix: String,

    /// Recordings smaller than this are logged as suspicious
    pub min_expected_bytes: u64,

    pub topology: Topology,
}

impl Default for RecorderConfig {
    fn default() -> Self {
        Self {
            capture: CaptureConfig::default(),
            recordings_dir: None,
            file_prefix: "voice_".to_string(),
            min_expected_bytes: 1000,
            topology: Topology::InProcess,
        }
    }
}

impl RecorderConfig {
    /// Resolve the recordings directory under a cache dir
    pub fn output_dir(&self, cache_dir: &Path) -> PathBuf {
        match &self.recordings_dir {
            Some(subdir) => cache_dir.join(subdir),
            None => cache_dir.to_path_buf(),
        }
    }
}
