//! Platform capture selection
//!
//! Picks the capture provider for the current target and, on Android, the
//! MediaRecorder constructor for the running API level.

use super::traits::{CaptureError, CaptureProvider, CaptureResource};

/// First Android API level (12, "S") with `MediaRecorder(Context)`
pub const CONTEXT_CONSTRUCTOR_API_LEVEL: i32 = 31;

/// How the platform recorder object gets constructed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderConstructor {
    /// `MediaRecorder(Context)`
    WithContext,
    /// Deprecated no-argument `MediaRecorder()`
    Legacy,
}

/// Select the constructor for an Android API level
pub fn select_constructor(api_level: i32) -> RecorderConstructor {
    if api_level >= CONTEXT_CONSTRUCTOR_API_LEVEL {
        RecorderConstructor::WithContext
    } else {
        RecorderConstructor::Legacy
    }
}

/// Provider used on targets without native audio capture.
///
/// Every acquisition fails, so `start` reports a recording error while the
/// rest of the recorder keeps working.
#[derive(Debug, Default)]
pub struct UnsupportedProvider;

impl CaptureProvider for UnsupportedProvider {
    fn name(&self) -> &str {
        "unsupported"
    }

    fn acquire(&self) -> Result<Box<dyn CaptureResource>, CaptureError> {
        Err(CaptureError::Unsupported(format!(
            "native audio capture is not available on {}",
            std::env::consts::OS
        )))
    }
}

/// Get the capture provider for the current platform
pub fn default_provider() -> Result<Box<dyn CaptureProvider>, CaptureError> {
    #[cfg(target_os = "android")]
    {
        let provider = super::android::MediaRecorderProvider::from_android_context()?;
        Ok(Box::new(provider))
    }

    #[cfg(not(target_os = "android"))]
    {
        tracing::warn!(
            "Native audio capture not available on {}, recordings will fail to start",
            std::env::consts::OS
        );
        Ok(Box::new(UnsupportedProvider))
    }
}
