//! Platform-specific capture implementations
//!
//! This module provides the audio capture resource for each platform.

pub mod platform;
pub mod traits;

#[cfg(target_os = "android")]
pub mod android;

#[cfg(test)]
pub(crate) mod testing;

// Re-export traits
pub use traits::{
    AudioEncoder, AudioSource, CaptureConfig, CaptureError, CaptureProvider, CaptureResource,
    OutputFormat,
};

pub use platform::{default_provider, select_constructor, RecorderConstructor, UnsupportedProvider};
