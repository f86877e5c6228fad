//! Capture trait definitions
//!
//! Platform-agnostic view of an audio capture resource. The resource does the
//! actual microphone access and encoding; the recorder only drives it.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors raised by a capture resource or its provider
#[derive(Error, Debug)]
pub enum CaptureError {
    #[error("Unsupported configuration: {0}")]
    Unsupported(String),

    #[error("Capture device unavailable: {0}")]
    DeviceUnavailable(String),

    #[error("Capture resource in unexpected state: {0}")]
    IllegalState(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Platform error: {0}")]
    Platform(String),
}

/// Microphone the resource records from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AudioSource {
    Mic,
    Camcorder,
    VoiceRecognition,
    VoiceCommunication,
}

impl Default for AudioSource {
    fn default() -> Self {
        Self::Mic
    }
}

/// Container format of the output file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputFormat {
    Mpeg4,
    ThreeGpp,
    AacAdts,
    Ogg,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Mpeg4
    }
}

impl OutputFormat {
    /// File extension for this container
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Mpeg4 => "m4a",
            OutputFormat::ThreeGpp => "3gp",
            OutputFormat::AacAdts => "aac",
            OutputFormat::Ogg => "ogg",
        }
    }
}

/// Audio codec
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AudioEncoder {
    Aac,
    HeAac,
    AmrNb,
    Opus,
}

impl Default for AudioEncoder {
    fn default() -> Self {
        Self::Aac
    }
}

impl AudioEncoder {
    /// Whether this codec can be muxed into the given container
    pub fn fits(&self, format: OutputFormat) -> bool {
        match self {
            AudioEncoder::Aac | AudioEncoder::HeAac => {
                matches!(format, OutputFormat::Mpeg4 | OutputFormat::AacAdts)
            }
            AudioEncoder::AmrNb => format == OutputFormat::ThreeGpp,
            AudioEncoder::Opus => format == OutputFormat::Ogg,
        }
    }
}

/// AMR narrowband only encodes 8 kHz audio, up to its 12.2 kbps mode
const AMR_NB_SAMPLE_RATE: u32 = 8_000;
const AMR_NB_MAX_BIT_RATE: u32 = 12_200;

/// Parameters handed to the capture resource during configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CaptureConfig {
    pub audio_source: AudioSource,
    pub output_format: OutputFormat,
    pub audio_encoder: AudioEncoder,

    /// Encoding bit rate in bits per second
    pub bit_rate: u32,

    /// Sampling rate in Hz
    pub sample_rate: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            audio_source: AudioSource::Mic,
            output_format: OutputFormat::Mpeg4,
            audio_encoder: AudioEncoder::Aac,
            bit_rate: 128_000,
            sample_rate: 44_100,
        }
    }
}

impl CaptureConfig {
    /// Reject parameter combinations no capture resource can honor
    pub fn validate(&self) -> Result<(), CaptureError> {
        if self.bit_rate == 0 {
            return Err(CaptureError::Unsupported("bit rate must be positive".to_string()));
        }
        if !(8_000..=96_000).contains(&self.sample_rate) {
            return Err(CaptureError::Unsupported(format!(
                "sample rate {} Hz is out of range",
                self.sample_rate
            )));
        }
        if !self.audio_encoder.fits(self.output_format) {
            return Err(CaptureError::Unsupported(format!(
                "{:?} audio cannot be stored in a {:?} container",
                self.audio_encoder, self.output_format
            )));
        }
        if matches!(self.audio_encoder, AudioEncoder::AmrNb)
            && (self.sample_rate != AMR_NB_SAMPLE_RATE || self.bit_rate > AMR_NB_MAX_BIT_RATE)
        {
            return Err(CaptureError::Unsupported(format!(
                "AMR-NB needs {} Hz and at most {} bps, got {} Hz at {} bps",
                AMR_NB_SAMPLE_RATE, AMR_NB_MAX_BIT_RATE, self.sample_rate, self.bit_rate
            )));
        }
        Ok(())
    }
}

/// A platform capture resource (one microphone/encoder pipeline)
///
/// Call order is `configure`, `prepare`, `start`, then `stop`. `release` may
/// be called at any point and must be the last call.
pub trait CaptureResource: Send {
    /// Apply capture parameters and the output destination
    fn configure(&mut self, config: &CaptureConfig, output: &Path) -> Result<(), CaptureError>;

    /// Prepare the encoder pipeline
    fn prepare(&mut self) -> Result<(), CaptureError>;

    /// Begin capturing to the output destination
    fn start(&mut self) -> Result<(), CaptureError>;

    /// Finalize the output file
    fn stop(&mut self) -> Result<(), CaptureError>;

    /// Free the underlying platform resource
    fn release(&mut self) -> Result<(), CaptureError>;
}

/// Constructs capture resources
pub trait CaptureProvider: Send + Sync {
    /// Provider name, for logs
    fn name(&self) -> &str;

    /// Acquire a fresh capture resource
    fn acquire(&self) -> Result<Box<dyn CaptureResource>, CaptureError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = CaptureConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.output_format.extension(), "m4a");
    }

    #[test]
    fn test_codec_container_mismatch() {
        let config = CaptureConfig {
            output_format: OutputFormat::Ogg,
            audio_encoder: AudioEncoder::Aac,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(CaptureError::Unsupported(_))));

        let config = CaptureConfig {
            output_format: OutputFormat::ThreeGpp,
            audio_encoder: AudioEncoder::AmrNb,
            sample_rate: 8_000,
            bit_rate: 12_200,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_amr_nb_rates() {
        // Container fits, but 44.1 kHz at 128 kbps is beyond AMR-NB
        let defaults = CaptureConfig {
            output_format: OutputFormat::ThreeGpp,
            audio_encoder: AudioEncoder::AmrNb,
            ..Default::default()
        };
        assert!(matches!(defaults.validate(), Err(CaptureError::Unsupported(_))));

        let high_bit_rate = CaptureConfig {
            sample_rate: 8_000,
            ..defaults.clone()
        };
        assert!(high_bit_rate.validate().is_err());

        let narrowband = CaptureConfig {
            sample_rate: 8_000,
            bit_rate: 7_950,
            ..defaults
        };
        assert!(narrowband.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_rates() {
        let zero_bit_rate = CaptureConfig {
            bit_rate: 0,
            ..Default::default()
        };
        assert!(zero_bit_rate.validate().is_err());

        let high_sample_rate = CaptureConfig {
            sample_rate: 192_000,
            ..Default::default()
        };
        assert!(high_sample_rate.validate().is_err());
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: CaptureConfig =
            serde_json::from_str(r#"{"outputFormat":"ogg","audioEncoder":"opus"}"#).unwrap();
        assert_eq!(config.output_format, OutputFormat::Ogg);
        assert_eq!(config.audio_encoder, AudioEncoder::Opus);
        assert_eq!(config.bit_rate, 128_000);
        assert_eq!(config.audio_source, AudioSource::Mic);
    }
}
