//! Method-call dispatch
//!
//! Maps named calls from the frontend bridge (`startRecording`,
//! `stopRecording`, `isRecording`) onto a [`Recorder`].

use crate::recorder::Recorder;
use crate::utils::error::{ErrorResponse, RecorderError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::str::FromStr;

/// Methods understood by the recorder channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    StartRecording,
    StopRecording,
    IsRecording,
}

impl FromStr for Method {
    type Err = RecorderError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "startRecording" => Ok(Method::StartRecording),
            "stopRecording" => Ok(Method::StopRecording),
            "isRecording" => Ok(Method::IsRecording),
            other => Err(RecorderError::Unimplemented(other.to_string())),
        }
    }
}

/// Outcome of a dispatched call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum MethodResponse {
    Success { value: Value },
    Error(ErrorResponse),
    NotImplemented,
}

impl From<RecorderError> for MethodResponse {
    fn from(error: RecorderError) -> Self {
        match error {
            RecorderError::Unimplemented(_) => MethodResponse::NotImplemented,
            other => MethodResponse::Error(other.into()),
        }
    }
}

/// Run a named call against the recorder
pub fn dispatch(recorder: &dyn Recorder, method: &str) -> MethodResponse {
    let method = match method.parse::<Method>() {
        Ok(method) => method,
        Err(e) => {
            tracing::warn!("{}", e);
            return e.into();
        }
    };

    tracing::debug!("Dispatching {:?}", method);

    let result = match method {
        Method::StartRecording => recorder
            .start_recording()
            .map(|path| Value::String(path.to_string_lossy().to_string())),
        // The bridge answers stop with the path only, so a finalization
        // failure is logged here; `stop_recording` carries it in full.
        Method::StopRecording => recorder.stop_recording().map(|output| match output {
            Some(output) => {
                if let Some(error) = &output.finalize_error {
                    tracing::warn!("Recording {:?} may be incomplete: {}", output.path, error);
                }
                Value::String(output.path_string())
            }
            None => Value::Null,
        }),
        Method::IsRecording => Ok(Value::Bool(recorder.is_recording())),
    };

    match result {
        Ok(value) => MethodResponse::Success { value },
        Err(e) => {
            tracing::error!("{:?} failed: {}", method, e);
            e.into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::testing::{FakeProvider, Step};
    use crate::capture::{AudioEncoder, CaptureConfig, OutputFormat};
    use crate::recorder::SessionManager;
    use crate::service::ServiceBinder;
    use crate::storage::CacheDirStorage;
    use tempfile::tempdir;

    fn success(response: MethodResponse) -> Value {
        match response {
            MethodResponse::Success { value } => value,
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn test_start_is_recording_stop() {
        let dir = tempdir().unwrap();
        let provider = FakeProvider::new();
        let manager = SessionManager::new(
            Box::new(provider.clone()),
            Box::new(CacheDirStorage::new(dir.path(), "voice_")),
            CaptureConfig::default(),
        );

        let started = success(dispatch(&manager, "startRecording"));
        let path = started.as_str().unwrap().to_string();
        assert!(path.ends_with(".m4a"));
        assert_eq!(success(dispatch(&manager, "isRecording")), Value::Bool(true));

        let stopped = success(dispatch(&manager, "stopRecording"));
        assert_eq!(stopped, Value::String(path));
        assert_eq!(success(dispatch(&manager, "isRecording")), Value::Bool(false));
    }

    #[test]
    fn test_restart_returns_new_path() {
        let dir = tempdir().unwrap();
        let provider = FakeProvider::new();
        let manager = SessionManager::new(
            Box::new(provider.clone()),
            Box::new(CacheDirStorage::new(dir.path(), "voice_")),
            CaptureConfig::default(),
        );

        let first = success(dispatch(&manager, "startRecording"));
        let second = success(dispatch(&manager, "startRecording"));
        assert_ne!(first, second);

        assert_eq!(success(dispatch(&manager, "stopRecording")), second);
        assert_eq!(success(dispatch(&manager, "stopRecording")), Value::Null);
    }

    #[test]
    fn test_invalid_config_reports_recording_error() {
        let dir = tempdir().unwrap();
        let manager = SessionManager::new(
            Box::new(FakeProvider::new()),
            Box::new(CacheDirStorage::new(dir.path(), "voice_")),
            CaptureConfig {
                output_format: OutputFormat::ThreeGpp,
                audio_encoder: AudioEncoder::Aac,
                ..Default::default()
            },
        );

        match dispatch(&manager, "startRecording") {
            MethodResponse::Error(error) => assert_eq!(error.code, "RECORDING_ERROR"),
            other => panic!("expected error, got {:?}", other),
        }
        assert_eq!(success(dispatch(&manager, "isRecording")), Value::Bool(false));
    }

    #[test]
    fn test_acquire_failure_then_retry() {
        let dir = tempdir().unwrap();
        let provider = FakeProvider::new();
        let manager = SessionManager::new(
            Box::new(provider.clone()),
            Box::new(CacheDirStorage::new(dir.path(), "voice_")),
            CaptureConfig::default(),
        );
        provider.fail_once(Step::Acquire);

        assert!(matches!(dispatch(&manager, "startRecording"), MethodResponse::Error(_)));
        assert!(success(dispatch(&manager, "startRecording")).is_string());
    }

    #[test]
    fn test_stop_failure_still_returns_path() {
        let dir = tempdir().unwrap();
        let provider = FakeProvider::new();
        let manager = SessionManager::new(
            Box::new(provider.clone()),
            Box::new(CacheDirStorage::new(dir.path(), "voice_")),
            CaptureConfig::default(),
        );

        let started = success(dispatch(&manager, "startRecording"));
        provider.fail_once(Step::Stop);

        assert_eq!(success(dispatch(&manager, "stopRecording")), started);
        assert_eq!(success(dispatch(&manager, "isRecording")), Value::Bool(false));
        assert_eq!(provider.live(), 0);
    }

    #[test]
    fn test_unknown_method_is_not_implemented() {
        let dir = tempdir().unwrap();
        let manager = SessionManager::new(
            Box::new(FakeProvider::new()),
            Box::new(CacheDirStorage::new(dir.path(), "voice_")),
            CaptureConfig::default(),
        );

        assert_eq!(dispatch(&manager, "pauseRecording"), MethodResponse::NotImplemented);
    }

    #[test]
    fn test_unbound_service_is_not_ready() {
        let binder = ServiceBinder::new();

        match dispatch(&binder, "startRecording") {
            MethodResponse::Error(error) => assert_eq!(error.code, "NOT_READY"),
            other => panic!("expected error, got {:?}", other),
        }
        assert_eq!(success(dispatch(&binder, "isRecording")), Value::Bool(false));
    }

    #[test]
    fn test_response_serialization() {
        let json = serde_json::to_value(MethodResponse::Success {
            value: Value::Bool(true),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({ "status": "success", "value": true }));

        let json = serde_json::to_value(MethodResponse::NotImplemented).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "notImplemented" }));

        let json = serde_json::to_value(MethodResponse::Error(ErrorResponse {
            code: "RECORDING_ERROR".to_string(),
            message: "boom".to_string(),
        }))
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "status": "error", "code": "RECORDING_ERROR", "message": "boom" })
        );
    }
}
