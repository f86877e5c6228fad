//! Recording-related Tauri commands

use super::dispatch::{dispatch, MethodResponse};
use crate::recorder::{Recorder, RecordingOutput};
use crate::service::ServiceBinder;
use crate::utils::error::{ErrorResponse, RecorderError, RecorderResult};
use std::sync::Arc;
use tauri::State;

/// Plugin state for recording
pub struct RecorderState {
    recorder: Arc<dyn Recorder>,
    binder: Option<Arc<ServiceBinder>>,
}

impl RecorderState {
    /// Recorder owned by the plugin
    pub fn in_process(recorder: Arc<dyn Recorder>) -> Self {
        Self {
            recorder,
            binder: None,
        }
    }

    /// Recorder reached through a service binder
    pub fn with_service(binder: Arc<ServiceBinder>) -> Self {
        Self {
            recorder: binder.clone(),
            binder: Some(binder),
        }
    }

    pub fn recorder(&self) -> Arc<dyn Recorder> {
        Arc::clone(&self.recorder)
    }

    /// Stop any recording and tear down the service connection
    pub fn shutdown(&self) {
        match &self.binder {
            Some(binder) => binder.shutdown(),
            None => {
                if let Ok(Some(output)) = self.recorder.stop_recording() {
                    tracing::info!("Stopped recording {:?} on exit", output.path);
                }
            }
        }
    }
}

/// Run a recorder call on the blocking pool; capture setup and teardown are
/// synchronous platform calls.
async fn run_blocking<T, F>(recorder: Arc<dyn Recorder>, call: F) -> Result<T, ErrorResponse>
where
    T: Send + 'static,
    F: FnOnce(&dyn Recorder) -> RecorderResult<T> + Send + 'static,
{
    tauri::async_runtime::spawn_blocking(move || call(recorder.as_ref()))
        .await
        .map_err(|e| ErrorResponse::from(RecorderError::AcquisitionFailure(e.to_string())))?
        .map_err(ErrorResponse::from)
}

/// Start recording, returning the output file path
#[tauri::command]
pub async fn start_recording(state: State<'_, RecorderState>) -> Result<String, ErrorResponse> {
    let path = run_blocking(state.recorder(), |recorder| recorder.start_recording()).await?;
    Ok(path.to_string_lossy().to_string())
}

/// Stop recording
#[tauri::command]
pub async fn stop_recording(
    state: State<'_, RecorderState>,
) -> Result<Option<RecordingOutput>, ErrorResponse> {
    run_blocking(state.recorder(), |recorder| recorder.stop_recording()).await
}

/// Whether a recording is in progress
#[tauri::command]
pub async fn is_recording(state: State<'_, RecorderState>) -> Result<bool, ErrorResponse> {
    run_blocking(state.recorder(), |recorder| Ok(recorder.is_recording())).await
}

/// Route a named method call (`startRecording`, `stopRecording`,
/// `isRecording`) through the dispatcher
#[tauri::command]
pub async fn invoke_method(
    state: State<'_, RecorderState>,
    method: String,
) -> Result<MethodResponse, ErrorResponse> {
    let recorder = state.recorder();
    tauri::async_runtime::spawn_blocking(move || dispatch(recorder.as_ref(), &method))
        .await
        .map_err(|e| ErrorResponse::from(RecorderError::AcquisitionFailure(e.to_string())))
}
