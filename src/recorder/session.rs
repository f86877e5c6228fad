//! A single recording session
//!
//! A session owns its output path and, while configuring or active, the guard
//! holding its capture resource. Once released it is never reused.

use super::guard::ResourceGuard;
use super::state::{RecordingOutput, SessionState};
use crate::capture::{CaptureConfig, CaptureResource};
use crate::utils::error::{RecorderError, RecorderResult};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub struct Session {
    id: Uuid,
    state: SessionState,
    output_path: PathBuf,
    resource: Option<ResourceGuard>,
    started_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Create a session that will record into `output_path`
    pub fn new(output_path: PathBuf) -> Self {
        Self {
            id: Uuid::new_v4(),
            state: SessionState::Configuring,
            output_path,
            resource: None,
            started_at: None,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Whether the session still holds its capture resource
    pub fn holds_resource(&self) -> bool {
        self.resource.is_some()
    }

    /// Take ownership of `resource` and bring it up: `Configuring -> Active`.
    ///
    /// On failure the session stays in `Configuring` and still owns the
    /// resource; the caller must [`abandon`](Self::abandon) it.
    pub fn activate(
        &mut self,
        resource: Box<dyn CaptureResource>,
        config: &CaptureConfig,
    ) -> RecorderResult<()> {
        if self.state != SessionState::Configuring || self.resource.is_some() {
            return Err(RecorderError::AcquisitionFailure(format!(
                "session {} cannot be activated from {:?}",
                self.id, self.state
            )));
        }

        let guard = self.resource.insert(ResourceGuard::new(self.id, resource));
        guard.begin(config, &self.output_path)?;

        self.state = SessionState::Active;
        self.started_at = Some(Utc::now());
        tracing::info!("Session {} recording to {:?}", self.id, self.output_path);
        Ok(())
    }

    /// Drop a session that never became active: `Configuring -> Released`
    pub fn abandon(&mut self) {
        tracing::debug!("Session {}: abandoning", self.id);
        self.release_resource();
        self.state = SessionState::Released;
    }

    /// Stop capturing and release the resource: `Active -> Released`.
    ///
    /// Release happens whether or not finalizing succeeded.
    pub fn finish(&mut self, min_expected_bytes: u64) -> RecordingOutput {
        let finalize_error = match self.resource.as_mut() {
            Some(guard) => guard.finalize().err(),
            None => Some(RecorderError::FinalizationFailure(
                "no capture resource to stop".to_string(),
            )),
        };
        if let Some(e) = &finalize_error {
            tracing::error!("Session {}: {}", self.id, e);
        }

        self.release_resource();
        self.state = SessionState::Released;

        let duration_ms = self
            .started_at
            .map(|started| (Utc::now() - started).num_milliseconds())
            .unwrap_or(0);
        let size_bytes = verify_output(&self.output_path, min_expected_bytes);

        tracing::info!(
            "Session {} stopped after {}ms: {:?}",
            self.id,
            duration_ms,
            self.output_path
        );

        RecordingOutput {
            session_id: self.id,
            path: self.output_path.clone(),
            duration_ms,
            size_bytes,
            finalize_error: finalize_error.map(|e| e.to_string()),
        }
    }

    fn release_resource(&mut self) {
        if let Some(guard) = self.resource.take() {
            // Nothing useful can be done with a resource that won't let go.
            match guard.release() {
                Ok(()) => tracing::debug!("Session {}: capture resource released", self.id),
                Err(e) => tracing::warn!("Session {}: error releasing capture resource: {}", self.id, e),
            }
        }
    }
}

/// Check the recorded file. Advisory only: problems are logged, never raised.
pub fn verify_output(path: &Path, min_expected_bytes: u64) -> Option<u64> {
    let size = match fs::metadata(path) {
        Ok(metadata) => metadata.len(),
        Err(e) => {
            tracing::error!("Recording file {:?} is not readable: {}", path, e);
            return None;
        }
    };

    if size == 0 {
        tracing::error!("Recording file {:?} is empty", path);
    } else if size < min_expected_bytes {
        tracing::warn!("Recording file {:?} is very small ({} bytes)", path, size);
    } else {
        tracing::debug!("Recording file {:?}: {} bytes", path, size);
    }

    Some(size)
}
