//! Recording session manager
//!
//! Owns at most one active session and drives it through its lifecycle. All
//! state lives behind one mutex, so concurrent callers are serialized and two
//! capture resources can never be held at once.

use super::session::Session;
use super::state::{RecordingOutput, SessionState};
use crate::capture::{CaptureConfig, CaptureProvider};
use crate::storage::StorageProvider;
use crate::utils::error::{RecorderError, RecorderResult};
use parking_lot::Mutex;
use std::path::PathBuf;

/// The operations exposed over the method-call bridge
pub trait Recorder: Send + Sync {
    /// Start a new recording and return its output path
    fn start_recording(&self) -> RecorderResult<PathBuf>;

    /// Stop the current recording. Returns `None` when nothing was recording.
    fn stop_recording(&self) -> RecorderResult<Option<RecordingOutput>>;

    /// Whether a recording is in progress
    fn is_recording(&self) -> bool;
}

/// Manages the single recording session
pub struct SessionManager {
    provider: Box<dyn CaptureProvider>,
    storage: Box<dyn StorageProvider>,
    capture: CaptureConfig,
    min_expected_bytes: u64,

    /// The active session, if any. Only active sessions are stored here.
    session: Mutex<Option<Session>>,
}

impl SessionManager {
    /// Create a session manager
    pub fn new(
        provider: Box<dyn CaptureProvider>,
        storage: Box<dyn StorageProvider>,
        capture: CaptureConfig,
    ) -> Self {
        tracing::info!("Session manager using capture provider: {}", provider.name());
        Self {
            provider,
            storage,
            capture,
            min_expected_bytes: 1000,
            session: Mutex::new(None),
        }
    }

    /// Size below which a finished recording is logged as suspicious
    pub fn with_min_expected_bytes(mut self, bytes: u64) -> Self {
        self.min_expected_bytes = bytes;
        self
    }

    /// Current state
    pub fn state(&self) -> SessionState {
        self.session
            .lock()
            .as_ref()
            .map(Session::state)
            .unwrap_or(SessionState::Idle)
    }

    /// Start recording.
    ///
    /// A session that is still active is stopped and released first.
    pub fn start(&self) -> RecorderResult<PathBuf> {
        let mut slot = self.session.lock();

        if let Some(mut previous) = slot.take() {
            tracing::warn!(
                "Session {} still recording, stopping it before starting a new one",
                previous.id()
            );
            previous.finish(self.min_expected_bytes);
        }

        let session = self.open_session()?;
        let path = session.output_path().to_path_buf();
        *slot = Some(session);

        Ok(path)
    }

    /// Stop recording. Stopping with no active session is a no-op.
    pub fn stop(&self) -> RecorderResult<Option<RecordingOutput>> {
        // Hold the lock until the resource is released.
        let mut slot = self.session.lock();
        let Some(mut session) = slot.take() else {
            tracing::warn!("Not recording, nothing to stop");
            return Ok(None);
        };

        Ok(Some(session.finish(self.min_expected_bytes)))
    }

    /// Whether a session is active
    pub fn is_recording(&self) -> bool {
        self.state() == SessionState::Active
    }

    /// Stop whatever is recording, discarding the result
    pub fn shutdown(&self) {
        if let Ok(Some(output)) = self.stop() {
            tracing::info!("Stopped recording {:?} during shutdown", output.path);
        }
    }

    /// `Idle -> Configuring -> Active`, or `Released` on any failure
    fn open_session(&self) -> RecorderResult<Session> {
        self.capture.validate()?;

        let output_path = self
            .storage
            .allocate(self.capture.output_format.extension())
            .map_err(|e| {
                RecorderError::AcquisitionFailure(format!("could not create output file: {}", e))
            })?;

        let mut session = Session::new(output_path);
        tracing::debug!("Session {}: configuring {:?}", session.id(), session.output_path());

        let result = self
            .provider
            .acquire()
            .map_err(RecorderError::from)
            .and_then(|resource| session.activate(resource, &self.capture));

        match result {
            Ok(()) => Ok(session),
            Err(e) => {
                tracing::error!("Session {}: {}", session.id(), e);
                session.abandon();
                Err(e)
            }
        }
    }
}

impl Recorder for SessionManager {
    fn start_recording(&self) -> RecorderResult<PathBuf> {
        self.start()
    }

    fn stop_recording(&self) -> RecorderResult<Option<RecordingOutput>> {
        self.stop()
    }

    fn is_recording(&self) -> bool {
        SessionManager::is_recording(self)
    }
}

impl Drop for SessionManager {
    fn drop(&mut self) {
        self.shutdown();
    }
}
