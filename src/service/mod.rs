//! Hosted recording service
//!
//! Alternative topology where the session manager lives in a separately
//! hosted service (on Android, a foreground service that keeps microphone
//! access while the UI is in the background). Clients reach it through a
//! [`ServiceBinder`], which only hands out the service once the bind
//! handshake has completed. Until then every call fails with `NotReady`.

use crate::recorder::{Recorder, RecordingOutput, SessionManager};
use crate::utils::error::{RecorderError, RecorderResult};
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use std::thread::JoinHandle;

/// A recording service hosting its own session manager
pub struct RecordingService {
    manager: SessionManager,
    created_at: DateTime<Utc>,
}

impl RecordingService {
    pub fn new(manager: SessionManager) -> Self {
        Self {
            manager,
            created_at: Utc::now(),
        }
    }

    /// Called once the service is up
    pub fn on_create(&self) {
        tracing::info!("Audio recording service created at {}", self.created_at);
    }

    /// Called when the host tears the service down
    pub fn on_destroy(&self) {
        self.manager.shutdown();
        tracing::info!("Audio recording service destroyed");
    }
}

impl Recorder for RecordingService {
    fn start_recording(&self) -> RecorderResult<PathBuf> {
        self.manager.start()
    }

    fn stop_recording(&self) -> RecorderResult<Option<RecordingOutput>> {
        self.manager.stop()
    }

    fn is_recording(&self) -> bool {
        self.manager.is_recording()
    }
}

/// Connection to the recording service
enum Connection {
    Unbound,
    Binding,
    Bound(Arc<RecordingService>),
}

/// State shared with the bind thread
struct Shared {
    connection: Mutex<Connection>,
    /// The running service, kept alive by its host across unbind/rebind
    hosted: Mutex<Option<Arc<RecordingService>>>,
}

/// Client-side handle to a [`RecordingService`]
pub struct ServiceBinder {
    shared: Arc<Shared>,
}

impl ServiceBinder {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared {
                connection: Mutex::new(Connection::Unbound),
                hosted: Mutex::new(None),
            }),
        }
    }

    /// Whether the handshake has completed
    pub fn is_bound(&self) -> bool {
        matches!(*self.shared.connection.lock(), Connection::Bound(_))
    }

    /// Start the bind handshake.
    ///
    /// `launch` brings the service up on a background thread. If a service
    /// is already running it is reconnected instead and `launch` is not
    /// called. Returns `None` if a bind is already in progress or complete.
    pub fn bind<F>(&self, launch: F) -> Option<JoinHandle<()>>
    where
        F: FnOnce() -> RecorderResult<RecordingService> + Send + 'static,
    {
        {
            let mut connection = self.shared.connection.lock();
            if !matches!(*connection, Connection::Unbound) {
                tracing::warn!("Recording service already bound or binding");
                return None;
            }
            *connection = Connection::Binding;
        }

        tracing::debug!("Binding to recording service...");
        let shared = Arc::clone(&self.shared);
        let running = shared.hosted.lock().clone();
        Some(std::thread::spawn(move || {
            if let Some(service) = running {
                shared.connected(service);
                return;
            }
            match launch() {
                Ok(service) => {
                    service.on_create();
                    shared.connected(Arc::new(service));
                }
                Err(e) => {
                    tracing::error!("Failed to launch recording service: {}", e);
                    *shared.connection.lock() = Connection::Unbound;
                }
            }
        }))
    }

    /// Complete the handshake with an already running service
    pub fn on_connected(&self, service: Arc<RecordingService>) {
        self.shared.connected(service);
    }

    /// The service went away on its own
    pub fn on_disconnected(&self) {
        tracing::warn!("Recording service disconnected");
        *self.shared.connection.lock() = Connection::Unbound;
        let gone = self.shared.hosted.lock().take();
        drop(gone);
    }

    /// Drop the connection, leaving the service (and any recording) running
    pub fn unbind(&self) {
        let previous = std::mem::replace(&mut *self.shared.connection.lock(), Connection::Unbound);
        if matches!(previous, Connection::Bound(_)) {
            tracing::debug!("Recording service unbound");
        }
    }

    /// Destroy the running service (stopping any recording) and unbind
    pub fn shutdown(&self) {
        *self.shared.connection.lock() = Connection::Unbound;
        let hosted = self.shared.hosted.lock().take();
        if let Some(service) = hosted {
            service.on_destroy();
        }
    }

    fn service(&self) -> RecorderResult<Arc<RecordingService>> {
        match &*self.shared.connection.lock() {
            Connection::Bound(service) => Ok(Arc::clone(service)),
            Connection::Binding => Err(RecorderError::NotReady("bind in progress".to_string())),
            Connection::Unbound => Err(RecorderError::NotReady("service not bound".to_string())),
        }
    }
}

impl Shared {
    fn connected(&self, service: Arc<RecordingService>) {
        let mut connection = self.connection.lock();
        if matches!(*connection, Connection::Binding) {
            *self.hosted.lock() = Some(Arc::clone(&service));
            *connection = Connection::Bound(service);
            tracing::info!("Recording service bound");
        } else {
            // Shut down while the handshake was in flight
            tracing::warn!("Recording service connected after shutdown, dropping it");
            drop(connection);
            service.on_destroy();
        }
    }
}

impl Default for ServiceBinder {
    fn default() -> Self {
        Self::new()
    }
}

/// Failures inside the service surface as service errors
fn service_error(error: RecorderError) -> RecorderError {
    match error {
        RecorderError::NotReady(_) | RecorderError::Service(_) => error,
        other => RecorderError::Service(other.to_string()),
    }
}

impl Recorder for ServiceBinder {
    fn start_recording(&self) -> RecorderResult<PathBuf> {
        self.service()?.start_recording().map_err(service_error)
    }

    fn stop_recording(&self) -> RecorderResult<Option<RecordingOutput>> {
        self.service()?.stop_recording().map_err(service_error)
    }

    fn is_recording(&self) -> bool {
        match self.service() {
            Ok(service) => service.is_recording(),
            Err(_) => false,
        }
    }
}
