//! Voice Recorder - native voice-note recording for Tauri apps.
//!
//! This crate is a Tauri plugin exposing the platform's audio capture
//! (MediaRecorder on Android) to the frontend. The frontend starts and stops
//! recordings and gets back the path of the recorded file.

pub mod capture;
pub mod commands;
pub mod config;
pub mod recorder;
pub mod service;
pub mod storage;
pub mod utils;

use commands::recording::RecorderState;
use config::{RecorderConfig, Topology};
use recorder::SessionManager;
use service::{RecordingService, ServiceBinder};
use std::path::Path;
use std::sync::Arc;
use storage::CacheDirStorage;
use tauri::plugin::{Builder, TauriPlugin};
use tauri::{Manager, RunEvent, Runtime};
use utils::RecorderResult;

pub use utils::init_tracing;

/// Name the plugin registers under
pub const PLUGIN_NAME: &str = "voice-recorder";

/// Build a session manager for the current platform
pub fn build_manager(config: &RecorderConfig, cache_dir: &Path) -> RecorderResult<SessionManager> {
    let provider = capture::default_provider()?;
    let storage = CacheDirStorage::new(config.output_dir(cache_dir), config.file_prefix.clone());

    Ok(
        SessionManager::new(provider, Box::new(storage), config.capture.clone())
            .with_min_expected_bytes(config.min_expected_bytes),
    )
}

/// Initialize the plugin
pub fn init<R: Runtime>() -> TauriPlugin<R, Option<RecorderConfig>> {
    Builder::<R, Option<RecorderConfig>>::new(PLUGIN_NAME)
        .invoke_handler(tauri::generate_handler![
            commands::recording::start_recording,
            commands::recording::stop_recording,
            commands::recording::is_recording,
            commands::recording::invoke_method,
        ])
        .setup(|app, api| {
            let config = api.config().clone().unwrap_or_default();
            let cache_dir = app.path().app_cache_dir()?;

            tracing::info!(
                "Initializing {} v{} ({:?} topology)",
                PLUGIN_NAME,
                env!("CARGO_PKG_VERSION"),
                config.topology
            );

            let state = match config.topology {
                Topology::InProcess => {
                    let manager = build_manager(&config, &cache_dir)?;
                    RecorderState::in_process(Arc::new(manager))
                }
                Topology::Service => {
                    let binder = Arc::new(ServiceBinder::new());
                    binder.bind(move || build_manager(&config, &cache_dir).map(RecordingService::new));
                    RecorderState::with_service(binder)
                }
            };

            app.manage(state);
            Ok(())
        })
        .on_event(|app, event| {
            if let RunEvent::Exit = event {
                if let Some(state) = app.try_state::<RecorderState>() {
                    state.shutdown();
                }
            }
        })
        .build()
}
