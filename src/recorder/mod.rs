//! Recording system module
//!
//! This module implements the recording-session lifecycle:
//! - Session owning one capture resource through a scoped guard
//! - SessionManager enforcing a single active session
//! - Recorder trait for the operations exposed to the frontend

pub mod guard;
pub mod manager;
pub mod session;
pub mod state;

pub use manager::{Recorder, SessionManager};
pub use session::Session;
pub use state::{RecordingOutput, SessionState};
