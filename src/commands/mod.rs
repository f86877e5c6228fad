//! Tauri command handlers
//!
//! This module contains the IPC command handlers the frontend calls through
//! Tauri's invoke system, and the dispatcher for named method calls.

pub mod dispatch;
pub mod recording;

pub use dispatch::{dispatch, Method, MethodResponse};
pub use recording::RecorderState;
