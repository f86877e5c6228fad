//! Shared utilities

pub mod error;
pub mod logging;

pub use error::{ErrorResponse, RecorderError, RecorderResult};
pub use logging::init_tracing;
