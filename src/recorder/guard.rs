//! Scoped ownership of a capture resource
//!
//! A [`ResourceGuard`] is the only holder of a capture resource. Dropping it
//! releases the resource, so no exit path (error return or unwinding) can
//! leave a platform recorder behind.

use crate::capture::{CaptureConfig, CaptureError, CaptureResource};
use crate::utils::error::{RecorderError, RecorderResult};
use std::path::Path;
use uuid::Uuid;

pub struct ResourceGuard {
    session_id: Uuid,
    resource: Option<Box<dyn CaptureResource>>,
}

impl ResourceGuard {
    pub fn new(session_id: Uuid, resource: Box<dyn CaptureResource>) -> Self {
        Self {
            session_id,
            resource: Some(resource),
        }
    }

    fn resource(&mut self) -> Result<&mut dyn CaptureResource, CaptureError> {
        match self.resource.as_deref_mut() {
            Some(resource) => Ok(resource),
            None => Err(CaptureError::IllegalState(
                "capture resource already released".to_string(),
            )),
        }
    }

    /// Configure, prepare and start capturing to `output`
    pub fn begin(&mut self, config: &CaptureConfig, output: &Path) -> Result<(), CaptureError> {
        let session_id = self.session_id;
        let resource = self.resource()?;
        resource.configure(config, output)?;
        tracing::debug!("Session {}: capture resource configured", session_id);

        resource.prepare()?;
        tracing::debug!("Session {}: capture resource prepared", session_id);

        resource.start()
    }

    /// Ask the resource to finish writing the output file
    pub fn finalize(&mut self) -> RecorderResult<()> {
        let resource = self
            .resource()
            .map_err(|e| RecorderError::FinalizationFailure(e.to_string()))?;
        resource
            .stop()
            .map_err(|e| RecorderError::FinalizationFailure(e.to_string()))
    }

    /// Release the resource now, reporting any failure
    pub fn release(mut self) -> Result<(), CaptureError> {
        match self.resource.take() {
            Some(mut resource) => resource.release(),
            None => Ok(()),
        }
    }
}

impl Drop for ResourceGuard {
    fn drop(&mut self) {
        if let Some(mut resource) = self.resource.take() {
            tracing::warn!("Session {}: releasing capture resource on drop", self.session_id);
            if let Err(e) = resource.release() {
                tracing::warn!("Session {}: release failed: {}", self.session_id, e);
            }
        }
    }
}
