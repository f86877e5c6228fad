//! Scripted capture provider for tests
//!
//! Records every call made on the resources it hands out and can be told to
//! fail at any step. `live()` is the number of resources acquired but not yet
//! released.

use super::traits::{CaptureConfig, CaptureError, CaptureProvider, CaptureResource};
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Step at which a fake resource can fail
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Acquire,
    Configure,
    Prepare,
    Start,
    Stop,
    Release,
}

#[derive(Debug, Default)]
struct Script {
    /// Steps that fail once, in order of arming
    failures: Vec<Step>,
    events: Vec<String>,
    live: usize,
    max_live: usize,
    acquired: usize,
    /// Bytes written to the output file on a successful stop
    payload: usize,
}

impl Script {
    fn take_failure(&mut self, step: Step) -> bool {
        match self.failures.iter().position(|armed| *armed == step) {
            Some(index) => {
                self.failures.remove(index);
                true
            }
            None => false,
        }
    }
}

/// Fake capture provider
#[derive(Debug, Clone)]
pub struct FakeProvider {
    script: Arc<Mutex<Script>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self {
            script: Arc::new(Mutex::new(Script {
                payload: 4096,
                ..Default::default()
            })),
        }
    }

    /// Make the next call at `step` fail
    pub fn fail_once(&self, step: Step) {
        self.script.lock().failures.push(step);
    }

    /// Number of bytes the next stops write
    pub fn set_payload(&self, bytes: usize) {
        self.script.lock().payload = bytes;
    }

    pub fn live(&self) -> usize {
        self.script.lock().live
    }

    pub fn max_live(&self) -> usize {
        self.script.lock().max_live
    }

    pub fn acquired(&self) -> usize {
        self.script.lock().acquired
    }

    pub fn events(&self) -> Vec<String> {
        self.script.lock().events.clone()
    }
}

impl CaptureProvider for FakeProvider {
    fn name(&self) -> &str {
        "fake"
    }

    fn acquire(&self) -> Result<Box<dyn CaptureResource>, CaptureError> {
        let mut script = self.script.lock();
        if script.take_failure(Step::Acquire) {
            script.events.push("acquire failed".to_string());
            return Err(CaptureError::DeviceUnavailable("microphone busy".to_string()));
        }

        script.acquired += 1;
        script.live += 1;
        script.max_live = script.max_live.max(script.live);
        let id = script.acquired;
        script.events.push(format!("acquire {}", id));

        Ok(Box::new(FakeResource {
            id,
            script: Arc::clone(&self.script),
            output: None,
            released: false,
        }))
    }
}

struct FakeResource {
    id: usize,
    script: Arc<Mutex<Script>>,
    output: Option<PathBuf>,
    released: bool,
}

impl FakeResource {
    fn step(&self, step: Step) -> Result<(), CaptureError> {
        let mut script = self.script.lock();
        if self.released {
            return Err(CaptureError::IllegalState(format!("{:?} after release", step)));
        }
        if script.take_failure(step) {
            script.events.push(format!("{:?} {} failed", step, self.id).to_lowercase());
            return Err(match step {
                Step::Stop => CaptureError::IllegalState("stop called in an invalid state".to_string()),
                _ => CaptureError::Unsupported(format!("{:?} rejected", step)),
            });
        }
        script.events.push(format!("{:?} {}", step, self.id).to_lowercase());
        Ok(())
    }
}

impl CaptureResource for FakeResource {
    fn configure(&mut self, _config: &CaptureConfig, output: &Path) -> Result<(), CaptureError> {
        self.step(Step::Configure)?;
        self.output = Some(output.to_path_buf());
        Ok(())
    }

    fn prepare(&mut self) -> Result<(), CaptureError> {
        self.step(Step::Prepare)
    }

    fn start(&mut self) -> Result<(), CaptureError> {
        self.step(Step::Start)
    }

    fn stop(&mut self) -> Result<(), CaptureError> {
        self.step(Step::Stop)?;
        let payload = self.script.lock().payload;
        if let Some(output) = &self.output {
            fs::write(output, vec![0u8; payload])?;
        }
        Ok(())
    }

    fn release(&mut self) -> Result<(), CaptureError> {
        if self.released {
            return Ok(());
        }
        // The handle is gone even when the platform complains about it.
        self.released = true;
        let mut script = self.script.lock();
        script.live -= 1;
        if script.take_failure(Step::Release) {
            script.events.push(format!("release {} failed", self.id));
            return Err(CaptureError::Platform("release threw".to_string()));
        }
        script.events.push(format!("release {}", self.id));
        Ok(())
    }
}

impl Drop for FakeResource {
    fn drop(&mut self) {
        if !self.released {
            self.released = true;
            let mut script = self.script.lock();
            script.live -= 1;
            script.events.push(format!("dropped {}", self.id));
        }
    }
}
