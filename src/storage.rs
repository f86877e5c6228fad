//! Output location allocation
//!
//! Each session records into a fresh file in the app's cache area, named
//! `<prefix><unique>.<ext>`.

use std::fs;
use std::io;
use std::path::PathBuf;

/// Supplies writable output paths
pub trait StorageProvider: Send + Sync {
    /// Allocate a new, collision-free path with the given extension
    fn allocate(&self, extension: &str) -> io::Result<PathBuf>;
}

/// Allocates files in a cache directory
#[derive(Debug, Clone)]
pub struct CacheDirStorage {
    dir: PathBuf,
    prefix: String,
}

impl CacheDirStorage {
    pub fn new(dir: impl Into<PathBuf>, prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            prefix: prefix.into(),
        }
    }
}

impl StorageProvider for CacheDirStorage {
    fn allocate(&self, extension: &str) -> io::Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;

        let suffix = format!(".{}", extension);
        let file = tempfile::Builder::new()
            .prefix(&self.prefix)
            .suffix(&suffix)
            .tempfile_in(&self.dir)?;

        // Keep the file; the capture resource writes into it.
        let (_, path) = file.keep().map_err(|e| e.error)?;

        tracing::debug!("Allocated recording file: {:?}", path);
        Ok(path)
    }
}
