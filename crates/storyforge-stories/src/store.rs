//! Storage for generated artifacts.

use std::fs;
use std::io;
use std::path::Path;
use std::time::SystemTime;

/// Where generated artifacts are checked and written.
pub trait ArtifactStore: Send + Sync {
    /// Whether an artifact exists at `path`.
    fn exists(&self, path: &Path) -> bool;

    /// Last modification time, or `None` if nothing exists at `path`.
    fn modified(&self, path: &Path) -> io::Result<Option<SystemTime>>;

    /// Write an artifact, replacing any previous content.
    fn write(&self, path: &Path, contents: &str) -> io::Result<()>;
}

/// Artifact store backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStore;

impl ArtifactStore for FsStore {
    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn modified(&self, path: &Path) -> io::Result<Option<SystemTime>> {
        match fs::metadata(path) {
            Ok(metadata) => metadata.modified().map(Some),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, path: &Path, contents: &str) -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, contents)
    }
}
