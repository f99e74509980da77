//! Local filesystem adapter using std::fs.

use std::io;
use std::path::{Path, PathBuf};

use schemaforge_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{ForgeError, ForgeResult},
};

/// Production filesystem rooted at the application directory.
///
/// Every path the generators hand over is relative; it is joined onto
/// `root` before touching the disk.
#[derive(Debug, Clone)]
pub struct LocalFilesystem {
    root: PathBuf,
}

impl LocalFilesystem {
    /// Create a new local filesystem adapter rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> ForgeResult<()> {
        let full = self.resolve(path);
        std::fs::create_dir_all(&full).map_err(|e| map_io_error(&full, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> ForgeResult<()> {
        let full = self.resolve(path);
        std::fs::write(&full, content).map_err(|e| map_io_error(&full, e, "write file"))
    }

    fn read_file(&self, path: &Path) -> ForgeResult<String> {
        let full = self.resolve(path);
        std::fs::read_to_string(&full).map_err(|e| map_io_error(&full, e, "read file"))
    }

    fn list_dir(&self, path: &Path) -> ForgeResult<Vec<String>> {
        let full = self.resolve(path);
        let entries = match std::fs::read_dir(&full) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(map_io_error(&full, e, "list directory")),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| map_io_error(&full, e, "list directory"))?;
            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    fn exists(&self, path: &Path) -> bool {
        self.resolve(path).exists()
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> ForgeError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("Failed to {}: {}", operation, e),
    }
    .into()
}
