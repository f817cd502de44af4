//! Test context and harness for run testing
//!
//! Provides a unified context for setting up and tearing down test environments.

use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test context that manages a scratch directory for sources, destinations and logs
pub struct TestContext {
    /// Temporary directory for test files
    temp_dir: TempDir,
}

impl TestContext {
    /// Create a new test context with a temporary directory
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    /// Get the temporary directory path
    pub fn temp_dir(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Path of the run log used by `ConfigBuilder::for_context`
    pub fn log_path(&self) -> PathBuf {
        self.temp_dir.path().join("backup.log")
    }

    /// Create a subdirectory in the temp dir
    pub fn create_subdir(&self, name: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        std::fs::create_dir_all(&path).expect("Failed to create subdirectory");
        path
    }

    /// Create a file in the temp dir
    pub fn create_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Check if a file exists in the temp directory
    pub fn file_exists(&self, name: &str) -> bool {
        self.temp_dir.path().join(name).exists()
    }

    /// Read a file from the temp directory
    pub fn read_file(&self, name: &str) -> io::Result<String> {
        std::fs::read_to_string(self.temp_dir.path().join(name))
    }

    /// Contents of the run log, empty when nothing was logged
    pub fn log_contents(&self) -> String {
        std::fs::read_to_string(self.log_path()).unwrap_or_default()
    }

    /// Archives (`backup_*`) currently present in a destination
    pub fn archives_in(&self, destination: &Path) -> Vec<PathBuf> {
        let Ok(entries) = std::fs::read_dir(destination) else {
            return Vec::new();
        };
        let mut archives: Vec<PathBuf> = entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| {
                p.file_name()
                    .map(|n| n.to_string_lossy().starts_with("backup_"))
                    .unwrap_or(false)
            })
            .collect();
        archives.sort();
        archives
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
