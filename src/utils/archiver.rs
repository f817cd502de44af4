//! External archiver invocation (7-Zip compatible command line)

use super::executor::CommandExecutor;
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// `backup_<YYYYMMDDHHMMSS>.<ext>`
pub fn archive_file_name(now: DateTime<Local>, extension: &str) -> String {
    format!("backup_{}.{}", now.format("%Y%m%d%H%M%S"), extension)
}

/// Arguments for "add to archive": `a <archive> <file>...`
pub fn build_add_args(archive_path: &Path, files: &[PathBuf]) -> Vec<OsString> {
    let mut args = Vec::with_capacity(files.len() + 2);
    args.push(OsString::from("a"));
    args.push(archive_path.as_os_str().to_os_string());
    args.extend(files.iter().map(|f| f.as_os_str().to_os_string()));
    args
}

/// Produces archives by running the configured tool
pub struct Archiver<'a> {
    executor: &'a dyn CommandExecutor,
    program: PathBuf,
    extension: String,
}

impl<'a> Archiver<'a> {
    pub fn new(executor: &'a dyn CommandExecutor, program: PathBuf, extension: String) -> Self {
        Self {
            executor,
            program,
            extension,
        }
    }

    /// Where an archive started at `now` would be written
    pub fn archive_path(&self, destination: &Path, now: DateTime<Local>) -> PathBuf {
        destination.join(archive_file_name(now, &self.extension))
    }

    /// Archive `files` into `destination`. Succeeds only when the tool exits 0.
    pub fn create_archive(
        &self,
        destination: &Path,
        files: &[PathBuf],
        now: DateTime<Local>,
    ) -> Result<PathBuf> {
        if files.is_empty() {
            anyhow::bail!("No files to archive");
        }

        fs::create_dir_all(destination)
            .with_context(|| format!("Failed to create destination directory: {:?}", destination))?;

        let archive_path = self.archive_path(destination, now);
        info!(
            "Archiving {} files into {}",
            files.len(),
            archive_path.display()
        );

        let args = build_add_args(&archive_path, files);
        self.executor
            .run_command(self.program.as_os_str(), &args)
            .with_context(|| format!("{} failed", self.program.display()))?;

        Ok(archive_path)
    }
}
