use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub global: GlobalConfig,
    #[serde(default)]
    pub backup_groups: Vec<BackupGroup>,
}

/// Global configuration settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GlobalConfig {
    /// Archiver executable (7-Zip compatible command line)
    #[serde(default = "default_archiver_path")]
    pub archiver_path: PathBuf,

    /// Extension of produced archives, without the dot
    #[serde(default = "default_archive_extension")]
    pub archive_extension: String,

    /// Run log, one `<timestamp>: <message>` line per event
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,

    /// Name of the state file kept in each backup destination
    #[serde(default = "default_state_file_name")]
    pub state_file_name: String,

    /// Diagnostic logging configuration
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_directory: Option<PathBuf>,
    #[serde(default = "default_log_max_files")]
    pub log_max_files: u32,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            archiver_path: default_archiver_path(),
            archive_extension: default_archive_extension(),
            log_file: default_log_file(),
            state_file_name: default_state_file_name(),
            log_level: default_log_level(),
            log_directory: None,
            log_max_files: default_log_max_files(),
        }
    }
}

/// A set of source directories sharing one destination and one policy
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct BackupGroup {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub source_directories: Vec<PathBuf>,

    #[serde(default)]
    pub backup_destination: PathBuf,

    /// Only archive files changed since the last successful backup
    #[serde(default)]
    pub incremental: bool,
}

impl BackupGroup {
    /// Display name: the configured name, or `group-<n>` from its 1-based position
    pub fn display_name(&self, index: usize) -> String {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name.to_string(),
            _ => format!("group-{}", index + 1),
        }
    }

    /// A group needs at least one source directory and a destination
    pub fn is_valid(&self) -> bool {
        !self.source_directories.is_empty() && !self.backup_destination.as_os_str().is_empty()
    }

    pub fn mode(&self) -> BackupMode {
        if self.incremental {
            BackupMode::Incremental
        } else {
            BackupMode::Full
        }
    }
}

impl fmt::Display for BackupGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sources: Vec<String> = self
            .source_directories
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        write!(
            f,
            "{{name: {:?}, source_directories: {:?}, backup_destination: {:?}, incremental: {}}}",
            self.name.as_deref().unwrap_or(""),
            sources,
            self.backup_destination.display().to_string(),
            self.incremental
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupMode {
    Full,
    Incremental,
}

impl fmt::Display for BackupMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackupMode::Full => write!(f, "full"),
            BackupMode::Incremental => write!(f, "incremental"),
        }
    }
}

// Default value functions

fn default_archiver_path() -> PathBuf { PathBuf::from("7z") }
fn default_archive_extension() -> String { "7z".to_string() }
fn default_log_file() -> PathBuf { PathBuf::from("backup.log") }
fn default_state_file_name() -> String { "last_backup.json".to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_log_max_files() -> u32 { 10 }
