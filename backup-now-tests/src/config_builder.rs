//! Fluent API for building test configurations
//!
//! Provides a builder pattern for creating test configurations with sensible defaults.

use crate::test_context::TestContext;
use backup_now::config::{BackupGroup, Config, GlobalConfig};
use std::path::{Path, PathBuf};

/// Builder for creating test configurations
pub struct ConfigBuilder {
    global: GlobalConfig,
    groups: Vec<BackupGroup>,
}

impl ConfigBuilder {
    /// Create a new ConfigBuilder with no groups and default global settings
    pub fn new() -> Self {
        Self {
            global: GlobalConfig::default(),
            groups: Vec::new(),
        }
    }

    /// Builder whose run log lives inside the context's temp dir
    pub fn for_context(ctx: &TestContext) -> Self {
        Self::new().with_log_file(&ctx.log_path())
    }

    /// Set the archiver executable
    pub fn with_archiver(mut self, path: &Path) -> Self {
        self.global.archiver_path = path.to_path_buf();
        self
    }

    /// Set the archive extension
    pub fn with_extension(mut self, extension: &str) -> Self {
        self.global.archive_extension = extension.to_string();
        self
    }

    /// Set the run log file
    pub fn with_log_file(mut self, path: &Path) -> Self {
        self.global.log_file = path.to_path_buf();
        self
    }

    /// Set the state file name used in every destination
    pub fn with_state_file_name(mut self, name: &str) -> Self {
        self.global.state_file_name = name.to_string();
        self
    }

    /// Add a full-backup group
    pub fn add_group(self, name: &str, sources: &[PathBuf], destination: &Path) -> Self {
        self.push_group(Some(name), sources, destination, false)
    }

    /// Add an incremental group
    pub fn add_incremental_group(self, name: &str, sources: &[PathBuf], destination: &Path) -> Self {
        self.push_group(Some(name), sources, destination, true)
    }

    /// Add a group without a name (it will be called `group-<n>`)
    pub fn add_unnamed_group(self, sources: &[PathBuf], destination: &Path) -> Self {
        self.push_group(None, sources, destination, false)
    }

    /// Add a group with neither sources nor destination
    pub fn add_invalid_group(mut self, name: &str) -> Self {
        self.groups.push(BackupGroup {
            name: Some(name.to_string()),
            ..Default::default()
        });
        self
    }

    fn push_group(
        mut self,
        name: Option<&str>,
        sources: &[PathBuf],
        destination: &Path,
        incremental: bool,
    ) -> Self {
        self.groups.push(BackupGroup {
            name: name.map(str::to_string),
            source_directories: sources.to_vec(),
            backup_destination: destination.to_path_buf(),
            incremental,
        });
        self
    }

    /// Build the Config
    pub fn build(self) -> Config {
        Config {
            global: self.global,
            backup_groups: self.groups,
        }
    }

    /// Render the configuration as TOML
    pub fn to_toml(self) -> String {
        toml::to_string_pretty(&self.build()).expect("Failed to serialize config")
    }

    /// Render the configuration as JSON
    pub fn to_json(self) -> String {
        serde_json::to_string_pretty(&self.build()).expect("Failed to serialize config")
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
