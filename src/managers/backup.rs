//! Backup manager - orchestrates backup runs over the configured groups

use crate::config::{self, BackupGroup, BackupMode, Config};
use crate::managers::logging::RunLog;
use crate::utils::archiver::Archiver;
use crate::utils::executor::CommandExecutor;
use crate::utils::scanner::scan_files;
use crate::utils::state::StateStore;
use anyhow::Result;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// What happened to a single group during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupOutcome {
    /// Archive written and state advanced
    Archived(PathBuf),
    /// Nothing to archive
    Unchanged,
    /// Missing source directories or destination
    Invalid,
    /// Archiver or state write failed; state left as it was
    Failed(String),
    /// Dry run: the archive that would have been written
    Planned { archive: PathBuf, files: usize },
}

/// Totals for one run, in configuration order
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub outcomes: Vec<(String, GroupOutcome)>,
}

impl RunSummary {
    fn count(&self, pred: impl Fn(&GroupOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|(_, o)| pred(o)).count()
    }

    pub fn archived(&self) -> usize {
        self.count(|o| matches!(o, GroupOutcome::Archived(_)))
    }

    pub fn unchanged(&self) -> usize {
        self.count(|o| matches!(o, GroupOutcome::Unchanged))
    }

    pub fn invalid(&self) -> usize {
        self.count(|o| matches!(o, GroupOutcome::Invalid))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, GroupOutcome::Failed(_)))
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }
}

/// Per-group overview for `list` and `status`
#[derive(Debug, Clone)]
pub struct GroupStatus {
    pub name: String,
    pub sources: Vec<PathBuf>,
    pub destination: PathBuf,
    pub mode: BackupMode,
    pub valid: bool,
    pub last_backup: Option<DateTime<Local>>,
}

pub struct BackupManager {
    config: Config,
    executor: Box<dyn CommandExecutor>,
    state: StateStore,
    log: RunLog,
    dry_run: bool,
}

impl BackupManager {
    /// Create new backup manager
    pub fn new(config: Config, executor: Box<dyn CommandExecutor>) -> Self {
        let state = StateStore::new(config.global.state_file_name.clone());
        let log = RunLog::new(config.global.log_file.clone());

        Self {
            config,
            executor,
            state,
            log,
            dry_run: false,
        }
    }

    /// Scan and report without running the archiver or touching state
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Back up every group in configuration order, or only the named group.
    /// Group failures are logged and never abort the run.
    pub fn run(&self, group_filter: Option<&str>) -> Result<RunSummary> {
        let mut summary = RunSummary::default();

        if self.config.backup_groups.is_empty() {
            self.log.info("Configuration is missing backup groups.");
            return Ok(summary);
        }

        if let Some(wanted) = group_filter {
            let known = self
                .config
                .backup_groups
                .iter()
                .enumerate()
                .any(|(i, g)| g.display_name(i) == wanted);
            if !known {
                anyhow::bail!("Group not found: {}", wanted);
            }
        }

        for (index, group) in self.config.backup_groups.iter().enumerate() {
            let name = group.display_name(index);
            if group_filter.is_some_and(|wanted| wanted != name) {
                debug!("Skipping group '{}' (not selected)", name);
                continue;
            }

            let outcome = self.backup_group(&name, group);
            summary.outcomes.push((name, outcome));
        }

        info!(
            "Run finished: {} archived, {} unchanged, {} invalid, {} failed",
            summary.archived(),
            summary.unchanged(),
            summary.invalid(),
            summary.failed()
        );

        Ok(summary)
    }

    /// Run one group: scan, archive, then advance its state on success
    pub fn backup_group(&self, name: &str, group: &BackupGroup) -> GroupOutcome {
        if !group.is_valid() {
            self.log
                .error(&format!("Invalid configuration for group: {}", group));
            return GroupOutcome::Invalid;
        }

        let destination = group.backup_destination.as_path();
        let started = Local::now();
        let cutoff = match group.mode() {
            BackupMode::Incremental => self.state.read(destination),
            BackupMode::Full => None,
        };

        info!(
            "Starting {} backup for group '{}' (since: {})",
            group.mode(),
            name,
            cutoff
                .map(|c| c.to_rfc3339())
                .unwrap_or_else(|| "beginning".to_string())
        );

        let files: Vec<PathBuf> = scan_files(&group.source_directories, cutoff).collect();

        if files.is_empty() {
            for dir in &group.source_directories {
                let message = match group.mode() {
                    BackupMode::Incremental => format!(
                        "No files modified since the last backup from the {}.",
                        dir.display()
                    ),
                    BackupMode::Full => format!("No files found in {}.", dir.display()),
                };
                self.log.info(&message);
            }
            return GroupOutcome::Unchanged;
        }

        let archiver = Archiver::new(
            self.executor.as_ref(),
            self.config.global.archiver_path.clone(),
            self.config.global.archive_extension.clone(),
        );

        if self.dry_run {
            let archive = archiver.archive_path(destination, started);
            info!(
                "Dry run: would archive {} files from group '{}' into {}",
                files.len(),
                name,
                archive.display()
            );
            for file in &files {
                debug!("  {}", file.display());
            }
            return GroupOutcome::Planned {
                archive,
                files: files.len(),
            };
        }

        match archiver.create_archive(destination, &files, started) {
            Ok(archive) => {
                self.log.info(&format!(
                    "Successfully backed up to {} from {}",
                    archive.display(),
                    join_paths(&group.source_directories)
                ));

                if let Err(e) = self.state.write(destination, started) {
                    let message = format!("Failed to save backup state for group '{}': {:#}", name, e);
                    self.log.error(&message);
                    return GroupOutcome::Failed(message);
                }

                GroupOutcome::Archived(archive)
            }
            Err(e) => {
                let message = format!("Error during backup: {:#}", e);
                self.log.error(&message);
                GroupOutcome::Failed(message)
            }
        }
    }

    /// Overview of every configured group with its last successful backup
    pub fn group_status(&self) -> Vec<GroupStatus> {
        self.config
            .backup_groups
            .iter()
            .enumerate()
            .map(|(index, group)| {
                let valid = group.is_valid();
                GroupStatus {
                    name: group.display_name(index),
                    sources: group.source_directories.clone(),
                    destination: group.backup_destination.clone(),
                    mode: group.mode(),
                    valid,
                    last_backup: if valid {
                        self.state.read(&group.backup_destination)
                    } else {
                        None
                    },
                }
            })
            .collect()
    }
}

/// Load the configuration at `config_path` and run it. A configuration that
/// is missing or malformed ends the run quietly with nothing processed.
pub fn run_from_config(
    config_path: &Path,
    executor: Box<dyn CommandExecutor>,
    group_filter: Option<&str>,
    dry_run: bool,
) -> Result<RunSummary> {
    match config::load_config(config_path) {
        Ok(config) => BackupManager::new(config, executor)
            .with_dry_run(dry_run)
            .run(group_filter),
        Err(e) => {
            report_config_error(config_path, &e);
            Ok(RunSummary::default())
        }
    }
}

/// Log an unusable configuration to the default run log next to it
pub fn report_config_error(config_path: &Path, error: &config::ConfigError) {
    let fallback = config_path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(config::GlobalConfig::default().log_file);
    RunLog::new(fallback).error(&format!("{}. No groups to process.", error));
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
