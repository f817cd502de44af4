//! Per-group persisted state: the time of the last successful backup
//!
//! The record lives next to the archives, in the group's destination
//! directory. Nothing guards against two runs writing it concurrently.

use anyhow::{Context, Result};
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Serialize, Deserialize)]
struct BackupState {
    last_backup: String,
}

/// Reads and writes `last_backup` records keyed by destination directory
#[derive(Debug, Clone)]
pub struct StateStore {
    file_name: String,
}

impl StateStore {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
        }
    }

    /// Location of the state file for a destination
    pub fn state_path(&self, destination: &Path) -> PathBuf {
        destination.join(&self.file_name)
    }

    /// Time of the last successful backup, or `None` for "beginning of time".
    /// A record that cannot be read or parsed counts as absent.
    pub fn read(&self, destination: &Path) -> Option<DateTime<Local>> {
        let path = self.state_path(destination);
        if !path.exists() {
            debug!("No state file at {:?}", path);
            return None;
        }

        match load_state(&path) {
            Ok(time) => Some(time),
            Err(e) => {
                warn!("Ignoring unreadable state file {:?}: {:#}", path, e);
                None
            }
        }
    }

    /// Record `timestamp` as the last successful backup for a destination
    pub fn write(&self, destination: &Path, timestamp: DateTime<Local>) -> Result<()> {
        let path = self.state_path(destination);
        fs::create_dir_all(destination)
            .with_context(|| format!("Failed to create destination directory: {:?}", destination))?;

        let state = BackupState {
            last_backup: timestamp.to_rfc3339(),
        };
        let json = serde_json::to_string(&state)?;
        fs::write(&path, json).with_context(|| format!("Failed to write state file: {:?}", path))?;

        debug!("Saved state {} to {:?}", state.last_backup, path);
        Ok(())
    }
}

fn load_state(path: &Path) -> Result<DateTime<Local>> {
    let contents = fs::read_to_string(path)?;
    let state: BackupState = serde_json::from_str(&contents)?;
    parse_timestamp(&state.last_backup)
}

/// Parse an ISO-8601 timestamp; values without an offset are local time
pub fn parse_timestamp(value: &str) -> Result<DateTime<Local>> {
    if let Ok(time) = DateTime::parse_from_rfc3339(value) {
        return Ok(time.with_timezone(&Local));
    }

    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f"))
        .with_context(|| format!("Invalid timestamp: {}", value))?;

    Local
        .from_local_datetime(&naive)
        .earliest()
        .with_context(|| format!("Timestamp does not exist in local time: {}", value))
}
