use super::types::*;
use super::expand_tilde;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Configuration file {0} not found")]
    NotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to parse JSON config file: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Load configuration from a TOML or JSON file (chosen by extension)
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ConfigError::NotFound(path.to_path_buf()));
    }

    let contents = fs::read_to_string(path)?;
    let mut config = parse_config(&contents, is_json(path))?;

    let base = path.parent().unwrap_or_else(|| Path::new(""));
    resolve_paths(&mut config, base);

    Ok(config)
}

/// Parse configuration text without touching the filesystem
pub fn parse_config(contents: &str, json: bool) -> Result<Config> {
    if json {
        Ok(serde_json::from_str(contents)?)
    } else {
        Ok(toml::from_str(contents)?)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

/// Expand `~` everywhere and anchor relative log paths at the config directory
fn resolve_paths(config: &mut Config, base: &Path) {
    config.global.log_file = anchor(&config.global.log_file, base);
    config.global.log_directory = config
        .global
        .log_directory
        .as_ref()
        .map(|dir| anchor(dir, base));
    config.global.archiver_path = expand_tilde(&config.global.archiver_path);

    for group in &mut config.backup_groups {
        group.source_directories = group
            .source_directories
            .iter()
            .map(|dir| expand_tilde(dir))
            .collect();
        if !group.backup_destination.as_os_str().is_empty() {
            group.backup_destination = expand_tilde(&group.backup_destination);
        }
    }
}

fn anchor(path: &Path, base: &Path) -> PathBuf {
    let expanded = expand_tilde(path);
    if expanded.is_relative() {
        base.join(expanded)
    } else {
        expanded
    }
}

/// Problem found while checking the configured groups
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GroupIssue {
    /// Missing source directories or destination
    Invalid { name: String, group: String },
    /// Several groups write the same state file; the last one to finish wins
    SharedDestination { destination: PathBuf, groups: Vec<String> },
}

impl fmt::Display for GroupIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupIssue::Invalid { name, group } => {
                write!(f, "Invalid configuration for group '{}': {}", name, group)
            }
            GroupIssue::SharedDestination { destination, groups } => write!(
                f,
                "Groups {} share destination {} and its state file",
                groups.join(", "),
                destination.display()
            ),
        }
    }
}

/// Report invalid groups and groups sharing a destination
pub fn validate_groups(config: &Config) -> Vec<GroupIssue> {
    let mut issues = Vec::new();
    let mut by_destination: BTreeMap<&Path, Vec<String>> = BTreeMap::new();

    for (index, group) in config.backup_groups.iter().enumerate() {
        let name = group.display_name(index);
        if !group.is_valid() {
            issues.push(GroupIssue::Invalid {
                name,
                group: group.to_string(),
            });
            continue;
        }
        by_destination
            .entry(group.backup_destination.as_path())
            .or_default()
            .push(name);
    }

    for (destination, groups) in by_destination {
        if groups.len() > 1 {
            issues.push(GroupIssue::SharedDestination {
                destination: destination.to_path_buf(),
                groups,
            });
        }
    }

    issues
}
