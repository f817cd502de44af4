//! Configuration module for backup-now
//!
//! This module handles loading and checking the backup group configuration
//! from TOML or JSON files.
//!
//! ## Example Usage
//!
//! ```no_run
//! use backup_now::config;
//!
//! let config = config::load_config("backup-config.toml")?;
//!
//! for (index, group) in config.backup_groups.iter().enumerate() {
//!     println!("Group: {}, Destination: {:?}", group.display_name(index), group.backup_destination);
//! }
//! # Ok::<(), config::ConfigError>(())
//! ```

mod loader;
mod types;

pub use loader::{load_config, parse_config, validate_groups, ConfigError, GroupIssue, Result};
pub use types::*;

/// Expand tilde (~) in path
pub fn expand_tilde(path: &std::path::Path) -> std::path::PathBuf {
    if let Ok(stripped) = path.strip_prefix("~") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    path.to_path_buf()
}
