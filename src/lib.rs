//! Backup Now Library
//!
//! Configuration-driven file backups through an external archiver, with
//! per-group incremental state.

pub mod config;
pub mod managers;
pub mod utils;

// Re-export commonly used types
pub use config::{load_config, BackupGroup, Config};
pub use managers::backup::{run_from_config, BackupManager, GroupOutcome, RunSummary};
pub use managers::logging::{init_console_logging, init_logging, LogGuard, LoggingConfig, RunLog};
