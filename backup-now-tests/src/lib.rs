//! Test utilities for backup-now
//!
//! This crate provides shared test utilities, configuration builders
//! and helper functions for testing the backup-now application.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use test_utils::{ConfigBuilder, MockExecutor, TestContext};
//!
//! #[test]
//! fn my_test() {
//!     let ctx = TestContext::new();
//!     let config = ConfigBuilder::for_context(&ctx)
//!         .add_group("docs", &[ctx.create_subdir("docs")], &ctx.temp_dir().join("out"))
//!         .build();
//!     // ... test code
//! }
//! ```

pub mod config_builder;
pub mod fixtures;
pub mod test_context;

// Re-export commonly used items
pub use config_builder::ConfigBuilder;
pub use fixtures::*;
pub use test_context::TestContext;

// Re-export types from the main crate for convenience
pub use backup_now::config::{BackupGroup, BackupMode, Config, GlobalConfig};
pub use backup_now::managers::backup::{BackupManager, GroupOutcome, RunSummary};
pub use backup_now::utils::state::StateStore;

// Re-export mock implementations from the main crate
pub use backup_now::utils::executor::mock::{CommandCall, MockExecutor, MockResponse};
pub use backup_now::utils::executor::CommandExecutor;
