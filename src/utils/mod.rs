pub mod archiver;
pub mod command;
pub mod scanner;
pub mod state;

// Trait-based abstraction for testability
pub mod executor;

// Re-export commonly used types and traits (used by test crate)
pub use executor::{CommandExecutor, RealExecutor};
