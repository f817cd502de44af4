//! Utilities for running external programs with proper error handling

use anyhow::{Context, Result};
use std::ffi::{OsStr, OsString};
use std::process::{Command, Output, Stdio};
use tracing::{debug, error};

/// Run a program with an argument vector. No shell is involved, so arguments
/// reach the program verbatim whatever characters they contain.
pub fn run_command(program: &OsStr, args: &[OsString]) -> Result<Output> {
    let mut cmd = Command::new(program);
    cmd.args(args);
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    debug!(
        "Running command: {} ({} arguments)",
        program.to_string_lossy(),
        args.len()
    );

    let output = cmd
        .output()
        .with_context(|| format!("Failed to execute {}", program.to_string_lossy()))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        error!("Command failed: {}", program.to_string_lossy());
        error!("Stderr: {}", stderr.trim());
        anyhow::bail!(
            "Command failed with exit code {:?}: {}",
            output.status.code(),
            stderr.trim()
        );
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !stdout.is_empty() {
        debug!("Command output: {}", stdout);
    }

    Ok(output)
}
