//! Test fixtures and sample data
//!
//! Provides configuration templates and stand-in archiver programs.

use std::path::{Path, PathBuf};

/// Configuration in the layout of the original JSON config files
pub fn sample_json_config(source: &Path, destination: &Path) -> String {
    serde_json::json!({
        "backup_groups": [
            {
                "source_directories": [source],
                "backup_destination": destination,
                "incremental": false
            }
        ]
    })
    .to_string()
}

/// Minimal TOML configuration with one incremental group
pub fn sample_toml_config(source: &Path, destination: &Path, archiver: &Path) -> String {
    format!(
        r#"
[global]
archiver_path = "{archiver}"

[[backup_groups]]
name = "documents"
source_directories = ["{source}"]
backup_destination = "{destination}"
incremental = true
"#,
        archiver = toml_path(archiver),
        source = toml_path(source),
        destination = toml_path(destination),
    )
}

// Backslashes would be escapes inside TOML basic strings
fn toml_path(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// File the fake archiver writes its arguments to, one per line
pub fn recorded_args_path(archiver: &Path) -> PathBuf {
    archiver.with_extension("args")
}

/// Arguments recorded by the last fake archiver invocation
pub fn recorded_args(archiver: &Path) -> Vec<String> {
    std::fs::read_to_string(recorded_args_path(archiver))
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

/// Shell script standing in for 7z: records its arguments and creates the
/// archive named by the second argument
#[cfg(unix)]
pub fn fake_archiver(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "fake-7z.sh",
        r#"#!/bin/sh
printf '%s\n' "$@" > "${0%.sh}.args"
[ "$1" = "a" ] || exit 7
touch "$2"
"#,
    )
}

/// Shell script standing in for a 7z that fails with exit status 2
#[cfg(unix)]
pub fn failing_archiver(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "broken-7z.sh",
        r#"#!/bin/sh
printf '%s\n' "$@" > "${0%.sh}.args"
echo "simulated archiver failure" >&2
exit 2
"#,
    )
}

#[cfg(unix)]
fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    std::fs::create_dir_all(dir).expect("Failed to create script directory");
    let path = dir.join(name);
    std::fs::write(&path, body).expect("Failed to write script");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("Failed to make script executable");
    path
}
