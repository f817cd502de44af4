//! Recursive file discovery with modification-time filtering

use chrono::{DateTime, Local};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use walkdir::{DirEntry, WalkDir};

/// Lazily walk `roots` in order, yielding files modified strictly after
/// `cutoff`. With no cutoff every file is yielded. Roots that are not
/// directories are skipped.
pub fn scan_files<'a>(
    roots: &'a [PathBuf],
    cutoff: Option<DateTime<Local>>,
) -> impl Iterator<Item = PathBuf> + 'a {
    roots
        .iter()
        .filter(|root| root.is_dir())
        .flat_map(|root| WalkDir::new(root).follow_links(false).into_iter())
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                None
            }
        })
        .filter(is_file_entry)
        .filter_map(move |entry| {
            let path = entry.into_path();
            match cutoff {
                None => Some(path),
                Some(cutoff) => match modified_time(&path) {
                    Some(mtime) if mtime > cutoff => Some(path),
                    _ => None,
                },
            }
        })
}

/// Every file currently under `roots`
pub fn list_all_files(roots: &[PathBuf]) -> Vec<PathBuf> {
    scan_files(roots, None).collect()
}

/// Files under `roots` modified after `cutoff`
pub fn modified_since(roots: &[PathBuf], cutoff: DateTime<Local>) -> Vec<PathBuf> {
    scan_files(roots, Some(cutoff)).collect()
}

// Symlinks count as files unless they resolve to a directory
fn is_file_entry(entry: &DirEntry) -> bool {
    let file_type = entry.file_type();
    if file_type.is_dir() {
        return false;
    }
    if file_type.is_symlink() {
        return !entry.path().is_dir();
    }
    true
}

fn modified_time(path: &Path) -> Option<DateTime<Local>> {
    match fs::metadata(path).and_then(|m| m.modified()) {
        Ok(time) => Some(DateTime::<Local>::from(time)),
        Err(e) => {
            warn!("Cannot read modification time of {:?}: {}", path, e);
            None
        }
    }
}
