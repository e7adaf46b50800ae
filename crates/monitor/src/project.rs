//! Walking a project tree: finding the rule file and listing candidate paths.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use walkdir::{DirEntry, WalkDir};

use pathwarden_core::paths::normalize_path;
use policy_engine::rules::glob;

/// Whether a root-relative path falls under one of the `exclude` globs.
pub fn is_excluded(relative: &str, exclude: &[String]) -> bool {
    let relative = normalize_path(relative);
    exclude
        .iter()
        .any(|pattern| glob::matches(&normalize_path(pattern), &relative))
}

/// Finds `file_name` under `root`, preferring the shallowest copy and, at the
/// same depth, the first in name order.
pub fn locate_rules_file(root: &Path, file_name: &str, exclude: &[String]) -> Option<PathBuf> {
    walk(root, exclude)
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file() && entry.file_name() == file_name)
        .min_by_key(|entry| entry.depth())
        .map(|entry| entry.into_path())
}

/// Every file under `root` as a normalized, root-relative path, in walk order.
pub fn project_files(root: &Path, exclude: &[String]) -> Result<Vec<String>> {
    let mut files = Vec::new();
    for entry in walk(root, exclude) {
        let entry = entry.with_context(|| format!("walk {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        if let Some(relative) = relative_path(root, &entry) {
            files.push(relative);
        }
    }
    Ok(files)
}

fn walk<'a>(
    root: &'a Path,
    exclude: &'a [String],
) -> impl Iterator<Item = walkdir::Result<DirEntry>> + 'a {
    WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(move |entry| match relative_path(root, entry) {
            Some(relative) if !relative.is_empty() => !is_excluded(&relative, exclude),
            _ => true,
        })
}

fn relative_path(root: &Path, entry: &DirEntry) -> Option<String> {
    let relative = entry.path().strip_prefix(root).ok()?;
    Some(normalize_path(&relative.to_string_lossy()))
}
