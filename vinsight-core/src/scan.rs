//! Parallel, deterministic discovery of `.vue` files with directory pruning.
//!
//! - Early directory pruning via `WalkDir::filter_entry` (whole subtree skipped)
//! - Parallel entry processing via Rayon's `par_bridge`
//! - Output is sorted so reports are stable across runs

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Directories excluded by default (front-end project conventions).
const EXCLUDED_DIRS: &[&str] = &[
    "node_modules",
    ".git",
    "dist",
    ".nuxt",
    ".output",
    ".vinsight",
];

/// Manifest marking the root of a front-end project.
const PROJECT_MANIFEST: &str = "package.json";

#[inline]
fn is_excluded_dir(entry: &walkdir::DirEntry, excludes: &HashSet<&str>) -> bool {
    entry.file_type().is_dir()
        && entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| excludes.contains(name))
}

/// Gathers all `.vue` files below `root`, skipping the default exclusions.
pub fn gather_vue_files(root: &Path) -> Result<Vec<PathBuf>> {
    gather_vue_files_with_excludes(root, &[])
}

/// Gathers all `.vue` files below `root`, also pruning directories named in
/// `excludes`.
pub fn gather_vue_files_with_excludes(root: &Path, excludes: &[&str]) -> Result<Vec<PathBuf>> {
    let all_excludes: HashSet<&str> = EXCLUDED_DIRS
        .iter()
        .copied()
        .chain(excludes.iter().copied())
        .collect();

    let mut files = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| !is_excluded_dir(e, &all_excludes))
        .par_bridge()
        .filter_map(|entry| match entry {
            Ok(e) => {
                let path = e.path();
                if e.file_type().is_file() && path.extension().is_some_and(|ext| ext == "vue") {
                    Some(Ok(path.to_path_buf()))
                } else {
                    None
                }
            }
            Err(e) => Some(Err(e.into())),
        })
        .collect::<Result<Vec<_>>>()
        .with_context(|| format!("Failed to gather .vue files from {}", root.display()))?;

    files.sort();
    Ok(files)
}

/// Nearest ancestor of `start` (inclusive) containing a `package.json`.
pub fn find_project_root(start: &Path) -> Option<PathBuf> {
    let start = if start.is_file() { start.parent()? } else { start };
    start
        .ancestors()
        .find(|dir| dir.join(PROJECT_MANIFEST).is_file())
        .map(Path::to_path_buf)
}
