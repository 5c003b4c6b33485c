use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

/// Filename suffixes that mark a file as a UI test spec.
pub const TEST_FILE_SUFFIXES: &[&str] = &[".spec.ts", ".test.ts", ".spec.js", ".test.js"];

/// Directories never descended into: version-control metadata, build
/// output, dependency caches, and the dashboard's own subtree.
pub const EXCLUDED_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    "dist",
    "build",
    "coverage",
    "results",
    "test-dashboard",
];

/// Hard cutoff: directories deeper than this below a seed are not
/// descended into, keeping the scan out of unrelated trees.
pub const MAX_SCAN_DEPTH: usize = 2;

/// Recursively enumerates candidate test files under a resolved root.
pub struct FileDiscovery {
    seed_subdirs: Vec<String>,
}

impl FileDiscovery {
    pub fn new(seed_subdirs: Vec<String>) -> Self {
        Self { seed_subdirs }
    }

    /// Enumerate test files under the root's seed directories, in
    /// discovery order, deduplicated by canonical path. A directory
    /// that cannot be listed is logged and skipped.
    pub fn discover(&self, root: &Path) -> Vec<PathBuf> {
        let mut seeds = vec![root.to_path_buf()];
        if let Some(parent) = root.parent() {
            if parent.as_os_str() != "" {
                seeds.push(parent.to_path_buf());
            }
        }
        for subdir in &self.seed_subdirs {
            seeds.push(root.join(subdir));
        }

        let mut seen: HashSet<PathBuf> = HashSet::new();
        let mut files = Vec::new();
        for seed in seeds {
            if !seed.is_dir() {
                continue;
            }
            debug!(seed = %seed.display(), "scanning seed directory");
            self.scan_seed(&seed, &mut seen, &mut files);
        }
        files
    }

    fn scan_seed(&self, seed: &Path, seen: &mut HashSet<PathBuf>, files: &mut Vec<PathBuf>) {
        let walker = WalkDir::new(seed)
            .max_depth(MAX_SCAN_DEPTH)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| !is_excluded_dir(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(seed = %seed.display(), error = %err, "skipping unreadable directory entry");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if !is_test_file(&name) {
                continue;
            }
            // Seeds overlap (the root is also reachable from its
            // parent), so dedupe on the canonical path.
            let path = entry
                .path()
                .canonicalize()
                .unwrap_or_else(|_| entry.path().to_path_buf());
            if seen.insert(path.clone()) {
                files.push(path);
            }
        }
    }
}

fn is_excluded_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| EXCLUDED_DIRS.contains(&name))
            .unwrap_or(false)
}

fn is_test_file(name: &str) -> bool {
    TEST_FILE_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_test_file_suffixes() {
        assert!(is_test_file("login.spec.ts"));
        assert!(is_test_file("users.test.js"));
        assert!(!is_test_file("helpers.ts"));
        assert!(!is_test_file("spec.ts"));
        assert!(is_test_file(".spec.ts"));
    }
}
