use std::path::PathBuf;
use tracing::debug;

/// Locates the directory holding the test tree by probing an ordered
/// candidate list. Infallible: when no candidate exists the process
/// working directory is used, which may simply yield an empty scan.
pub struct PathResolver {
    candidates: Vec<PathBuf>,
}

impl PathResolver {
    pub fn new(candidates: Vec<PathBuf>) -> Self {
        Self { candidates }
    }

    /// First existing candidate, or the current working directory.
    pub fn resolve(&self) -> PathBuf {
        for candidate in &self.candidates {
            if candidate.is_dir() {
                debug!(root = %candidate.display(), "resolved test root");
                return candidate.clone();
            }
        }
        let fallback = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        debug!(root = %fallback.display(), "no candidate root exists, falling back to working directory");
        fallback
    }
}
