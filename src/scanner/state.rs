use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Counters and findings accumulated over one top-level scan call.
///
/// A fresh value is created per call and threaded by `&mut` through the
/// recursion, so a scanner can be shared between callers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanState {
    pub total_files: u64,
    pub total_dirs: u64,
    pub total_size: u64,

    /// Every symlink encountered, in discovery order, at most once each
    pub symbolic_links: Vec<PathBuf>,

    /// Every path that failed an open or readability check
    pub unreadable_items: Vec<PathBuf>,

    /// Per-entry metadata reads performed (instrumentation)
    pub entries_read: u64,

    seen_links: HashSet<PathBuf>,
    entered_dirs: HashSet<PathBuf>,
}

/// Totals at a point in the traversal, used to compute a subtree's share.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Totals {
    pub size: u64,
    pub files: u64,
    pub dirs: u64,
}

impl ScanState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_items(&self) -> u64 {
        self.total_files + self.total_dirs
    }

    pub fn totals(&self) -> Totals {
        Totals {
            size: self.total_size,
            files: self.total_files,
            dirs: self.total_dirs,
        }
    }

    /// Totals gained since `before`
    pub fn since(&self, before: Totals) -> Totals {
        Totals {
            size: self.total_size - before.size,
            files: self.total_files - before.files,
            dirs: self.total_dirs - before.dirs,
        }
    }

    /// Add totals computed elsewhere (a cache hit)
    pub fn fold(&mut self, totals: Totals) {
        self.total_size += totals.size;
        self.total_files += totals.files;
        self.total_dirs += totals.dirs;
    }

    pub fn add_file(&mut self, size: u64) {
        self.total_files += 1;
        self.total_size += size;
    }

    pub fn add_dir(&mut self) {
        self.total_dirs += 1;
    }

    /// Record a symlink; returns false if it was already recorded in this call
    pub fn record_symlink(&mut self, path: &Path) -> bool {
        if !self.seen_links.insert(path.to_path_buf()) {
            return false;
        }
        self.symbolic_links.push(path.to_path_buf());
        true
    }

    pub fn record_unreadable(&mut self, path: &Path) {
        self.unreadable_items.push(path.to_path_buf());
    }

    /// Mark a canonical directory as entered; returns false if it already was
    pub fn enter_dir(&mut self, real_path: PathBuf) -> bool {
        self.entered_dirs.insert(real_path)
    }

    pub fn was_entered(&self, real_path: &Path) -> bool {
        self.entered_dirs.contains(real_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symlink_recorded_once() {
        let mut state = ScanState::new();
        assert!(state.record_symlink(Path::new("/a/link")));
        assert!(!state.record_symlink(Path::new("/a/link")));
        assert!(state.record_symlink(Path::new("/b/link")));
        assert_eq!(state.symbolic_links.len(), 2);
    }

    #[test]
    fn test_since_and_fold() {
        let mut state = ScanState::new();
        state.add_file(10);
        let before = state.totals();

        state.add_file(5);
        state.add_file(7);
        state.add_dir();
        let delta = state.since(before);
        assert_eq!(delta, Totals { size: 12, files: 2, dirs: 1 });

        let mut other = ScanState::new();
        other.fold(delta);
        assert_eq!(other.total_size, 12);
        assert_eq!(other.total_items(), 3);
    }

    #[test]
    fn test_enter_dir_tracks_visits() {
        let mut state = ScanState::new();
        assert!(state.enter_dir(PathBuf::from("/x")));
        assert!(state.was_entered(Path::new("/x")));
        assert!(!state.enter_dir(PathBuf::from("/x")));
    }
}
