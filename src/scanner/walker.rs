use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::Serialize;

use crate::error::{Result, ScanError};

use super::cache::SizeCache;
use super::meta::is_readable;
use super::node::DirectoryNode;
use super::options::ScanOptions;
use super::size::format_bytes;
use super::state::ScanState;

/// Report produced by a tree scan.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
    pub path: PathBuf,
    pub total_files: u64,
    pub total_dirs: u64,
    pub total_size: u64,
    pub total_size_formatted: String,
    pub total_items: u64,
    /// Wall time in seconds, rounded to 4 decimals
    pub scan_time: f64,
    pub symbolic_links: Vec<PathBuf>,
    pub unreadable_items: Vec<PathBuf>,
    pub directory_tree: DirectoryNode,
}

/// Report produced by a quick scan.
///
/// Only the size fields are serialized; the full counters stay available in
/// `state` for callers that want them.
#[derive(Debug, Clone, Serialize)]
pub struct QuickScanResult {
    pub total_size: u64,
    pub total_size_formatted: String,
    #[serde(skip)]
    pub state: ScanState,
}

/// How a single directory entry is treated
enum Visit {
    Skip,
    Descend,
    File { size: u64 },
}

/// Recursive directory scanner.
///
/// Holds only configuration; every call builds its own [`ScanState`], so one
/// scanner may serve any number of sequential or concurrent calls.
#[derive(Debug, Clone, Default)]
pub struct DirectoryScanner {
    options: ScanOptions,
    cache: Option<SizeCache>,
}

impl DirectoryScanner {
    /// Scanner with the given options. When `options.use_cache` is set the
    /// cache lives in the default per-user location.
    pub fn new(options: ScanOptions) -> Self {
        let cache = if options.use_cache {
            match SizeCache::default_location(options.cache_expiry_secs) {
                Ok(cache) => Some(cache),
                Err(err) => {
                    tracing::warn!(%err, "Aggregate cache disabled");
                    None
                }
            }
        } else {
            None
        };

        Self { options, cache }
    }

    /// Use an explicit cache document. Only consulted when `use_cache` is set.
    pub fn with_cache(mut self, cache: SizeCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    pub fn cache(&self) -> Option<&SizeCache> {
        self.cache.as_ref()
    }

    /// Cache consulted by quick scans. Depth-limited scans see truncated
    /// subtrees, so they neither read nor write it.
    fn active_cache(&self) -> Option<&SizeCache> {
        self.cache
            .as_ref()
            .filter(|_| self.options.use_cache && self.options.max_depth.is_none())
    }

    /// Mark `path` as entered for the strict cycle guard
    fn mark_entered(&self, path: &Path, state: &mut ScanState) {
        if !self.options.strict_cycle_guard {
            return;
        }
        match fs::canonicalize(path) {
            Ok(real) => {
                state.enter_dir(real);
            }
            Err(err) => tracing::debug!(path = %path.display(), %err, "Cannot resolve directory"),
        }
    }

    /// Scan `root` and build the full directory tree.
    ///
    /// Fails only when `root` is missing, not a directory, or unreadable;
    /// anything unreadable below it is listed in `unreadable_items`.
    pub fn scan(&self, root: &Path) -> Result<ScanResult> {
        let root = resolve_root(root)?;
        if !is_readable(&root) {
            return Err(ScanError::invalid_path(&root, "not readable"));
        }

        tracing::info!(path = %root.display(), "Scanning directory tree");

        let start = Instant::now();
        let mut state = ScanState::new();

        let tree = self
            .scan_tree(&root, 0, &mut state)
            .ok_or_else(|| ScanError::invalid_path(&root, "cannot open directory"))?;

        let scan_time = (start.elapsed().as_secs_f64() * 10_000.0).round() / 10_000.0;

        tracing::info!(
            files = state.total_files,
            dirs = state.total_dirs,
            size = state.total_size,
            "Scan complete"
        );

        Ok(ScanResult {
            path: root,
            total_files: state.total_files,
            total_dirs: state.total_dirs,
            total_size: state.total_size,
            total_size_formatted: format_bytes(state.total_size),
            total_items: state.total_items(),
            scan_time,
            symbolic_links: state.symbolic_links,
            unreadable_items: state.unreadable_items,
            directory_tree: tree,
        })
    }

    /// Compute the total size below `root` without building a tree, using the
    /// aggregate cache when enabled.
    pub fn quick_scan(&self, root: &Path) -> Result<QuickScanResult> {
        let root = resolve_root(root)?;

        tracing::info!(path = %root.display(), "Quick scanning directory");

        let mut state = ScanState::new();
        let fingerprint = self.options.cache_fingerprint();

        self.quick_scan_dir(&root, 0, &fingerprint, &mut state);

        tracing::info!(size = state.total_size, "Quick scan complete");

        Ok(QuickScanResult {
            total_size: state.total_size,
            total_size_formatted: format_bytes(state.total_size),
            state,
        })
    }

    fn scan_tree(&self, path: &Path, depth: usize, state: &mut ScanState) -> Option<DirectoryNode> {
        if self.options.exceeds_depth(depth) {
            return None;
        }

        let entries = read_entries(path, state)?;
        self.mark_entered(path, state);
        let mut node = DirectoryNode::new(path);

        for (child_path, name) in entries {
            match self.visit_entry(&child_path, &name, state) {
                Visit::Skip => {}
                Visit::Descend => {
                    if let Some(child) = self.scan_tree(&child_path, depth + 1, state) {
                        node.add_child(child);
                    }
                }
                Visit::File { size } => {
                    node.add_file(size);
                    state.add_file(size);
                }
            }
        }

        state.add_dir();
        Some(node)
    }

    fn quick_scan_dir(
        &self,
        path: &Path,
        depth: usize,
        fingerprint: &str,
        state: &mut ScanState,
    ) {
        if self.options.exceeds_depth(depth) {
            return;
        }

        let cache = self.active_cache();
        let hit = cache
            .and_then(|c| c.get(path))
            .filter(|entry| entry.fingerprint == fingerprint);
        if let Some(hit) = hit {
            tracing::debug!(path = %path.display(), size = hit.size, "Cache hit");
            state.fold(hit.totals());
            return;
        }

        let Some(entries) = read_entries(path, state) else {
            return;
        };
        self.mark_entered(path, state);
        let before = state.totals();

        for (child_path, name) in entries {
            match self.visit_entry(&child_path, &name, state) {
                Visit::Skip => {}
                Visit::Descend => self.quick_scan_dir(&child_path, depth + 1, fingerprint, state),
                Visit::File { size } => state.add_file(size),
            }
        }

        state.add_dir();

        if let Some(cache) = cache {
            let subtree = state.since(before);
            if let Err(err) = cache.set_totals(path, subtree, fingerprint) {
                tracing::debug!(%err, path = %path.display(), "Failed to persist cache entry");
            }
        }
    }

    /// Apply the per-entry policy shared by both traversal modes
    fn visit_entry(&self, path: &Path, name: &str, state: &mut ScanState) -> Visit {
        if name == "." || name == ".." {
            return Visit::Skip;
        }

        state.entries_read += 1;
        let link_meta = match fs::symlink_metadata(path) {
            Ok(m) => m,
            Err(err) => {
                tracing::debug!(path = %path.display(), %err, "Cannot stat entry");
                state.record_unreadable(path);
                return Visit::Skip;
            }
        };

        let is_link = link_meta.file_type().is_symlink();
        let target_meta = if is_link { fs::metadata(path).ok() } else { None };
        let is_dir = match &target_meta {
            Some(meta) => meta.is_dir(),
            None => !is_link && link_meta.is_dir(),
        };

        if is_link {
            state.record_symlink(path);
            if !self.options.follow_symlinks {
                return Visit::Skip;
            }
            if is_dir && self.is_cycle(path, state) {
                return Visit::Skip;
            }
        }

        if is_dir {
            if self.options.is_excluded_dir(name) {
                tracing::debug!(path = %path.display(), "Excluded directory");
                return Visit::Skip;
            }
            if !is_readable(path) {
                state.record_unreadable(path);
                return Visit::Skip;
            }
            return Visit::Descend;
        }

        if self.options.is_excluded_file(name) {
            tracing::trace!(path = %path.display(), "Excluded file");
            return Visit::Skip;
        }
        if !is_readable(path) {
            state.record_unreadable(path);
            return Visit::Skip;
        }

        let size = match target_meta {
            Some(meta) => meta.len(),
            None => link_meta.len(),
        };
        Visit::File { size }
    }

    /// Cycle guard for a followed directory symlink.
    ///
    /// The link is skipped when its target is an ancestor of (or equal to) the
    /// link's own location. The location is resolved through the link's parent,
    /// so a link reached through another link is compared by where it really
    /// lives. This does not catch cycles spanning several links;
    /// `strict_cycle_guard` additionally refuses targets already entered in
    /// this call.
    fn is_cycle(&self, link: &Path, state: &ScanState) -> bool {
        let Ok(real) = fs::canonicalize(link) else {
            return false;
        };

        if real_location(link).starts_with(&real) {
            tracing::debug!(link = %link.display(), target = %real.display(), "Symlink points at an ancestor");
            return true;
        }

        if self.options.strict_cycle_guard && state.was_entered(&real) {
            tracing::debug!(link = %link.display(), target = %real.display(), "Symlink target already visited");
            return true;
        }

        false
    }
}

/// Where `link` itself lives once its parent directories are resolved
fn real_location(link: &Path) -> PathBuf {
    match (link.parent(), link.file_name()) {
        (Some(parent), Some(name)) => match fs::canonicalize(parent) {
            Ok(parent) => parent.join(name),
            Err(_) => link.to_path_buf(),
        },
        _ => link.to_path_buf(),
    }
}

/// Canonicalize and require a directory
fn resolve_root(root: &Path) -> Result<PathBuf> {
    let resolved = root
        .canonicalize()
        .map_err(|e| ScanError::invalid_path(root, e.to_string()))?;

    if !resolved.is_dir() {
        return Err(ScanError::invalid_path(root, "not a directory"));
    }

    Ok(resolved)
}

/// Open a directory and collect `(path, name)` pairs sorted by name. The
/// handle is closed before returning. Failure to open records the directory
/// as unreadable.
fn read_entries(path: &Path, state: &mut ScanState) -> Option<Vec<(PathBuf, String)>> {
    let read_dir = match fs::read_dir(path) {
        Ok(rd) => rd,
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "Cannot open directory");
            state.record_unreadable(path);
            return None;
        }
    };

    let mut entries: Vec<(PathBuf, String)> = read_dir
        .filter_map(|result| match result {
            Ok(entry) => Some((entry.path(), entry.file_name().to_string_lossy().into_owned())),
            Err(err) => {
                tracing::debug!(path = %path.display(), %err, "Skipping unreadable directory entry");
                None
            }
        })
        .collect();
    entries.sort_by(|a, b| a.1.cmp(&b.1));

    Some(entries)
}
