use std::collections::BTreeSet;
use std::path::Path;

/// Directory names skipped entirely by default (version control, editor and
/// dependency folders, scratch space).
pub const DEFAULT_EXCLUDE_DIRS: &[&str] = &[
    ".git",
    ".svn",
    "node_modules",
    ".idea",
    ".vscode",
    "vendor",
    "cache",
    "tmp",
    "temp",
];

/// File extensions skipped by default, compared lowercase.
pub const DEFAULT_EXCLUDE_EXTS: &[&str] = &["log", "tmp", "temp", "cache"];

/// Exact file names skipped by default.
pub const DEFAULT_EXCLUDE_FILES: &[&str] = &[
    ".DS_Store",
    "Thumbs.db",
    "desktop.ini",
    "error_log",
    "debug.log",
];

/// Default lifetime of an aggregate cache entry (30 minutes).
pub const DEFAULT_CACHE_EXPIRY_SECS: u64 = 30 * 60;

/// Configuration options for directory scanning operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
    /// Directory names skipped entirely, at any depth
    pub exclude_dirs: BTreeSet<String>,

    /// File extensions skipped (stored lowercase, without the leading dot)
    pub exclude_exts: BTreeSet<String>,

    /// Exact file names skipped
    pub exclude_files: BTreeSet<String>,

    /// Descend into / read through symbolic links
    pub follow_symlinks: bool,

    /// Maximum depth to recurse (None = unlimited). The root is depth 0.
    pub max_depth: Option<usize>,

    /// Consult and populate the aggregate cache during quick scans
    pub use_cache: bool,

    /// Seconds after which a cache entry is treated as absent
    pub cache_expiry_secs: u64,

    /// Track every directory entered in a call (the root included) and refuse
    /// to enter one again through a followed symlink, on top of the
    /// ancestor-prefix check
    pub strict_cycle_guard: bool,
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self {
            exclude_dirs: to_set(DEFAULT_EXCLUDE_DIRS.iter().copied()),
            exclude_exts: DEFAULT_EXCLUDE_EXTS
                .iter()
                .map(|ext| normalize_ext(ext))
                .collect(),
            exclude_files: to_set(DEFAULT_EXCLUDE_FILES.iter().copied()),
            follow_symlinks: false,
            max_depth: None,
            use_cache: false,
            cache_expiry_secs: DEFAULT_CACHE_EXPIRY_SECS,
            strict_cycle_guard: false,
        }
    }
}

impl ScanOptions {
    /// Create a new ScanOptions with default filters
    pub fn new() -> Self {
        Self::default()
    }

    /// Options with every filter list emptied, so nothing is excluded by name
    pub fn unfiltered() -> Self {
        Self::default().without_filters()
    }

    /// Empty every filter list, keeping the traversal and cache settings
    pub fn without_filters(mut self) -> Self {
        self.exclude_dirs.clear();
        self.exclude_exts.clear();
        self.exclude_files.clear();
        self
    }

    /// Replace the excluded directory names
    pub fn with_exclude_dirs<I, S>(mut self, dirs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_dirs = to_set(dirs);
        self
    }

    /// Add a single directory name to the exclusion list
    pub fn add_exclude_dir(mut self, dir: impl Into<String>) -> Self {
        self.exclude_dirs.insert(dir.into());
        self
    }

    /// Replace the excluded file extensions
    pub fn with_exclude_exts<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.exclude_exts = exts.into_iter().map(|e| normalize_ext(e.as_ref())).collect();
        self
    }

    /// Replace the excluded file names
    pub fn with_exclude_files<I, S>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_files = to_set(files);
        self
    }

    /// Set whether to follow symbolic links
    pub fn with_follow_symlinks(mut self, follow: bool) -> Self {
        self.follow_symlinks = follow;
        self
    }

    /// Set maximum recursion depth (None = unlimited)
    pub fn with_max_depth(mut self, depth: Option<usize>) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set aggregate cache policy
    pub fn with_cache(mut self, enabled: bool, expiry_secs: u64) -> Self {
        self.use_cache = enabled;
        self.cache_expiry_secs = expiry_secs;
        self
    }

    /// Enable the visited-set cycle guard for followed symlinks
    pub fn with_strict_cycle_guard(mut self, enabled: bool) -> Self {
        self.strict_cycle_guard = enabled;
        self
    }

    /// Whether a directory with this name is skipped
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.exclude_dirs.contains(name)
    }

    /// Whether a file with this name is skipped, by exact name or by its
    /// lowercased extension
    pub fn is_excluded_file(&self, name: &str) -> bool {
        if self.exclude_files.contains(name) {
            return true;
        }

        Path::new(name)
            .extension()
            .map(|ext| self.exclude_exts.contains(&ext.to_string_lossy().to_lowercase()))
            .unwrap_or(false)
    }

    /// Whether a directory at `depth` is past the depth budget
    pub fn exceeds_depth(&self, depth: usize) -> bool {
        self.max_depth.is_some_and(|max| depth > max)
    }

    /// Hex digest of every setting that changes which entries a subtree total
    /// includes. Cache entries written under other settings are misses.
    pub fn cache_fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for (tag, set) in [
            ("dirs", &self.exclude_dirs),
            ("exts", &self.exclude_exts),
            ("files", &self.exclude_files),
        ] {
            hasher.update(tag.as_bytes());
            for item in set {
                hasher.update(&(item.len() as u64).to_le_bytes());
                hasher.update(item.as_bytes());
            }
        }
        hasher.update(&[u8::from(self.follow_symlinks), u8::from(self.strict_cycle_guard)]);
        hasher.finalize().to_hex().to_string()
    }
}

/// Lowercase an extension and strip a leading dot
pub fn normalize_ext(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

fn to_set<I, S>(items: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}
