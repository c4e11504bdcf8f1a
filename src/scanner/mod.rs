mod cache;
mod formatter;
mod listing;
mod meta;
mod node;
mod options;
mod size;
mod state;
mod walker;

pub use cache::{CacheDocument, CacheEntry, SizeCache, CACHE_FILE_NAME};
pub use formatter::{format_json, format_summary, format_tree, FormatOptions};
pub use listing::{list_dirs, list_files, DirListing, FileListing};
pub use meta::is_readable;
pub use node::DirectoryNode;
pub use options::{
    normalize_ext, ScanOptions, DEFAULT_CACHE_EXPIRY_SECS, DEFAULT_EXCLUDE_DIRS,
    DEFAULT_EXCLUDE_EXTS, DEFAULT_EXCLUDE_FILES,
};
pub use size::format_bytes;
pub use state::{ScanState, Totals};
pub use walker::{DirectoryScanner, QuickScanResult, ScanResult};
