use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use walkdir::WalkDir;

use super::meta::{is_readable, modified_secs};

/// A file found by [`list_files`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileListing {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    /// Modification time, unix seconds
    pub modified: u64,
    pub is_link: bool,
}

/// A directory found by [`list_dirs`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DirListing {
    pub name: String,
    pub path: PathBuf,
    /// Modification time, unix seconds
    pub modified: u64,
    pub is_link: bool,
}

/// Files directly inside `path`, sorted by name.
///
/// Symlinks are classified by their target. An unreadable or missing `path`
/// yields an empty list.
pub fn list_files(path: &Path, include_hidden: bool) -> Vec<FileListing> {
    shallow_entries(path, include_hidden)
        .filter_map(|(name, entry_path, is_link)| {
            let meta = fs::metadata(&entry_path).ok()?;
            if !meta.is_file() {
                return None;
            }
            Some(FileListing {
                name,
                size: meta.len(),
                modified: modified_secs(&meta),
                path: entry_path,
                is_link,
            })
        })
        .collect()
}

/// Subdirectories directly inside `path`, sorted by name.
///
/// Same policy as [`list_files`].
pub fn list_dirs(path: &Path, include_hidden: bool) -> Vec<DirListing> {
    shallow_entries(path, include_hidden)
        .filter_map(|(name, entry_path, is_link)| {
            let meta = fs::metadata(&entry_path).ok()?;
            if !meta.is_dir() {
                return None;
            }
            Some(DirListing {
                name,
                modified: modified_secs(&meta),
                path: entry_path,
                is_link,
            })
        })
        .collect()
}

/// `(name, path, is_link)` for each visible entry one level below `path`
fn shallow_entries(
    path: &Path,
    include_hidden: bool,
) -> impl Iterator<Item = (String, PathBuf, bool)> {
    let readable = path.is_dir() && is_readable(path);
    if !readable {
        tracing::debug!(path = %path.display(), "Listing skipped, path not a readable directory");
    }

    WalkDir::new(path)
        .min_depth(1)
        .max_depth(1)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .take_while(move |_| readable)
        .filter_map(|result| result.ok())
        .filter_map(move |entry| {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !include_hidden && name.starts_with('.') {
                return None;
            }
            Some((name, entry.path().to_path_buf(), entry.path_is_symlink()))
        })
}
