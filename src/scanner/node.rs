use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One directory in a tree scan, with totals for everything counted beneath it.
///
/// Serialized field names (`size`, `files`, `dirs`) are the ones consumers of
/// the `directory_tree` document read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryNode {
    /// Full path to the directory
    pub path: PathBuf,

    /// Sum of counted file sizes in this directory and all descendants
    #[serde(rename = "size")]
    pub size_bytes: u64,

    /// Number of counted files (recursive)
    #[serde(rename = "files")]
    pub file_count: u64,

    /// Number of scanned subdirectories (recursive, excluding this one)
    #[serde(rename = "dirs")]
    pub dir_count: u64,

    /// Scanned subdirectories in traversal order
    pub children: Vec<DirectoryNode>,
}

impl DirectoryNode {
    /// Create an empty node for `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            size_bytes: 0,
            file_count: 0,
            dir_count: 0,
            children: Vec::new(),
        }
    }

    /// Last path component, or the full path for `/`
    pub fn name(&self) -> String {
        name_of(&self.path)
    }

    /// Count a file found directly in this directory
    pub fn add_file(&mut self, size: u64) {
        self.size_bytes += size;
        self.file_count += 1;
    }

    /// Fold a finished child subtree into this node and keep it as a child
    pub fn add_child(&mut self, child: DirectoryNode) {
        self.size_bytes += child.size_bytes;
        self.file_count += child.file_count;
        self.dir_count += child.dir_count + 1;
        self.children.push(child);
    }

    /// Sum of the sizes of files counted directly in this directory
    pub fn own_size(&self) -> u64 {
        self.size_bytes - self.children.iter().map(|c| c.size_bytes).sum::<u64>()
    }

    /// Find a descendant (or self) by path
    pub fn find(&self, path: &Path) -> Option<&DirectoryNode> {
        if self.path == path {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(path))
    }
}

pub(crate) fn name_of(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
