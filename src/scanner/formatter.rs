use serde::Serialize;

use crate::error::Result;

use super::node::DirectoryNode;
use super::size::format_bytes;
use super::walker::ScanResult;

/// Format options for tree output
#[derive(Debug, Clone)]
pub struct FormatOptions {
    /// Maximum depth to display
    pub max_depth: Option<usize>,
    /// Show only the first N children per directory
    pub top_n: Option<usize>,
    /// Show file counts
    pub show_counts: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            max_depth: Some(3),
            top_n: Some(20),
            show_counts: false,
        }
    }
}

impl FormatOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_top_n(mut self, n: usize) -> Self {
        self.top_n = Some(n);
        self
    }

    pub fn with_counts(mut self, show: bool) -> Self {
        self.show_counts = show;
        self
    }

    pub fn unlimited() -> Self {
        Self {
            max_depth: None,
            top_n: None,
            show_counts: false,
        }
    }
}

/// Format a directory tree as indented text
pub fn format_tree(node: &DirectoryNode, options: &FormatOptions) -> String {
    let mut output = String::new();
    format_tree_recursive(node, &mut output, "", true, 0, options);
    output
}

fn format_tree_recursive(
    node: &DirectoryNode,
    output: &mut String,
    prefix: &str,
    is_last: bool,
    depth: usize,
    options: &FormatOptions,
) {
    if let Some(max_depth) = options.max_depth {
        if depth > max_depth {
            return;
        }
    }

    let connector = if depth == 0 {
        ""
    } else if is_last {
        "└── "
    } else {
        "├── "
    };

    let count_str = if options.show_counts {
        format!(" ({} files, {} dirs)", node.file_count, node.dir_count)
    } else {
        String::new()
    };

    output.push_str(&format!(
        "{}{}{:>10}  {}/{}\n",
        prefix,
        connector,
        format_bytes(node.size_bytes),
        node.name(),
        count_str
    ));

    if node.children.is_empty() {
        return;
    }

    let new_prefix = if depth == 0 {
        String::new()
    } else if is_last {
        format!("{}    ", prefix)
    } else {
        format!("{}│   ", prefix)
    };

    let shown = options
        .top_n
        .map_or(node.children.len(), |n| n.min(node.children.len()));
    let has_more = shown < node.children.len();

    for (i, child) in node.children.iter().take(shown).enumerate() {
        let is_last_child = i + 1 == shown && !has_more;
        format_tree_recursive(child, output, &new_prefix, is_last_child, depth + 1, options);
    }

    if has_more {
        output.push_str(&format!(
            "{}└── ... and {} more entries\n",
            new_prefix,
            node.children.len() - shown
        ));
    }
}

/// One-line summary of a tree scan
pub fn format_summary(result: &ScanResult) -> String {
    let mut summary = format!(
        "Total: {} in {} files, {} directories ({:.4}s)",
        result.total_size_formatted, result.total_files, result.total_dirs, result.scan_time
    );

    if !result.symbolic_links.is_empty() {
        summary.push_str(&format!("\nSymbolic links: {}", result.symbolic_links.len()));
    }
    if !result.unreadable_items.is_empty() {
        summary.push_str(&format!("\nUnreadable: {}", result.unreadable_items.len()));
        for item in &result.unreadable_items {
            summary.push_str(&format!("\n  {}", item.display()));
        }
    }

    summary
}

/// Serialize any report as JSON
pub fn format_json<T: Serialize>(value: &T, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(json)
}
