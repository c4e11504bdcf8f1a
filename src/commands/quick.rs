//! Quick scan command implementation

use crate::cli::QuickArgs;
use crate::config::Config;
use crate::error::Result;
use crate::scanner::{format_json, DirectoryScanner};

/// Run the quick command
pub fn run(args: QuickArgs, config: &Config) -> Result<()> {
    let use_cache = (config.cache.enabled || args.cache) && !args.no_cache;

    let mut options = config
        .scan_options()
        .with_cache(use_cache, config.cache.expiry_seconds);
    if let Some(depth) = args.max_depth {
        options = options.with_max_depth(Some(depth));
    }
    if args.follow_symlinks {
        options = options.with_follow_symlinks(true);
    }

    let mut scanner = DirectoryScanner::new(options);
    if use_cache {
        scanner = scanner.with_cache(config.size_cache()?);
    }

    let result = scanner.quick_scan(&args.path)?;
    tracing::debug!(
        files = result.state.total_files,
        dirs = result.state.total_dirs,
        entries_read = result.state.entries_read,
        "Quick scan counters"
    );

    println!("{}", format_json(&result, true)?);

    Ok(())
}
