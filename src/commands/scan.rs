//! Scan command implementation

use crate::cli::ScanArgs;
use crate::config::Config;
use crate::error::Result;
use crate::scanner::{
    format_json, format_summary, format_tree, DirectoryScanner, FormatOptions, ScanOptions,
};

/// Scan options for this invocation: config values overridden by flags
pub fn scan_options(args: &ScanArgs, config: &Config) -> ScanOptions {
    let mut options = config.scan_options();
    if args.no_filters {
        options = options.without_filters();
    }

    if let Some(depth) = args.max_depth {
        options = options.with_max_depth(Some(depth));
    }
    if args.follow_symlinks {
        options = options.with_follow_symlinks(true);
    }

    // Tree scans never consult the aggregate cache
    options.with_cache(false, config.cache.expiry_seconds)
}

/// Run the scan command
pub fn run(args: ScanArgs, config: &Config) -> Result<()> {
    let scanner = DirectoryScanner::new(scan_options(&args, config));

    tracing::info!(path = %args.path.display(), "Scanning directory");

    let result = scanner.scan(&args.path)?;

    if args.json {
        println!("{}", format_json(&result, true)?);
        return Ok(());
    }

    let format_options = FormatOptions::new()
        .with_max_depth(args.display_depth)
        .with_top_n(args.top)
        .with_counts(args.counts);

    println!("{}", format_tree(&result.directory_tree, &format_options));
    println!("{}", format_summary(&result));

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Command};
    use clap::Parser;

    fn scan_args(argv: &[&str]) -> ScanArgs {
        match Cli::parse_from(argv).command {
            Command::Scan(args) => args,
            _ => panic!("Expected Scan command"),
        }
    }

    #[test]
    fn test_flags_override_config() {
        let args = scan_args(&["sizewalk", "scan", "--max-depth", "1", "-L"]);
        let options = scan_options(&args, &Config::default());

        assert_eq!(options.max_depth, Some(1));
        assert!(options.follow_symlinks);
        assert!(!options.use_cache);
        assert!(options.exclude_dirs.contains("node_modules"));
    }

    #[test]
    fn test_no_filters_clears_exclusions() {
        let args = scan_args(&["sizewalk", "scan", "--no-filters"]);
        let options = scan_options(&args, &Config::default());

        assert!(options.exclude_dirs.is_empty());
        assert!(options.exclude_exts.is_empty());
        assert!(options.exclude_files.is_empty());
    }

    #[test]
    fn test_no_filters_keeps_configured_traversal() {
        let mut config = Config::default();
        config.scanner.max_depth = Some(2);
        config.scanner.strict_cycle_guard = true;
        config.scanner.follow_symlinks = true;
        let args = scan_args(&["sizewalk", "scan", "--no-filters"]);
        let options = scan_options(&args, &config);

        assert!(options.exclude_dirs.is_empty());
        assert_eq!(options.max_depth, Some(2));
        assert!(options.strict_cycle_guard);
        assert!(options.follow_symlinks);
    }

    #[test]
    fn test_cache_never_used_for_tree_scans() {
        let mut config = Config::default();
        config.cache.enabled = true;
        let args = scan_args(&["sizewalk", "scan"]);

        assert!(!scan_options(&args, &config).use_cache);
    }
}
