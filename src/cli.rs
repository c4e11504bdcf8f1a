use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

/// Sizewalk - directory size reports for backup packaging
#[derive(Parser, Debug)]
#[command(name = "sizewalk")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true, value_name = "PATH", env = "SIZEWALK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Scan a directory tree and report sizes
    Scan(ScanArgs),

    /// Compute the total size of a directory
    Quick(QuickArgs),

    /// List files or subdirectories of a directory
    Ls(LsArgs),

    /// Manage the aggregate size cache
    Cache(CacheArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Directory to scan
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Maximum depth to display
    #[arg(short = 'd', long, default_value = "3", value_name = "N")]
    pub display_depth: usize,

    /// Maximum depth to scan (overrides config)
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Show only the first N subdirectories per directory
    #[arg(short = 'n', long, default_value = "20", value_name = "N")]
    pub top: usize,

    /// Follow symbolic links
    #[arg(short = 'L', long)]
    pub follow_symlinks: bool,

    /// Do not apply any exclusion filters
    #[arg(long)]
    pub no_filters: bool,

    /// Show file and directory counts per node
    #[arg(long)]
    pub counts: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct QuickArgs {
    /// Directory to measure
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Maximum depth to scan (overrides config)
    #[arg(long, value_name = "N")]
    pub max_depth: Option<usize>,

    /// Follow symbolic links
    #[arg(short = 'L', long)]
    pub follow_symlinks: bool,

    /// Use the aggregate cache even if the config disables it
    #[arg(long, conflicts_with = "no_cache")]
    pub cache: bool,

    /// Bypass the aggregate cache
    #[arg(long)]
    pub no_cache: bool,
}

#[derive(Args, Debug)]
pub struct LsArgs {
    /// Directory to list
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Include hidden entries
    #[arg(short, long)]
    pub all: bool,

    /// List subdirectories instead of files
    #[arg(long)]
    pub dirs: bool,
}

#[derive(Args, Debug)]
pub struct CacheArgs {
    #[command(subcommand)]
    pub action: CacheAction,
}

#[derive(Subcommand, Debug)]
pub enum CacheAction {
    /// Remove one cached path, or the whole cache
    Clear {
        /// Directory whose entry should be removed
        path: Option<PathBuf>,
    },

    /// Print the cache document location
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_scan_command() {
        let cli = Cli::parse_from(["sizewalk", "scan", "/home", "--json", "-L"]);
        match cli.command {
            Command::Scan(args) => {
                assert_eq!(args.path, PathBuf::from("/home"));
                assert!(args.json);
                assert!(args.follow_symlinks);
                assert_eq!(args.max_depth, None);
            }
            _ => panic!("Expected Scan command"),
        }
    }

    #[test]
    fn parse_quick_with_options() {
        let cli = Cli::parse_from(["sizewalk", "quick", "--no-cache", "--max-depth", "2", "/srv"]);
        match cli.command {
            Command::Quick(args) => {
                assert!(args.no_cache);
                assert_eq!(args.max_depth, Some(2));
                assert_eq!(args.path, PathBuf::from("/srv"));
            }
            _ => panic!("Expected Quick command"),
        }
    }

    #[test]
    fn quick_cache_flags_conflict() {
        let result = Cli::try_parse_from(["sizewalk", "quick", "--cache", "--no-cache"]);
        assert!(result.is_err());
    }

    #[test]
    fn parse_cache_clear_path() {
        let cli = Cli::parse_from(["sizewalk", "cache", "clear", "/srv/www"]);
        match cli.command {
            Command::Cache(CacheArgs {
                action: CacheAction::Clear { path },
            }) => assert_eq!(path, Some(PathBuf::from("/srv/www"))),
            _ => panic!("Expected cache clear"),
        }
    }

    #[test]
    fn global_verbose_flag() {
        let cli = Cli::parse_from(["sizewalk", "-vvv", "scan"]);
        assert_eq!(cli.verbose, 3);
    }
}
