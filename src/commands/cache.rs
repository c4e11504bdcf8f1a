//! Cache maintenance command implementation

use crate::cli::{CacheAction, CacheArgs};
use crate::config::Config;
use crate::error::Result;

/// Run the cache command
pub fn run(args: CacheArgs, config: &Config) -> Result<()> {
    let cache = config.size_cache()?;

    match args.action {
        CacheAction::Clear { path: None } => {
            cache.clear_cache(None)?;
            println!("Cleared cache {}", cache.file_path().display());
        }
        CacheAction::Clear { path: Some(path) } => {
            // Entries are keyed by canonical path
            let key = path.canonicalize().unwrap_or(path);
            if cache.remove(&key)? {
                println!("Removed {}", key.display());
            } else {
                println!("No cache entry for {}", key.display());
            }
        }
        CacheAction::Path => println!("{}", cache.file_path().display()),
    }

    Ok(())
}
