use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{CacheError, ConfigError};
use crate::scanner::{
    normalize_ext, ScanOptions, SizeCache, DEFAULT_CACHE_EXPIRY_SECS, DEFAULT_EXCLUDE_DIRS,
    DEFAULT_EXCLUDE_EXTS, DEFAULT_EXCLUDE_FILES,
};

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub scanner: ScannerConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Directory names to skip
    pub exclude_dirs: Vec<String>,
    /// File extensions to skip (case-insensitive)
    pub exclude_exts: Vec<String>,
    /// Exact file names to skip
    pub exclude_files: Vec<String>,
    /// Follow symbolic links
    pub follow_symlinks: bool,
    /// Maximum recursion depth (absent = unlimited)
    pub max_depth: Option<usize>,
    /// Refuse to re-enter a directory through a followed symlink
    pub strict_cycle_guard: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Use the aggregate cache for quick scans
    pub enabled: bool,
    /// Entry lifetime in seconds
    pub expiry_seconds: u64,
    /// Directory holding the cache document (default: user cache dir)
    pub directory: Option<PathBuf>,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            exclude_dirs: to_strings(DEFAULT_EXCLUDE_DIRS),
            exclude_exts: to_strings(DEFAULT_EXCLUDE_EXTS),
            exclude_files: to_strings(DEFAULT_EXCLUDE_FILES),
            follow_symlinks: false,
            max_depth: None,
            strict_cycle_guard: false,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            expiry_seconds: DEFAULT_CACHE_EXPIRY_SECS,
            directory: None,
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// An explicit path must exist and parse. Without one, the per-user config
    /// file is read when present, otherwise defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(p) => p,
                None => return Ok(Self::default()),
            },
        };

        let content = fs::read_to_string(&path).map_err(|source| ConfigError::ReadError {
            path: path.clone(),
            source,
        })?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ParseError {
                path: path.clone(),
                source,
            })?;

        config.validate()?;
        tracing::debug!(path = %path.display(), "Loaded config file");

        Ok(config)
    }

    /// `$XDG_CONFIG_HOME/sizewalk/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("sizewalk").join("config.toml"))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cache.enabled && self.cache.expiry_seconds == 0 {
            return Err(ConfigError::Invalid(
                "cache.expiry_seconds must be positive when the cache is enabled".into(),
            ));
        }

        if self
            .scanner
            .exclude_exts
            .iter()
            .any(|ext| normalize_ext(ext).is_empty())
        {
            return Err(ConfigError::Invalid(
                "scanner.exclude_exts must not contain empty extensions".into(),
            ));
        }

        Ok(())
    }

    /// Scan options described by this configuration
    pub fn scan_options(&self) -> ScanOptions {
        ScanOptions::new()
            .with_exclude_dirs(self.scanner.exclude_dirs.iter().cloned())
            .with_exclude_exts(&self.scanner.exclude_exts)
            .with_exclude_files(self.scanner.exclude_files.iter().cloned())
            .with_follow_symlinks(self.scanner.follow_symlinks)
            .with_max_depth(self.scanner.max_depth)
            .with_strict_cycle_guard(self.scanner.strict_cycle_guard)
            .with_cache(self.cache.enabled, self.cache.expiry_seconds)
    }

    /// Cache handle at the configured or default location
    pub fn size_cache(&self) -> Result<SizeCache, CacheError> {
        match &self.cache.directory {
            Some(dir) => Ok(SizeCache::in_dir(dir, self.cache.expiry_seconds)),
            None => SizeCache::default_location(self.cache.expiry_seconds),
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert!(!config.cache.enabled);
        assert_eq!(config.cache.expiry_seconds, 1800);
    }

    #[test]
    fn config_serializes_to_toml() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[scanner]"));
        assert!(toml_str.contains("[cache]"));
    }

    #[test]
    fn default_scan_options_match_config_defaults() {
        let options = Config::default().scan_options();
        assert_eq!(options, ScanOptions::default());
    }

    #[test]
    fn zero_expiry_rejected_when_enabled() {
        let mut config = Config::default();
        config.cache.enabled = true;
        config.cache.expiry_seconds = 0;
        assert!(config.validate().is_err());

        config.cache.enabled = false;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_extension_rejected() {
        let mut config = Config::default();
        config.scanner.exclude_exts.push(".".to_string());
        assert!(config.validate().is_err());
    }

    #[test]
    fn configured_cache_directory_is_used() {
        let mut config = Config::default();
        config.cache.directory = Some(PathBuf::from("/var/cache/backups"));
        let cache = config.size_cache().unwrap();
        assert_eq!(
            cache.file_path(),
            Path::new("/var/cache/backups/directory_sizes.json")
        );
    }
}
