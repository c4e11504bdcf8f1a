//! Sizewalk - directory size reports for backup packaging
//!
//! This crate provides:
//! - A recursive directory scanner producing a size/count tree
//! - A quick aggregate-size scan backed by a persisted cache
//! - Shallow file and directory listings

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod scanner;

// Re-export commonly used types
pub use config::Config;
pub use error::{Result, ScanError};
pub use scanner::{DirectoryScanner, ScanOptions};
