//! Subcommand implementations

pub mod cache;
pub mod ls;
pub mod quick;
pub mod scan;
