//! Shallow listing command implementation

use crate::cli::LsArgs;
use crate::error::Result;
use crate::scanner::{format_json, list_dirs, list_files};

/// Run the ls command
pub fn run(args: LsArgs) -> Result<()> {
    let output = if args.dirs {
        format_json(&list_dirs(&args.path, args.all), true)?
    } else {
        format_json(&list_files(&args.path, args.all), true)?
    };

    println!("{}", output);

    Ok(())
}
