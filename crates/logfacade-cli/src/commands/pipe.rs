//! Pipe command
//!
//! Usage: logfacade pipe [--level <LEVEL>] < input

use clap::Args;
use logfacade::{global, Level};
use std::io::{self, Write};

#[derive(Debug, Args)]
pub struct PipeArgs {
    /// Level for every piped line
    #[arg(long, default_value = "info")]
    pub level: Level,
}

/// Execute pipe command
pub fn execute(args: PipeArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = global().writer_level(args.level);
    io::copy(&mut io::stdin().lock(), &mut writer)?;
    writer.flush()?;
    Ok(())
}
