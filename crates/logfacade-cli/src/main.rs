//! logfacade CLI
//!
//! Command-line front end for the process logger: configure it from a JSON
//! file, then emit entries or pipe a stream through it.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "logfacade")]
#[command(about = "logfacade - Leveled process logging", long_about = None)]
struct Cli {
    /// JSON config file with a `logging` section
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Emit a single log entry
    Emit(commands::emit::EmitArgs),
    /// Log every line read from standard input
    Pipe(commands::pipe::PipeArgs),
}

fn main() {
    let cli = Cli::parse();

    let result = commands::configure(cli.config.as_deref()).and_then(|()| match cli.command {
        Commands::Emit(args) => commands::emit::execute(args),
        Commands::Pipe(args) => commands::pipe::execute(args),
    });

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
