//! Emit command
//!
//! Usage: logfacade emit [--level <LEVEL>] [--field KEY=VALUE]... <MESSAGE>...

use clap::Args;
use logfacade::{global, Fields, Level};
use serde_json::Value;

#[derive(Debug, Args)]
pub struct EmitArgs {
    /// Entry level (trace, debug, info, warn, error, fatal, panic)
    #[arg(long, default_value = "info")]
    pub level: Level,

    /// Structured field, repeatable
    #[arg(long = "field", value_name = "KEY=VALUE")]
    pub fields: Vec<String>,

    /// Message words, joined with spaces
    #[arg(required = true)]
    pub message: Vec<String>,
}

fn parse_field(raw: &str) -> Result<(String, Value), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), Value::from(value))),
        _ => Err(format!("field must be KEY=VALUE, got {:?}", raw)),
    }
}

/// Execute emit command
pub fn execute(args: EmitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let fields = args
        .fields
        .iter()
        .map(String::as_str)
        .map(parse_field)
        .collect::<Result<Fields, _>>()?;
    let entry = global::with_fields(fields);
    let message = args.message.join(" ");

    match args.level {
        Level::Fatal => entry.fatal(message),
        Level::Panic => entry.panic(message),
        level => entry.log(level, message),
    }
    Ok(())
}
