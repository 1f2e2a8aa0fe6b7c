//! Process-wide default logger
//!
//! Prefer building a [`Logger`] at the application's composition root and
//! passing clones around. These free functions serve code that has no logger
//! handle; they all act on one lazily created instance (level `info`,
//! standard error) unless [`init_global`] installed another first.

use crate::config::Config;
use crate::errors::Result;
use crate::fields::Fields;
use crate::logger::{Entry, Logger};
use crate::writer::LogWriter;
use std::fmt;
use std::sync::OnceLock;

static GLOBAL: OnceLock<Logger> = OnceLock::new();

/// The process-wide logger, created on first use
pub fn global() -> &'static Logger {
    GLOBAL.get_or_init(Logger::new)
}

/// Install `logger` as the process-wide logger
///
/// Only possible before anything has touched [`global`]; otherwise the
/// logger is handed back.
pub fn init_global(logger: Logger) -> std::result::Result<(), Logger> {
    GLOBAL.set(logger)
}

/// Configure the process-wide logger
///
/// # Errors
///
/// See [`Logger::setup`].
pub fn setup(config: &Config) -> Result<()> {
    global().setup(config)
}

pub fn trace(message: impl AsRef<str>) {
    global().trace(message);
}

pub fn tracef(args: fmt::Arguments<'_>) {
    global().tracef(args);
}

pub fn debug(message: impl AsRef<str>) {
    global().debug(message);
}

pub fn debugf(args: fmt::Arguments<'_>) {
    global().debugf(args);
}

pub fn info(message: impl AsRef<str>) {
    global().info(message);
}

pub fn infof(args: fmt::Arguments<'_>) {
    global().infof(args);
}

pub fn warn(message: impl AsRef<str>) {
    global().warn(message);
}

pub fn warnf(args: fmt::Arguments<'_>) {
    global().warnf(args);
}

pub fn error(message: impl AsRef<str>) {
    global().error(message);
}

pub fn errorf(args: fmt::Arguments<'_>) {
    global().errorf(args);
}

/// Log at `fatal` level, then exit with status 1
pub fn fatal(message: impl AsRef<str>) {
    global().fatal(message);
}

pub fn fatalf(args: fmt::Arguments<'_>) {
    global().fatalf(args);
}

pub fn with_fields(fields: Fields) -> Entry {
    global().with_fields(fields)
}

/// Writer into the process-wide logger at `info`
pub fn writer() -> LogWriter {
    global().writer()
}
