//! logfacade - a small process logging facade
//!
//! This crate provides one shared logger for an application:
//! - Configuration of verbosity and an optional log file via [`Logger::setup`]
//! - Leveled logging (trace → panic), plain and formatted
//! - Structured fields via [`Logger::with_fields`]
//! - An `io::Write` adapter ([`Logger::writer`]) for redirecting text output
//! - Console output is always kept; a configured file receives a copy
//!
//! Lines are rendered as plain text, no colors:
//!
//! ```text
//! time="2026-10-18T09:12:44+00:00" level=info msg=login user=alice
//! ```
//!
//! # Usage
//!
//! ```
//! use logfacade::{Config, Logger};
//!
//! let logger = Logger::new();
//! logger.setup(&Config::new("", "warn")).unwrap();
//! logger.warn("disk almost full");
//! logger.info("not shown");
//! ```

pub mod config;
pub mod errors;
pub mod fields;
pub mod format;
pub mod global;
pub mod level;
pub mod logger;
pub mod macros;
pub mod sink;
pub mod test_capture;
pub mod writer;

// Re-export commonly used types
pub use config::Config;
pub use errors::{LogError, LogErrorKind, Result};
pub use fields::Fields;
pub use format::TextFormat;
pub use global::{global, init_global};
pub use level::Level;
pub use logger::{Entry, ExitHandler, Logger, LoggerBuilder};
pub use sink::{Console, Destination, FanOut};
pub use test_capture::CaptureBuffer;
pub use writer::LogWriter;
