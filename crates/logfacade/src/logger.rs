//! The shared logger
//!
//! A [`Logger`] owns a minimum level and a [`Destination`]. Each enabled
//! entry is rendered with [`TextFormat`] and written to the destination as a
//! single line. Clones share all of it, so the composition root can build one
//! logger and hand clones to every component that needs it.
//!
//! # Usage
//!
//! ```
//! use logfacade::{Config, Logger};
//!
//! let logger = Logger::new();
//! logger.setup(&Config::with_level("debug")).unwrap();
//!
//! logger.info("server started");
//! logger.with_field("user", "alice").warn("password about to expire");
//! ```

use crate::config::Config;
use crate::errors::{io_error, LogError, Result};
use crate::fields::{render_fields, Fields};
use crate::format::TextFormat;
use crate::level::Level;
use crate::sink::{open_append, Console, Destination, FanOut};
use crate::writer::LogWriter;
use serde_json::Value;
use std::fmt;
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;
use tracing_subscriber::filter::filter_fn;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::Layer;

/// Called with the exit status after a fatal entry is written
pub type ExitHandler = Arc<dyn Fn(i32) + Send + Sync>;

/// Generates the plain and formatted method pair for each ordinary level
macro_rules! leveled_methods {
    ($($level:ident => $plain:ident, $formatted:ident;)*) => {
        $(
            #[doc = concat!("Log a message at `", stringify!($plain), "` level")]
            pub fn $plain(&self, message: impl AsRef<str>) {
                self.log(Level::$level, message);
            }

            #[doc = concat!("Log a formatted message at `", stringify!($plain), "` level")]
            pub fn $formatted(&self, args: fmt::Arguments<'_>) {
                self.logf(Level::$level, args);
            }
        )*
    };
}

/// Fatal and panic variants; these do not return normally
macro_rules! terminal_methods {
    () => {
        /// Log at `fatal` level, then exit the process with status 1
        ///
        /// The exit happens even when the threshold suppresses the line.
        pub fn fatal(&self, message: impl AsRef<str>) {
            self.log(Level::Fatal, message);
            self.exit(1);
        }

        /// Formatted variant of [`fatal`](Self::fatal)
        pub fn fatalf(&self, args: fmt::Arguments<'_>) {
            self.logf(Level::Fatal, args);
            self.exit(1);
        }

        /// Log at `panic` level, then panic with the message
        pub fn panic(&self, message: impl AsRef<str>) -> ! {
            let message = message.as_ref();
            self.log(Level::Panic, message);
            panic!("{}", message);
        }

        /// Formatted variant of [`panic`](Self::panic)
        pub fn panicf(&self, args: fmt::Arguments<'_>) -> ! {
            let message = args.to_string();
            self.log(Level::Panic, &message);
            panic!("{}", message);
        }
    };
}

struct Inner {
    level: AtomicU8,
    destination: Destination,
    console: Console,
    exit: ExitHandler,
    format: TextFormat,
}

/// Shared logger handle
///
/// Cheap to clone; every clone observes the same level and destination.
#[derive(Clone)]
pub struct Logger {
    inner: Arc<Inner>,
}

impl Logger {
    /// Unconfigured logger: level `info`, output to standard error
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    /// Apply a configuration
    ///
    /// The level is validated before anything changes; an unknown name leaves
    /// the logger untouched. The resolved level is applied before the log file
    /// is opened, so a file failure still leaves the new level in effect.
    /// An empty `filename` keeps whatever destination is already in place.
    ///
    /// # Errors
    ///
    /// - [`LogError::InvalidLevel`] if `level` is not a known level name
    /// - [`LogError::Io`] if the log file cannot be opened for appending
    pub fn setup(&self, config: &Config) -> Result<()> {
        let level = if config.level.is_empty() {
            Level::Info
        } else {
            config.level.parse::<Level>()?
        };
        self.set_level(level);

        if !config.filename.is_empty() {
            let path = Path::new(&config.filename);
            let file = open_append(path).map_err(|e| io_error(path, e))?;
            self.inner
                .destination
                .replace(FanOut::new(vec![self.inner.console.sink(), Box::new(file)]));
        }
        Ok(())
    }

    /// Current minimum level
    pub fn level(&self) -> Level {
        Level::from_u8(self.inner.level.load(Ordering::Acquire))
    }

    /// Replace the minimum level
    ///
    /// Takes effect for every later entry, including native `tracing` events
    /// once [`install_global_tracing`](Self::install_global_tracing) has run.
    pub fn set_level(&self, level: Level) {
        self.inner.level.store(level as u8, Ordering::Release);
    }

    /// True when entries at `level` would be written
    #[inline]
    pub fn is_enabled(&self, level: Level) -> bool {
        level.is_enabled_at(self.level())
    }

    /// Number of sinks currently receiving output (1 = console only)
    pub fn sink_count(&self) -> usize {
        self.inner.destination.sink_count()
    }

    /// Entry pre-populated with `fields`; emits nothing until a level method is called
    pub fn with_fields(&self, fields: Fields) -> Entry {
        Entry {
            logger: self.clone(),
            fields,
        }
    }

    /// Entry with a single field
    pub fn with_field(&self, key: impl Into<String>, value: impl Into<Value>) -> Entry {
        self.with_fields(Fields::new()).with_field(key, value)
    }

    /// Log `message` at `level`
    pub fn log(&self, level: Level, message: impl AsRef<str>) {
        self.emit(level, message.as_ref(), &Fields::new());
    }

    /// Log pre-formatted arguments at `level`; formatting is skipped when disabled
    pub fn logf(&self, level: Level, args: fmt::Arguments<'_>) {
        if self.is_enabled(level) {
            self.emit_args(level, args, &Fields::new());
        }
    }

    leveled_methods! {
        Trace => trace, tracef;
        Debug => debug, debugf;
        Info => info, infof;
        Warn => warn, warnf;
        Error => error, errorf;
    }

    terminal_methods!();

    /// Writer whose lines are logged at `info`
    pub fn writer(&self) -> LogWriter {
        self.writer_level(Level::Info)
    }

    /// Writer whose lines are logged at `level`
    pub fn writer_level(&self, level: Level) -> LogWriter {
        LogWriter::new(self.clone(), level)
    }

    /// Route every `tracing` event in the process through this logger
    ///
    /// Native events are filtered by this logger's level at the time they
    /// fire and rendered in the same line format to the same destination.
    ///
    /// # Errors
    ///
    /// Returns [`LogError::AlreadyInstalled`] if a global default subscriber
    /// has already been set.
    pub fn install_global_tracing(&self) -> Result<()> {
        let logger = self.clone();
        let layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .event_format(self.inner.format)
            .with_writer(self.inner.destination.clone())
            .with_filter(filter_fn(move |metadata| {
                logger.is_enabled(Level::from_tracing(metadata.level()))
            }));

        tracing::subscriber::set_global_default(tracing_subscriber::registry().with(layer))
            .map_err(|_| LogError::AlreadyInstalled)
    }

    /// Flush every sink of the current destination
    pub fn flush(&self) {
        let _ = self.inner.destination.flush();
    }

    fn exit(&self, code: i32) {
        self.flush();
        (self.inner.exit)(code);
    }

    fn emit(&self, level: Level, message: &str, fields: &Fields) {
        if !self.is_enabled(level) {
            return;
        }
        let line = self.inner.format.render(level, message, &render_fields(fields));
        self.inner.destination.write_line(line.as_bytes());
    }

    fn emit_args(&self, level: Level, args: fmt::Arguments<'_>, fields: &Fields) {
        match args.as_str() {
            Some(message) => self.emit(level, message, fields),
            None => self.emit(level, &args.to_string(), fields),
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("level", &self.level())
            .field("sinks", &self.sink_count())
            .finish()
    }
}

/// Builder for a [`Logger`]
pub struct LoggerBuilder {
    level: Level,
    console: Console,
    exit: ExitHandler,
    format: TextFormat,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self {
            level: Level::Info,
            console: Console::stderr(),
            exit: Arc::new(|code| std::process::exit(code)),
            format: TextFormat::new(),
        }
    }
}

impl LoggerBuilder {
    /// Initial minimum level (default `info`)
    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Replace standard error as the console sink
    pub fn console<W>(mut self, writer: W) -> Self
    where
        W: Write + Clone + Send + Sync + 'static,
    {
        self.console = Console::from_writer(writer);
        self
    }

    /// Replace `std::process::exit` as the fatal exit path
    pub fn exit_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(i32) + Send + Sync + 'static,
    {
        self.exit = Arc::new(handler);
        self
    }

    /// Leave out the `time=` column (useful for exact-match tests)
    pub fn without_timestamp(mut self) -> Self {
        self.format = self.format.without_timestamp();
        self
    }

    pub fn build(self) -> Logger {
        Logger {
            inner: Arc::new(Inner {
                level: AtomicU8::new(self.level as u8),
                destination: Destination::new(FanOut::single(self.console.sink())),
                console: self.console,
                exit: self.exit,
                format: self.format,
            }),
        }
    }
}

/// Log entry carrying structured fields
///
/// Built by [`Logger::with_fields`] / [`Logger::with_field`]; the fields are
/// rendered as `key=value` after the message.
#[derive(Clone, Debug)]
pub struct Entry {
    logger: Logger,
    fields: Fields,
}

impl Entry {
    /// Add one field, replacing any previous value for `key`
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Merge `fields` into this entry
    pub fn with_fields(mut self, fields: Fields) -> Self {
        self.fields.extend(fields);
        self
    }

    pub fn fields(&self) -> &Fields {
        &self.fields
    }

    /// Log `message` at `level` with this entry's fields
    pub fn log(&self, level: Level, message: impl AsRef<str>) {
        self.logger.emit(level, message.as_ref(), &self.fields);
    }

    /// Formatted variant of [`log`](Self::log)
    pub fn logf(&self, level: Level, args: fmt::Arguments<'_>) {
        if self.logger.is_enabled(level) {
            self.logger.emit_args(level, args, &self.fields);
        }
    }

    leveled_methods! {
        Trace => trace, tracef;
        Debug => debug, debugf;
        Info => info, infof;
        Warn => warn, warnf;
        Error => error, errorf;
    }

    terminal_methods!();

    fn exit(&self, code: i32) {
        self.logger.exit(code);
    }
}
