use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using LogError
pub type Result<T> = std::result::Result<T, LogError>;

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that callers can match on without
/// depending on the wording of the error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogErrorKind {
    /// The configured level string is not a recognised level name
    InvalidLevel,
    /// The log file could not be opened or read
    Io,
    /// The configuration document could not be parsed
    Config,
    /// A global tracing subscriber is already installed
    AlreadyInstalled,
}

impl LogErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            LogErrorKind::InvalidLevel => "ERR_INVALID_LEVEL",
            LogErrorKind::Io => "ERR_IO",
            LogErrorKind::Config => "ERR_CONFIG",
            LogErrorKind::AlreadyInstalled => "ERR_ALREADY_INSTALLED",
        }
    }
}

/// Errors surfaced by logger configuration
///
/// Emission never produces one of these; only `setup`, config loading and
/// global installation do.
#[derive(Error, Debug)]
pub enum LogError {
    /// Level string did not match any known level
    #[error("invalid log level: {level:?}")]
    InvalidLevel { level: String },

    /// Opening or reading a file failed; the OS error is kept as the source
    #[error("failed to open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Config document was malformed
    #[error("invalid logging config: {reason}")]
    Config { reason: String },

    /// `install_global_tracing` was called after a global default was set
    #[error("a global tracing subscriber is already installed")]
    AlreadyInstalled,
}

impl LogError {
    /// Get the error kind
    pub fn kind(&self) -> LogErrorKind {
        match self {
            LogError::InvalidLevel { .. } => LogErrorKind::InvalidLevel,
            LogError::Io { .. } => LogErrorKind::Io,
            LogError::Config { .. } => LogErrorKind::Config,
            LogError::AlreadyInstalled => LogErrorKind::AlreadyInstalled,
        }
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind().code()
    }

    /// The underlying OS error, for `Io` failures
    pub fn io_error(&self) -> Option<&std::io::Error> {
        match self {
            LogError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Create an IO error bound to the file it concerns
pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> LogError {
    LogError::Io {
        path: path.into(),
        source,
    }
}
