//! Output destinations
//!
//! A [`FanOut`] duplicates every write to an ordered list of sinks. The
//! logger's [`Destination`] is a shared, swappable `FanOut` guarded by a mutex;
//! each rendered line is written while holding the lock, so lines from
//! concurrent callers never interleave.

use std::fmt;
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing_subscriber::fmt::MakeWriter;

/// A boxed byte sink
pub type Sink = Box<dyn Write + Send>;

/// Writes each buffer to every sink, in order
///
/// A failing sink does not stop the others. `write` only reports an error
/// when no sink accepted the buffer.
#[derive(Default)]
pub struct FanOut {
    sinks: Vec<Sink>,
}

impl FanOut {
    pub fn new(sinks: Vec<Sink>) -> Self {
        Self { sinks }
    }

    pub fn single(sink: Sink) -> Self {
        Self { sinks: vec![sink] }
    }

    pub fn push(&mut self, sink: Sink) {
        self.sinks.push(sink);
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl fmt::Debug for FanOut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FanOut")
            .field("sinks", &self.sinks.len())
            .finish()
    }
}

impl Write for FanOut {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut first_err = None;
        let mut delivered = self.sinks.is_empty();

        for sink in &mut self.sinks {
            match sink.write_all(buf) {
                Ok(()) => delivered = true,
                Err(e) => {
                    first_err.get_or_insert(e);
                }
            }
        }

        match first_err {
            Some(e) if !delivered => Err(e),
            _ => Ok(buf.len()),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut first_err = None;
        for sink in &mut self.sinks {
            if let Err(e) = sink.flush() {
                first_err.get_or_insert(e);
            }
        }
        first_err.map_or(Ok(()), Err)
    }
}

/// Shared, swappable destination the logger renders into
#[derive(Clone, Debug, Default)]
pub struct Destination {
    inner: Arc<Mutex<FanOut>>,
}

impl Destination {
    pub fn new(fan_out: FanOut) -> Self {
        Self {
            inner: Arc::new(Mutex::new(fan_out)),
        }
    }

    /// Swap in a new fan-out, returning the previous one
    pub fn replace(&self, fan_out: FanOut) -> FanOut {
        std::mem::replace(&mut *self.lock(), fan_out)
    }

    /// Number of sinks currently receiving output
    pub fn sink_count(&self) -> usize {
        self.lock().len()
    }

    /// Write one complete line to every sink under the lock
    ///
    /// Sink failures are dropped; a line is never reported as an error.
    pub fn write_line(&self, line: &[u8]) {
        let _ = self.lock().write_all(line);
    }

    /// Flush every sink; errors are reported but the lock is always released
    pub fn flush(&self) -> io::Result<()> {
        self.lock().flush()
    }

    fn lock(&self) -> MutexGuard<'_, FanOut> {
        // A panic mid-write leaves the sinks usable; keep logging.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Writer handed to the formatter; holds the destination lock until dropped
pub struct DestinationWriter<'a> {
    guard: MutexGuard<'a, FanOut>,
}

impl Write for DestinationWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.guard.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.guard.flush()
    }
}

impl<'a> MakeWriter<'a> for Destination {
    type Writer = DestinationWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        DestinationWriter { guard: self.lock() }
    }
}

/// Factory for the console sink
///
/// Standard error by default. Setup asks for a fresh console handle each time
/// it builds a file fan-out, so the console is never dropped from the output.
#[derive(Clone)]
pub struct Console {
    make: Arc<dyn Fn() -> Sink + Send + Sync>,
}

impl Console {
    pub fn stderr() -> Self {
        Self {
            make: Arc::new(|| Box::new(io::stderr())),
        }
    }

    /// Use a cloneable writer as the console, e.g. a capture buffer in tests
    pub fn from_writer<W>(writer: W) -> Self
    where
        W: Write + Clone + Send + Sync + 'static,
    {
        Self {
            make: Arc::new(move || Box::new(writer.clone())),
        }
    }

    pub fn sink(&self) -> Sink {
        (self.make)()
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::stderr()
    }
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Console")
    }
}

/// Open a log file for appending, creating it (0644 on unix) if absent
pub fn open_append(path: &Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.create(true).append(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }
    options.open(path)
}
