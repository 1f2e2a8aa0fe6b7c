//! `io::Write` adapter that turns text into log entries
//!
//! Lets code that only knows how to write to a stream (a child process's
//! output, a library's debug hook) send its text through the logger.

use crate::level::Level;
use crate::logger::Logger;
use std::fmt;
use std::io::{self, Write};

/// Longest line held back while waiting for a newline; longer input is split
pub const MAX_LINE: usize = 64 * 1024;

/// Writer that logs every complete line at a fixed level
///
/// Partial lines are held until the terminating newline arrives, until
/// [`MAX_LINE`] bytes have accumulated, or until the writer is flushed or
/// dropped. At `fatal` each line runs the exit handler and at `panic` each
/// line panics, as the matching logger methods do.
pub struct LogWriter {
    logger: Logger,
    level: Level,
    pending: Vec<u8>,
}

impl LogWriter {
    pub fn new(logger: Logger, level: Level) -> Self {
        Self {
            logger,
            level,
            pending: Vec::new(),
        }
    }

    pub fn level(&self) -> Level {
        self.level
    }

    fn emit_line(&self, line: &[u8]) {
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        let message = String::from_utf8_lossy(line);
        match self.level {
            Level::Fatal => self.logger.fatal(message),
            // Never start a second panic while unwinding through `drop`
            Level::Panic if !std::thread::panicking() => self.logger.panic(message),
            level => self.logger.log(level, message),
        }
    }

    fn emit_pending(&mut self) {
        if !self.pending.is_empty() {
            let pending = std::mem::take(&mut self.pending);
            self.emit_line(&pending);
        }
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        for segment in buf.split_inclusive(|&b| b == b'\n') {
            let (body, complete) = match segment.strip_suffix(b"\n") {
                Some(body) => (body, true),
                None => (segment, false),
            };
            self.pending.extend_from_slice(body);

            while self.pending.len() > MAX_LINE {
                let rest = self.pending.split_off(MAX_LINE);
                let line = std::mem::replace(&mut self.pending, rest);
                self.emit_line(&line);
            }
            if complete {
                let line = std::mem::take(&mut self.pending);
                self.emit_line(&line);
            }
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.emit_pending();
        self.logger.flush();
        Ok(())
    }
}

impl Drop for LogWriter {
    fn drop(&mut self) {
        self.emit_pending();
    }
}

impl fmt::Debug for LogWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogWriter")
            .field("level", &self.level)
            .field("pending", &self.pending.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_capture::CaptureBuffer;

    fn capture_logger() -> (Logger, CaptureBuffer) {
        let capture = CaptureBuffer::new();
        let logger = Logger::builder()
            .level(Level::Debug)
            .console(capture.clone())
            .without_timestamp()
            .build();
        (logger, capture)
    }

    #[test]
    fn test_each_line_becomes_an_entry() {
        let (logger, capture) = capture_logger();
        let mut writer = logger.writer();

        writer.write_all(b"first\nsecond\r\n").unwrap();

        assert_eq!(
            capture.lines(),
            vec!["level=info msg=first", "level=info msg=second"]
        );
    }

    #[test]
    fn test_line_split_across_writes() {
        let (logger, capture) = capture_logger();
        let mut writer = logger.writer_level(Level::Warn);

        writer.write_all(b"hel").unwrap();
        assert!(capture.contents().is_empty());
        writer.write_all(b"lo\n").unwrap();

        assert_eq!(capture.lines(), vec!["level=warning msg=hello"]);
    }

    #[test]
    fn test_flush_and_drop_emit_partial_line() {
        let (logger, capture) = capture_logger();

        let mut writer = logger.writer_level(Level::Debug);
        writer.write_all(b"no newline").unwrap();
        writer.flush().unwrap();
        writer.write_all(b"tail").unwrap();
        drop(writer);

        assert_eq!(
            capture.lines(),
            vec![r#"level=debug msg="no newline""#, "level=debug msg=tail"]
        );
    }

    #[test]
    fn test_overlong_line_is_split_at_cap() {
        let (logger, capture) = capture_logger();
        let mut writer = logger.writer();

        writer.write_all(&vec![b'a'; MAX_LINE]).unwrap();
        assert!(capture.contents().is_empty());
        writer.write_all(b"bb").unwrap();

        let lines = capture.lines();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0], format!("level=info msg={}", "a".repeat(MAX_LINE)));
        drop(writer);
        assert_eq!(capture.lines()[1], "level=info msg=bb");
    }

    #[test]
    fn test_fatal_writer_runs_exit_handler_per_line() {
        let capture = CaptureBuffer::new();
        let codes = std::sync::Arc::new(std::sync::Mutex::new(Vec::new()));
        let seen = codes.clone();
        let logger = Logger::builder()
            .console(capture.clone())
            .without_timestamp()
            .exit_handler(move |code| seen.lock().unwrap().push(code))
            .build();

        logger.writer_level(Level::Fatal).write_all(b"boom
").unwrap();

        assert_eq!(capture.lines(), vec!["level=fatal msg=boom"]);
        assert_eq!(*codes.lock().unwrap(), vec![1]);
    }

    #[test]
    #[should_panic(expected = "corrupt")]
    fn test_panic_writer_panics() {
        let (logger, _capture) = capture_logger();
        let _ = logger.writer_level(Level::Panic).write_all(b"corrupt
");
    }

    #[test]
    fn test_writer_respects_threshold() {
        let (logger, capture) = capture_logger();
        logger.set_level(Level::Error);

        writeln!(logger.writer(), "quiet").unwrap();

        assert!(capture.contents().is_empty());
    }
}
