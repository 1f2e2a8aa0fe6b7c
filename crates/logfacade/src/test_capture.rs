//! In-memory capture sink for deterministic logging assertions
//!
//! Inject a [`CaptureBuffer`] as the console of a logger built with
//! [`LoggerBuilder::console`](crate::LoggerBuilder::console) and read back the
//! rendered lines.

use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// Cloneable byte sink; all clones share one buffer
#[derive(Clone, Debug, Default)]
pub struct CaptureBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded
    pub fn contents(&self) -> String {
        let bytes = self.bytes.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Captured output split into lines, terminators removed
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    /// Check if the captured output contains `text`
    pub fn contains(&self, text: &str) -> bool {
        self.contents().contains(text)
    }

    /// Drop everything captured so far
    pub fn clear(&self) {
        self.bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
