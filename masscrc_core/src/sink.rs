//! Line-oriented output and error sinks.
//!
//! The pipeline emits three byte streams: result lines, error lines, and
//! debug notices. Each is a writer injected at wiring time so the CLI can
//! point them at stdout/stderr or files and tests can capture them in memory.

use log::warn;
use std::io::Write;
use std::sync::{Arc, Mutex};

/// Cloneable line writer shared between workers.
#[derive(Clone)]
pub struct LineSink {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl std::fmt::Debug for LineSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LineSink").finish_non_exhaustive()
    }
}

impl LineSink {
    pub fn from_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub fn stdout() -> Self {
        Self::from_writer(std::io::stdout())
    }

    pub fn stderr() -> Self {
        Self::from_writer(std::io::stderr())
    }

    /// In-memory sink plus a handle to read back what was written.
    pub fn memory() -> (Self, CaptureBuffer) {
        let capture = CaptureBuffer::default();
        (Self::from_writer(capture.clone()), capture)
    }

    /// Write one line, appending the trailing newline.
    ///
    /// A sink write failure must not take down the pipeline; it is logged and
    /// the line is dropped.
    pub fn write_line(&self, line: &str) {
        let mut writer = self.inner.lock().expect("sink mutex poisoned");
        if let Err(err) = writeln!(writer, "{line}") {
            warn!("failed to write output line: {err}");
        }
    }
}

/// Shared in-memory byte buffer for capturing sink output.
#[derive(Debug, Clone, Default)]
pub struct CaptureBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl CaptureBuffer {
    /// Captured contents as UTF-8.
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock().expect("capture mutex poisoned")).into_owned()
    }

    /// Captured contents split into lines.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.bytes
            .lock()
            .expect("capture mutex poisoned")
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_line_appends_newline() {
        let (sink, capture) = LineSink::memory();
        sink.write_line("abc 3 path");
        sink.write_line("def 4 other");

        assert_eq!(capture.contents(), "abc 3 path\ndef 4 other\n");
        assert_eq!(capture.lines(), vec!["abc 3 path", "def 4 other"]);
    }

    #[test]
    fn test_clones_share_the_writer() {
        let (sink, capture) = LineSink::memory();
        let other = sink.clone();
        sink.write_line("one");
        other.write_line("two");

        assert_eq!(capture.lines().len(), 2);
    }
}
