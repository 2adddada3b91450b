//! Output sink handle
//!
//! A [`Sink`] is a cloneable handle to one writer. Every record is written
//! with a single `write_all` while the handle's lock is held, so concurrent
//! loggers sharing a sink never interleave partial lines.

use super::error::{LoggerError, Result};
use parking_lot::Mutex;
use std::fmt;
use std::io::{self, Write};
use std::sync::Arc;

#[derive(Clone)]
pub struct Sink {
    name: &'static str,
    writer: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Sink {
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self::named("writer", writer)
    }

    fn named<W: Write + Send + 'static>(name: &'static str, writer: W) -> Self {
        Self {
            name,
            writer: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    /// The process standard error stream (the baseline sink)
    pub fn stderr() -> Self {
        Self::named("stderr", io::stderr())
    }

    pub fn stdout() -> Self {
        Self::named("stdout", io::stdout())
    }

    pub fn name(&self) -> &str {
        self.name
    }

    /// Write one encoded record and flush it
    pub fn write_record(&self, bytes: &[u8]) -> Result<()> {
        let mut writer = self.writer.lock();
        writer
            .write_all(bytes)
            .map_err(|e| LoggerError::io_operation("writing record", self.name, e))?;
        writer
            .flush()
            .map_err(|e| LoggerError::io_operation("flushing record", self.name, e))?;
        Ok(())
    }

    pub fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }

    /// True when both handles write to the same underlying writer
    pub fn same_as(&self, other: &Sink) -> bool {
        Arc::ptr_eq(&self.writer, &other.writer)
    }
}

impl fmt::Debug for Sink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink").field("name", &self.name).finish()
    }
}

/// In-memory writer whose contents can be read back
///
/// Handy for capturing output in tests:
///
/// ```
/// use rust_log_facade::{LogOption, Logger, SharedBuffer, Sink};
///
/// let buffer = SharedBuffer::new();
/// let logger = Logger::new([LogOption::writer(Sink::new(buffer.clone()))]).unwrap();
/// logger.info("ready");
/// assert!(buffer.contents().contains("msg=ready"));
/// ```
#[derive(Clone, Default)]
pub struct SharedBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.bytes.lock()).into_owned()
    }

    /// Non-empty output lines
    pub fn lines(&self) -> Vec<String> {
        self.contents()
            .lines()
            .filter(|l| !l.is_empty())
            .map(String::from)
            .collect()
    }

    pub fn clear(&self) {
        self.bytes.lock().clear();
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.bytes.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_record_to_buffer() {
        let buffer = SharedBuffer::new();
        let sink = Sink::new(buffer.clone());
        sink.write_record(b"first\n").unwrap();
        sink.write_record(b"second\n").unwrap();
        assert_eq!(buffer.lines(), vec!["first", "second"]);
    }

    #[test]
    fn test_write_error_is_reported() {
        let sink = Sink::new(FailingWriter);
        let err = sink.write_record(b"x\n").unwrap_err();
        assert!(matches!(err, LoggerError::IoOperation { .. }));
    }

    #[test]
    fn test_clones_share_writer() {
        let sink = Sink::new(SharedBuffer::new());
        let other = sink.clone();
        assert!(sink.same_as(&other));
        assert!(!sink.same_as(&Sink::stderr()));
    }
}
