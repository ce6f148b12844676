use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

// ---------------------------------------------------------------------------
// Sink
// ---------------------------------------------------------------------------

/// Shared append-only destination for serialized records.
///
/// Every record is handed over as one complete line and written while the
/// lock is held, so concurrent writers never interleave bytes.
#[derive(Clone)]
pub struct Sink {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl Sink {
    pub fn from_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub fn stdout() -> Self {
        Self::from_writer(io::stdout())
    }

    pub fn stderr() -> Self {
        Self::from_writer(io::stderr())
    }

    /// Opens `path` for appending, creating it if needed.
    pub fn file(path: impl AsRef<Path>) -> io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path.as_ref())?;
        Ok(Self::from_writer(file))
    }

    /// Write one complete record and flush it.
    pub fn write_record(&self, line: &[u8]) -> io::Result<()> {
        let mut writer = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        writer.write_all(line)?;
        writer.flush()
    }
}

impl std::fmt::Debug for Sink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sink").finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// BufferSink
// ---------------------------------------------------------------------------

/// In-memory capture of everything written through a [`Sink`].
#[derive(Debug, Clone, Default)]
pub struct BufferSink {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A [`Sink`] that appends into this buffer.
    pub fn sink(&self) -> Sink {
        Sink::from_writer(self.clone())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<u8>> {
        self.buf.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    /// Every captured line parsed as JSON.
    pub fn records(&self) -> serde_json::Result<Vec<serde_json::Value>> {
        self.lines().iter().map(|l| serde_json::from_str(l)).collect()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

impl Write for BufferSink {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.lock().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_sink_captures_records() {
        let buf = BufferSink::new();
        let sink = buf.sink();
        sink.write_record(b"{\"a\":1}\n").unwrap();
        sink.clone().write_record(b"{\"a\":2}\n").unwrap();

        assert_eq!(buf.lines(), vec!["{\"a\":1}", "{\"a\":2}"]);
        let records = buf.records().unwrap();
        assert_eq!(records[1]["a"], 2);

        buf.clear();
        assert!(buf.contents().is_empty());
    }

    #[test]
    fn test_file_sink_appends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("records.log");

        Sink::file(&path).unwrap().write_record(b"one\n").unwrap();
        Sink::file(&path).unwrap().write_record(b"two\n").unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert_eq!(text, "one\ntwo\n");
    }
}
