//! In-memory ring of log lines.
//!
//! `tracing_sub` writes formatted events here once a global buffer is
//! installed; the demo's log panel reads them back with [`LogHandle::tail`].

use std::collections::VecDeque;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, OnceLock};

pub const DEFAULT_MAX_LINES: usize = 2000;

static GLOBAL_LOG: OnceLock<LogHandle> = OnceLock::new();

/// Installs `handle` as the process-wide buffer. Only the first call wins.
pub fn set_global_log(handle: LogHandle) -> bool {
    GLOBAL_LOG.set(handle).is_ok()
}

pub fn global_log() -> Option<LogHandle> {
    GLOBAL_LOG.get().cloned()
}

#[derive(Debug)]
struct LogBuffer {
    lines: VecDeque<String>,
    max_lines: usize,
}

impl LogBuffer {
    fn push_line(&mut self, line: String) {
        self.lines.push_back(line);
        while self.lines.len() > self.max_lines {
            self.lines.pop_front();
        }
    }
}

#[derive(Clone, Debug)]
pub struct LogHandle {
    inner: Arc<Mutex<LogBuffer>>,
}

impl Default for LogHandle {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_LINES)
    }
}

impl LogHandle {
    pub fn new(max_lines: usize) -> Self {
        Self {
            inner: Arc::new(Mutex::new(LogBuffer {
                lines: VecDeque::new(),
                max_lines: max_lines.max(1),
            })),
        }
    }

    pub fn push(&self, line: impl Into<String>) {
        if let Ok(mut buffer) = self.inner.lock() {
            buffer.push_line(line.into());
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().map(|b| b.lines.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The last `count` lines, oldest first.
    pub fn tail(&self, count: usize) -> Vec<String> {
        let Ok(buffer) = self.inner.lock() else {
            return Vec::new();
        };
        let skip = buffer.lines.len().saturating_sub(count);
        buffer.lines.iter().skip(skip).cloned().collect()
    }

    pub fn writer(&self) -> LogWriter {
        LogWriter {
            handle: self.clone(),
            pending: Vec::new(),
        }
    }
}

/// `io::Write` adapter: bytes are split on newlines and each complete line
/// becomes one entry. A trailing partial line is kept until the next write
/// or until the writer is flushed or dropped.
#[derive(Debug)]
pub struct LogWriter {
    handle: LogHandle,
    pending: Vec<u8>,
}

impl LogWriter {
    fn drain_lines(&mut self) {
        while let Some(pos) = self.pending.iter().position(|b| *b == b'\n') {
            let line: Vec<u8> = self.pending.drain(..=pos).collect();
            let text = String::from_utf8_lossy(&line[..line.len() - 1]);
            self.handle.push(text.trim_end_matches('\r').to_string());
        }
    }
}

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.pending.extend_from_slice(buf);
        self.drain_lines();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.drain_lines();
        if !self.pending.is_empty() {
            let text = String::from_utf8_lossy(&self.pending).to_string();
            self.pending.clear();
            self.handle.push(text);
        }
        Ok(())
    }
}

impl Drop for LogWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writer_splits_lines_and_keeps_partials() {
        let handle = LogHandle::new(10);
        {
            let mut writer = handle.writer();
            writer.write_all(b"first\nsec").unwrap();
            assert_eq!(handle.tail(10), vec!["first".to_string()]);
            writer.write_all(b"ond\r\nthird").unwrap();
        }
        assert_eq!(handle.tail(10), vec!["first", "second", "third"]);
    }

    #[test]
    fn buffer_drops_oldest_lines() {
        let handle = LogHandle::new(2);
        for line in ["a", "b", "c"] {
            handle.push(line);
        }
        assert_eq!(handle.len(), 2);
        assert_eq!(handle.tail(1), vec!["c".to_string()]);
        assert_eq!(handle.tail(5), vec!["b".to_string(), "c".to_string()]);
    }
}
