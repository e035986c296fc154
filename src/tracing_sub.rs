use std::io::{self, Write};

use tracing::Level;

use crate::log_buffer::{LogHandle, LogWriter, global_log};

/// Where one formatted event ends up.
///
/// Stderr is unreadable while the alternate screen is up, so the binary
/// installs a global [`LogHandle`] before starting the UI and every event
/// lands in the log panel instead.
pub enum LogSink {
    Buffer(LogWriter),
    Stderr(io::Stderr),
}

impl LogSink {
    pub fn for_handle(handle: Option<&LogHandle>) -> Self {
        match handle {
            Some(handle) => Self::Buffer(handle.writer()),
            None => Self::Stderr(io::stderr()),
        }
    }
}

impl Write for LogSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        match self {
            Self::Buffer(w) => w.write(buf),
            Self::Stderr(s) => s.write(buf),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self {
            Self::Buffer(w) => w.flush(),
            Self::Stderr(s) => s.flush(),
        }
    }
}

/// Picks the sink per event, so a log buffer installed after the
/// subscriber still receives output.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlobalSink;

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for GlobalSink {
    type Writer = LogSink;

    fn make_writer(&'a self) -> Self::Writer {
        LogSink::for_handle(global_log().as_ref())
    }
}

/// Installs the process-wide subscriber, plain text without timestamps,
/// filtered at `level`. Returns `false` when one was already installed.
pub fn install(level: Level) -> bool {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(GlobalSink)
        .with_target(false)
        .with_ansi(false)
        .without_time()
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buffer_sink_collects_whole_lines() {
        let handle = LogHandle::new(8);
        {
            let mut sink = LogSink::for_handle(Some(&handle));
            sink.write_all(b"DEBUG split frame=#2\nDEBUG flo").unwrap();
            sink.write_all(b"ated\n").unwrap();
            sink.flush().unwrap();
        }
        assert_eq!(handle.tail(8), vec!["DEBUG split frame=#2", "DEBUG floated"]);
    }

    #[test]
    fn missing_handle_falls_back_to_stderr() {
        assert!(matches!(LogSink::for_handle(None), LogSink::Stderr(_)));
    }
}
