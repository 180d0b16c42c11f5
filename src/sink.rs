//! Append-only text sinks for per-request remarks and debug lines
//!
//! A [`LogSink`] is a shared, lock-protected writer. A [`Logger`] pairs a sink
//! with a line prefix (the request URL) and mirrors each line into a `tracing`
//! event so the same information reaches structured logging. Sinks that
//! already write to the terminal are not mirrored.

use std::fmt;
use std::io::{self, Write};
use std::sync::{Arc, Mutex, PoisonError};

/// Which stream a logger writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    Remarks,
    Debug,
}

/// A shared writer that accepts whole lines from many tasks
#[derive(Clone)]
pub struct LogSink {
    writer: Arc<Mutex<Box<dyn Write + Send>>>,
    mirror: bool,
}

impl LogSink {
    /// Wraps any writer as a sink
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Arc::new(Mutex::new(Box::new(writer))),
            mirror: true,
        }
    }

    /// A sink writing to standard error
    ///
    /// Lines are not mirrored into `tracing`, since the fmt subscriber
    /// prints to the same terminal.
    pub fn stderr() -> Self {
        Self {
            mirror: false,
            ..Self::new(io::stderr())
        }
    }

    /// Whether loggers over this sink also emit `tracing` events
    pub fn mirrors_to_tracing(&self) -> bool {
        self.mirror
    }

    /// A sink that discards everything
    pub fn discard() -> Self {
        Self::new(io::sink())
    }

    /// Writes one line under a single lock acquisition
    pub fn write_line(&self, line: &str) -> io::Result<()> {
        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.write_all(line.as_bytes())?;
        writer.write_all(b"\n")?;
        writer.flush()
    }
}

impl fmt::Debug for LogSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogSink")
            .field("mirror", &self.mirror)
            .finish_non_exhaustive()
    }
}

/// A URL-prefixed line writer over a [`LogSink`]
#[derive(Clone)]
pub struct Logger {
    sink: LogSink,
    prefix: String,
    channel: Channel,
}

impl Logger {
    /// Creates a logger whose lines read `"{prefix}{message}"`
    pub fn new(sink: &LogSink, prefix: impl Into<String>, channel: Channel) -> Self {
        Self {
            sink: sink.clone(),
            prefix: prefix.into(),
            channel,
        }
    }

    /// Writes one prefixed line
    ///
    /// A message spanning several lines is joined onto one, so every entry in
    /// the sink carries the prefix. Write failures are reported through
    /// `tracing` and otherwise ignored; a broken log target never stops a
    /// crawl.
    pub fn println(&self, message: impl fmt::Display) {
        let line = format!("{}{}", self.prefix, single_line(&message.to_string()));

        if self.sink.mirrors_to_tracing() {
            match self.channel {
                Channel::Remarks => tracing::info!(target: "scrap::remarks", "{}", line),
                Channel::Debug => tracing::debug!(target: "scrap::debug", "{}", line),
            }
        }

        if let Err(e) = self.sink.write_line(&line) {
            tracing::warn!("Failed to write {:?} line: {}", self.channel, e);
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }
}

/// Joins the non-blank lines of `message` with single spaces
fn single_line(message: &str) -> String {
    if !message.contains(['\n', '\r']) {
        return message.to_string();
    }

    message
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("prefix", &self.prefix)
            .field("channel", &self.channel)
            .finish()
    }
}

/// Cloneable in-memory writer; every clone appends to the same buffer
#[derive(Debug, Clone, Default)]
pub struct CaptureBuffer {
    bytes: Arc<Mutex<Vec<u8>>>,
}

impl CaptureBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded as UTF-8
    pub fn contents(&self) -> String {
        let bytes = self.bytes.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&bytes).into_owned()
    }

    /// Written lines, without their terminators
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    /// A sink appending to this buffer
    pub fn sink(&self) -> LogSink {
        LogSink::new(self.clone())
    }
}

impl Write for CaptureBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut bytes = self.bytes.lock().unwrap_or_else(PoisonError::into_inner);
        bytes.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
