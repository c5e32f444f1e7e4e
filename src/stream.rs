//! # Line Stream Runner
//!
//! Reads hex-encoded packets one per line and hands the rendered JSON
//! messages to a [`PacketSink`].
//!
//! A line that fails to decode is logged and counted, then skipped. Only a
//! read error on the input or a write error on the sink stops the run.

use std::io::{self, Write};

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, warn};

use crate::error::Result;
use crate::processor::PacketProcessor;

/// Destination for rendered messages
#[cfg_attr(test, mockall::automock)]
pub trait PacketSink {
    /// Deliver one message
    fn emit(&mut self, message: &str) -> io::Result<()>;
}

/// Sink writing one message per line to any [`Write`]
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Consume the sink and return the underlying writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterSink<io::Stdout> {
    /// Sink writing to standard output
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> PacketSink for WriterSink<W> {
    fn emit(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.writer, "{}", message)?;
        self.writer.flush()
    }
}

/// Counters for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Non-blank lines read
    pub lines: u64,
    /// Lines decoded successfully
    pub decoded: u64,
    /// Lines that failed to decode
    pub failed: u64,
    /// Messages delivered to the sink
    pub messages: u64,
}

/// Drives a [`PacketProcessor`] over a line-oriented reader
pub struct StreamRunner<S: PacketSink> {
    processor: PacketProcessor,
    sink: S,
    stats: RunStats,
}

impl<S: PacketSink> StreamRunner<S> {
    pub fn new(processor: PacketProcessor, sink: S) -> Self {
        Self {
            processor,
            sink,
            stats: RunStats::default(),
        }
    }

    /// Counters accumulated so far
    pub fn stats(&self) -> RunStats {
        self.stats
    }

    /// Consume the runner and return its sink
    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Process every line until the reader is exhausted
    ///
    /// Counters stay valid if the returned future is dropped early.
    ///
    /// # Errors
    ///
    /// Returns error if reading the input or writing to the sink fails.
    /// Decode failures are counted, not returned.
    pub async fn run<R>(&mut self, reader: R) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = reader.lines();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            self.stats.lines += 1;

            match self.processor.process(&line) {
                Ok(messages) => {
                    for message in &messages {
                        self.sink.emit(message)?;
                        self.stats.messages += 1;
                    }
                    self.stats.decoded += 1;
                    debug!(line = self.stats.lines, messages = messages.len(), "Packet processed");
                }
                Err(e) => {
                    self.stats.failed += 1;
                    warn!(line = self.stats.lines, "Failed to process packet: {}", e);
                }
            }
        }

        Ok(())
    }
}
