//! Output sinks and the capturing output channel.

use crate::errors::WidgetError;
use std::io::Write;

/// Trait for the destination of rendered text.
pub trait OutputSink {
    /// Appends text to the sink.
    fn write_str(&mut self, text: &str) -> Result<(), WidgetError>;

    /// Drains buffered text, for sinks that buffer.
    fn take_buffered(&mut self) -> Option<String> {
        None
    }

    /// Flushes any pending output.
    fn flush(&mut self) -> Result<(), WidgetError> {
        Ok(())
    }
}

/// A sink that buffers everything in memory.
///
/// Used as the default when no sink is configured.
#[derive(Debug, Clone, Default)]
pub struct StringSink {
    buffer: String,
}

impl StringSink {
    /// Creates a new empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the buffered text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.buffer
    }
}

impl OutputSink for StringSink {
    fn write_str(&mut self, text: &str) -> Result<(), WidgetError> {
        self.buffer.push_str(text);
        Ok(())
    }

    fn take_buffered(&mut self) -> Option<String> {
        Some(std::mem::take(&mut self.buffer))
    }
}

/// A sink that discards all output.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl OutputSink for NullSink {
    fn write_str(&mut self, _text: &str) -> Result<(), WidgetError> {
        Ok(())
    }
}

/// A sink that forwards output to an `io::Write`.
#[derive(Debug)]
pub struct WriterSink<W: Write> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    /// Wraps a writer.
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the inner writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> OutputSink for WriterSink<W> {
    fn write_str(&mut self, text: &str) -> Result<(), WidgetError> {
        self.writer.write_all(text.as_bytes())?;
        Ok(())
    }

    fn flush(&mut self) -> Result<(), WidgetError> {
        self.writer.flush()?;
        Ok(())
    }
}

/// The ambient output channel of a render.
///
/// Writes go to the innermost open capture buffer, or to the base sink when
/// nothing is being captured.
pub struct OutputChannel {
    base: Box<dyn OutputSink>,
    captures: Vec<String>,
}

impl OutputChannel {
    /// Creates a channel over the given base sink.
    #[must_use]
    pub fn new(base: Box<dyn OutputSink>) -> Self {
        Self {
            base,
            captures: Vec::new(),
        }
    }

    /// Appends text to the current destination.
    pub fn write(&mut self, text: &str) -> Result<(), WidgetError> {
        match self.captures.last_mut() {
            Some(buffer) => {
                buffer.push_str(text);
                Ok(())
            }
            None => self.base.write_str(text),
        }
    }

    /// Starts a new capture scope.
    pub fn begin_capture(&mut self) {
        self.captures.push(String::new());
    }

    /// Ends the innermost capture scope and returns what it captured.
    ///
    /// Returns `None` if no capture is open.
    pub fn end_capture(&mut self) -> Option<String> {
        self.captures.pop()
    }

    /// Returns the number of open capture scopes.
    #[must_use]
    pub fn capture_depth(&self) -> usize {
        self.captures.len()
    }

    /// Drains the base sink's buffered output.
    pub fn take_output(&mut self) -> Option<String> {
        self.base.take_buffered()
    }

    /// Flushes the base sink.
    pub fn flush(&mut self) -> Result<(), WidgetError> {
        self.base.flush()
    }
}

impl Default for OutputChannel {
    fn default() -> Self {
        Self::new(Box::new(StringSink::new()))
    }
}

impl std::fmt::Debug for OutputChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OutputChannel")
            .field("capture_depth", &self.captures.len())
            .finish_non_exhaustive()
    }
}
