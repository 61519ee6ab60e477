//! Level-filtered, prefixed logger.

use std::fmt;
use std::sync::Arc;

use super::level::LogLevel;
use super::sink::{LogSink, TracingSink};

/// Logging facility handed to every module and component.
///
/// Carries a threshold, a name prefix, and a shared sink. Component loggers
/// are derived with [`Logger::child`], which nests the prefix under the
/// parent's (`module.component`).
#[derive(Clone)]
pub struct Logger {
    threshold: LogLevel,
    prefix: String,
    sink: Arc<dyn LogSink>,
}

impl Logger {
    /// Logger with the default `tracing`-backed sink.
    pub fn new(threshold: LogLevel, prefix: impl Into<String>) -> Self {
        Self::with_sink(threshold, prefix, Arc::new(TracingSink))
    }

    pub fn with_sink(threshold: LogLevel, prefix: impl Into<String>, sink: Arc<dyn LogSink>) -> Self {
        Self {
            threshold,
            prefix: prefix.into(),
            sink,
        }
    }

    /// Derive a logger whose prefix nests under this one.
    pub fn child(&self, name: &str) -> Logger {
        let prefix = if self.prefix.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.prefix, name)
        };
        Logger {
            threshold: self.threshold,
            prefix,
            sink: Arc::clone(&self.sink),
        }
    }

    pub fn threshold(&self) -> LogLevel {
        self.threshold
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Whether a message at `level` would be emitted. Callers building
    /// expensive messages should check this first.
    pub fn enabled(&self, level: LogLevel) -> bool {
        level >= self.threshold
    }

    /// Emit `message` at `level` if it clears the threshold.
    ///
    /// Never blocks, never fails: a sink that cannot deliver drops the
    /// message.
    pub fn log(&self, level: LogLevel, message: impl fmt::Display) {
        if !self.enabled(level) {
            return;
        }
        self.sink.emit(level, &format!("{}: {}", self.prefix, message));
    }

    pub fn debug(&self, message: impl fmt::Display) {
        self.log(LogLevel::Debug, message);
    }

    pub fn verbose(&self, message: impl fmt::Display) {
        self.log(LogLevel::Verbose, message);
    }

    pub fn info(&self, message: impl fmt::Display) {
        self.log(LogLevel::Info, message);
    }

    pub fn warning(&self, message: impl fmt::Display) {
        self.log(LogLevel::Warning, message);
    }

    pub fn error(&self, message: impl fmt::Display) {
        self.log(LogLevel::Error, message);
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("threshold", &self.threshold)
            .field("prefix", &self.prefix)
            .finish_non_exhaustive()
    }
}
