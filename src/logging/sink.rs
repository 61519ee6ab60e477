//! Log sinks.
//!
//! A sink receives `(level, prefixed_message)` pairs and is responsible for
//! everything past that point: transport, timestamps, persistence. Sinks
//! must not block and must not panic; a sink that cannot deliver drops the
//! message.

use std::sync::Mutex;

use super::level::LogLevel;

/// Consumer of filtered, prefixed log messages.
pub trait LogSink: Send + Sync {
    fn emit(&self, level: LogLevel, message: &str);
}

/// Default sink: forwards to the `tracing` ecosystem.
///
/// Level mapping keeps the ordering intact: DEBUG→trace, VERBOSE→debug,
/// INFO→info, WARNING→warn, ERROR→error.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn emit(&self, level: LogLevel, message: &str) {
        match level {
            LogLevel::Debug => tracing::trace!("{message}"),
            LogLevel::Verbose => tracing::debug!("{message}"),
            LogLevel::Info => tracing::info!("{message}"),
            LogLevel::Warning => tracing::warn!("{message}"),
            LogLevel::Error => tracing::error!("{message}"),
        }
    }
}

/// Sink that records every emitted message in memory.
///
/// Used by tests to assert on filtering and prefixing without standing up a
/// subscriber.
#[derive(Debug, Default)]
pub struct MemorySink {
    entries: Mutex<Vec<(LogLevel, String)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything emitted so far, in emission order.
    pub fn entries(&self) -> Vec<(LogLevel, String)> {
        self.lock().clone()
    }

    /// Messages only, dropping the levels.
    pub fn messages(&self) -> Vec<String> {
        self.lock().iter().map(|(_, m)| m.clone()).collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.lock().iter().any(|(_, m)| m.contains(needle))
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(LogLevel, String)>> {
        // A panicked writer must not poison logging for everyone else.
        match self.entries.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl LogSink for MemorySink {
    fn emit(&self, level: LogLevel, message: &str) {
        self.lock().push((level, message.to_string()));
    }
}
