//! Log sinks injected into checks

use parking_lot::Mutex;
use std::sync::Arc;

/// Destination for the messages a check emits while running.
pub trait LogSink: Send + Sync {
    fn error(&self, message: &str);

    fn info(&self, _message: &str) {}
}

/// Forwards to `tracing` under the `health_check` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLog;

impl LogSink for TracingLog {
    fn error(&self, message: &str) {
        tracing::error!(target: "health_check", "{}", message);
    }

    fn info(&self, message: &str) {
        tracing::info!(target: "health_check", "{}", message);
    }
}

pub fn default_log() -> Arc<dyn LogSink> {
    Arc::new(TracingLog)
}

/// Keeps every message in memory. Handy for asserting on probe failures.
#[derive(Debug, Default)]
pub struct MemoryLog {
    errors: Mutex<Vec<String>>,
    infos: Mutex<Vec<String>>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.lock().clone()
    }

    pub fn infos(&self) -> Vec<String> {
        self.infos.lock().clone()
    }
}

impl LogSink for MemoryLog {
    fn error(&self, message: &str) {
        self.errors.lock().push(message.to_string());
    }

    fn info(&self, message: &str) {
        self.infos.lock().push(message.to_string());
    }
}
