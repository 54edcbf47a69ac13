//! Logging seam for non-fatal engine warnings.
//!
//! The consolidation engine reports recoverable conflicts through a
//! [`Logger`] rather than calling `tracing` directly, so callers can collect
//! them (for `--json` output or tests) as well as print them.

use std::sync::Mutex;

/// Receiver for user-facing warnings.
pub trait Logger: Send + Sync {
    fn log_warning(&self, message: &str);
}

/// Forwards warnings to `tracing::warn!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn log_warning(&self, message: &str) {
        tracing::warn!("{}", message);
    }
}

/// Records warnings and forwards them to `tracing`.
#[derive(Debug, Default)]
pub struct CollectingLogger {
    warnings: Mutex<Vec<String>>,
}

impl CollectingLogger {
    pub fn new() -> Self {
        CollectingLogger::default()
    }

    /// Take every warning recorded so far.
    pub fn take_warnings(&self) -> Vec<String> {
        match self.warnings.lock() {
            Ok(mut warnings) => std::mem::take(&mut *warnings),
            Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
        }
    }
}

impl Logger for CollectingLogger {
    fn log_warning(&self, message: &str) {
        tracing::warn!("{}", message);
        match self.warnings.lock() {
            Ok(mut warnings) => warnings.push(message.to_string()),
            Err(poisoned) => poisoned.into_inner().push(message.to_string()),
        }
    }
}
