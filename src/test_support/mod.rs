//! Test utilities for xcgen unit tests.
//!
//! Provides target and platform fixtures plus a [`StubLogger`] that records
//! engine warnings without printing them.
//!
//! # Example
//!
//! ```rust,ignore
//! use crate::test_support::{universe, StubLogger, TargetBuilder};
//!
//! let targets = universe([("A", TargetBuilder::new("//a:A").build())]);
//! let logger = StubLogger::new();
//! let consolidated = consolidate_targets(&targets, &logger).unwrap();
//! assert!(logger.warnings().is_empty());
//! ```

pub mod fixtures;

use std::sync::Mutex;

use crate::util::Logger;

// Re-export fixtures for convenience
pub use fixtures::*;

/// Logger that only records warnings.
#[derive(Debug, Default)]
pub struct StubLogger {
    warnings: Mutex<Vec<String>>,
}

impl StubLogger {
    pub fn new() -> Self {
        StubLogger::default()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.lock().unwrap().clone()
    }
}

impl Logger for StubLogger {
    fn log_warning(&self, message: &str) {
        self.warnings.lock().unwrap().push(message.to_string());
    }
}

/// Assertion helpers for testing.
pub mod assertions {
    /// Assert that a result is Err and return the error.
    pub fn assert_err<T: std::fmt::Debug, E>(result: Result<T, E>) -> E {
        match result {
            Ok(v) => panic!("expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    }

    /// Assert that an error message contains a substring.
    pub fn assert_error_contains<T: std::fmt::Debug>(
        result: anyhow::Result<T>,
        substring: &str,
    ) {
        match result {
            Ok(v) => panic!("expected Err containing '{}', got Ok: {:?}", substring, v),
            Err(e) => {
                let msg = format!("{:#}", e);
                assert!(
                    msg.contains(substring),
                    "error '{}' does not contain '{}'",
                    msg,
                    substring
                );
            }
        }
    }
}
