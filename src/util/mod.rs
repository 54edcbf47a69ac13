//! Shared utilities

pub mod config;
pub mod diagnostic;
pub mod hash;
pub mod logger;

pub use config::Config;
pub use diagnostic::Diagnostic;
pub use logger::{CollectingLogger, Logger, TracingLogger};
