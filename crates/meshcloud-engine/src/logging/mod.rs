//! Logging utilities.
//!
//! This module centralizes logger initialization. Everything else in the
//! workspace logs through the standard `log` facade; host-facing diagnostics
//! additionally go through [`crate::core::DebugChannel`].

mod init;

pub use init::{init_logging, LoggingConfig};
