//! Logging utilities.
//!
//! Centralizes logger initialization on top of the `log` facade; every crate in
//! the workspace logs through `log` macros only.

mod init;

pub use init::{init_logging, LoggingConfig, DEFAULT_FILTER};
