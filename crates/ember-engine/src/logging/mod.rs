//! Logging utilities.
//!
//! This module centralizes logger initialization. Engine code only talks to the
//! `log` facade; where records end up (console, log file, both) is decided once
//! by the application through [`LoggingConfig`].

mod init;

pub use init::{init_logging, LogSink, LoggingConfig};
