//! Logging setup.
//!
//! Everything logs through the `log` facade; `env_logger` is installed once at
//! startup.

mod init;

pub use init::{DEFAULT_FILTER, LoggingConfig, init_logging};
