//! # temlogger
//!
//! Structured logging with the transport chosen by configuration.
//!
//! Call sites ask for a logger by name; where its records go is decided by
//! `LOGGING_PROVIDER` (or [`config()`]):
//!
//! - `default` (or anything unrecognised) - the process `tracing` subscriber
//! - `logstash` - newline-delimited JSON over TCP to `LOGGING_URL:LOGGING_PORT`
//! - `stackdriver` - structured cloud logging entries on stdout
//!
//! `LOGGING_ENVIRONMENT` is stamped on every record as `environment`.
//!
//! ## Quick Start
//!
//! ```rust
//! temlogger::config().set_provider("default");
//!
//! let logger = temlogger::get_logger("billing")?;
//! logger.info("invoice sent");
//! logger
//!     .at(temlogger::Level::Warning)
//!     .field("invoice_id", 42)
//!     .log("payment overdue");
//! # Ok::<(), temlogger::Error>(())
//! ```
//!
//! Asking again with unchanged configuration returns the same logger without
//! rebuilding its transport. Changing the provider and asking again rebinds it.
//!
//! ## Testing
//!
//! The `test-utils` feature provides [`testing::RecordingTransports`], an
//! in-memory [`TransportFactory`] for use with [`LoggerManager::with_transports`].

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod config;
mod error;
mod manager;
mod provider;
mod transport;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

use std::sync::{Arc, OnceLock};

// Re-export the log primitive
pub use temlogger_core::*;

pub use config::{load_dotenv, load_dotenv_from, LoggingConfig};
pub use error::{Error, Result, TransportError};
pub use manager::LoggerManager;
pub use provider::{LogstashSettings, Provider, ProviderPlan, StackdriverSettings};
pub use transport::{DefaultTransports, TransportFactory};

// Field values for `EventBuilder::field`
pub use serde_json::{json, Value};

// Transport handlers, for wiring loggers by hand
pub use temlogger_transports::{
    CloudLoggingClient, LogstashHandler, LogstashVersion, StructuredLogHandler,
};

fn global() -> &'static LoggerManager {
    static MANAGER: OnceLock<LoggerManager> = OnceLock::new();
    MANAGER.get_or_init(|| {
        LoggerManager::with_parts(
            Arc::new(LoggingConfig::new()),
            LoggerRegistry::global(),
            Arc::new(DefaultTransports),
        )
    })
}

/// Return the process-wide logger for `name`, bound to the configured provider.
///
/// See [`LoggerManager::get_logger`].
pub fn get_logger(name: &str) -> Result<Arc<Logger>> {
    global().get_logger(name)
}

/// The process-wide configuration read by [`get_logger`]
pub fn config() -> &'static LoggingConfig {
    global().config()
}
