//! # temlogger-core
//!
//! The log primitive that temlogger binds transports to.
//!
//! This crate provides:
//!
//! - [`Level`] and [`LogEvent`], the in-flight shape of a log call
//! - [`Logger`], a named logger holding a minimum level and a set of [`Handler`]s
//! - [`LoggerRegistry`], the name to logger map (one logger object per name)
//! - the record formatters that turn a [`LogEvent`] into an ordered
//!   [`StructuredRecord`] (`@timestamp`, `message`, `host`, ...)
//!
//! Transports live in `temlogger-transports` and the provider resolution
//! lives in the `temlogger` facade.
//!
//! ## Example
//!
//! ```rust
//! use temlogger_core::{Level, Logger};
//!
//! let logger = Logger::new("billing");
//! logger.set_level(Level::Info);
//! logger.at(Level::Warning).field("invoice", 42).log("invoice overdue");
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
mod event;
pub mod formatter;
mod handler;
mod level;
mod logger;
mod registry;

#[cfg(any(test, feature = "test-utils"))]
mod capture;

pub use error::HandlerError;
pub use event::{ExceptionInfo, LogEvent};
pub use formatter::{
    FormatterBase, LogstashFormatter, RecordFormatter, StackdriverFormatter, StructuredRecord,
};
pub use handler::Handler;
pub use level::{Level, ParseLevelError};
pub use logger::{EventBuilder, Logger};
pub use registry::LoggerRegistry;

#[cfg(any(test, feature = "test-utils"))]
pub use capture::CaptureHandler;
