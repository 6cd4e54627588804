//! # temlogger-transports
//!
//! Transport handlers that temlogger attaches to named loggers.
//!
//! Each transport is opt-in via a Cargo feature:
//!
//! - `logstash` - [`LogstashHandler`], newline-delimited JSON over TCP
//! - `stackdriver` - [`CloudLoggingClient`] and its default
//!   [`StructuredLogHandler`], one JSON document per line for cloud ingestion
//!
//! Both handlers accept an optional [`RecordFormatter`](temlogger_core::RecordFormatter);
//! without one they shape records natively.
//!
//! Transports send what they are given. They do not buffer, batch or retry.
//!
//! ## Example
//!
//! ```toml
//! [dependencies]
//! temlogger-transports = { version = "0.2", default-features = false, features = ["logstash"] }
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;

// Logstash TCP shipping
#[cfg(feature = "logstash")]
pub mod logstash;

// Cloud logging structured output
#[cfg(feature = "stackdriver")]
pub mod stackdriver;

pub use error::{Result, TransportError};

#[cfg(feature = "logstash")]
pub use logstash::{LogstashHandler, LogstashVersion};

#[cfg(feature = "stackdriver")]
pub use stackdriver::{CloudLoggingClient, StructuredLogHandler};
