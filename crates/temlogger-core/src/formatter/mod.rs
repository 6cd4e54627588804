//! Record formatters
//!
//! A formatter turns a [`LogEvent`] into an ordered [`StructuredRecord`]. The
//! record is a `serde_json::Map` built with `preserve_order`, so keys keep
//! their insertion order and overwriting a key keeps its original position.
//!
//! Handlers without a formatter pass events to their transport's native
//! shaping; the formatters here are for providers that need the canonical
//! shape:
//!
//! - [`StackdriverFormatter`]: `@timestamp, message, host, path, environment,
//!   level, logger_name`, then extras, then debug fields
//! - [`LogstashFormatter`]: the logstash v1 event plus `environment`
//!
//! # Example
//!
//! ```rust
//! use temlogger_core::{Level, LogEvent, RecordFormatter, StackdriverFormatter};
//!
//! let formatter = StackdriverFormatter::new("production").with_host("web-1");
//! let event = LogEvent::new("api", Level::Info, "ready").with_created(0.0);
//! let record = formatter.format(&event);
//!
//! assert_eq!(record["@timestamp"], "1970-01-01T00:00:00.000Z");
//! assert_eq!(record["environment"], "production");
//! ```

mod base;
mod logstash;
mod stackdriver;

pub use base::{format_timestamp, FormatterBase, RESERVED_ATTRS};
pub use logstash::LogstashFormatter;
pub use stackdriver::StackdriverFormatter;

use crate::LogEvent;

/// Ordered structured record
pub type StructuredRecord = serde_json::Map<String, serde_json::Value>;

/// Shapes a [`LogEvent`] into a [`StructuredRecord`]
pub trait RecordFormatter: Send + Sync {
    /// Format one event
    fn format(&self, event: &LogEvent) -> StructuredRecord;
}
