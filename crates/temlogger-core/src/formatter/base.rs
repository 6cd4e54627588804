//! Shared formatter plumbing: timestamps, host, extra and debug fields

use super::StructuredRecord;
use crate::LogEvent;
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Attribute names the log primitive uses internally; extras with these
/// keys never reach a formatted record.
pub const RESERVED_ATTRS: &[&str] = &[
    "args",
    "asctime",
    "created",
    "exc_info",
    "exc_text",
    "filename",
    "funcName",
    "id",
    "levelname",
    "levelno",
    "lineno",
    "module",
    "msecs",
    "message",
    "msg",
    "name",
    "pathname",
    "process",
    "processName",
    "relativeCreated",
    "thread",
    "threadName",
    "extra",
    "auth_token",
    "password",
    "stack_info",
];

/// Render epoch seconds as `YYYY-MM-DDTHH:MM:SS.mmmZ` in UTC.
///
/// Milliseconds are truncated. Instants chrono cannot represent (NaN,
/// out of range) render as the Unix epoch.
pub fn format_timestamp(created: f64) -> String {
    let millis = (created * 1000.0).floor();
    let instant = if millis.is_finite() {
        DateTime::<Utc>::from_timestamp_millis(millis as i64)
    } else {
        None
    };

    instant
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
        .format("%Y-%m-%dT%H:%M:%S%.3fZ")
        .to_string()
}

/// Construction-time parameters shared by the formatters.
///
/// Host and environment are fixed for the formatter's lifetime; they are
/// not read per event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FormatterBase {
    /// Host name written to the `host` field
    pub host: String,
    /// Deployment environment tag
    pub environment: String,
}

impl FormatterBase {
    /// Bind to `environment` on this machine's hostname
    pub fn new(environment: impl Into<String>) -> Self {
        Self {
            host: gethostname::gethostname().to_string_lossy().into_owned(),
            environment: environment.into(),
        }
    }

    /// Override the host name
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    /// See [`format_timestamp`]
    pub fn format_timestamp(&self, created: f64) -> String {
        format_timestamp(created)
    }

    /// Caller-supplied attributes minus [`RESERVED_ATTRS`], in insertion order
    pub fn extra_fields(&self, event: &LogEvent) -> StructuredRecord {
        event
            .extra
            .iter()
            .filter(|(key, _)| !RESERVED_ATTRS.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    /// Exception-derived fields; empty when the event carries no exception
    pub fn debug_fields(&self, event: &LogEvent) -> StructuredRecord {
        let mut fields = StructuredRecord::new();
        let Some(exception) = &event.exception else {
            return fields;
        };

        fields.insert("exception_type".into(), Value::from(exception.type_name.clone()));
        fields.insert("exception_message".into(), Value::from(exception.message.clone()));
        fields.insert("stack_trace".into(), Value::from(exception.traceback.clone()));
        fields.insert("lineno".into(), Value::from(event.lineno));
        fields.insert("process".into(), Value::from(event.process));
        fields.insert("thread_name".into(), Value::from(event.thread_name.clone()));
        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ExceptionInfo, Level};
    use proptest::prelude::*;

    #[test]
    fn test_format_timestamp_epoch() {
        assert_eq!(format_timestamp(0.0), "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_format_timestamp_truncates_millis() {
        // 2021-03-04T05:06:07.1239Z
        assert_eq!(
            format_timestamp(1_614_834_367.1239),
            "2021-03-04T05:06:07.123Z"
        );
    }

    #[test]
    fn test_format_timestamp_non_finite() {
        assert_eq!(format_timestamp(f64::NAN), "1970-01-01T00:00:00.000Z");
        assert_eq!(format_timestamp(f64::INFINITY), "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_extra_fields_skip_reserved() {
        let base = FormatterBase::new("dev").with_host("h");
        let event = LogEvent::new("app", Level::Info, "m")
            .with_field("password", "hunter2")
            .with_field("customer", "acme")
            .with_field("msg", "shadow");

        let extra = base.extra_fields(&event);
        assert_eq!(extra.len(), 1);
        assert_eq!(extra["customer"], "acme");
    }

    #[test]
    fn test_debug_fields_only_with_exception() {
        let base = FormatterBase::new("dev");
        let event = LogEvent::new("app", Level::Error, "m");
        assert!(base.debug_fields(&event).is_empty());

        let err = std::io::Error::new(std::io::ErrorKind::Other, "broken pipe");
        let event = event.with_exception(ExceptionInfo::from_error(&err));
        let debug = base.debug_fields(&event);
        assert_eq!(debug["exception_message"], "broken pipe");
        assert!(debug.contains_key("exception_type"));
        assert!(debug.contains_key("stack_trace"));
        assert!(debug.contains_key("thread_name"));
    }

    #[test]
    fn test_default_host_is_machine_hostname() {
        let base = FormatterBase::new("dev");
        assert!(!base.host.is_empty());
    }

    proptest! {
        #[test]
        fn prop_timestamp_shape(secs in 0i64..4_102_444_800i64, millis in 0u32..1000u32) {
            let created = secs as f64 + f64::from(millis) / 1000.0;
            let rendered = format_timestamp(created);

            prop_assert_eq!(rendered.len(), 24);
            prop_assert!(rendered.ends_with('Z'));
            prop_assert_eq!(&rendered[10..11], "T");
            prop_assert_eq!(format_timestamp(created), rendered);
        }
    }
}
