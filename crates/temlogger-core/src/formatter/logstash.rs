//! Logstash event shape with a deployment environment

use super::{FormatterBase, RecordFormatter, StructuredRecord};
use crate::LogEvent;
use serde_json::Value;

/// Formatter for the logstash provider.
///
/// Produces a logstash v1 event (`@timestamp, @version, message, host, path,
/// tags, type`) extended with `environment`, `level` and `logger_name`,
/// followed by extra fields and, for events with an exception, debug fields.
#[derive(Clone, Debug)]
pub struct LogstashFormatter {
    base: FormatterBase,
    message_type: String,
    tags: Vec<String>,
}

impl LogstashFormatter {
    /// Create a formatter bound to `environment`
    pub fn new(environment: impl Into<String>) -> Self {
        Self {
            base: FormatterBase::new(environment),
            message_type: "logstash".to_string(),
            tags: Vec::new(),
        }
    }

    /// Override the host name
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.base = self.base.with_host(host);
        self
    }

    /// Set the `type` field
    pub fn with_message_type(mut self, message_type: impl Into<String>) -> Self {
        self.message_type = message_type.into();
        self
    }

    /// Set the `tags` field
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    /// Shared parameters
    pub fn base(&self) -> &FormatterBase {
        &self.base
    }
}

impl RecordFormatter for LogstashFormatter {
    fn format(&self, event: &LogEvent) -> StructuredRecord {
        let mut record = StructuredRecord::new();
        record.insert(
            "@timestamp".into(),
            Value::from(self.base.format_timestamp(event.created)),
        );
        record.insert("@version".into(), Value::from("1"));
        record.insert("message".into(), Value::from(event.message.clone()));
        record.insert("host".into(), Value::from(self.base.host.clone()));
        record.insert("path".into(), Value::from(event.pathname.clone()));
        record.insert("tags".into(), Value::from(self.tags.clone()));
        record.insert("type".into(), Value::from(self.message_type.clone()));
        record.insert(
            "environment".into(),
            Value::from(self.base.environment.clone()),
        );
        record.insert("level".into(), Value::from(event.level.as_str()));
        record.insert("logger_name".into(), Value::from(event.name.clone()));

        record.extend(self.base.extra_fields(event));

        if event.exception.is_some() {
            record.extend(self.base.debug_fields(event));
        }

        record
    }
}
