//! Cloud logging record shape

use super::{FormatterBase, RecordFormatter, StructuredRecord};
use crate::LogEvent;
use serde_json::Value;

/// Formatter for the stackdriver provider.
///
/// Key order: `@timestamp, message, host, path, environment, level,
/// logger_name`, then extra fields, then debug fields when the event
/// carries an exception. Extra and debug fields may overwrite core keys.
#[derive(Clone, Debug)]
pub struct StackdriverFormatter {
    base: FormatterBase,
}

impl StackdriverFormatter {
    /// Create a formatter bound to `environment`
    pub fn new(environment: impl Into<String>) -> Self {
        Self {
            base: FormatterBase::new(environment),
        }
    }

    /// Override the host name
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.base = self.base.with_host(host);
        self
    }

    /// Shared parameters
    pub fn base(&self) -> &FormatterBase {
        &self.base
    }
}

impl RecordFormatter for StackdriverFormatter {
    fn format(&self, event: &LogEvent) -> StructuredRecord {
        let mut record = StructuredRecord::new();
        record.insert(
            "@timestamp".into(),
            Value::from(self.base.format_timestamp(event.created)),
        );
        record.insert("message".into(), Value::from(event.message.clone()));
        record.insert("host".into(), Value::from(self.base.host.clone()));
        record.insert("path".into(), Value::from(event.pathname.clone()));
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
