//! Native logstash event shapes, used when no formatter is supplied

use super::LogstashVersion;
use serde_json::Value;
use temlogger_core::{FormatterBase, LogEvent, RecordFormatter, StructuredRecord};

/// The logstash event shape for a protocol version.
#[derive(Clone, Debug)]
pub struct NativeFormatter {
    version: LogstashVersion,
    base: FormatterBase,
    message_type: String,
    tags: Vec<String>,
}

impl NativeFormatter {
    /// Native shape for `version` on this machine's hostname
    pub fn new(version: LogstashVersion) -> Self {
        Self {
            version,
            base: FormatterBase::new(""),
            message_type: "logstash".to_string(),
            tags: Vec::new(),
        }
    }

    /// Override the host name
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.base = self.base.with_host(host);
        self
    }

    fn format_v0(&self, event: &LogEvent) -> StructuredRecord {
        let mut fields = StructuredRecord::new();
        fields.insert("levelname".into(), Value::from(event.level.as_str()));
        fields.insert("logger".into(), Value::from(event.name.clone()));
        fields.extend(self.base.extra_fields(event));
        fields.extend(self.base.debug_fields(event));

        let mut record = StructuredRecord::new();
        record.insert(
            "@timestamp".into(),
            Value::from(self.base.format_timestamp(event.created)),
        );
        record.insert("@message".into(), Value::from(event.message.clone()));
        record.insert(
            "@source".into(),
            Value::from(format!("Logstash://{}/{}", self.base.host, event.pathname)),
        );
        record.insert("@source_host".into(), Value::from(self.base.host.clone()));
        record.insert("@source_path".into(), Value::from(event.pathname.clone()));
        record.insert("@tags".into(), Value::from(self.tags.clone()));
        record.insert("@type".into(), Value::from(self.message_type.clone()));
        record.insert("@fields".into(), Value::Object(fields));
        record
    }

    fn format_v1(&self, event: &LogEvent) -> StructuredRecord {
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
        record.insert("level".into(), Value::from(event.level.as_str()));
        record.insert("logger_name".into(), Value::from(event.name.clone()));
        record.extend(self.base.extra_fields(event));
        record.extend(self.base.debug_fields(event));
        record
    }
}

impl RecordFormatter for NativeFormatter {
    fn format(&self, event: &LogEvent) -> StructuredRecord {
        match self.version {
            LogstashVersion::V0 => self.format_v0(event),
            LogstashVersion::V1 => self.format_v1(event),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use temlogger_core::Level;

    fn event() -> LogEvent {
        LogEvent::new("svc", Level::Info, "hello")
            .with_created(0.0)
            .with_location("src/main.rs", 3)
            .with_field("user", "ann")
    }

    #[test]
    fn test_v1_shape() {
        let record = NativeFormatter::new(LogstashVersion::V1)
            .with_host("box")
            .format(&event());
        let keys: Vec<&str> = record.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "@timestamp",
                "@version",
                "message",
                "host",
                "path",
                "tags",
                "type",
                "level",
                "logger_name",
                "user"
            ]
        );
    }

    #[test]
    fn test_v0_nests_fields() {
        let record = NativeFormatter::new(LogstashVersion::V0)
            .with_host("box")
            .format(&event());
        assert_eq!(record["@message"], "hello");
        assert_eq!(record["@source"], "Logstash://box/src/main.rs");
        assert_eq!(record["@fields"]["levelname"], "INFO");
        assert_eq!(record["@fields"]["logger"], "svc");
        assert_eq!(record["@fields"]["user"], "ann");
        assert!(!record.contains_key("message"));
    }
}
