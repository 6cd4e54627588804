//! Cloud logging structured output
//!
//! Managed runtimes ingest one JSON document per stdout line as a structured
//! log entry. [`CloudLoggingClient::default_handler`] returns a
//! [`StructuredLogHandler`] writing in that format.

use crate::error::{Result, TransportError};
use serde::Deserialize;
use serde_json::{json, Value};
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};
use temlogger_core::{Handler, HandlerError, LogEvent, RecordFormatter, StructuredRecord};

/// Record key carrying the call site
pub const SOURCE_LOCATION_KEY: &str = "logging.googleapis.com/sourceLocation";

/// Environment variables consulted for the project id, in priority order
#[derive(Debug, Default, Deserialize)]
struct ProjectEnv {
    google_cloud_project: Option<String>,
    gcloud_project: Option<String>,
    gcp_project: Option<String>,
}

impl ProjectEnv {
    fn project_id(self) -> Option<String> {
        [self.google_cloud_project, self.gcloud_project, self.gcp_project]
            .into_iter()
            .flatten()
            .find(|id| !id.is_empty())
    }
}

/// Cloud logging client bound to one project
#[derive(Clone, Debug)]
pub struct CloudLoggingClient {
    project_id: String,
}

impl CloudLoggingClient {
    /// Discover the project from `GOOGLE_CLOUD_PROJECT`, `GCLOUD_PROJECT`
    /// or `GCP_PROJECT`.
    pub fn from_env() -> Result<Self> {
        let vars = std::env::vars_os().filter_map(|(key, value)| {
            Some((key.into_string().ok()?, value.into_string().ok()?))
        });
        let env = envy::from_iter::<_, ProjectEnv>(vars).unwrap_or_default();
        env.project_id()
            .map(Self::with_project)
            .ok_or(TransportError::MissingProject)
    }

    /// Client for an explicit project id
    pub fn with_project(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
        }
    }

    /// The bound project id
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Handler writing structured entries to stdout
    pub fn default_handler(&self) -> StructuredLogHandler {
        tracing::debug!(project = %self.project_id, "creating structured log handler");
        StructuredLogHandler::new()
    }
}

/// Handler writing one JSON log entry per line.
pub struct StructuredLogHandler {
    writer: Mutex<Box<dyn Write + Send>>,
    formatter: Option<Arc<dyn RecordFormatter>>,
}

impl Default for StructuredLogHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl StructuredLogHandler {
    /// Handler writing to stdout
    pub fn new() -> Self {
        Self::with_writer(std::io::stdout())
    }

    /// Handler writing to `writer`
    pub fn with_writer(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            formatter: None,
        }
    }

    /// Shape records with `formatter` before the entry keys are added
    pub fn with_formatter(mut self, formatter: Arc<dyn RecordFormatter>) -> Self {
        self.formatter = Some(formatter);
        self
    }

    /// The log entry written for `event`
    pub fn entry(&self, event: &LogEvent) -> StructuredRecord {
        let mut record = match &self.formatter {
            Some(formatter) => formatter.format(event),
            None => {
                let mut native = StructuredRecord::new();
                native.insert("message".into(), Value::from(event.message.clone()));
                native
            }
        };

        if !record.contains_key("severity") {
            record.insert("severity".into(), Value::from(event.level.as_str()));
        }
        if self.formatter.is_none() {
            record.insert("logger_name".into(), Value::from(event.name.clone()));
        }
        record.insert(
            SOURCE_LOCATION_KEY.into(),
            json!({ "file": event.pathname, "line": event.lineno }),
        );
        record
    }
}

impl Handler for StructuredLogHandler {
    fn emit(&self, event: &LogEvent) -> std::result::Result<(), HandlerError> {
        let mut line = serde_json::to_vec(&self.entry(event))?;
        line.push(b'\n');

        let mut writer = self.writer.lock().unwrap_or_else(PoisonError::into_inner);
        writer.write_all(&line)?;
        Ok(())
    }

    fn flush(&self) -> std::result::Result<(), HandlerError> {
        self.writer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .flush()?;
        Ok(())
    }
}
