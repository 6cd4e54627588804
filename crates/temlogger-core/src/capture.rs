//! In-memory handler for tests
//!
//! Only available with the `test-utils` feature.

use crate::{Handler, HandlerError, LogEvent, RecordFormatter, StructuredRecord};
use serde_json::Value;
use std::sync::{Arc, Mutex, PoisonError};

/// Handler that keeps every event (and its formatted record) in memory.
///
/// ```rust,ignore
/// let capture = Arc::new(CaptureHandler::new());
/// logger.add_handler(capture.clone());
/// logger.info("hello");
/// assert_eq!(capture.len(), 1);
/// ```
#[derive(Clone, Default)]
pub struct CaptureHandler {
    formatter: Option<Arc<dyn RecordFormatter>>,
    captured: Arc<Mutex<Vec<(LogEvent, StructuredRecord)>>>,
}

impl CaptureHandler {
    /// Capture with the native shape (`message`, `level`, `logger_name`)
    pub fn new() -> Self {
        Self::default()
    }

    /// Capture records shaped by `formatter`
    pub fn with_formatter(formatter: Arc<dyn RecordFormatter>) -> Self {
        Self {
            formatter: Some(formatter),
            captured: Arc::default(),
        }
    }

    /// Whether a formatter was supplied
    pub fn has_formatter(&self) -> bool {
        self.formatter.is_some()
    }

    /// Captured events, oldest first
    pub fn events(&self) -> Vec<LogEvent> {
        self.lock().iter().map(|(event, _)| event.clone()).collect()
    }

    /// Captured formatted records, oldest first
    pub fn records(&self) -> Vec<StructuredRecord> {
        self.lock().iter().map(|(_, record)| record.clone()).collect()
    }

    /// Number of captured events
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether nothing has been captured
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Drop everything captured so far
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<(LogEvent, StructuredRecord)>> {
        self.captured.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Handler for CaptureHandler {
    fn emit(&self, event: &LogEvent) -> Result<(), HandlerError> {
        let record = match &self.formatter {
            Some(formatter) => formatter.format(event),
            None => {
                let mut record = StructuredRecord::new();
                record.insert("message".into(), Value::from(event.message.clone()));
                record.insert("level".into(), Value::from(event.level.as_str()));
                record.insert("logger_name".into(), Value::from(event.name.clone()));
                record
            }
        };

        self.lock().push((event.clone(), record));
        Ok(())
    }
}
