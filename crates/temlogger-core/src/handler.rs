//! Output destinations

use crate::{HandlerError, LogEvent};

/// A structured-output destination attached to a [`Logger`](crate::Logger).
///
/// Handlers own their formatting: a handler built with a
/// [`RecordFormatter`](crate::RecordFormatter) shapes records through it,
/// otherwise it uses its transport's native shape.
pub trait Handler: Send + Sync {
    /// Format and deliver one event
    fn emit(&self, event: &LogEvent) -> Result<(), HandlerError>;

    /// Flush anything the sink buffers
    fn flush(&self) -> Result<(), HandlerError> {
        Ok(())
    }
}
