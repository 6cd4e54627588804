//! The in-flight log event

use crate::Level;
use serde_json::{Map, Value};
use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error as StdError;
use std::fmt::Write;
use std::time::{SystemTime, UNIX_EPOCH};

/// Exception context attached to an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionInfo {
    /// Type name of the error value
    pub type_name: String,
    /// The error's `Display` output
    pub message: String,
    /// Error line, one `Caused by:` line per source, then the backtrace if captured
    pub traceback: String,
}

impl ExceptionInfo {
    /// Capture exception info from an error value.
    ///
    /// The type name is the static type of `err`. For a trait object
    /// (`&dyn Error`, `&*Box<dyn Error>`) that is not informative, so the
    /// leading identifier of its `Debug` output is used instead: the struct
    /// or variant name for derived `Debug` impls.
    ///
    /// The backtrace is only included when backtraces are enabled for the
    /// process (`RUST_BACKTRACE` / `RUST_LIB_BACKTRACE`).
    pub fn from_error<E>(err: &E) -> Self
    where
        E: StdError + ?Sized,
    {
        let static_name = std::any::type_name::<E>();
        let type_name = if static_name.starts_with("dyn ") {
            debug_type_name(err).unwrap_or_else(|| static_name.to_string())
        } else {
            static_name.to_string()
        };
        let message = err.to_string();

        let mut traceback = format!("{}: {}", type_name, message);
        let mut source = err.source();
        while let Some(cause) = source {
            let _ = write!(traceback, "\nCaused by: {}", cause);
            source = cause.source();
        }

        let backtrace = Backtrace::capture();
        if backtrace.status() == BacktraceStatus::Captured {
            let _ = write!(traceback, "\n{}", backtrace);
        }

        Self {
            type_name,
            message,
            traceback,
        }
    }
}

/// Leading identifier of the `Debug` output, e.g. `Timeout` for `Timeout { after: 5 }`
fn debug_type_name<E: StdError + ?Sized>(err: &E) -> Option<String> {
    let mut debug = format!("{:?}", err);
    let end = debug
        .find(|c: char| !(c.is_alphanumeric() || c == '_' || c == ':'))
        .unwrap_or(debug.len());
    if end == 0 {
        return None;
    }
    debug.truncate(end);
    Some(debug)
}

/// A single log call, as handed to handlers and formatters.
#[derive(Debug, Clone)]
pub struct LogEvent {
    /// Name of the logger that produced the event
    pub name: String,
    /// Severity
    pub level: Level,
    /// The rendered message
    pub message: String,
    /// Creation instant in seconds since the Unix epoch
    pub created: f64,
    /// Source file of the call site
    pub pathname: String,
    /// Source line of the call site
    pub lineno: u32,
    /// Name of the emitting thread
    pub thread_name: String,
    /// Emitting process id
    pub process: u32,
    /// Caller-supplied attributes, in insertion order
    pub extra: Map<String, Value>,
    /// Exception context, when the call carried an error
    pub exception: Option<ExceptionInfo>,
}

impl LogEvent {
    /// Create an event stamped with the current time, thread and process.
    pub fn new(name: impl Into<String>, level: Level, message: impl Into<String>) -> Self {
        let created = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or_default();

        let thread = std::thread::current();
        let thread_name = thread
            .name()
            .map(String::from)
            .unwrap_or_else(|| format!("{:?}", thread.id()));

        Self {
            name: name.into(),
            level,
            message: message.into(),
            created,
            pathname: String::new(),
            lineno: 0,
            thread_name,
            process: std::process::id(),
            extra: Map::new(),
            exception: None,
        }
    }

    /// Set the call site
    pub fn with_location(mut self, pathname: impl Into<String>, lineno: u32) -> Self {
        self.pathname = pathname.into();
        self.lineno = lineno;
        self
    }

    /// Override the creation instant
    pub fn with_created(mut self, created: f64) -> Self {
        self.created = created;
        self
    }

    /// Add one extra attribute; a repeated key replaces the earlier value
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// Attach exception context
    pub fn with_exception(mut self, exception: ExceptionInfo) -> Self {
        self.exception = Some(exception);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt;

    #[derive(Debug)]
    struct Inner;

    impl fmt::Display for Inner {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "disk full")
        }
    }

    impl StdError for Inner {}

    #[derive(Debug)]
    struct Outer(Inner);

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "could not save invoice")
        }
    }

    impl StdError for Outer {
        fn source(&self) -> Option<&(dyn StdError + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_exception_info_walks_sources() {
        let info = ExceptionInfo::from_error(&Outer(Inner));
        assert!(info.type_name.ends_with("Outer"));
        assert_eq!(info.message, "could not save invoice");
        assert!(info.traceback.contains("could not save invoice"));
        assert!(info.traceback.contains("Caused by: disk full"));
    }

    #[test]
    fn test_exception_info_through_trait_object() {
        let boxed: Box<dyn StdError> = Box::new(Outer(Inner));
        let info = ExceptionInfo::from_error(&*boxed);
        assert_eq!(info.type_name, "Outer");
        assert!(info.traceback.starts_with("Outer: could not save invoice"));
        assert!(info.traceback.contains("Caused by: disk full"));
    }

    #[test]
    fn test_exception_info_from_io_error() {
        let err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.cfg");
        let info = ExceptionInfo::from_error(&err);
        assert!(info.type_name.contains("io"));
        assert_eq!(info.message, "missing.cfg");
    }

    #[test]
    fn test_new_event_is_stamped() {
        let event = LogEvent::new("app", Level::Info, "hello");
        assert!(event.created > 0.0);
        assert_eq!(event.process, std::process::id());
        assert!(!event.thread_name.is_empty());
        assert!(event.extra.is_empty());
        assert!(event.exception.is_none());
    }

    #[test]
    fn test_builder_fields_keep_order() {
        let event = LogEvent::new("app", Level::Info, "hello")
            .with_field("b", 1)
            .with_field("a", "x")
            .with_field("b", 2);
        let keys: Vec<_> = event.extra.keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(event.extra["b"], 2);
    }
}
